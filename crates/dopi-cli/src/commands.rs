use std::path::{Path, PathBuf};

use dopi::config::{default_config_path, load_config, save_config};
use dopi::maintenance::AuditReport;
use dopi::pipeline::{DeleteOutcome, IngestOutcome, LogProgress};
use dopi::view;
use dopi::{
    ArchiveMode, Config, DeletePipeline, Document, Extractor, ExtractorRegistry, IngestPipeline,
    IngestRequest, Session,
};

use crate::cli::IngestArgs;
use crate::error::{Error, Result};
use crate::prompt::StdinConfirm;

const HIGHLIGHT_OPEN: &str = "\x1b[1;33m";
const HIGHLIGHT_CLOSE: &str = "\x1b[0m";

/// Where settings come from for one invocation.
pub struct Settings {
    pub config_path: PathBuf,
    pub config: Option<Config>,
    pub root_override: Option<PathBuf>,
}

impl Settings {
    /// A missing config file is not an error; `--root` may stand in for it.
    pub fn resolve(config: Option<PathBuf>, root: Option<PathBuf>) -> Result<Self> {
        let config_path = match config {
            Some(path) => path,
            None => default_config_path()?,
        };
        let config = if config_path.is_file() {
            Some(load_config(&config_path)?)
        } else {
            tracing::debug!("No config file at {}", config_path.display());
            None
        };
        Ok(Self {
            config_path,
            config,
            root_override: root,
        })
    }

    pub fn storage_root(&self) -> Result<PathBuf> {
        self.root_override
            .clone()
            .or_else(|| self.config.as_ref().map(|c| c.storage_path.clone()))
            .ok_or(Error::NoStorageRoot)
    }

    pub fn archive_mode(&self) -> ArchiveMode {
        self.config
            .as_ref()
            .map(|c| c.archive_mode)
            .unwrap_or_default()
    }

    pub fn ocr_languages(&self) -> Vec<String> {
        self.config
            .as_ref()
            .map(|c| c.ocr_languages.clone())
            .unwrap_or_default()
    }

    pub fn open_session(&self) -> Result<Session> {
        let root = self.storage_root()?;
        Ok(Session::open(&root)?)
    }
}

pub fn init(settings: &Settings, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let dir = std::fs::canonicalize(dir)?;

    let mut config = settings
        .config
        .clone()
        .unwrap_or_else(|| Config::new(&dir));
    config.storage_path = dir.clone();
    save_config(&settings.config_path, &config)?;

    let session = Session::open(&dir)?;
    println!(
        "Storage root set to {} ({} documents)",
        dir.display(),
        session.catalog().count()?
    );
    tracing::info!("Saved config to {}", settings.config_path.display());
    Ok(())
}

pub fn ingest(settings: &Settings, args: IngestArgs) -> Result<()> {
    let session = settings.open_session()?;
    let mode = archive_mode(settings, &args);

    let mut request = IngestRequest::new(&args.file, mode);
    if let Some(keyword) = args.keyword1 {
        request = request.keyword1(keyword);
    }
    if let Some(keyword) = args.keyword2 {
        request = request.keyword2(keyword);
    }
    if let Some(date) = args.date {
        request = request.date(date);
    }
    request = match (args.content, args.content_file) {
        (Some(content), _) => request.content(content),
        (None, Some(path)) => request.content(std::fs::read_to_string(path)?),
        (None, None) => extract_or_empty(request, &settings.ocr_languages()),
    };

    let confirm = StdinConfirm::new(args.yes);
    let outcome = IngestPipeline::new(&session, &confirm)
        .with_progress(&LogProgress)
        .run(request);

    let message = outcome.message();
    match outcome {
        IngestOutcome::Done(receipt) => {
            println!("{} (id {})", message, receipt.id);
            Ok(())
        }
        IngestOutcome::Aborted { .. } => {
            println!("{}", message);
            Ok(())
        }
        IngestOutcome::Failed { .. } => Err(Error::Pipeline(message)),
    }
}

/// `--move` and `--copy` override the configured mode.
fn archive_mode(settings: &Settings, args: &IngestArgs) -> ArchiveMode {
    if args.move_file {
        ArchiveMode::Move
    } else if args.copy {
        ArchiveMode::Copy
    } else {
        settings.archive_mode()
    }
}

/// Extraction failures are not fatal; the document is filed without text.
fn extract_or_empty(request: IngestRequest, languages: &[String]) -> IngestRequest {
    let registry = ExtractorRegistry::new(languages);
    match registry.extract_text(&request.source) {
        Ok(text) => request.content(text),
        Err(e) => {
            tracing::warn!(
                "No text extracted from {}: {}",
                request.source.display(),
                e
            );
            request
        }
    }
}

pub fn list(settings: &Settings, json: bool) -> Result<()> {
    let session = settings.open_session()?;
    print_documents(&session.catalog().list_all()?, json)
}

pub fn search(settings: &Settings, term: &str, json: bool) -> Result<()> {
    let mut session = settings.open_session()?;
    print_documents(&session.search(term)?, json)
}

fn print_documents(docs: &[Document], json: bool) -> Result<()> {
    let rows: Vec<_> = docs.iter().map(view::summary).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in &rows {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            row.id, row.name, row.keyword1, row.keyword2, row.date, row.content
        );
    }
    tracing::info!("{} documents", rows.len());
    Ok(())
}

pub fn show(settings: &Settings, name: &str, highlight: Option<&str>, json: bool) -> Result<()> {
    let session = settings.open_session()?;
    let doc = session
        .catalog()
        .find_by_name(name)?
        .ok_or_else(|| Error::NotFound(name.to_string()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    let detail = view::detail(&doc);
    match highlight {
        Some(term) => print!(
            "{}",
            view::highlight(&detail, term, HIGHLIGHT_OPEN, HIGHLIGHT_CLOSE)
        ),
        None => print!("{}", detail),
    }
    Ok(())
}

pub fn delete(settings: &Settings, name: &str, yes: bool) -> Result<()> {
    let session = settings.open_session()?;
    let confirm = StdinConfirm::new(yes);
    let outcome = DeletePipeline::new(&session, &confirm).run(name);

    let message = outcome.message();
    match outcome {
        DeleteOutcome::Failed { .. } => Err(Error::Pipeline(message)),
        DeleteOutcome::Done(receipt) if !receipt.record_removed => {
            println!("No catalog entry named '{}'.", name);
            Ok(())
        }
        _ => {
            println!("{}", message);
            Ok(())
        }
    }
}

pub fn path(settings: &Settings, name: &str) -> Result<()> {
    let session = settings.open_session()?;
    println!("{}", session.archived_path(name)?.display());
    Ok(())
}

pub fn audit(settings: &Settings, json: bool) -> Result<()> {
    let session = settings.open_session()?;
    let report = dopi::audit(&session)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_audit(&report);
    }
    Ok(())
}

fn print_audit(report: &AuditReport) {
    if report.is_consistent() {
        println!("Storage root and catalog agree.");
        return;
    }
    for name in &report.orphan_files {
        println!("orphan file\t{}", name);
    }
    for name in &report.dangling_rows {
        println!("missing file\t{}", name);
    }
}
