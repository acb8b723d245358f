use std::path::{Path, PathBuf};

use tracing::{info_span, warn};

use crate::catalog::{Document, NewDocument};
use crate::error::ExtractionError;
use crate::extract::Extractor;
use crate::sanitize;
use crate::session::Session;
use crate::storage::{validate_name, ArchiveMode, Placement};

use super::confirm::Confirm;
use super::error::PipelineError;
use super::progress::{IngestPhase, NoopProgress, ProgressEvent, ProgressReporter};

/// A candidate record plus the file it describes.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub source: PathBuf,
    pub document: NewDocument,
    pub mode: ArchiveMode,
}

impl IngestRequest {
    /// Starts a request for `source`; the record name is the file's base name.
    pub fn new<P: Into<PathBuf>>(source: P, mode: ArchiveMode) -> Self {
        let source = source.into();
        let name = file_name(&source);
        Self {
            source,
            document: NewDocument {
                name,
                ..Default::default()
            },
            mode,
        }
    }

    pub fn keyword1(mut self, keyword: impl Into<String>) -> Self {
        self.document.keyword1 = Some(keyword.into());
        self
    }

    pub fn keyword2(mut self, keyword: impl Into<String>) -> Self {
        self.document.keyword2 = Some(keyword.into());
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.document.date = Some(date.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.document.content = content.into();
        self
    }

    /// Fills the content from the source file.
    pub fn extract_content(self, extractor: &dyn Extractor) -> Result<Self, ExtractionError> {
        let text = extractor.extract_text(&self.source)?;
        Ok(self.content(text))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// A completed ingestion.
#[derive(Debug)]
pub struct IngestReceipt {
    pub id: i64,
    pub name: String,
    /// An existing record was replaced after confirmation.
    pub replaced_record: bool,
    pub placement: Placement,
    /// The refreshed listing, or `None` if it could not be read back.
    pub view: Option<Vec<Document>>,
}

/// Terminal state of an ingestion.
#[derive(Debug)]
pub enum IngestOutcome {
    Done(IngestReceipt),
    /// Overwrite was declined; nothing was touched.
    Aborted { name: String },
    Failed {
        phase: IngestPhase,
        error: PipelineError,
        /// Set when the file reached the storage root but the catalog write failed.
        archived: Option<PathBuf>,
    },
}

impl IngestOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub fn message(&self) -> String {
        match self {
            Self::Done(receipt) => {
                let action = if receipt.replaced_record {
                    "updated"
                } else {
                    "added"
                };
                format!("{}. Catalog entry {}.", receipt.placement.message(), action)
            }
            Self::Aborted { name } => format!("Kept the existing entry for '{}'.", name),
            Self::Failed {
                error,
                archived: Some(path),
                ..
            } => format!(
                "{}. The file was archived at '{}' but has no catalog entry.",
                error,
                path.display()
            ),
            Self::Failed { error, .. } => format!("{}. The catalog was not changed.", error),
        }
    }
}

/// Files a document: conflict check, archive, then catalog write.
///
/// The filesystem is always written before the catalog, so a failure can
/// leave an archived file without a record but never a record without a file.
pub struct IngestPipeline<'a> {
    session: &'a Session,
    confirm: &'a dyn Confirm,
    progress: &'a dyn ProgressReporter,
}

impl<'a> IngestPipeline<'a> {
    pub fn new(session: &'a Session, confirm: &'a dyn Confirm) -> Self {
        Self {
            session,
            confirm,
            progress: &NoopProgress,
        }
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn run(&self, request: IngestRequest) -> IngestOutcome {
        let filename = sanitize::redact_path(&request.source);
        let _pipeline_span = info_span!("ingest",
            filename = %filename,
            mode = %request.mode,
        )
        .entered();

        let name = request.document.name.clone();

        // Collecting
        {
            let _step = info_span!("collect").entered();
            self.phase(IngestPhase::Collecting, "Checking the document record...");
            if let Err(e) = self.step_collect(&request) {
                return self.fail(IngestPhase::Collecting, e, None);
            }
        }

        // ConflictCheck
        let replaced_record = {
            let _step = info_span!("conflict_check").entered();
            self.phase(IngestPhase::ConflictCheck, "Looking for an existing record...");
            match self.session.catalog().find_by_name(&name) {
                Ok(Some(_)) => {
                    if !self.confirm.confirm_overwrite(&name) {
                        self.progress.report(ProgressEvent::Aborted { name: name.clone() });
                        return IngestOutcome::Aborted { name };
                    }
                    true
                }
                Ok(None) => false,
                Err(e) => return self.fail(IngestPhase::ConflictCheck, e.into(), None),
            }
        };

        // Archiving
        let placement = {
            let _step = info_span!("archive").entered();
            self.phase(IngestPhase::Archiving, "Placing the file in the storage root...");
            match self.session.archiver().place(&request.source, request.mode) {
                Ok(placement) => placement,
                Err(e) => return self.fail(IngestPhase::Archiving, e.into(), None),
            }
        };

        // Committing
        let id = {
            let _step = info_span!("commit").entered();
            self.phase(IngestPhase::Committing, "Writing the catalog record...");
            match self.session.catalog().upsert(&request.document) {
                Ok(id) => id,
                Err(e) => {
                    warn!("Catalog write failed after archiving {}", name);
                    return self.fail(
                        IngestPhase::Committing,
                        e.into(),
                        Some(placement.path.clone()),
                    );
                }
            }
        };

        // Done
        let view = match self.session.refresh() {
            Ok(view) => Some(view),
            Err(e) => {
                warn!("Could not refresh the listing after ingesting {}: {}", name, e);
                None
            }
        };
        self.phase(IngestPhase::Done, placement.message());
        self.progress.report(ProgressEvent::Completed {
            name: name.clone(),
            id,
        });

        IngestOutcome::Done(IngestReceipt {
            id,
            name,
            replaced_record,
            placement,
            view,
        })
    }

    fn step_collect(&self, request: &IngestRequest) -> Result<(), PipelineError> {
        let name = &request.document.name;
        validate_name(name)?;

        let file_name = file_name(&request.source);
        if *name != file_name {
            return Err(PipelineError::NameMismatch {
                name: name.clone(),
                file_name,
            });
        }
        Ok(())
    }

    fn phase(&self, phase: IngestPhase, message: &str) {
        self.progress.report(ProgressEvent::Phase {
            phase,
            message: message.to_string(),
        });
    }

    fn fail(
        &self,
        phase: IngestPhase,
        error: PipelineError,
        archived: Option<PathBuf>,
    ) -> IngestOutcome {
        self.progress.report(ProgressEvent::Failed {
            phase,
            error: error.to_string(),
        });
        IngestOutcome::Failed {
            phase,
            error,
            archived,
        }
    }
}
