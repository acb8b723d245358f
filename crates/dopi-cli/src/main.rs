mod cli;
mod commands;
mod error;
mod prompt;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use commands::Settings;

fn init_tracing(verbose: u8, quiet: bool) -> error::Result<()> {
    let filter = if let Ok(env) = std::env::var("DOPI_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| error::Error::Logging(e.to_string()))?;

    // The library logs through the `log` facade.
    tracing_log::LogTracer::init().map_err(|e| error::Error::Logging(e.to_string()))?;
    Ok(())
}

fn run(cli: Cli) -> error::Result<()> {
    let settings = Settings::resolve(cli.config, cli.root)?;

    match cli.command {
        Command::Init { dir } => commands::init(&settings, &dir),
        Command::Ingest(args) => commands::ingest(&settings, args),
        Command::List { json } => commands::list(&settings, json),
        Command::Search { term, json } => commands::search(&settings, &term, json),
        Command::Show {
            name,
            highlight,
            json,
        } => commands::show(&settings, &name, highlight.as_deref(), json),
        Command::Delete { name, yes } => commands::delete(&settings, &name, yes),
        Command::Path { name } => commands::path(&settings, &name),
        Command::Audit { json } => commands::audit(&settings, json),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_tracing(cli.verbose, cli.quiet) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
