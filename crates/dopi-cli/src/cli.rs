use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "dopi",
    version,
    about = "Archive scanned documents and search them by keyword and content"
)]
pub struct Cli {
    /// Config file to use instead of $DOPI_CONFIG or the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage root to use instead of the configured one
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the storage root and create its catalog
    Init {
        /// Directory that will hold archived files and the catalog
        dir: PathBuf,
    },
    /// Archive a file and record it in the catalog
    Ingest(IngestArgs),
    /// List every catalog entry, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Find entries whose name, keywords, date or content contain a term
    Search {
        /// Case-insensitive substring; empty lists everything
        term: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one entry in full
    Show {
        name: String,
        /// Mark occurrences of this term
        #[arg(long)]
        highlight: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an entry and its archived file
    Delete {
        name: String,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the path of an archived file
    Path { name: String },
    /// Compare the storage root with the catalog
    Audit {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// File to archive; its name becomes the catalog name
    pub file: PathBuf,

    /// Move the file into the storage root instead of copying it
    #[arg(long = "move", conflicts_with = "copy")]
    pub move_file: bool,

    /// Copy the file even when the configured archive mode is move
    #[arg(long)]
    pub copy: bool,

    #[arg(long)]
    pub keyword1: Option<String>,

    #[arg(long)]
    pub keyword2: Option<String>,

    /// Free-form date, stored as given
    #[arg(long)]
    pub date: Option<String>,

    /// Text content; extracted from the file when omitted
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,

    /// Read the text content from this file
    #[arg(long)]
    pub content_file: Option<PathBuf>,

    /// Replace an existing entry without asking
    #[arg(short, long)]
    pub yes: bool,
}
