pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod maintenance;
pub mod pipeline;
pub mod sanitize;
pub mod session;
pub mod storage;
pub mod view;

pub use catalog::{Catalog, CatalogError, Document, NewDocument};
pub use config::{load_config, save_config, Config};
pub use error::{ArchiveError, ConfigError, DopiError, ExtractionError, Result};
pub use extract::{DocumentFormat, Extractor, ExtractorRegistry};
pub use maintenance::{audit, AuditReport};
pub use pipeline::{
    AlwaysConfirm, Confirm, DeleteOutcome, DeletePipeline, FileRemoval, IngestOutcome,
    IngestPipeline, IngestRequest, NeverConfirm, PipelineError,
};
pub use session::Session;
pub use storage::{ArchiveMode, Archiver};
