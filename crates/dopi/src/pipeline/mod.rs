//! Ingestion and deletion pipelines.
//!
//! Neither pipeline is transactional across the filesystem and the catalog.
//! Each step commits before the next starts; the step order is what bounds
//! the inconsistency a crash can leave behind.

pub mod confirm;
pub mod delete;
pub mod error;
pub mod ingest;
pub mod progress;

pub use confirm::{AlwaysConfirm, Confirm, FnConfirm, NeverConfirm, Prompt};
pub use delete::{DeleteOutcome, DeletePipeline, DeleteReceipt, FileRemoval};
pub use error::PipelineError;
pub use ingest::{IngestOutcome, IngestPipeline, IngestReceipt, IngestRequest};
pub use progress::{IngestPhase, LogProgress, NoopProgress, ProgressEvent, ProgressReporter};
