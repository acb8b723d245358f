use thiserror::Error;

use crate::catalog::CatalogError;
use crate::error::ArchiveError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Archiving failed: {0}")]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Document name '{name}' does not match the source file name '{file_name}'")]
    NameMismatch { name: String, file_name: String },
}
