use dopi::{CatalogError, ConfigError, DopiError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Dopi(#[from] DopiError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no storage root configured; run `dopi init <DIR>` or pass --root")]
    NoStorageRoot,

    #[error("no catalog entry named '{0}'")]
    NotFound(String),

    #[error("{0}")]
    Pipeline(String),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Dopi(e.into())
    }
}

impl From<CatalogError> for Error {
    fn from(e: CatalogError) -> Self {
        Self::Dopi(e.into())
    }
}
