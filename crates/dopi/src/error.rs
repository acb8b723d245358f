use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DopiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] crate::catalog::CatalogError),

    #[error("No archived file for '{name}' at '{path}'")]
    FileMissing { name: String, path: PathBuf },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Could not determine a configuration directory for this platform")]
    NoConfigDir,
}

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Source file not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Source is not a regular file: {0}")]
    NotAFile(PathBuf),

    #[error("Storage root is not an accessible directory: {0}")]
    StorageRootUnavailable(PathBuf),

    #[error("Invalid document name '{0}'")]
    InvalidName(String),

    #[error("Failed to {action} '{from}' to '{to}': {source}")]
    Io {
        action: &'static str,
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read document '{path}': {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to process PDF: {0}")]
    Pdf(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("OCR support is not compiled in (enable the `ocr` feature)")]
    OcrUnavailable,
}

pub type Result<T> = std::result::Result<T, DopiError>;
