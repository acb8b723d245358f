use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::storage::ArchiveMode;

/// Persisted front-end settings. The storage root is chosen once and kept
/// for the whole session; changing it later does not move or merge catalogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "Storage path")]
    pub storage_path: PathBuf,

    /// Default mode for `ingest` when the caller does not pick one.
    #[serde(rename = "Archive mode", default)]
    pub archive_mode: ArchiveMode,

    /// Tesseract languages for image OCR.
    #[serde(
        rename = "OCR languages",
        default = "default_languages",
        skip_serializing_if = "is_default_languages"
    )]
    pub ocr_languages: Vec<String>,
}

fn default_languages() -> Vec<String> {
    vec!["eng".to_string()]
}

fn is_default_languages(languages: &[String]) -> bool {
    languages == default_languages().as_slice()
}

impl Config {
    pub fn new<P: Into<PathBuf>>(storage_path: P) -> Self {
        Self {
            storage_path: storage_path.into(),
            archive_mode: ArchiveMode::default(),
            ocr_languages: default_languages(),
        }
    }
}
