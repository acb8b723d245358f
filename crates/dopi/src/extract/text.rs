use std::path::Path;

use crate::error::ExtractionError;
use crate::extract::Extractor;

pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for TextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        std::fs::read_to_string(path).map_err(|e| ExtractionError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_extract_text_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Hello, World!").unwrap();
        writeln!(temp_file, "This is a test document.").unwrap();

        let text = TextExtractor::new().extract_text(temp_file.path()).unwrap();

        assert_eq!(text, "Hello, World!\nThis is a test document.\n");
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), [0xff, 0xfe, 0x00]).unwrap();

        let result = TextExtractor::new().extract_text(temp_file.path());
        assert!(matches!(result, Err(ExtractionError::ReadDocument { .. })));
    }
}
