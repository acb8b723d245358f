use std::path::Path;

use crate::error::ExtractionError;
use crate::extract::Extractor;

/// Reads the embedded text layer of a PDF. Scanned PDFs without a text
/// layer yield an empty string.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for PdfExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        let _span = tracing::info_span!("extract.pdf").entered();

        let pdf_bytes = std::fs::read(path).map_err(|e| ExtractionError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

        let doc = lopdf::Document::load_mem(&pdf_bytes)
            .map_err(|e| ExtractionError::Pdf(format!("Failed to load PDF: {}", e)))?;

        Ok(extract_pages(&doc))
    }
}

/// Concatenates the text of every page, each followed by a blank line.
/// Pages lopdf cannot decode are skipped.
fn extract_pages(doc: &lopdf::Document) -> String {
    let mut text = String::new();

    for (page_num, _) in doc.get_pages() {
        match doc.extract_text(&[page_num]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push_str("\n\n");
            }
            Err(e) => {
                tracing::warn!("Skipping page {} without decodable text: {}", page_num, e);
            }
        }
    }

    text
}
