//! Text extraction from source documents.
//!
//! The archive engine treats extracted text as opaque; these extractors are
//! the default collaborators a front end plugs in before ingesting.

pub mod image;
pub mod pdf;
pub mod text;

use std::path::Path;

use crate::error::ExtractionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Text,
    Image,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" | "text" | "md" => Some(Self::Text),
            "png" | "jpg" | "jpeg" | "tiff" | "tif" | "bmp" => Some(Self::Image),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Produces the text content of a document.
pub trait Extractor: Send + Sync {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError>;
}

impl<F> Extractor for F
where
    F: Fn(&Path) -> Result<String, ExtractionError> + Send + Sync,
{
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        self(path)
    }
}

/// Dispatches to the extractor for the file's format.
pub struct ExtractorRegistry {
    pdf: pdf::PdfExtractor,
    text: text::TextExtractor,
    image: image::ImageExtractor,
}

impl ExtractorRegistry {
    pub fn new(ocr_languages: &[String]) -> Self {
        Self {
            pdf: pdf::PdfExtractor::new(),
            text: text::TextExtractor::new(),
            image: image::ImageExtractor::new(ocr_languages),
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl Extractor for ExtractorRegistry {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let format = DocumentFormat::from_extension(extension)
            .ok_or_else(|| ExtractionError::UnsupportedFormat(extension.to_string()))?;

        let _span = tracing::info_span!("extract", format = ?format).entered();
        match format {
            DocumentFormat::Pdf => self.pdf.extract_text(path),
            DocumentFormat::Text => self.text.extract_text(path),
            DocumentFormat::Image => self.image.extract_text(path),
        }
    }
}
