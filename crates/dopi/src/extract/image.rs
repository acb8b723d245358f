//! OCR for scanned images. Needs the native Tesseract library, so the real
//! implementation is only built with the `ocr` feature.

use std::path::Path;

use crate::error::ExtractionError;
use crate::extract::Extractor;

pub struct ImageExtractor {
    languages: String,
}

impl ImageExtractor {
    /// `languages` are Tesseract language codes, joined as `eng+deu`.
    /// Empty means English.
    pub fn new(languages: &[String]) -> Self {
        let languages = if languages.is_empty() {
            "eng".to_string()
        } else {
            languages.join("+")
        };
        Self { languages }
    }

    pub fn languages(&self) -> &str {
        &self.languages
    }
}

impl Extractor for ImageExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        let _span = tracing::info_span!("extract.ocr").entered();

        let image_data = std::fs::read(path).map_err(|e| ExtractionError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

        ocr_image_bytes(&image_data, &self.languages)
    }
}

#[cfg(feature = "ocr")]
fn ocr_image_bytes(image_data: &[u8], languages: &str) -> Result<String, ExtractionError> {
    use std::io::Cursor;

    let img = image::load_from_memory(image_data)
        .map_err(|e| ExtractionError::Ocr(format!("Failed to load image: {}", e)))?;

    // leptess reads PNG reliably; normalize every input format to it.
    let mut png_data = Vec::new();
    img.write_to(&mut Cursor::new(&mut png_data), image::ImageFormat::Png)
        .map_err(|e| ExtractionError::Ocr(format!("Failed to convert image: {}", e)))?;

    let mut lt = leptess::LepTess::new(None, languages)
        .map_err(|e| ExtractionError::Ocr(format!("Failed to initialize Tesseract: {}", e)))?;

    lt.set_image_from_mem(&png_data)
        .map_err(|e| ExtractionError::Ocr(format!("Failed to set image for OCR: {}", e)))?;

    lt.get_utf8_text()
        .map_err(|e| ExtractionError::Ocr(format!("OCR failed: {}", e)))
}

#[cfg(not(feature = "ocr"))]
fn ocr_image_bytes(_image_data: &[u8], _languages: &str) -> Result<String, ExtractionError> {
    Err(ExtractionError::OcrUnavailable)
}
