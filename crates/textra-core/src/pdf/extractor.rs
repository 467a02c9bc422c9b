//! Embedded text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use crate::config::PdfConfig;
use crate::error::PdfError;
use crate::result::PageText;

/// Extracts embedded text from digital PDFs.
///
/// Every failure here is soft: it signals "not a usable digital PDF"
/// and the caller falls back to OCR.
pub struct DigitalExtractor {
    min_text_length: usize,
}

impl DigitalExtractor {
    /// Create an extractor with the configured quality gate.
    pub fn new(config: &PdfConfig) -> Self {
        Self {
            min_text_length: config.min_text_length,
        }
    }

    /// Attempt to pull embedded text from the buffer.
    ///
    /// Pages are concatenated in page order with newline delimiters.
    /// Trimmed output must exceed the quality gate to count as valid;
    /// shorter output is treated the same as a parse failure, which
    /// is common for scanned PDFs that only embed a filename or
    /// header as text.
    pub fn extract(&self, data: &[u8]) -> Result<PageText, PdfError> {
        let (raw, pages) = Self::load(data)?;

        let text = pdf_extract::extract_text_from_mem(&raw)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        let trimmed = text.trim();

        let chars = trimmed.chars().count();
        if chars <= self.min_text_length {
            debug!("embedded text below quality gate: {} chars", chars);
            return Err(PdfError::BelowQualityGate(chars));
        }

        debug!("digital extraction: {} pages, {} chars", pages, chars);
        Ok(PageText {
            text: trimmed.to_string(),
            pages,
        })
    }

    /// Parse the document structure and return raw bytes suitable for
    /// text extraction plus the page count.
    ///
    /// PDFs encrypted with an empty password are transparently
    /// decrypted and re-serialized so the text extractor sees plain
    /// streams.
    fn load(data: &[u8]) -> Result<(Vec<u8>, usize), PdfError> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let pages = doc.get_pages().len();
        if pages == 0 {
            return Err(PdfError::NoPages);
        }

        Ok((raw, pages))
    }
}
