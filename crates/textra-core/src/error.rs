//! Error types for the textra-core library.

use thiserror::Error;

/// Main error type for the textra library.
#[derive(Error, Debug)]
pub enum TextraError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to digital PDF text extraction.
///
/// All of these are soft failures from the pipeline's point of view:
/// the orchestrator routes them into the OCR fallback.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract embedded text from the PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Embedded text is below the quality gate (typical for scanned
    /// PDFs carrying only a filename or header as text).
    #[error("embedded text too short: {0} chars")]
    BelowQualityGate(usize),
}

/// Errors related to the OCR fallback stage.
#[derive(Error, Debug)]
pub enum OcrError {
    /// A required external tool is not installed.
    #[error("missing dependency: {0}")]
    MissingDependency(String),

    /// Rasterizing the PDF to page images failed.
    #[error("rasterization failed: {0}")]
    Rasterize(String),

    /// Rasterization produced no page images.
    #[error("no pages produced by rasterizer")]
    NoPages,

    /// A tesseract invocation failed.
    #[error("tesseract failed: {0}")]
    Engine(String),

    /// Temp-file bookkeeping around the OCR scratch directory failed.
    #[error("scratch I/O failed: {0}")]
    Scratch(String),
}

/// Result type for the textra library.
pub type Result<T> = std::result::Result<T, TextraError>;
