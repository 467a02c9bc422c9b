//! Result record produced by the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Which stage produced the final text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Embedded text pulled straight from PDF page objects.
    Digital,
    /// Text recovered from rasterized pages by OCR.
    Ocr,
    /// Neither stage produced usable text.
    Failed,
}

/// Text recovered by a single stage, with the page count it covered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// Per-page text joined with newline delimiters, in page order.
    pub text: String,
    /// Number of pages the stage saw.
    pub pages: usize,
}

/// Outcome of the fallback chain before truncation and packaging.
///
/// A tagged variant instead of sentinel empty strings, so "stage
/// declined" is explicit and the finalization step stays a pure
/// function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// Digital extraction passed the quality gate.
    Digital(PageText),
    /// OCR fallback recovered text.
    Ocr(PageText),
    /// Both stages declined.
    Failed,
}

/// The output record for one extraction invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted text, truncated to the configured character limit.
    pub text: String,
    /// Number of pages in the document (0 when extraction failed).
    pub num_pages: usize,
    /// True iff the pre-truncation text exceeded the limit.
    pub is_truncated: bool,
    /// Character count of `text` after truncation.
    pub character_count: usize,
    /// Stage that produced the text.
    pub extraction_method: ExtractionMethod,
}
