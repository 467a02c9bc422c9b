//! Extraction orchestrator: digital text first, OCR fallback,
//! truncation and packaging.

use tracing::debug;

use crate::config::TextraConfig;
use crate::ocr::{OcrEngine, OcrStage};
use crate::pdf::DigitalExtractor;
use crate::result::{ExtractionMethod, ExtractionResult, StageOutcome};

/// The two-stage fallback chain.
///
/// Digital extraction is cheap and lossless when available; OCR costs
/// seconds per page and is lossy, so it runs strictly as a fallback,
/// never speculatively. Each stage is attempted exactly once and the
/// two outputs are never mixed for one document.
pub struct Extractor {
    config: TextraConfig,
    digital: DigitalExtractor,
    ocr: OcrEngine,
}

impl Extractor {
    /// Create an extractor from configuration.
    pub fn new(config: TextraConfig) -> Self {
        let digital = DigitalExtractor::new(&config.pdf);
        let ocr = OcrEngine::new(config.ocr.clone(), &config.preprocess);
        Self {
            config,
            digital,
            ocr,
        }
    }

    /// Run the full fallback chain on a PDF buffer.
    ///
    /// Stage failures never escape: they are logged and drive the
    /// fallback, ending at method `failed` in the worst case.
    pub fn extract(&self, data: &[u8]) -> ExtractionResult {
        self.extract_with(data, &self.ocr)
    }

    /// Run the chain with an explicit OCR stage.
    pub fn extract_with(&self, data: &[u8], ocr: &dyn OcrStage) -> ExtractionResult {
        finalize(self.resolve(data, ocr), self.config.output.max_chars)
    }

    fn resolve(&self, data: &[u8], ocr: &dyn OcrStage) -> StageOutcome {
        match self.digital.extract(data) {
            Ok(page_text) => return StageOutcome::Digital(page_text),
            Err(e) => debug!("digital extraction declined: {}", e),
        }

        match ocr.extract(data) {
            Ok(page_text) if !page_text.text.is_empty() => StageOutcome::Ocr(page_text),
            Ok(_) => {
                debug!("OCR produced no text");
                StageOutcome::Failed
            }
            Err(e) => {
                debug!("OCR extraction failed: {}", e);
                StageOutcome::Failed
            }
        }
    }
}

/// Pure finalization of a stage outcome: tag the method, truncate to
/// the character limit, count what remains.
pub fn finalize(outcome: StageOutcome, max_chars: usize) -> ExtractionResult {
    let (text, pages, method) = match outcome {
        StageOutcome::Digital(p) => (p.text, p.pages, ExtractionMethod::Digital),
        StageOutcome::Ocr(p) => (p.text, p.pages, ExtractionMethod::Ocr),
        StageOutcome::Failed => (String::new(), 0, ExtractionMethod::Failed),
    };

    let (text, is_truncated) = truncate_chars(text, max_chars);
    let character_count = text.chars().count();

    ExtractionResult {
        text,
        num_pages: pages,
        is_truncated,
        character_count,
        extraction_method: method,
    }
}

/// Truncate to at most `max_chars` Unicode scalars, on a char
/// boundary.
fn truncate_chars(text: String, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            let mut truncated = text;
            truncated.truncate(byte_idx);
            (truncated, true)
        }
        None => (text, false),
    }
}
