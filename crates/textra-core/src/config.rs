//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TextraError};

/// Main configuration for the textra pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextraConfig {
    /// Digital PDF extraction configuration.
    pub pdf: PdfConfig,

    /// OCR fallback configuration.
    pub ocr: OcrConfig,

    /// Image preprocessing configuration.
    pub preprocess: PreprocessConfig,

    /// Output packaging configuration.
    pub output: OutputConfig,
}

/// Digital PDF extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum trimmed text length for embedded text to count as a
    /// valid digital extraction. Anything at or below this falls back
    /// to OCR. Known limitation: documents with legitimately short
    /// embedded text (cover pages) are misclassified as scanned.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            min_text_length: 100,
        }
    }
}

/// OCR fallback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// DPI for rasterizing PDF pages.
    pub render_dpi: u32,

    /// Tesseract language packs, combined with `+`. Two fixed packs
    /// instead of a language-detection step.
    pub languages: String,

    /// Maximum pages to OCR (0 = unlimited). A cap bounds the runtime
    /// on pathological documents with thousands of scanned pages.
    pub max_pages: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            render_dpi: 300,
            languages: "ita+eng".to_string(),
            max_pages: 0,
        }
    }
}

/// Image preprocessing configuration.
///
/// The defaults mirror the parameters the pipeline was tuned with;
/// none of them have been validated against a real scan corpus, so
/// they are exposed here as tunable constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Denoising filter strength (h). Higher removes more noise and
    /// more detail.
    pub denoise_strength: f32,

    /// Patch radius for the denoiser (radius 3 = 7x7 patches).
    pub patch_radius: u32,

    /// Search window radius for the denoiser (radius 10 = 21x21).
    pub search_radius: u32,

    /// Global binarization threshold: below -> black, at/above ->
    /// white. Deliberately not adaptive so output is reproducible.
    pub binarize_threshold: u8,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            denoise_strength: 10.0,
            patch_radius: 3,
            search_radius: 10,
            binarize_threshold: 150,
        }
    }
}

/// Output packaging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Maximum characters in the result text; longer output is
    /// truncated and flagged.
    pub max_chars: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { max_chars: 60_000 }
    }
}

impl TextraConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| TextraError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| TextraError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
