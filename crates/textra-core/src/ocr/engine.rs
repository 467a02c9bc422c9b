//! OCR engine driving pdftoppm rasterization and tesseract.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::config::{OcrConfig, PreprocessConfig};
use crate::error::OcrError;
use crate::result::PageText;

use super::preprocessing::ImagePreprocessor;

/// A fallible OCR stage the orchestrator can fall back to.
///
/// Behind a trait so the fallback chain is testable with a mock that
/// records whether OCR was invoked at all.
pub trait OcrStage {
    /// Recover text from a PDF buffer via rasterization and OCR.
    fn extract(&self, data: &[u8]) -> Result<PageText, OcrError>;
}

/// OCR engine backed by external poppler/tesseract tools.
///
/// Rasterizes every page at the configured DPI inside a scratch
/// directory that is removed on all exit paths, preprocesses each
/// page image, and runs tesseract with a fixed combined language
/// model so no language-detection step is needed.
pub struct OcrEngine {
    config: OcrConfig,
    preprocessor: ImagePreprocessor,
}

impl OcrEngine {
    /// Create an engine from configuration.
    pub fn new(config: OcrConfig, preprocess: &PreprocessConfig) -> Self {
        Self {
            config,
            preprocessor: ImagePreprocessor::new(preprocess),
        }
    }

    /// Verify the external tools are installed.
    ///
    /// Run before any processing begins; a missing tool is fatal for
    /// the whole invocation, not a soft stage failure.
    pub fn check_dependencies() -> crate::error::Result<()> {
        for (tool, probe) in [("pdftoppm", "-v"), ("tesseract", "--version")] {
            Command::new(tool)
                .arg(probe)
                .output()
                .map_err(|_| OcrError::MissingDependency(tool.to_string()))?;
        }
        Ok(())
    }

    /// Rasterize the PDF into per-page PNGs under `dir`.
    ///
    /// Returns the page image paths in page order; pdftoppm
    /// zero-pads page numbers so a filename sort is page order.
    fn rasterize(&self, data: &[u8], dir: &Path) -> Result<Vec<PathBuf>, OcrError> {
        let input = dir.join("input.pdf");
        fs::write(&input, data).map_err(|e| OcrError::Scratch(e.to_string()))?;

        let output = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(self.config.render_dpi.to_string())
            .arg(&input)
            .arg(dir.join("page"))
            .output()
            .map_err(|e| OcrError::Rasterize(e.to_string()))?;

        if !output.status.success() {
            return Err(OcrError::Rasterize(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let mut pages: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| OcrError::Scratch(e.to_string()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension().is_some_and(|ext| ext == "png")
                    && path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.starts_with("page"))
            })
            .collect();
        pages.sort();
        Ok(pages)
    }

    /// Preprocess one page image and run tesseract on it.
    fn ocr_page(&self, page_png: &Path) -> Result<String, OcrError> {
        let raster = image::open(page_png)
            .map_err(|e| OcrError::Rasterize(format!("{}: {}", page_png.display(), e)))?;

        let processed = self.preprocessor.preprocess(&raster);
        let processed_path = page_png.with_extension("proc.png");
        processed
            .save(&processed_path)
            .map_err(|e| OcrError::Scratch(e.to_string()))?;

        let output = Command::new("tesseract")
            .arg(&processed_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.languages)
            .output()
            .map_err(|e| OcrError::Engine(e.to_string()))?;

        if !output.status.success() {
            return Err(OcrError::Engine(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(strip_form_feeds(&String::from_utf8_lossy(&output.stdout)))
    }
}

impl OcrStage for OcrEngine {
    fn extract(&self, data: &[u8]) -> Result<PageText, OcrError> {
        // TempDir removes the scratch space on drop, whatever path we
        // leave through.
        let scratch = tempfile::tempdir().map_err(|e| OcrError::Scratch(e.to_string()))?;

        let mut pages = self.rasterize(data, scratch.path())?;
        if pages.is_empty() {
            return Err(OcrError::NoPages);
        }
        if self.config.max_pages > 0 && pages.len() > self.config.max_pages {
            warn!(
                "capping OCR at {} of {} pages",
                self.config.max_pages,
                pages.len()
            );
            pages.truncate(self.config.max_pages);
        }

        debug!("rasterized {} pages at {} dpi", pages.len(), self.config.render_dpi);

        let mut text = String::new();
        for (i, page) in pages.iter().enumerate() {
            match self.ocr_page(page) {
                Ok(page_text) if !page_text.trim().is_empty() => {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(page_text.trim());
                }
                Ok(_) => {
                    debug!("no text detected on page {}", i + 1);
                }
                Err(e) => {
                    warn!("OCR failed for page {}: {}", i + 1, e);
                }
            }
        }

        Ok(PageText {
            text,
            pages: pages.len(),
        })
    }
}

/// Tesseract emits a trailing form feed per page on stdout.
fn strip_form_feeds(text: &str) -> String {
    text.replace('\u{000C}', "")
}
