//! OCR fallback pipeline: rasterization, preprocessing, recognition.

mod engine;
mod preprocessing;

pub use engine::{OcrEngine, OcrStage};
pub use preprocessing::ImagePreprocessor;
