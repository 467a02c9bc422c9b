//! Digital PDF text extraction.

mod extractor;

pub use extractor::DigitalExtractor;
