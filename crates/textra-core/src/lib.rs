//! Core library for PDF text extraction with OCR fallback.
//!
//! This crate provides:
//! - Digital PDF text extraction (embedded text objects)
//! - An OCR fallback for scanned documents (rasterize, preprocess,
//!   recognize)
//! - Image preprocessing tuned for OCR accuracy (denoise, binarize,
//!   dilate)
//! - The orchestrating fallback chain with truncation and a
//!   structured result record

pub mod config;
pub mod error;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod result;

pub use config::TextraConfig;
pub use error::{OcrError, PdfError, Result, TextraError};
pub use ocr::{ImagePreprocessor, OcrEngine, OcrStage};
pub use pdf::DigitalExtractor;
pub use pipeline::Extractor;
pub use result::{ExtractionMethod, ExtractionResult, PageText, StageOutcome};

#[cfg(test)]
pub(crate) mod test_support {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    /// Build an in-memory PDF with one page per entry, each carrying
    /// the given text in a base-14 font.
    pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for page_text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![50.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*page_text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode content stream"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("serialize PDF");
        buf
    }
}
