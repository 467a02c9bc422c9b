//! End-to-end tests for the textra binary.
//!
//! Everything on stdout must parse as a single JSON line, success and
//! failure alike. Cases that reach the extraction pipeline need the
//! external poppler/tesseract tools and are skipped when those are
//! not installed.

use std::process::Command as StdCommand;

use assert_cmd::Command;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use predicates::prelude::*;

fn textra() -> Command {
    Command::cargo_bin("textra").expect("binary built")
}

fn ocr_tools_available() -> bool {
    ["pdftoppm", "tesseract"].iter().all(|tool| {
        StdCommand::new(tool)
            .arg("--help")
            .output()
            .is_ok()
    })
}

/// Build a PDF with one page per entry, each carrying the given text.
fn build_pdf(pages: &[&str]) -> Vec<u8> {
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

#[test]
fn missing_argument_is_a_usage_error_payload() {
    textra()
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"error\""))
        .stdout(predicate::str::contains("usage"));
}

#[test]
fn unreadable_file_is_an_error_payload() {
    textra()
        .arg("/no/such/file.pdf")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("\"error\""))
        .stdout(predicate::str::contains("cannot read"));
}

#[test]
fn empty_file_is_an_error_payload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.pdf");
    std::fs::write(&path, b"").unwrap();

    textra()
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("not a valid PDF"));
}

#[test]
fn garbage_file_is_an_error_payload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.pdf");
    std::fs::write(&path, b"this is just some bytes").unwrap();

    textra()
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("not a valid PDF"));
}

#[test]
fn error_payloads_parse_as_json() {
    let output = textra().arg("/no/such/file.pdf").output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let payload: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert!(payload["error"].is_string());
}

#[test]
fn digital_pdf_reports_digital_method() {
    if !ocr_tools_available() {
        eprintln!("skipping: pdftoppm/tesseract not installed");
        return;
    }

    let body = "Embedded digital text that is long enough to clear the \
                quality gate, repeated so the pipeline reports it as a \
                straightforward digital extraction.";
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("digital.pdf");
    std::fs::write(&path, build_pdf(&[body, body, body])).unwrap();

    let output = textra().arg(&path).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let payload: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(payload["extraction_method"], "digital");
    assert_eq!(payload["num_pages"], 3);
    assert_eq!(payload["is_truncated"], false);
    let text = payload["text"].as_str().unwrap();
    assert_eq!(
        payload["character_count"].as_u64().unwrap() as usize,
        text.chars().count()
    );
}

#[test]
fn diagnostics_never_leak_onto_stdout() {
    if !ocr_tools_available() {
        eprintln!("skipping: pdftoppm/tesseract not installed");
        return;
    }

    let body = "Verbose mode diagnostics belong on stderr; the stdout \
                channel must stay a single parseable JSON line even when \
                tracing is turned all the way up for a run.";
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("digital.pdf");
    std::fs::write(&path, build_pdf(&[body])).unwrap();

    let output = textra().arg("-vvv").arg(&path).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim().lines().count(), 1);
    let payload: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(payload["extraction_method"], "digital");
}
