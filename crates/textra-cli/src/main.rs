//! CLI for PDF text extraction with OCR fallback.
//!
//! Stdout carries exactly one line of JSON per invocation: the result
//! record on success, `{"error": ...}` on failure. Diagnostics go to
//! stderr so callers keep a single parse path.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use serde_json::json;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use textra_core::{Extractor, OcrEngine, TextraConfig};

/// Extract plain text from a PDF, falling back to OCR for scanned documents
#[derive(Parser)]
#[command(name = "textra")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// PDF file to extract
    input: PathBuf,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Rasterization DPI for the OCR fallback
    #[arg(long)]
    dpi: Option<u32>,

    /// Tesseract language packs, combined with '+' (e.g. "ita+eng")
    #[arg(long)]
    languages: Option<String>,

    /// Cap the number of pages the OCR fallback processes (0 = unlimited)
    #[arg(long)]
    max_pages: Option<usize>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(_) => return fail("usage: textra [OPTIONS] <INPUT>"),
    };

    // Set up logging based on verbosity; stderr only, stdout is the
    // JSON channel.
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    match run(cli) {
        Ok(line) => {
            println!("{}", line);
            ExitCode::SUCCESS
        }
        Err(err) => fail(&format!("{:#}", err)),
    }
}

fn run(cli: Cli) -> anyhow::Result<String> {
    let mut config = match &cli.config {
        Some(path) => TextraConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => TextraConfig::default(),
    };
    if let Some(dpi) = cli.dpi {
        config.ocr.render_dpi = dpi;
    }
    if let Some(languages) = cli.languages {
        config.ocr.languages = languages;
    }
    if let Some(max_pages) = cli.max_pages {
        config.ocr.max_pages = max_pages;
    }

    let data = fs::read(&cli.input)
        .with_context(|| format!("cannot read {}", cli.input.display()))?;
    if data.is_empty() || !data.starts_with(b"%PDF") {
        anyhow::bail!("not a valid PDF: {}", cli.input.display());
    }

    // Fatal before any processing; soft stage failures inside the
    // pipeline are handled by the fallback chain instead.
    OcrEngine::check_dependencies()?;

    let result = Extractor::new(config).extract(&data);
    Ok(serde_json::to_string(&result)?)
}

fn fail(message: &str) -> ExitCode {
    println!("{}", json!({ "error": message }));
    ExitCode::FAILURE
}
