// Preprocess stage: raw book text -> one token per line in processed/.
//
// Readability is measured here, on the cleaned text, because the token
// files no longer carry sentence boundaries.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::{file_stem, list_files, progress_bar, PROCESSED_SUFFIX};
use crate::analyzer::statistics;
use crate::config::Config;
use crate::output::report;
use crate::preprocess::{cleaner, preprocess_text, TextTokenizer};

/// Output of preprocessing one book.
#[derive(Debug, Clone)]
pub struct ProcessedBook {
    pub name: String,
    pub path: PathBuf,
    pub tokens: usize,
}

/// Preprocess every `.txt` file in the raw directory.
pub fn run(config: &Config, tokenizer: &dyn TextTokenizer) -> Result<Vec<ProcessedBook>> {
    let raw_dir = config.raw_dir();
    let books = list_files(&raw_dir, ".txt")?;
    if books.is_empty() {
        warn!(dir = %raw_dir.display(), "No raw books found; run `novelscope download` first");
        return Ok(Vec::new());
    }

    let processed_dir = config.processed_dir();
    fs::create_dir_all(&processed_dir)
        .with_context(|| format!("Failed to create {}", processed_dir.display()))?;
    let results_dir = config.results_dir();

    let pb = progress_bar(books.len(), "Preprocessing");
    let mut processed = Vec::with_capacity(books.len());
    for path in &books {
        let book = process_book(path, &processed_dir, &results_dir, tokenizer)?;
        pb.inc(1);
        processed.push(book);
    }
    pb.finish_and_clear();

    info!(books = processed.len(), "Preprocessing complete");
    Ok(processed)
}

/// Clean and tokenize one raw file, writing `<stem>_processed.txt`.
pub fn process_book(
    path: &Path,
    processed_dir: &Path,
    results_dir: &Path,
    tokenizer: &dyn TextTokenizer,
) -> Result<ProcessedBook> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let raw = String::from_utf8_lossy(&bytes);

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .with_context(|| format!("Unusable file name: {}", path.display()))?;

    let tokens = preprocess_text(&raw, tokenizer);
    let out_path = processed_dir.join(format!("{name}{PROCESSED_SUFFIX}"));
    fs::write(&out_path, tokens.join("\n"))
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    let readability = statistics::readability(&cleaner::clean_text(&raw));
    report::write_readability(
        &results_dir.join(format!("{}_readability.csv", file_stem(&name))),
        &readability,
    )?;

    info!(book = %name, tokens = tokens.len(), "Preprocessed");
    Ok(ProcessedBook {
        name,
        path: out_path,
        tokens: tokens.len(),
    })
}
