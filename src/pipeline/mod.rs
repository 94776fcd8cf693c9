// Pipeline stages: download -> preprocess -> analyze -> themes / compare.
//
// Each stage reads what the previous one left under the data directory, so
// stages can run alone (`novelscope analyze`) or chained (`novelscope all`).
// Stages log with tracing and return anyhow errors; the analysis engines
// they drive stay silent.

pub mod analyze;
pub mod compare;
pub mod download;
pub mod preprocess;
pub mod themes;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use crate::analyzer::FrequencyAnalyzer;

/// Suffix of token files written by the preprocess stage.
pub const PROCESSED_SUFFIX: &str = "_processed.txt";

/// Files in `dir` whose names end with `suffix`, sorted by file name.
///
/// A missing directory yields an empty list.
pub fn list_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(suffix))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Document name of a processed token file (`moby_processed.txt` -> `moby`).
pub fn document_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    file_name
        .strip_suffix(PROCESSED_SUFFIX)
        .map(str::to_string)
}

/// Load every processed token file into a fresh analyzer, in file-name order.
pub fn load_processed(dir: &Path) -> Result<FrequencyAnalyzer> {
    let mut analyzer = FrequencyAnalyzer::new();
    for path in list_files(dir, PROCESSED_SUFFIX)? {
        let Some(name) = document_name(&path) else {
            continue;
        };
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let tokens: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        debug!(document = %name, tokens = tokens.len(), "Loaded processed document");
        if analyzer.add_document(name.clone(), tokens).is_some() {
            warn!(document = %name, "Duplicate document name, keeping the later file");
        }
    }
    Ok(analyzer)
}

fn progress_bar(len: usize, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!("  {label} [{{bar:30}}] {{pos}}/{{len}} ({{eta}})"))
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}

/// Filesystem-safe form of a document name for result file names.
fn file_stem(name: &str) -> String {
    crate::gutenberg::clean_filename(name).replace(' ', "_")
}
