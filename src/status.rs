// System status display: data directory contents and last analysis run.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::pipeline::{list_files, PROCESSED_SUFFIX};

/// Display system status to the terminal.
pub fn show(config: &Config) -> Result<()> {
    let data_dir = &config.data_dir;
    if !data_dir.exists() {
        println!("Data directory: {} (not created yet)", data_dir.display());
        println!("\nRun `novelscope download --book-ids 1342 2701` to fetch some books.");
        return Ok(());
    }
    println!("Data directory: {}", data_dir.display());

    let raw = list_files(&config.raw_dir(), ".txt")?;
    let raw_bytes: u64 = raw
        .iter()
        .filter_map(|path| fs::metadata(path).ok())
        .map(|m| m.len())
        .sum();
    println!("Raw books: {} ({})", raw.len(), format_bytes(raw_bytes));

    let processed = list_files(&config.processed_dir(), PROCESSED_SUFFIX)?;
    if processed.is_empty() {
        println!("Processed books: none");
        println!("  Run `novelscope preprocess` to tokenize them");
    } else {
        println!("Processed books: {}", processed.len());
    }

    let results = config.results_dir();
    let csv_count = list_files(&results, ".csv")?.len();
    println!("Result files: {csv_count} CSV");

    match last_run(&results.join("summary.json"))? {
        Some(when) => println!("Last analysis: {when}"),
        None => {
            println!("Last analysis: never");
            println!("  Run `novelscope analyze` to build the reports");
        }
    }

    Ok(())
}

/// `generated_at` of a previous run's summary, if one exists.
fn last_run(summary_path: &Path) -> Result<Option<String>> {
    if !summary_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(summary_path)
        .with_context(|| format!("Failed to read {}", summary_path.display()))?;
    let summary: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", summary_path.display()))?;
    Ok(summary
        .get("generated_at")
        .and_then(|v| v.as_str())
        .map(str::to_string))
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
