// Themes stage: topic model over all documents.

use anyhow::Result;
use tracing::{info, warn};

use crate::analyzer::FrequencyAnalyzer;
use crate::config::Config;
use crate::insights::ThemeAnalyzer;
use crate::output::{report, terminal};

/// Fit topics and write topics.csv, document_topics.csv, dominant_topics.csv.
///
/// Returns `None` (with a warning) for corpora of fewer than two documents.
pub fn run(config: &Config, analyzer: &FrequencyAnalyzer) -> Result<Option<ThemeAnalyzer>> {
    if analyzer.len() < 2 {
        warn!(
            documents = analyzer.len(),
            "Need at least 2 documents for theme analysis; skipping"
        );
        return Ok(None);
    }

    let names = analyzer.document_names();
    let texts: Vec<String> = analyzer
        .store()
        .documents()
        .iter()
        .map(|doc| doc.joined_text())
        .collect();

    let theme_config = config.theme_config(names.len());
    info!(
        documents = names.len(),
        topics = theme_config.n_topics,
        "Fitting topic model"
    );

    let mut themes = ThemeAnalyzer::new(theme_config);
    themes.fit(&texts)?;

    let results_dir = config.results_dir();
    let topics = themes.topics()?;
    report::write_topics(&results_dir.join("topics.csv"), &topics)?;
    report::write_document_topics(
        &results_dir.join("document_topics.csv"),
        &names,
        &themes.document_topics()?,
    )?;
    let dominant = themes.dominant_topic(&names)?;
    report::write_dominant_topics(&results_dir.join("dominant_topics.csv"), &dominant)?;

    terminal::display_topics(&topics);
    terminal::display_dominant_topics(&dominant);

    info!(topics = topics.len(), "Theme analysis complete");
    Ok(Some(themes))
}
