// Analyze stage: frequency reports per document, corpus-wide and pairwise.

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use super::{file_stem, load_processed};
use crate::analyzer::FrequencyAnalyzer;
use crate::config::Config;
use crate::output::report::{self, DocumentSummary, RunSummary};
use crate::output::terminal;

/// Words at or below this count are reported as rare in the summary.
const RARE_WORD_THRESHOLD: usize = 2;

/// Top TF-IDF terms written per document.
const TFIDF_TERMS: usize = 25;

/// Load the processed corpus and write the frequency reports.
///
/// Returns the loaded analyzer so later stages can reuse it.
pub fn run(config: &Config) -> Result<FrequencyAnalyzer> {
    let analyzer = load_processed(&config.processed_dir())?;
    if analyzer.is_empty() {
        warn!("No processed documents found; run `novelscope preprocess` first");
        return Ok(analyzer);
    }
    let results_dir = config.results_dir();
    let names = analyzer.document_names();
    info!(documents = names.len(), "Analyzing word frequencies");

    let corpus = analyzer.corpus_frequency();
    let corpus_top = analyzer.top_words(&corpus, config.top_words);
    report::write_word_counts(&results_dir.join("corpus_frequency.csv"), &corpus_top)?;
    terminal::display_top_words("Corpus Top Words", &corpus_top, 20);

    let tfidf = analyzer.tfidf();
    let mut documents = Vec::with_capacity(names.len());

    println!();
    for name in &names {
        let stem = file_stem(name);
        let distribution = analyzer.document_frequency(name)?;
        let top = analyzer.top_words(&distribution, config.top_words);
        report::write_word_counts(&results_dir.join(format!("{stem}_frequency.csv")), &top)?;

        let stats = analyzer.document_statistics(name)?;
        report::write_statistics(&results_dir.join(format!("{stem}_statistics.csv")), &stats)?;
        terminal::display_statistics(name, &stats);

        if let Some(scores) = tfidf.get(name) {
            let mut ranked: Vec<(String, f64)> =
                scores.iter().map(|(w, s)| (w.clone(), *s)).collect();
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            ranked.truncate(TFIDF_TERMS);
            report::write_word_scores(&results_dir.join(format!("{stem}_tfidf.csv")), &ranked)?;
        }

        documents.push(DocumentSummary {
            name: name.clone(),
            rare_words: analyzer.rare_words(&distribution, RARE_WORD_THRESHOLD).len(),
            statistics: stats,
        });
    }

    for (i, a) in names.iter().enumerate() {
        for b in &names[i + 1..] {
            let rows = analyzer.compare_documents(a, b, config.top_words)?;
            let path =
                results_dir.join(format!("{}_vs_{}_comparison.csv", file_stem(a), file_stem(b)));
            report::write_rows(&path, &rows)?;
        }
    }

    let summary = RunSummary {
        generated_at: Utc::now(),
        document_count: names.len(),
        corpus_tokens: corpus.values().sum(),
        corpus_vocabulary: corpus.len(),
        documents,
        top_words: corpus_top.into_iter().take(10).collect(),
    };
    let summary_path = report::write_summary(&results_dir, &summary)?;

    info!(
        documents = names.len(),
        summary = %summary_path.display(),
        "Frequency analysis complete"
    );
    Ok(analyzer)
}
