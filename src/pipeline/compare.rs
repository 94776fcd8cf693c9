// Compare stage: similarity, distinctive words and rank correlation.

use anyhow::Result;
use tracing::{info, warn};

use super::file_stem;
use crate::analyzer::FrequencyAnalyzer;
use crate::config::Config;
use crate::insights::{ComparativeAnalyzer, SimilarityMethod};
use crate::output::{report, terminal};

/// Write similarity_matrix.csv, the word-difference table for the first two
/// documents, per-document unique words and rank_correlations.csv.
///
/// Skipped (with a warning) for corpora of fewer than two documents.
pub fn run(config: &Config, analyzer: &FrequencyAnalyzer) -> Result<()> {
    if analyzer.len() < 2 {
        warn!(
            documents = analyzer.len(),
            "Need at least 2 documents for comparison; skipping"
        );
        return Ok(());
    }

    let results_dir = config.results_dir();
    let comparative = ComparativeAnalyzer::new(analyzer.store());
    let names = comparative.document_names();

    let matrix = comparative.similarity_matrix(SimilarityMethod::Cosine);
    report::write_similarity_matrix(&results_dir.join("similarity_matrix.csv"), &matrix)?;
    terminal::display_similarity_matrix(&matrix);

    let (first, second) = (&names[0], &names[1]);
    let differences = comparative.rank_words_by_difference(first, second, config.top_words)?;
    report::write_rows(
        &results_dir.join(format!(
            "{}_vs_{}_word_diff.csv",
            file_stem(first),
            file_stem(second)
        )),
        &differences,
    )?;

    for name in &names {
        let unique = comparative.unique_words(name)?;
        report::write_word_counts(
            &results_dir.join(format!("{}_unique_words.csv", file_stem(name))),
            &unique,
        )?;
    }

    let mut correlations = Vec::new();
    for (i, a) in names.iter().enumerate() {
        for b in &names[i + 1..] {
            let rc = comparative.compare_word_ranks(a, b)?;
            correlations.push((a.clone(), b.clone(), rc));
        }
    }
    report::write_rank_correlations(&results_dir.join("rank_correlations.csv"), &correlations)?;
    terminal::display_rank_correlations(&correlations);

    info!(documents = names.len(), pairs = correlations.len(), "Comparison complete");
    Ok(())
}
