// Composition tests: verifying that the pipeline stages chain together.
//
// These tests exercise the data flow between modules:
//   raw text -> preprocess -> analyze -> themes / compare
// against a temporary data directory. No network access.

use std::fs;
use std::path::Path;

use novelscope::config::Config;
use novelscope::insights::{ComparativeAnalyzer, SimilarityMethod};
use novelscope::pipeline;

const MOBY: &str = "Title: Moby Dick\n\
*** START OF THE PROJECT GUTENBERG EBOOK MOBY DICK ***\n\
Call me Ishmael. The whale swam past the ship. The captain hunted the whale \
with a harpoon. Whales and harpoons and the sea, the endless sea. The crew \
watched the whale breach beside the ship while the captain shouted.\n\
*** END OF THE PROJECT GUTENBERG EBOOK MOBY DICK ***";

const EMMA: &str = "Title: Emma\n\
*** START OF THE PROJECT GUTENBERG EBOOK EMMA ***\n\
Emma attended the ball in a new bonnet. The carriage arrived at the ballroom. \
Dancing and bonnets and carriages filled the evening. Emma admired the \
ballroom while the carriage waited and the dance continued.\n\
*** END OF THE PROJECT GUTENBERG EBOOK EMMA ***";

fn config_for(dir: &Path) -> Config {
    Config {
        data_dir: dir.to_path_buf(),
        top_words: 20,
        ..Config::default()
    }
}

fn seed_raw_books(config: &Config) {
    let raw = config.raw_dir();
    fs::create_dir_all(&raw).unwrap();
    fs::write(raw.join("2701_Moby Dick.txt"), MOBY).unwrap();
    fs::write(raw.join("158_Emma.txt"), EMMA).unwrap();
}

// ============================================================
// Chain: preprocess -> analyze
// ============================================================

#[test]
fn preprocess_then_analyze_writes_reports() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());
    seed_raw_books(&config);

    let processed = pipeline::preprocess::run(&config, &config.tokenizer()).unwrap();
    assert_eq!(processed.len(), 2);
    assert!(processed.iter().all(|book| book.tokens > 0));

    let moby_tokens =
        fs::read_to_string(config.processed_dir().join("2701_Moby Dick_processed.txt")).unwrap();
    assert!(moby_tokens.lines().any(|t| t == "whale"));
    assert!(!moby_tokens.lines().any(|t| t == "the"));

    let analyzer = pipeline::analyze::run(&config).unwrap();
    // sorted file-name order
    assert_eq!(analyzer.document_names(), vec!["158_Emma", "2701_Moby Dick"]);

    let results = config.results_dir();
    for file in [
        "corpus_frequency.csv",
        "158_Emma_frequency.csv",
        "158_Emma_statistics.csv",
        "158_Emma_readability.csv",
        "2701_Moby_Dick_frequency.csv",
        "2701_Moby_Dick_tfidf.csv",
        "158_Emma_vs_2701_Moby_Dick_comparison.csv",
        "summary.json",
    ] {
        assert!(results.join(file).exists(), "missing {file}");
    }

    let corpus = fs::read_to_string(results.join("corpus_frequency.csv")).unwrap();
    assert!(corpus.starts_with("word,frequency\n"));

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(results.join("summary.json")).unwrap()).unwrap();
    assert_eq!(summary["document_count"], 2);
    assert!(summary["generated_at"].is_string());
}

// ============================================================
// Chain: analyze -> themes / compare
// ============================================================

#[test]
fn full_pipeline_writes_theme_and_comparison_reports() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());
    seed_raw_books(&config);

    pipeline::preprocess::run(&config, &config.tokenizer()).unwrap();
    let analyzer = pipeline::analyze::run(&config).unwrap();

    let themes = pipeline::themes::run(&config, &analyzer).unwrap().unwrap();
    // topics capped at the document count
    assert_eq!(themes.config().n_topics, 2);

    pipeline::compare::run(&config, &analyzer).unwrap();

    let results = config.results_dir();
    for file in [
        "topics.csv",
        "document_topics.csv",
        "dominant_topics.csv",
        "similarity_matrix.csv",
        "158_Emma_vs_2701_Moby_Dick_word_diff.csv",
        "158_Emma_unique_words.csv",
        "2701_Moby_Dick_unique_words.csv",
        "rank_correlations.csv",
    ] {
        assert!(results.join(file).exists(), "missing {file}");
    }

    let unique = fs::read_to_string(results.join("2701_Moby_Dick_unique_words.csv")).unwrap();
    assert!(unique.lines().any(|line| line.starts_with("whale,")));
}

#[test]
fn single_document_skips_themes_and_compare() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());
    fs::create_dir_all(config.raw_dir()).unwrap();
    fs::write(config.raw_dir().join("2701_Moby Dick.txt"), MOBY).unwrap();

    pipeline::preprocess::run(&config, &config.tokenizer()).unwrap();
    let analyzer = pipeline::analyze::run(&config).unwrap();

    assert!(pipeline::themes::run(&config, &analyzer).unwrap().is_none());
    pipeline::compare::run(&config, &analyzer).unwrap();
    assert!(!config.results_dir().join("similarity_matrix.csv").exists());
}

#[test]
fn empty_data_dir_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir.path().join("fresh"));

    assert!(pipeline::preprocess::run(&config, &config.tokenizer()).unwrap().is_empty());
    assert!(pipeline::analyze::run(&config).unwrap().is_empty());
    // nothing was created just by running empty stages
    assert!(!config.data_dir.exists());
}

// ============================================================
// Chain: processed files -> comparative engine
// ============================================================

#[test]
fn loaded_corpus_feeds_comparisons() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());
    seed_raw_books(&config);
    pipeline::preprocess::run(&config, &config.tokenizer()).unwrap();

    let analyzer = pipeline::load_processed(&config.processed_dir()).unwrap();
    let comparative = ComparativeAnalyzer::new(analyzer.store());

    let matrix = comparative.similarity_matrix(SimilarityMethod::Jaccard);
    let sim = matrix.get("158_Emma", "2701_Moby Dick").unwrap();
    assert!((0.0..1.0).contains(&sim));

    let emma_only = comparative.unique_words("158_Emma").unwrap();
    assert!(emma_only.iter().any(|(w, _)| w == "bonnet"));
    assert!(!emma_only.iter().any(|(w, _)| w == "whale"));
}
