// Unit tests for the topic engine.
//
// Covers the Unfit -> Fit state machine, argument validation, probability
// invariants of the fitted distributions and refit isolation.

use novelscope::insights::vectorizer::{CountVectorizer, VectorizerConfig};
use novelscope::insights::{ThemeAnalyzer, ThemeConfig};
use novelscope::AnalysisError;

fn assert_rows_are_distributions(rows: &[Vec<f64>], k: usize) {
    for row in rows {
        assert_eq!(row.len(), k);
        assert!(row.iter().all(|&p| p >= 0.0));
        let sum: f64 = row.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6, "row sums to {sum}");
    }
}

// ============================================================
// Fitting
// ============================================================

#[test]
fn two_short_documents_two_topics() {
    let mut themes = ThemeAnalyzer::new(ThemeConfig::with_topics(2));
    themes.fit(&["the cat sat", "the dog ran"]).unwrap();

    let topics = themes.topics().unwrap();
    assert_eq!(topics.len(), 2);
    assert!(topics.iter().all(|words| !words.is_empty()));

    let rows = themes.document_topics().unwrap();
    assert_eq!(rows.len(), 2);
    assert_rows_are_distributions(&rows, 2);
}

#[test]
fn stop_words_are_not_topic_words() {
    let mut themes = ThemeAnalyzer::new(ThemeConfig::with_topics(2));
    themes.fit(&["the cat sat", "the dog ran"]).unwrap();
    assert!(!themes.vocabulary().unwrap().iter().any(|w| w == "the"));
}

#[test]
fn fit_is_deterministic() {
    let docs = [
        "whale harpoon captain sea whale",
        "ballroom bonnet carriage dance",
        "whale sea ship storm",
    ];
    let mut first = ThemeAnalyzer::new(ThemeConfig::with_topics(2));
    let mut second = ThemeAnalyzer::new(ThemeConfig::with_topics(2));
    first.fit(&docs).unwrap();
    second.fit(&docs).unwrap();

    assert_eq!(first.topics().unwrap(), second.topics().unwrap());
    assert_eq!(first.document_topics().unwrap(), second.document_topics().unwrap());
}

#[test]
fn larger_corpus_uses_document_frequency_bounds() {
    let docs = [
        "whale harpoon captain sea",
        "whale harpoon sea ship",
        "ballroom bonnet carriage dance",
        "ballroom bonnet dance letter",
    ];
    let mut themes = ThemeAnalyzer::new(ThemeConfig::with_topics(2));
    themes.fit(&docs).unwrap();

    let vocabulary = themes.vocabulary().unwrap();
    assert!(vocabulary.iter().any(|w| w == "whale"));
    assert!(vocabulary.iter().any(|w| w == "bonnet"));
    // appears in a single document, below the default floor of 2
    assert!(!vocabulary.iter().any(|w| w == "captain"));
    assert_rows_are_distributions(&themes.document_topics().unwrap(), 2);
}

// ============================================================
// Validation
// ============================================================

#[test]
fn single_document_is_insufficient() {
    let mut themes = ThemeAnalyzer::new(ThemeConfig::with_topics(1));
    assert!(matches!(
        themes.fit(&["whale harpoon"]),
        Err(AnalysisError::InsufficientData(_))
    ));
}

#[test]
fn topic_count_out_of_range() {
    let docs = ["whale harpoon", "ballroom bonnet"];
    for k in [0, 3] {
        let mut themes = ThemeAnalyzer::new(ThemeConfig::with_topics(k));
        assert!(
            matches!(themes.fit(&docs), Err(AnalysisError::InvalidArgument(_))),
            "k = {k}"
        );
    }
}

#[test]
fn only_stop_words_is_insufficient() {
    let mut themes = ThemeAnalyzer::new(ThemeConfig::with_topics(2));
    assert!(matches!(
        themes.fit(&["the and of", "it is the"]),
        Err(AnalysisError::InsufficientData(_))
    ));
}

#[test]
fn default_bounds_on_two_documents_are_insufficient() {
    let config = ThemeConfig {
        small_corpus_max_docs: 0,
        ..ThemeConfig::with_topics(2)
    };
    let mut themes = ThemeAnalyzer::new(config);
    assert!(matches!(
        themes.fit(&["whale harpoon", "whale bonnet"]),
        Err(AnalysisError::InsufficientData(_))
    ));
}

#[test]
fn queries_before_fit_are_not_fitted() {
    let themes = ThemeAnalyzer::new(ThemeConfig::default());
    assert!(!themes.is_fitted());
    assert_eq!(themes.topics().unwrap_err(), AnalysisError::NotFitted);
    assert_eq!(themes.document_topics().unwrap_err(), AnalysisError::NotFitted);
    assert_eq!(themes.transform(&["whale"]).unwrap_err(), AnalysisError::NotFitted);
}

// ============================================================
// Queries
// ============================================================

#[test]
fn dominant_topic_sorted_by_topic_index() {
    let names = ["moby", "emma", "persuasion"];
    let mut themes = ThemeAnalyzer::new(ThemeConfig::with_topics(2));
    themes
        .fit(&[
            "whale harpoon captain sea whale sea",
            "ballroom bonnet carriage dance bonnet",
            "bonnet carriage letter dance navy",
        ])
        .unwrap();

    let dominant = themes.dominant_topic(&names).unwrap();
    assert_eq!(dominant.len(), 3);
    assert!(dominant.windows(2).all(|w| w[0].topic_index <= w[1].topic_index));

    let rows = themes.document_topics().unwrap();
    let topics = themes.topics().unwrap();
    for d in &dominant {
        let idx = names.iter().position(|n| *n == d.document).unwrap();
        let max = rows[idx].iter().cloned().fold(f64::MIN, f64::max);
        assert_eq!(d.probability, max);
        assert!(d.top_words.len() <= 5);
        assert_eq!(d.top_words[..], topics[d.topic_index][..d.top_words.len()]);
    }
}

#[test]
fn dominant_topic_name_count_must_match() {
    let mut themes = ThemeAnalyzer::new(ThemeConfig::with_topics(2));
    themes.fit(&["whale harpoon", "ballroom bonnet"]).unwrap();
    assert!(matches!(
        themes.dominant_topic(&["only-one"]),
        Err(AnalysisError::InvalidArgument(_))
    ));
}

#[test]
fn transform_unseen_text() {
    let mut themes = ThemeAnalyzer::new(ThemeConfig::with_topics(2));
    themes.fit(&["whale harpoon sea", "ballroom bonnet dance"]).unwrap();

    let rows = themes
        .transform(&["the whale and the sea", "nothing familiar here"])
        .unwrap();
    assert_rows_are_distributions(&rows, 2);
}

#[test]
fn topic_word_lists_respect_configured_length() {
    let config = ThemeConfig {
        n_top_words: 2,
        ..ThemeConfig::with_topics(2)
    };
    let mut themes = ThemeAnalyzer::new(config);
    themes.fit(&["whale harpoon sea ship", "ballroom bonnet dance"]).unwrap();
    assert!(themes.topics().unwrap().iter().all(|words| words.len() == 2));
}

// ============================================================
// Refit
// ============================================================

#[test]
fn refit_discards_previous_topics() {
    let mut themes = ThemeAnalyzer::new(ThemeConfig::with_topics(2));
    themes
        .fit(&["whale harpoon captain", "whale sea harpoon"])
        .unwrap();
    let before: Vec<String> = themes.topics().unwrap().concat();
    assert!(before.iter().any(|w| w == "whale"));

    themes
        .fit(&["ballroom bonnet carriage", "bonnet dance carriage"])
        .unwrap();
    let vocabulary = themes.vocabulary().unwrap().to_vec();
    for word in themes.topics().unwrap().concat() {
        assert!(vocabulary.contains(&word));
        assert!(!["whale", "harpoon", "captain", "sea"].contains(&word.as_str()));
    }
}

// ============================================================
// Vectorizer
// ============================================================

#[test]
fn vectorizer_rows_count_terms() {
    let config = VectorizerConfig::default().include_all();
    let (vocab, matrix) = CountVectorizer::new(config)
        .fit_transform(&["Whale whale SEA", "sea"])
        .unwrap();
    let whale = vocab.index_of("whale").unwrap();
    let sea = vocab.index_of("sea").unwrap();
    assert_eq!(matrix[[0, whale]], 2.0);
    assert_eq!(matrix[[0, sea]], 1.0);
    assert_eq!(matrix[[1, sea]], 1.0);
}
