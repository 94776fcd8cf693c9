// Result files: CSV tables and the JSON run summary under results/.
//
// Every writer takes the target path (or directory) explicitly and creates
// parent directories on demand. Rows are serialized with `csv`; headers come
// from the serde field names.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzer::correlation::RankCorrelation;
use crate::analyzer::frequency::{DocumentStatistics, FrequencyComparison};
use crate::analyzer::statistics::ReadabilityMetrics;
use crate::insights::comparisons::WordDifference;
use crate::insights::themes::DominantTopic;
use crate::insights::SimilarityMatrix;

/// A row type with a fixed CSV header.
///
/// The header is written even when a table has no rows. It must list the
/// serde field names in declaration order.
pub trait CsvRow: Serialize {
    const HEADER: &'static [&'static str];
}

#[derive(Debug, Serialize)]
struct WordCountRow<'a> {
    word: &'a str,
    frequency: usize,
}

#[derive(Debug, Serialize)]
struct WordScoreRow<'a> {
    word: &'a str,
    score: f64,
}

#[derive(Debug, Serialize)]
struct TopicRow<'a> {
    topic: usize,
    words: &'a str,
}

#[derive(Debug, Serialize)]
struct DominantTopicRow<'a> {
    document: &'a str,
    dominant_topic: usize,
    probability: f64,
    top_words: String,
}

#[derive(Debug, Serialize)]
struct RankCorrelationRow<'a> {
    document_a: &'a str,
    document_b: &'a str,
    correlation: f64,
    p_value: f64,
}

/// One document in `summary.json`.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub name: String,
    #[serde(flatten)]
    pub statistics: DocumentStatistics,
    /// Words occurring at most twice
    pub rare_words: usize,
}

/// Contents of `summary.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub document_count: usize,
    pub corpus_tokens: usize,
    pub corpus_vocabulary: usize,
    pub documents: Vec<DocumentSummary>,
    pub top_words: Vec<(String, usize)>,
}

impl CsvRow for WordCountRow<'_> {
    const HEADER: &'static [&'static str] = &["word", "frequency"];
}

impl CsvRow for WordScoreRow<'_> {
    const HEADER: &'static [&'static str] = &["word", "score"];
}

impl CsvRow for TopicRow<'_> {
    const HEADER: &'static [&'static str] = &["topic", "words"];
}

impl CsvRow for DominantTopicRow<'_> {
    const HEADER: &'static [&'static str] =
        &["document", "dominant_topic", "probability", "top_words"];
}

impl CsvRow for RankCorrelationRow<'_> {
    const HEADER: &'static [&'static str] = &["document_a", "document_b", "correlation", "p_value"];
}

impl CsvRow for DocumentStatistics {
    const HEADER: &'static [&'static str] = &[
        "total_words",
        "unique_words",
        "lexical_diversity",
        "hapax_legomena",
        "average_word_length",
    ];
}

impl CsvRow for ReadabilityMetrics {
    const HEADER: &'static [&'static str] = &[
        "flesch_kincaid_grade",
        "flesch_reading_ease",
        "average_words_per_sentence",
    ];
}

impl CsvRow for FrequencyComparison {
    const HEADER: &'static [&'static str] = &["word", "count_a", "count_b", "difference"];
}

impl CsvRow for WordDifference {
    const HEADER: &'static [&'static str] =
        &["word", "relative_freq_a", "relative_freq_b", "difference"];
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

// Headers are written explicitly so empty tables still get one.
fn open_writer(path: &Path) -> Result<csv::Writer<fs::File>> {
    create_parent(path)?;
    csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))
}

/// Serialize `rows` to a CSV file with a header row.
pub fn write_rows<T: CsvRow>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = open_writer(path)?;
    writer
        .write_record(T::HEADER)
        .with_context(|| format!("Failed to write header to {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))
}

/// `word,frequency` table.
pub fn write_word_counts(path: &Path, words: &[(String, usize)]) -> Result<()> {
    let rows: Vec<WordCountRow> = words
        .iter()
        .map(|(word, frequency)| WordCountRow {
            word,
            frequency: *frequency,
        })
        .collect();
    write_rows(path, &rows)
}

/// `word,score` table.
pub fn write_word_scores(path: &Path, words: &[(String, f64)]) -> Result<()> {
    let rows: Vec<WordScoreRow> = words
        .iter()
        .map(|(word, score)| WordScoreRow {
            word,
            score: *score,
        })
        .collect();
    write_rows(path, &rows)
}

pub fn write_statistics(path: &Path, stats: &DocumentStatistics) -> Result<()> {
    write_rows(path, std::slice::from_ref(stats))
}

pub fn write_readability(path: &Path, metrics: &ReadabilityMetrics) -> Result<()> {
    write_rows(path, std::slice::from_ref(metrics))
}

/// `topic,words`, words joined by spaces.
pub fn write_topics(path: &Path, topics: &[Vec<String>]) -> Result<()> {
    let joined: Vec<String> = topics.iter().map(|words| words.join(" ")).collect();
    let rows: Vec<TopicRow> = joined
        .iter()
        .enumerate()
        .map(|(topic, words)| TopicRow { topic, words })
        .collect();
    write_rows(path, &rows)
}

/// Document x topic weights with a `document,topic_0,..` header.
pub fn write_document_topics(path: &Path, names: &[String], weights: &[Vec<f64>]) -> Result<()> {
    let n_topics = weights.first().map_or(0, Vec::len);
    let header: Vec<String> = std::iter::once("document".to_string())
        .chain((0..n_topics).map(|k| format!("topic_{k}")))
        .collect();
    write_labelled_matrix(path, &header, names, weights)
}

pub fn write_dominant_topics(path: &Path, dominant: &[DominantTopic]) -> Result<()> {
    let rows: Vec<DominantTopicRow> = dominant
        .iter()
        .map(|d| DominantTopicRow {
            document: &d.document,
            dominant_topic: d.topic_index,
            probability: d.probability,
            top_words: d.top_words.join(" "),
        })
        .collect();
    write_rows(path, &rows)
}

/// Square matrix with document names along both axes.
pub fn write_similarity_matrix(path: &Path, matrix: &SimilarityMatrix) -> Result<()> {
    let header: Vec<String> = std::iter::once(String::new())
        .chain(matrix.names.iter().cloned())
        .collect();
    write_labelled_matrix(path, &header, &matrix.names, &matrix.values)
}

pub fn write_rank_correlations(
    path: &Path,
    correlations: &[(String, String, RankCorrelation)],
) -> Result<()> {
    let rows: Vec<RankCorrelationRow> = correlations
        .iter()
        .map(|(a, b, rc)| RankCorrelationRow {
            document_a: a,
            document_b: b,
            correlation: rc.correlation,
            p_value: rc.p_value,
        })
        .collect();
    write_rows(path, &rows)
}

fn write_labelled_matrix(
    path: &Path,
    header: &[String],
    labels: &[String],
    values: &[Vec<f64>],
) -> Result<()> {
    let mut writer = open_writer(path)?;
    writer
        .write_record(header)
        .with_context(|| format!("Failed to write header to {}", path.display()))?;
    for (label, row) in labels.iter().zip(values) {
        let record: Vec<String> = std::iter::once(label.clone())
            .chain(row.iter().map(f64::to_string))
            .collect();
        writer
            .write_record(&record)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))
}

/// Write `summary.json` into `results_dir` and return its path.
pub fn write_summary(results_dir: &Path, summary: &RunSummary) -> Result<PathBuf> {
    let path = results_dir.join("summary.json");
    create_parent(&path)?;
    let json = serde_json::to_string_pretty(summary).context("Failed to serialize run summary")?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
