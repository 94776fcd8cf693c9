// Frequency engine: counting-based statistics over the document store.
//
// Distributions are IndexMaps in first-occurrence order. That order is the
// tie-break for `top_words`, so identical input always produces identical
// rankings (the same behavior as a Counter's most_common).

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::statistics::{self, TfIdfTable};
use crate::corpus::DocumentStore;
use crate::error::AnalysisError;

/// Token -> count, in first-occurrence order.
pub type FrequencyDistribution = IndexMap<String, usize>;

/// Count every token in a sequence.
///
/// The counts always sum to `tokens.len()`.
pub fn frequency_distribution<S: AsRef<str>>(tokens: &[S]) -> FrequencyDistribution {
    let mut dist = FrequencyDistribution::new();
    for token in tokens {
        *dist.entry(token.as_ref().to_string()).or_insert(0) += 1;
    }
    dist
}

/// One row of a raw-count comparison between two documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyComparison {
    pub word: String,
    pub count_a: usize,
    pub count_b: usize,
    /// `count_a - count_b`
    pub difference: i64,
}

/// Vocabulary statistics for a single document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentStatistics {
    pub total_words: usize,
    pub unique_words: usize,
    /// unique / total, 0.0 for an empty document
    pub lexical_diversity: f64,
    /// Number of words occurring exactly once
    pub hapax_legomena: usize,
    /// Mean token length in characters, 0.0 for an empty document
    pub average_word_length: f64,
}

/// Per-document and corpus-wide word frequency analysis.
#[derive(Debug, Clone, Default)]
pub struct FrequencyAnalyzer {
    store: DocumentStore,
}

impl FrequencyAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a document's tokens.
    ///
    /// Reusing a name overwrites the earlier tokens and returns them.
    pub fn add_document(
        &mut self,
        name: impl Into<String>,
        tokens: Vec<String>,
    ) -> Option<Vec<String>> {
        self.store.insert(name, tokens)
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn document_names(&self) -> Vec<String> {
        self.store.names().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn frequency_distribution<S: AsRef<str>>(&self, tokens: &[S]) -> FrequencyDistribution {
        frequency_distribution(tokens)
    }

    pub fn document_frequency(&self, name: &str) -> Result<FrequencyDistribution, AnalysisError> {
        let tokens = self.store.require(name)?;
        Ok(frequency_distribution(tokens))
    }

    /// Aggregate distribution over every document currently in the store.
    pub fn corpus_frequency(&self) -> FrequencyDistribution {
        let mut dist = FrequencyDistribution::new();
        for (_, tokens) in self.store.iter() {
            for token in tokens {
                *dist.entry(token.clone()).or_insert(0) += 1;
            }
        }
        dist
    }

    /// The `n` most frequent words, count descending.
    ///
    /// Equal counts keep the distribution's first-occurrence order.
    pub fn top_words(&self, distribution: &FrequencyDistribution, n: usize) -> Vec<(String, usize)> {
        let mut ranked: Vec<(String, usize)> = distribution
            .iter()
            .map(|(word, &count)| (word.clone(), count))
            .collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    /// Compare raw counts of two documents over the union of their vocabularies.
    ///
    /// Rows are ordered by absolute difference descending, then by word, and
    /// cut to `n`. Swapping the documents yields the same words with negated
    /// differences.
    pub fn compare_documents(
        &self,
        name_a: &str,
        name_b: &str,
        n: usize,
    ) -> Result<Vec<FrequencyComparison>, AnalysisError> {
        let freq_a = self.document_frequency(name_a)?;
        let freq_b = self.document_frequency(name_b)?;

        let mut rows: Vec<FrequencyComparison> = union_vocabulary(&freq_a, &freq_b)
            .into_iter()
            .map(|word| {
                let count_a = freq_a.get(word).copied().unwrap_or(0);
                let count_b = freq_b.get(word).copied().unwrap_or(0);
                FrequencyComparison {
                    word: word.to_string(),
                    count_a,
                    count_b,
                    difference: count_a as i64 - count_b as i64,
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            b.difference
                .abs()
                .cmp(&a.difference.abs())
                .then_with(|| a.word.cmp(&b.word))
        });
        rows.truncate(n);
        Ok(rows)
    }

    /// TF-IDF scores for every term of every document in the store.
    pub fn tfidf(&self) -> TfIdfTable {
        statistics::calculate_tfidf(&self.store)
    }

    /// Words whose count is at most `threshold`, in distribution order.
    pub fn rare_words(
        &self,
        distribution: &FrequencyDistribution,
        threshold: usize,
    ) -> Vec<(String, usize)> {
        distribution
            .iter()
            .filter(|&(_, &count)| count <= threshold)
            .map(|(word, &count)| (word.clone(), count))
            .collect()
    }

    pub fn document_statistics(&self, name: &str) -> Result<DocumentStatistics, AnalysisError> {
        let tokens = self.store.require(name)?;
        let dist = frequency_distribution(tokens);

        let total_words = tokens.len();
        let unique_words = dist.len();
        let hapax_legomena = dist.values().filter(|&&count| count == 1).count();

        let average_word_length = if total_words == 0 {
            0.0
        } else {
            let total_chars: usize = tokens.iter().map(|t| t.chars().count()).sum();
            total_chars as f64 / total_words as f64
        };

        Ok(DocumentStatistics {
            total_words,
            unique_words,
            lexical_diversity: statistics::lexical_diversity(tokens),
            hapax_legomena,
            average_word_length,
        })
    }
}

/// Words of `a` in order, followed by the words only `b` has.
pub(crate) fn union_vocabulary<'a, V>(
    a: &'a IndexMap<String, V>,
    b: &'a IndexMap<String, V>,
) -> Vec<&'a str> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(a.len() + b.len());
    a.keys()
        .chain(b.keys())
        .map(String::as_str)
        .filter(|word| seen.insert(*word))
        .collect()
}
