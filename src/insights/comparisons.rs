// Comparative analysis: how documents differ from one another.
//
// Built once from a snapshot of the document store. Later changes to the
// store do not reach an existing analyzer; build a new one instead.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analyzer::correlation::{self, RankCorrelation};
use crate::analyzer::frequency::{frequency_distribution, union_vocabulary, FrequencyDistribution};
use crate::analyzer::statistics::jaccard;
use crate::corpus::DocumentStore;
use crate::error::AnalysisError;

/// How two documents are compared in a similarity matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMethod {
    /// Cosine of the raw frequency vectors over the union vocabulary.
    Cosine,
    /// Intersection over union of the vocabulary sets.
    Jaccard,
}

impl FromStr for SimilarityMethod {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "jaccard" => Ok(Self::Jaccard),
            other => Err(AnalysisError::InvalidArgument(format!(
                "Unknown similarity method: {other}"
            ))),
        }
    }
}

impl fmt::Display for SimilarityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cosine => write!(f, "cosine"),
            Self::Jaccard => write!(f, "jaccard"),
        }
    }
}

/// Square document x document similarity table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    pub method: SimilarityMethod,
    /// Row/column labels, in store order
    pub names: Vec<String>,
    /// `values[i][j]` is the similarity of `names[i]` and `names[j]`
    pub values: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    /// Look up a cell by document names.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        Some(self.values[i][j])
    }
}

/// One row of a relative-frequency comparison between two documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDifference {
    pub word: String,
    pub relative_freq_a: f64,
    pub relative_freq_b: f64,
    /// `relative_freq_a - relative_freq_b`
    pub difference: f64,
}

/// Cross-document comparison over a fixed set of documents.
#[derive(Debug, Clone)]
pub struct ComparativeAnalyzer {
    frequencies: IndexMap<String, FrequencyDistribution>,
    totals: IndexMap<String, usize>,
}

impl ComparativeAnalyzer {
    /// Snapshot the store and precompute one frequency table per document.
    pub fn new(store: &DocumentStore) -> Self {
        let mut frequencies = IndexMap::with_capacity(store.len());
        let mut totals = IndexMap::with_capacity(store.len());
        for (name, tokens) in store.iter() {
            frequencies.insert(name.to_string(), frequency_distribution(tokens));
            totals.insert(name.to_string(), tokens.len());
        }
        Self {
            frequencies,
            totals,
        }
    }

    pub fn document_names(&self) -> Vec<String> {
        self.frequencies.keys().cloned().collect()
    }

    fn frequency(&self, name: &str) -> Result<&FrequencyDistribution, AnalysisError> {
        self.frequencies
            .get(name)
            .ok_or_else(|| AnalysisError::NotFound(name.to_string()))
    }

    /// Words that occur in `name` and in no other document, with their counts.
    ///
    /// Returned in the document's first-occurrence order.
    pub fn unique_words(&self, name: &str) -> Result<Vec<(String, usize)>, AnalysisError> {
        let own = self.frequency(name)?;

        let others: HashSet<&str> = self
            .frequencies
            .iter()
            .filter(|(other, _)| other.as_str() != name)
            .flat_map(|(_, freq)| freq.keys().map(String::as_str))
            .collect();

        Ok(own
            .iter()
            .filter(|(word, _)| !others.contains(word.as_str()))
            .map(|(word, &count)| (word.clone(), count))
            .collect())
    }

    /// Pairwise similarity of every document, diagonal fixed at 1.0.
    pub fn similarity_matrix(&self, method: SimilarityMethod) -> SimilarityMatrix {
        let names = self.document_names();
        let n = names.len();
        let mut values = vec![vec![0.0; n]; n];

        match method {
            SimilarityMethod::Cosine => {
                let vectors = self.dense_vectors();
                for i in 0..n {
                    values[i][i] = 1.0;
                    for j in (i + 1)..n {
                        let sim = cosine(&vectors[i], &vectors[j]);
                        values[i][j] = sim;
                        values[j][i] = sim;
                    }
                }
            }
            SimilarityMethod::Jaccard => {
                let sets: Vec<HashSet<&str>> = self
                    .frequencies
                    .values()
                    .map(|freq| freq.keys().map(String::as_str).collect())
                    .collect();
                for i in 0..n {
                    values[i][i] = 1.0;
                    for j in (i + 1)..n {
                        let sim = jaccard(&sets[i], &sets[j]);
                        values[i][j] = sim;
                        values[j][i] = sim;
                    }
                }
            }
        }

        SimilarityMatrix {
            method,
            names,
            values,
        }
    }

    /// Rank words by the difference in relative frequency between two documents.
    ///
    /// Relative frequency is count / document length (0.0 for an empty
    /// document). Ordered by absolute difference descending, then by word.
    pub fn rank_words_by_difference(
        &self,
        name_a: &str,
        name_b: &str,
        top_n: usize,
    ) -> Result<Vec<WordDifference>, AnalysisError> {
        let freq_a = self.frequency(name_a)?;
        let freq_b = self.frequency(name_b)?;
        let total_a = self.totals.get(name_a).copied().unwrap_or(0);
        let total_b = self.totals.get(name_b).copied().unwrap_or(0);

        let mut rows: Vec<WordDifference> = union_vocabulary(freq_a, freq_b)
            .into_iter()
            .map(|word| {
                let relative_freq_a = relative(freq_a.get(word).copied().unwrap_or(0), total_a);
                let relative_freq_b = relative(freq_b.get(word).copied().unwrap_or(0), total_b);
                WordDifference {
                    word: word.to_string(),
                    relative_freq_a,
                    relative_freq_b,
                    difference: relative_freq_a - relative_freq_b,
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            b.difference
                .abs()
                .total_cmp(&a.difference.abs())
                .then_with(|| a.word.cmp(&b.word))
        });
        rows.truncate(top_n);
        Ok(rows)
    }

    /// Spearman correlation of the raw counts of the words both documents share.
    ///
    /// With fewer than two shared words the result is `RankCorrelation::NEUTRAL`
    /// (rho 0, p 1) rather than an error.
    pub fn compare_word_ranks(
        &self,
        name_a: &str,
        name_b: &str,
    ) -> Result<RankCorrelation, AnalysisError> {
        let freq_a = self.frequency(name_a)?;
        let freq_b = self.frequency(name_b)?;

        let (counts_a, counts_b): (Vec<f64>, Vec<f64>) = freq_a
            .iter()
            .filter_map(|(word, &count_a)| {
                freq_b
                    .get(word)
                    .map(|&count_b| (count_a as f64, count_b as f64))
            })
            .unzip();

        if counts_a.len() < 2 {
            return Ok(RankCorrelation::NEUTRAL);
        }

        Ok(correlation::spearman(&counts_a, &counts_b))
    }

    /// One dense count vector per document over the union vocabulary.
    fn dense_vectors(&self) -> Vec<Vec<f64>> {
        let mut vocabulary: IndexMap<&str, usize> = IndexMap::new();
        for freq in self.frequencies.values() {
            for word in freq.keys() {
                let next = vocabulary.len();
                vocabulary.entry(word.as_str()).or_insert(next);
            }
        }

        self.frequencies
            .values()
            .map(|freq| {
                let mut vector = vec![0.0; vocabulary.len()];
                for (word, &count) in freq {
                    if let Some(&idx) = vocabulary.get(word.as_str()) {
                        vector[idx] = count as f64;
                    }
                }
                vector
            })
            .collect()
    }
}

fn relative(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Cosine similarity of two dense vectors; 0.0 if either has zero magnitude.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = norm_a * norm_b;
    if denom < f64::EPSILON {
        return 0.0;
    }
    (dot / denom).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_cosine_parallel_vectors() {
        let sim = cosine(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        assert!((sim - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("Cosine".parse::<SimilarityMethod>().unwrap(), SimilarityMethod::Cosine);
        assert_eq!(" jaccard ".parse::<SimilarityMethod>().unwrap(), SimilarityMethod::Jaccard);
        assert!(matches!(
            "euclid".parse::<SimilarityMethod>(),
            Err(AnalysisError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_relative_of_empty_document() {
        assert_eq!(relative(0, 0), 0.0);
        assert_eq!(relative(1, 4), 0.25);
    }
}
