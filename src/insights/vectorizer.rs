// Bag-of-words count vectorizer for the topic model.
//
// Terms are runs of two or more word characters, lowercased, minus the
// English stop word list. Terms found in too many documents (ceiling) or too
// few (floor) are pruned. The surviving vocabulary is sorted alphabetically
// and frozen; later transforms ignore words outside it.

use std::collections::{BTreeMap, HashMap, HashSet};

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use stop_words::{get, LANGUAGE};

use crate::error::AnalysisError;

/// A document-frequency bound: a share of the corpus or an absolute count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DocFrequency {
    /// Fraction of documents, in [0.0, 1.0]
    Proportion(f64),
    /// Number of documents
    Count(usize),
}

impl DocFrequency {
    fn as_doc_count(self, n_docs: usize) -> f64 {
        match self {
            DocFrequency::Proportion(p) => p * n_docs as f64,
            DocFrequency::Count(c) => c as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Drop terms that appear in more documents than this
    pub max_df: DocFrequency,
    /// Drop terms that appear in fewer documents than this
    pub min_df: DocFrequency,
    /// Remove English stop words
    pub remove_stop_words: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_df: DocFrequency::Proportion(0.95),
            min_df: DocFrequency::Count(2),
            remove_stop_words: true,
        }
    }
}

impl VectorizerConfig {
    /// Bounds that keep every term. Needed for two- or three-document
    /// corpora, where the default floor and ceiling prune everything.
    pub fn include_all(&self) -> Self {
        Self {
            max_df: DocFrequency::Proportion(1.0),
            min_df: DocFrequency::Count(1),
            remove_stop_words: self.remove_stop_words,
        }
    }
}

/// The fitted vocabulary: term <-> column index.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
    stop_words: HashSet<String>,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn term(&self, idx: usize) -> Option<&str> {
        self.terms.get(idx).map(String::as_str)
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Count matrix (documents x terms) for `documents` against this vocabulary.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Array2<f64> {
        let mut matrix = Array2::zeros((documents.len(), self.terms.len()));
        for (row, doc) in documents.iter().enumerate() {
            for term in analyze(doc.as_ref(), &self.stop_words) {
                if let Some(&col) = self.index.get(&term) {
                    matrix[[row, col]] += 1.0;
                }
            }
        }
        matrix
    }
}

/// Learns a vocabulary and turns documents into term-count rows.
#[derive(Debug, Clone, Default)]
pub struct CountVectorizer {
    config: VectorizerConfig,
}

impl CountVectorizer {
    pub fn new(config: VectorizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Learn the vocabulary from `documents` and return it with their count matrix.
    pub fn fit_transform<S: AsRef<str>>(
        &self,
        documents: &[S],
    ) -> Result<(Vocabulary, Array2<f64>), AnalysisError> {
        let stop_words: HashSet<String> = if self.config.remove_stop_words {
            get(LANGUAGE::English).into_iter().collect()
        } else {
            HashSet::new()
        };

        let n_docs = documents.len();
        let max_doc_count = self.config.max_df.as_doc_count(n_docs);
        let min_doc_count = self.config.min_df.as_doc_count(n_docs);
        if max_doc_count < min_doc_count {
            let scaled = matches!(self.config.max_df, DocFrequency::Proportion(_))
                || matches!(self.config.min_df, DocFrequency::Proportion(_));
            if scaled {
                // a proportional bound shrank below the floor on a small corpus
                return Err(AnalysisError::InsufficientData(format!(
                    "document-frequency bounds keep no terms for {n_docs} documents \
                     (max {max_doc_count}, min {min_doc_count})"
                )));
            }
            return Err(AnalysisError::InvalidArgument(format!(
                "max_df ({max_doc_count}) corresponds to fewer documents than min_df ({min_doc_count})"
            )));
        }

        let mut document_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: HashSet<String> = analyze(doc.as_ref(), &stop_words).collect();
            for term in unique {
                *document_freq.entry(term).or_insert(0) += 1;
            }
        }

        // BTreeMap iteration gives alphabetical column order
        let terms: Vec<String> = document_freq
            .into_iter()
            .filter(|&(_, df)| {
                let df = df as f64;
                df >= min_doc_count && df <= max_doc_count
            })
            .map(|(term, _)| term)
            .collect();

        if terms.is_empty() {
            return Err(AnalysisError::InsufficientData(format!(
                "no terms remain after document-frequency pruning of {n_docs} documents"
            )));
        }

        let index = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();

        let vocabulary = Vocabulary {
            terms,
            index,
            stop_words,
        };
        let matrix = vocabulary.transform(documents);
        Ok((vocabulary, matrix))
    }
}

/// Lowercased terms of two or more word characters, stop words removed.
fn analyze<'a>(text: &'a str, stop_words: &'a HashSet<String>) -> impl Iterator<Item = String> + 'a {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| word.chars().count() >= 2)
        .map(str::to_lowercase)
        .filter(move |word| !stop_words.contains(word))
}
