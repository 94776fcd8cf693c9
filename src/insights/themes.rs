// Theme analysis: topic discovery over the whole corpus.
//
// The analyzer is either unfitted or holds exactly one fitted state
// (vocabulary, LDA model, per-document topic weights). `fit` always builds a
// fresh state and drops the previous one, so topics from an earlier corpus
// can never leak into later results.

use ndarray::Axis;
use serde::{Deserialize, Serialize};

use super::lda::{LdaConfig, LdaModel};
use super::vectorizer::{CountVectorizer, VectorizerConfig, Vocabulary};
use crate::error::AnalysisError;

/// How many words `dominant_topic` reports per topic.
pub const DOMINANT_TOPIC_WORDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// K. Must be between 1 and the number of fitted documents.
    pub n_topics: usize,
    /// Words listed per topic by `topics()`
    pub n_top_words: usize,
    pub vectorizer: VectorizerConfig,
    /// Corpora of at most this many documents are vectorized with
    /// every term kept (see `VectorizerConfig::include_all`).
    pub small_corpus_max_docs: usize,
    pub lda: LdaConfig,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            n_topics: 5,
            n_top_words: 10,
            vectorizer: VectorizerConfig::default(),
            small_corpus_max_docs: 3,
            lda: LdaConfig::default(),
        }
    }
}

impl ThemeConfig {
    pub fn with_topics(n_topics: usize) -> Self {
        Self {
            n_topics,
            ..Self::default()
        }
    }
}

/// The strongest topic of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominantTopic {
    pub document: String,
    pub topic_index: usize,
    pub probability: f64,
    /// Leading words of that topic
    pub top_words: Vec<String>,
}

#[derive(Debug, Clone)]
struct FittedThemes {
    vocabulary: Vocabulary,
    model: LdaModel,
    /// documents x topics, rows sum to 1
    document_topics: Vec<Vec<f64>>,
}

/// Topic model over a set of documents (Unfit -> Fit).
#[derive(Debug, Clone)]
pub struct ThemeAnalyzer {
    config: ThemeConfig,
    fitted: Option<FittedThemes>,
}

impl ThemeAnalyzer {
    pub fn new(config: ThemeConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Fit the topic model to `documents` (token text joined by spaces).
    ///
    /// Needs at least two documents and `1 <= n_topics <= documents.len()`.
    /// Any previous fit is discarded first, even if this one fails.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<&mut Self, AnalysisError> {
        self.fitted = None;

        let n_docs = documents.len();
        if n_docs < 2 {
            return Err(AnalysisError::InsufficientData(format!(
                "topic modeling needs at least 2 documents, got {n_docs}"
            )));
        }
        let k = self.config.n_topics;
        if k == 0 || k > n_docs {
            return Err(AnalysisError::InvalidArgument(format!(
                "number of topics must be between 1 and {n_docs}, got {k}"
            )));
        }

        let vectorizer_config = if n_docs <= self.config.small_corpus_max_docs {
            self.config.vectorizer.include_all()
        } else {
            self.config.vectorizer.clone()
        };

        let (vocabulary, dtm) = CountVectorizer::new(vectorizer_config).fit_transform(documents)?;
        let model = LdaModel::fit(k, &self.config.lda, &dtm)?;

        let document_topics = model
            .transform(&dtm)
            .axis_iter(Axis(0))
            .map(|row| row.to_vec())
            .collect();

        self.fitted = Some(FittedThemes {
            vocabulary,
            model,
            document_topics,
        });
        Ok(self)
    }

    fn state(&self) -> Result<&FittedThemes, AnalysisError> {
        self.fitted.as_ref().ok_or(AnalysisError::NotFitted)
    }

    /// The fitted vocabulary, in column order.
    pub fn vocabulary(&self) -> Result<&[String], AnalysisError> {
        Ok(self.state()?.vocabulary.terms())
    }

    /// Top `n_top_words` words of each topic, by topic-word weight descending.
    ///
    /// Equal weights keep vocabulary (alphabetical) order.
    pub fn topics(&self) -> Result<Vec<Vec<String>>, AnalysisError> {
        let state = self.state()?;
        Ok(top_topic_words(state, self.config.n_top_words))
    }

    /// Topic distribution of every fitted document; rows sum to 1.
    pub fn document_topics(&self) -> Result<Vec<Vec<f64>>, AnalysisError> {
        Ok(self.state()?.document_topics.clone())
    }

    /// Topic distributions for new texts against the fitted vocabulary.
    pub fn transform<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Vec<f64>>, AnalysisError> {
        let state = self.state()?;
        let dtm = state.vocabulary.transform(texts);
        Ok(state
            .model
            .transform(&dtm)
            .axis_iter(Axis(0))
            .map(|row| row.to_vec())
            .collect())
    }

    /// The strongest topic of each fitted document, sorted by topic index.
    ///
    /// `names` labels the documents in the order they were passed to `fit`.
    /// Ties on the maximum weight resolve to the lower topic index.
    pub fn dominant_topic<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Vec<DominantTopic>, AnalysisError> {
        let state = self.state()?;
        if names.len() != state.document_topics.len() {
            return Err(AnalysisError::InvalidArgument(format!(
                "expected {} document names, got {}",
                state.document_topics.len(),
                names.len()
            )));
        }

        let topics = top_topic_words(state, self.config.n_top_words.max(DOMINANT_TOPIC_WORDS));

        let mut rows: Vec<DominantTopic> = names
            .iter()
            .zip(&state.document_topics)
            .map(|(name, weights)| {
                let (topic_index, probability) = argmax(weights);
                DominantTopic {
                    document: name.as_ref().to_string(),
                    topic_index,
                    probability,
                    top_words: topics[topic_index]
                        .iter()
                        .take(DOMINANT_TOPIC_WORDS)
                        .cloned()
                        .collect(),
                }
            })
            .collect();

        rows.sort_by_key(|row| row.topic_index);
        Ok(rows)
    }
}

fn top_topic_words(state: &FittedThemes, n: usize) -> Vec<Vec<String>> {
    state
        .model
        .components()
        .axis_iter(Axis(0))
        .map(|weights| {
            let mut order: Vec<usize> = (0..weights.len()).collect();
            order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));
            order
                .into_iter()
                .take(n)
                .filter_map(|idx| state.vocabulary.term(idx).map(str::to_string))
                .collect()
        })
        .collect()
}

/// Index and value of the first maximum.
fn argmax(values: &[f64]) -> (usize, f64) {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, &v)| {
            if v > best.1 {
                (i, v)
            } else {
                best
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_prefers_first_maximum() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), (1, 0.4));
    }

    #[test]
    fn test_queries_before_fit_fail() {
        let analyzer = ThemeAnalyzer::new(ThemeConfig::with_topics(2));
        assert_eq!(analyzer.topics().unwrap_err(), AnalysisError::NotFitted);
        assert_eq!(analyzer.document_topics().unwrap_err(), AnalysisError::NotFitted);
        assert_eq!(
            analyzer.dominant_topic(&["a", "b"]).unwrap_err(),
            AnalysisError::NotFitted
        );
    }

    #[test]
    fn test_failed_refit_clears_previous_state() {
        let mut analyzer = ThemeAnalyzer::new(ThemeConfig::with_topics(2));
        analyzer.fit(&["whale harpoon", "ballroom bonnet"]).unwrap();
        assert!(analyzer.is_fitted());

        assert!(analyzer.fit(&["lonely"]).is_err());
        assert!(!analyzer.is_fitted());
    }
}
