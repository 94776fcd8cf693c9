use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::gutenberg::client::DEFAULT_GUTENBERG_URL;
use crate::gutenberg::PolitenessDelay;
use crate::insights::ThemeConfig;
use crate::preprocess::StandardTokenizer;

/// Words too common in narrative prose to say anything about a book.
pub const DEFAULT_CUSTOM_STOPWORDS: &[&str] =
    &["said", "would", "could", "one", "may", "also", "even", "many"];

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
/// Loading never touches the filesystem; each pipeline stage creates the
/// directories it writes into.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Root for raw/, processed/ and results/ (NOVELSCOPE_DATA_DIR)
    pub data_dir: PathBuf,
    /// Rows in the frequency and comparison reports
    pub top_words: usize,
    /// Requested topic count; the themes stage caps it at the document count
    pub topics: usize,
    pub words_per_topic: usize,
    /// Dropped during preprocessing on top of the English stop list
    pub custom_stopwords: Vec<String>,
    pub min_word_length: usize,
    pub delay_min_secs: f64,
    pub delay_max_secs: f64,
    /// Project Gutenberg endpoint (defaults to https://www.gutenberg.org)
    pub gutenberg_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            top_words: 50,
            topics: 5,
            words_per_topic: 10,
            custom_stopwords: DEFAULT_CUSTOM_STOPWORDS
                .iter()
                .map(|w| w.to_string())
                .collect(),
            min_word_length: 3,
            delay_min_secs: 1.0,
            delay_max_secs: 3.0,
            gutenberg_url: DEFAULT_GUTENBERG_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional. A numeric variable that is set but does
    /// not parse is an error rather than a silent fallback.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let custom_stopwords = match env::var("NOVELSCOPE_CUSTOM_STOPWORDS") {
            Ok(list) => parse_list(&list),
            Err(_) => defaults.custom_stopwords,
        };

        Ok(Self {
            data_dir: env::var("NOVELSCOPE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            top_words: parse_var("NOVELSCOPE_TOP_WORDS", defaults.top_words)?,
            topics: parse_var("NOVELSCOPE_TOPICS", defaults.topics)?,
            words_per_topic: parse_var("NOVELSCOPE_WORDS_PER_TOPIC", defaults.words_per_topic)?,
            custom_stopwords,
            min_word_length: parse_var("NOVELSCOPE_MIN_WORD_LENGTH", defaults.min_word_length)?,
            delay_min_secs: parse_var("NOVELSCOPE_DELAY_MIN_SECS", defaults.delay_min_secs)?,
            delay_max_secs: parse_var("NOVELSCOPE_DELAY_MAX_SECS", defaults.delay_max_secs)?,
            gutenberg_url: env::var("NOVELSCOPE_GUTENBERG_URL")
                .unwrap_or(defaults.gutenberg_url),
        })
    }

    /// Downloaded books, one `.txt` per book.
    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }

    /// Token files, one `<name>_processed.txt` per book.
    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join("processed")
    }

    /// CSV and JSON reports.
    pub fn results_dir(&self) -> PathBuf {
        self.data_dir.join("results")
    }

    pub fn tokenizer(&self) -> StandardTokenizer {
        StandardTokenizer::new(self.custom_stopwords.clone(), self.min_word_length)
    }

    pub fn politeness_delay(&self) -> PolitenessDelay {
        PolitenessDelay::new(self.delay_min_secs, self.delay_max_secs)
    }

    /// Topic model settings for a corpus of `n_documents`.
    pub fn theme_config(&self, n_documents: usize) -> ThemeConfig {
        ThemeConfig {
            n_topics: self.topics.min(n_documents),
            n_top_words: self.words_per_topic,
            ..ThemeConfig::default()
        }
    }
}

/// `dirs::data_dir()/novelscope`, or `./data` where the platform has none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("novelscope"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(default),
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number, got {raw:?}")),
        Err(_) => Ok(default),
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list(" Said, would,,could "), vec!["said", "would", "could"]);
    }

    #[test]
    fn test_theme_config_caps_topics_at_document_count() {
        let config = Config::default();
        assert_eq!(config.theme_config(3).n_topics, 3);
        assert_eq!(config.theme_config(12).n_topics, 5);
    }

    #[test]
    fn test_directory_layout() {
        let config = Config {
            data_dir: PathBuf::from("/tmp/novels"),
            ..Config::default()
        };
        assert_eq!(config.raw_dir(), PathBuf::from("/tmp/novels/raw"));
        assert_eq!(config.processed_dir(), PathBuf::from("/tmp/novels/processed"));
        assert_eq!(config.results_dir(), PathBuf::from("/tmp/novels/results"));
    }
}
