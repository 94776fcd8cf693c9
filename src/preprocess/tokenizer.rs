// Standard word tokenizer: lowercase, split, filter stop words, normalize.
//
// Stop words come from the `stop-words` English list plus any custom words
// from configuration. After filtering, each token is either lemmatized
// (plural nouns folded to their singular) or stemmed with the Snowball
// English stemmer. Lemmatization wins when both are enabled.

use std::collections::HashSet;
use std::sync::LazyLock;

use rust_stemmers::{Algorithm, Stemmer};
use stop_words::{get, LANGUAGE};

use super::traits::TextTokenizer;

static STEMMER: LazyLock<Stemmer> = LazyLock::new(|| Stemmer::create(Algorithm::English));

/// Irregular plurals the suffix rules would get wrong.
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("oxen", "ox"),
    ("wives", "wife"),
    ("lives", "life"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("wolves", "wolf"),
    ("halves", "half"),
    ("selves", "self"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct StandardTokenizer {
    pub remove_stopwords: bool,
    pub lemmatize: bool,
    pub stem: bool,
    /// Extra words dropped along with the English stop list
    pub custom_stopwords: Vec<String>,
    /// Shorter tokens are dropped (counted in characters)
    pub min_word_length: usize,
}

impl Default for StandardTokenizer {
    fn default() -> Self {
        Self {
            remove_stopwords: true,
            lemmatize: true,
            stem: false,
            custom_stopwords: Vec::new(),
            min_word_length: 1,
        }
    }
}

impl StandardTokenizer {
    pub fn new(custom_stopwords: Vec<String>, min_word_length: usize) -> Self {
        Self {
            custom_stopwords,
            min_word_length,
            ..Self::default()
        }
    }

    fn stop_words(&self) -> HashSet<String> {
        if !self.remove_stopwords {
            return HashSet::new();
        }
        let mut words: HashSet<String> = get(LANGUAGE::English).into_iter().collect();
        words.extend(self.custom_stopwords.iter().map(|w| w.trim().to_lowercase()));
        words
    }

    fn normalize(&self, token: String) -> String {
        if self.lemmatize {
            lemmatize(&token)
        } else if self.stem {
            STEMMER.stem(&token).into_owned()
        } else {
            token
        }
    }
}

impl TextTokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let stop_words = self.stop_words();
        let lowered = text.to_lowercase();

        lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|word| !word.is_empty() && word.chars().count() >= self.min_word_length)
            .filter(|word| !stop_words.contains(*word))
            .map(|word| self.normalize(word.to_string()))
            .collect()
    }
}

/// Fold a plural noun to its singular form with suffix rules.
///
/// Words of three characters or fewer, and words ending in "ss", "us" or
/// "is", are returned unchanged.
pub fn lemmatize(word: &str) -> String {
    if let Some(&(_, singular)) = IRREGULAR_PLURALS.iter().find(|(plural, _)| *plural == word) {
        return singular.to_string();
    }
    if word.chars().count() <= 3 || ["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if stem.chars().count() > 1 {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "ches", "shes", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    match word.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}
