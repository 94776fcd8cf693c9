// Corpus statistics: TF-IDF, lexical diversity, Jaccard overlap and
// readability heuristics.
//
// Empty-input conventions are explicit here rather than falling out of
// floating-point arithmetic:
//   - an empty document scores no terms (empty TF-IDF row)
//   - lexical diversity of an empty sequence is 0.0
//   - Jaccard of two empty vocabularies is 0.0, never 1.0

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::frequency::frequency_distribution;
use crate::corpus::DocumentStore;

/// Document name -> (term -> tf-idf score).
pub type TfIdfTable = IndexMap<String, IndexMap<String, f64>>;

/// Compute TF-IDF for every term of every document.
///
/// `tf(t, d) = count(t, d) / |d|`, `idf(t) = ln(N / df(t))`. A term present
/// in every document therefore scores 0.0. The table is only valid for the
/// exact document set it was computed from.
pub fn calculate_tfidf(store: &DocumentStore) -> TfIdfTable {
    let mut document_freq: HashMap<&str, usize> = HashMap::new();
    for (_, tokens) in store.iter() {
        let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        for term in unique {
            *document_freq.entry(term).or_insert(0) += 1;
        }
    }

    let n_documents = store.len() as f64;
    let mut table = TfIdfTable::with_capacity(store.len());

    for (name, tokens) in store.iter() {
        let total_terms = tokens.len() as f64;
        let mut scores = IndexMap::new();

        for (term, count) in frequency_distribution(tokens) {
            let tf = count as f64 / total_terms;
            // df >= 1: the term came from this very document
            let df = document_freq.get(term.as_str()).copied().unwrap_or(1) as f64;
            let idf = (n_documents / df).ln();
            scores.insert(term, tf * idf);
        }

        table.insert(name.to_string(), scores);
    }

    table
}

/// Unique tokens divided by total tokens; 0.0 for an empty sequence.
pub fn lexical_diversity<S: AsRef<str>>(tokens: &[S]) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let unique: HashSet<&str> = tokens.iter().map(|t| t.as_ref()).collect();
    unique.len() as f64 / tokens.len() as f64
}

/// Intersection over union of two sets. Two empty sets score 0.0.
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Jaccard similarity of the vocabularies of two token sequences.
pub fn similarity_score<S: AsRef<str>>(tokens_a: &[S], tokens_b: &[S]) -> f64 {
    let set_a: HashSet<&str> = tokens_a.iter().map(|t| t.as_ref()).collect();
    let set_b: HashSet<&str> = tokens_b.iter().map(|t| t.as_ref()).collect();
    jaccard(&set_a, &set_b)
}

/// Readability estimates for a passage of raw text.
///
/// All fields are `None` when the text has no sentences or no words.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityMetrics {
    pub flesch_kincaid_grade: Option<f64>,
    pub flesch_reading_ease: Option<f64>,
    pub average_words_per_sentence: Option<f64>,
}

/// Flesch reading ease and Flesch-Kincaid grade for `text`.
///
/// Sentences are the non-blank '.'-separated segments; words are
/// whitespace-separated. Syllables use a vowel-group heuristic.
pub fn readability(text: &str) -> ReadabilityMetrics {
    let sentences = text.split('.').filter(|s| !s.trim().is_empty()).count();
    let words: Vec<&str> = text.split_whitespace().collect();

    if sentences == 0 || words.is_empty() {
        return ReadabilityMetrics::default();
    }

    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();
    let words_per_sentence = words.len() as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words.len() as f64;

    ReadabilityMetrics {
        flesch_kincaid_grade: Some(0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59),
        flesch_reading_ease: Some(
            206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word,
        ),
        average_words_per_sentence: Some(words_per_sentence),
    }
}

/// Approximate syllable count. Never returns less than 1.
pub fn count_syllables(word: &str) -> usize {
    const VOWELS: &str = "aeiouy";
    let chars: Vec<char> = word.to_lowercase().chars().collect();
    if chars.len() <= 3 {
        return 1;
    }

    let is_vowel = |c: char| VOWELS.contains(c);
    let mut count: i64 = 0;

    if is_vowel(chars[0]) {
        count += 1;
    }
    for pair in chars.windows(2) {
        if is_vowel(pair[1]) && !is_vowel(pair[0]) {
            count += 1;
        }
    }

    let last = chars[chars.len() - 1];
    if last == 'e' {
        count -= 1;
    }
    if last == 'e' && chars[chars.len() - 2] == 'l' && !is_vowel(chars[chars.len() - 3]) {
        count += 1;
    }

    count.max(1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_syllables_short_words() {
        assert_eq!(count_syllables("the"), 1);
        assert_eq!(count_syllables("a"), 1);
    }

    #[test]
    fn test_count_syllables_silent_e_and_le() {
        // "make": m-a-k-e -> 1 vowel group after a consonant ('a'), 'e' -> 2, minus silent e
        assert_eq!(count_syllables("make"), 1);
        // "table": a, e groups = 2, silent e -1, consonant+le +1
        assert_eq!(count_syllables("table"), 2);
    }

    #[test]
    fn test_count_syllables_multi() {
        assert_eq!(count_syllables("wonderful"), 3);
    }

    #[test]
    fn test_jaccard_empty_sets_are_zero() {
        let a: HashSet<&str> = HashSet::new();
        assert_eq!(jaccard(&a, &a), 0.0);
    }

    #[test]
    fn test_readability_empty_text() {
        assert_eq!(readability("   "), ReadabilityMetrics::default());
    }
}
