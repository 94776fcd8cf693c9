// Unit tests for text cleanup and tokenization.
//
// Tests the cleaner on Gutenberg-shaped input and the tokenizer contract:
// lowercase output, stop word removal, determinism.

use novelscope::gutenberg::clean_filename;
use novelscope::preprocess::cleaner::{clean_text, remove_numbers};
use novelscope::preprocess::{preprocess_text, StandardTokenizer, TextTokenizer};

const BOOK: &str = "\u{feff}The Project Gutenberg eBook of Emma\n\
Title: Emma\n\
Author: Jane Austen\n\
\n\
*** START OF THE PROJECT GUTENBERG EBOOK EMMA ***\n\
\n\
<h1>CHAPTER I</h1>\n\
Emma Woodhouse, handsome, clever, and rich, with a comfortable home\n\
and happy disposition, seemed to unite some of the best blessings\n\
of existence &amp; had lived nearly twenty-one years in the world.\n\
\n\
*** END OF THE PROJECT GUTENBERG EBOOK EMMA ***\n\
Updated editions will replace the previous one.";

// ============================================================
// Cleaner
// ============================================================

#[test]
fn clean_text_strips_boilerplate_and_markup() {
    let cleaned = clean_text(BOOK);
    assert!(cleaned.starts_with("CHAPTER I Emma Woodhouse"));
    assert!(cleaned.ends_with("in the world."));
    assert!(!cleaned.contains("Gutenberg"));
    assert!(!cleaned.contains('<'));
    assert!(cleaned.contains("existence & had"));
    assert!(!cleaned.contains('\n'));
}

#[test]
fn named_entities_decode_into_whole_words() {
    let tokenizer = StandardTokenizer {
        lemmatize: false,
        ..StandardTokenizer::default()
    };
    let tokens = preprocess_text(
        "<p>The caf&eacute; na&iuml;ve r&eacute;sum&eacute; &AElig;sop</p>",
        &tokenizer,
    );
    assert_eq!(tokens, vec!["café", "naïve", "résumé", "æsop"]);
}

#[test]
fn remove_numbers_drops_digits() {
    assert_eq!(remove_numbers("Chapter 12, page 3"), "Chapter , page ");
}

// ============================================================
// Tokenizer
// ============================================================

#[test]
fn tokens_are_lowercase_without_stop_words() {
    let tokenizer = StandardTokenizer::new(vec!["said".to_string()], 3);
    let tokens = preprocess_text(BOOK, &tokenizer);

    assert!(!tokens.is_empty());
    assert!(tokens.iter().all(|t| *t == t.to_lowercase()));
    for stop in ["the", "and", "with", "said", "of"] {
        assert!(!tokens.iter().any(|t| t == stop), "{stop} survived");
    }
    assert!(tokens.iter().any(|t| t == "emma"));
    assert!(tokens.iter().any(|t| t == "woodhouse"));
    // "blessings" lemmatized to singular
    assert!(tokens.iter().any(|t| t == "blessing"));
    assert!(!tokens.iter().any(|t| t == "gutenberg"));
}

#[test]
fn tokenization_is_deterministic() {
    let tokenizer = StandardTokenizer::default();
    assert_eq!(
        preprocess_text(BOOK, &tokenizer),
        preprocess_text(BOOK, &tokenizer)
    );
}

#[test]
fn min_word_length_filters_short_tokens() {
    let tokenizer = StandardTokenizer {
        remove_stopwords: false,
        lemmatize: false,
        min_word_length: 4,
        ..StandardTokenizer::default()
    };
    assert_eq!(tokenizer.tokenize("a cat sat upon whales"), vec!["upon", "whales"]);
}

#[test]
fn tokenizer_usable_as_trait_object() {
    let tokenizer: Box<dyn TextTokenizer> = Box::new(StandardTokenizer::default());
    assert_eq!(tokenizer.tokenize("Whales!"), vec!["whale"]);
}

// ============================================================
// File names
// ============================================================

#[test]
fn clean_filename_is_filesystem_safe() {
    let name = clean_filename("84_Frankenstein; Or, The Modern Prometheus: A/B?.txt");
    assert!(!name.contains(['\\', '/', '*', '?', ':', '"', '<', '>', '|']));
    assert!(name.ends_with(".txt"));
}
