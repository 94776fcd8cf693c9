// Text preprocessing: raw book text to word tokens.

pub mod cleaner;
pub mod tokenizer;
pub mod traits;

pub use tokenizer::StandardTokenizer;
pub use traits::TextTokenizer;

/// Clean raw book text and tokenize it.
pub fn preprocess_text(raw: &str, tokenizer: &dyn TextTokenizer) -> Vec<String> {
    let cleaned = cleaner::clean_text(raw);
    let cleaned = cleaner::remove_punctuation(&cleaned);
    let cleaned = cleaner::normalize_whitespace(&cleaned);
    tokenizer.tokenize(&cleaned)
}
