// Tokenizer trait, so the preprocessing stage can swap tokenization schemes.
//
// The pipeline only sees `&dyn TextTokenizer`. The default implementation is
// `StandardTokenizer`; anything that turns cleaned text into word tokens
// can stand in for it.

/// Turns cleaned text into a sequence of word tokens.
pub trait TextTokenizer {
    /// Tokenize `text`. Must be deterministic for the same input.
    fn tokenize(&self, text: &str) -> Vec<String>;
}
