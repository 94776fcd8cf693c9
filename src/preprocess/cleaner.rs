// Raw text cleanup for downloaded books.
//
// Project Gutenberg plain-text files carry a license header and footer
// around the actual book, and some mirrors serve HTML. `clean_text` strips
// both and leaves a single line of prose with normalized whitespace.

use std::sync::LazyLock;

use regex_lite::Regex;
use scraper::Html;

static GUTENBERG_START: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\*\*\*\s*(?:START|BEGIN) OF (?:THIS|THE) PROJECT GUTENBERG E-?BOOK[^*]*\*\*\*")
});

static GUTENBERG_END: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\*\*\*\s*(?:THE )?END OF (?:THIS|THE) PROJECT GUTENBERG E-?BOOK[^*]*\*\*\*")
});

static DIGITS: LazyLock<Regex> = LazyLock::new(|| compile(r"[0-9]+"));

// Patterns are literals; a failure here is a bug caught by the tests below.
fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => panic!("invalid built-in pattern {pattern:?}: {e}"),
    }
}

/// Full cleanup: HTML markup, Gutenberg boilerplate, whitespace.
pub fn clean_text(raw: &str) -> String {
    let text = strip_html(raw);
    let text = strip_gutenberg_boilerplate(&text);
    normalize_whitespace(text)
}

/// Text content of an HTML fragment.
///
/// Tags are dropped and every named or numeric character reference is
/// decoded. Plain text passes through unchanged.
pub fn strip_html(text: &str) -> String {
    Html::parse_fragment(text).root_element().text().collect()
}

/// Keep only the text between the START and END markers.
///
/// A missing marker leaves that side of the text untouched.
pub fn strip_gutenberg_boilerplate(text: &str) -> &str {
    let body = match GUTENBERG_START.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    };
    let body = match GUTENBERG_END.find(body) {
        Some(m) => &body[..m.start()],
        None => body,
    };
    body.trim()
}

/// Replace every character that is neither a word character nor whitespace
/// with a space, so "end.Next" still splits into two words.
pub fn remove_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect()
}

pub fn remove_numbers(text: &str) -> String {
    DIGITS.replace_all(text, "").into_owned()
}

/// Collapse runs of whitespace (including newlines and tabs) to one space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
