// Tokenized document store: the shared substrate every engine reads.
//
// Documents are kept in insertion order (IndexMap) so that every derived
// table iterates documents the same way on every run. Token order inside a
// document is never touched.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// A named, ordered token sequence produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub tokens: Vec<String>,
}

impl Document {
    pub fn new(name: impl Into<String>, tokens: Vec<String>) -> Self {
        Self {
            name: name.into(),
            tokens,
        }
    }

    /// Total number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The tokens joined with single spaces, as fed to the topic vectorizer.
    pub fn joined_text(&self) -> String {
        self.tokens.join(" ")
    }
}

/// Mapping from document name to token sequence.
///
/// Grows only by addition during an analysis run. Re-adding a name replaces
/// its tokens (last write wins) while keeping its original position.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: IndexMap<String, Vec<String>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the tokens for `name`, returning the replaced tokens.
    pub fn insert(&mut self, name: impl Into<String>, tokens: Vec<String>) -> Option<Vec<String>> {
        self.documents.insert(name.into(), tokens)
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.documents.get(name).map(Vec::as_slice)
    }

    /// Like `get`, but a missing name is a `NotFound` error.
    pub fn require(&self, name: &str) -> Result<&[String], AnalysisError> {
        self.get(name)
            .ok_or_else(|| AnalysisError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.documents.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Document names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// (name, tokens) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.documents
            .iter()
            .map(|(name, tokens)| (name.as_str(), tokens.as_slice()))
    }

    /// Owned copies of every document, in insertion order.
    pub fn documents(&self) -> Vec<Document> {
        self.iter()
            .map(|(name, tokens)| Document::new(name, tokens.to_vec()))
            .collect()
    }
}

impl FromIterator<Document> for DocumentStore {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut store = DocumentStore::new();
        for doc in iter {
            store.insert(doc.name, doc.tokens);
        }
        store
    }
}
