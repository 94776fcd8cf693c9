// Corpus storage: named token sequences shared by all analysis engines.

pub mod store;

pub use store::{Document, DocumentStore};
