// Novelscope: word frequency and theme analysis for classic novels
//
// This is the library root. The analysis engines (corpus, analyzer,
// insights) are pure and return typed errors; the remaining modules drive
// them from the command line and the filesystem.

pub mod analyzer;
pub mod config;
pub mod corpus;
pub mod error;
pub mod gutenberg;
pub mod insights;
pub mod output;
pub mod pipeline;
pub mod preprocess;
pub mod status;

pub use error::AnalysisError;
