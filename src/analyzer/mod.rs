// Frequency analysis: distributions, TF-IDF, vocabulary statistics and
// rank correlation.

pub mod correlation;
pub mod frequency;
pub mod statistics;

pub use frequency::{FrequencyAnalyzer, FrequencyDistribution};
