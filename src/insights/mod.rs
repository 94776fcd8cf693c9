// Cross-document insights: comparisons and topic modeling.

pub mod comparisons;
pub mod lda;
pub mod themes;
pub mod vectorizer;

pub use comparisons::{ComparativeAnalyzer, SimilarityMatrix, SimilarityMethod};
pub use themes::{ThemeAnalyzer, ThemeConfig};
