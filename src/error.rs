// Error taxonomy for the analysis engines.
//
// The frequency, comparative and topic engines are pure computations: they
// never log and never retry. Every failure is one of these four variants,
// returned synchronously so the caller can validate or report it.

use thiserror::Error;

/// Errors returned by the corpus analysis engines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A referenced document name is not in the store.
    #[error("Document '{0}' not found")]
    NotFound(String),

    /// An argument is outside its accepted domain (unknown similarity
    /// method, topic count of zero or above the document count, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Not enough documents or vocabulary for the requested analysis.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A topic query was made before `fit`.
    #[error("Topic model has not been fitted yet")]
    NotFitted,
}
