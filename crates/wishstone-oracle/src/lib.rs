//! # wishstone-oracle
//!
//! Classification of wish text into a (wish_type, sentiment) pair.
//!
//! The classifier is an external language model treated as a black box. It
//! may be slow, unreachable, or return something unusable; every such case
//! surfaces as an [`OracleError`] and callers decide how to degrade.
//!
//! ## Modules
//!
//! - [`openai`]: chat-completions client with JSON-schema structured output
//! - [`stub`]: fixed or always-failing classifier for development and tests

pub mod openai;
pub mod stub;

use async_trait::async_trait;
use wishstone_types::wish::Classification;

pub use openai::{OpenAiClassifier, OpenAiConfig};
pub use stub::StubClassifier;

/// Error types for classification.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The classifier is not configured or deliberately disabled.
    #[error("classifier unavailable: {0}")]
    Unavailable(String),

    /// Transport failure, including timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The model declined to answer.
    #[error("model refused: {0}")]
    Refused(String),

    /// The response could not be turned into a complete label pair.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Convenience result type for oracle operations.
pub type Result<T> = std::result::Result<T, OracleError>;

/// Maps free text to a label pair.
///
/// Implementations are called with non-blank text only and must return a
/// complete pair (no `Unknown` on either side) or an error.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification>;
}
