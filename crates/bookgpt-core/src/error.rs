//! Error types for BookGPT Core
//!
//! Every failure class the generation pipeline knows about lives here.
//! Only [`ValidationError`] is ever surfaced to a caller as a hard failure;
//! provider and extraction errors are absorbed by the pipeline and turned into
//! fallback content.

use thiserror::Error;

/// Result type alias for BookGPT operations
pub type Result<T> = std::result::Result<T, BookGptError>;

/// Main error type for BookGPT operations
#[derive(Error, Debug)]
pub enum BookGptError {
    /// Request is missing required fields
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Every provider in the chain failed or was unavailable
    #[error("No provider produced a reply ({} attempts failed)", .0.len())]
    ProvidersExhausted(Vec<ProviderError>),

    /// Model response could not be turned into a structured result
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),
}

/// Missing or blank required fields.
///
/// Always carries the complete list so a caller can show every problem in a
/// single response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// The request body itself is absent or of the wrong kind
    #[error("{0}")]
    InvalidRequest(String),
}

impl ValidationError {
    /// Build from a list of missing field names, `None` when the list is empty
    pub fn from_missing(missing: Vec<String>) -> Option<Self> {
        if missing.is_empty() {
            None
        } else {
            Some(Self::MissingFields(missing))
        }
    }

    /// Field names reported by this error
    pub fn fields(&self) -> &[String] {
        match self {
            Self::MissingFields(fields) => fields,
            Self::InvalidRequest(_) => &[],
        }
    }
}

/// Errors related to a single provider attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("{0} is unavailable: missing credentials")]
    Unavailable(String),

    #[error("{provider} failed: {reason}")]
    Failed { provider: String, reason: String },

    #[error("{provider} timed out after {secs}s")]
    Timeout { provider: String, secs: u64 },

    #[error("{0} returned an empty response")]
    EmptyResponse(String),
}

impl ProviderError {
    /// Name of the provider the error belongs to
    pub fn provider(&self) -> &str {
        match self {
            Self::Unavailable(name) | Self::EmptyResponse(name) => name,
            Self::Failed { provider, .. } | Self::Timeout { provider, .. } => provider,
        }
    }
}

/// Errors related to pulling a structured result out of model text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("No JSON object found in response")]
    NoJsonFound,

    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
}
