//! Error types for deep-link routing.

use thiserror::Error;

/// Deep-link routing errors.
#[derive(Debug, Error)]
pub enum DeeplinkError {
    /// The dispatch input could not be parsed into scheme, authority and query.
    #[error("malformed uri {input:?}: {reason}")]
    MalformedUri {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The URI was well formed but no route matched its authority.
    #[error("no route matched: {0}")]
    Unresolved(String),

    /// A route pattern could not be registered.
    #[error("invalid route pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A required query parameter is absent.
    #[error("missing query parameter: {0}")]
    MissingParameter(String),

    /// The route manifest is not valid JSON for the expected shape.
    #[error("invalid route manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Result type alias for deep-link operations.
pub type Result<T> = std::result::Result<T, DeeplinkError>;
