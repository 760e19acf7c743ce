//! Request-level error taxonomy.
//!
//! Every variant is caught at the boundary that still produces an
//! [`ActionResponse`](crate::ActionResponse); none of them escapes as a fault.

use thiserror::Error;

use super::StoreError;

#[derive(Debug, Error)]
pub enum ContextError {
    /// Editor or site not found. Non-fatal: the operation is not applicable now.
    #[error("Not found: {0}")]
    Lookup(String),

    /// The editor was found but could not be written.
    #[error("Injection failed: {0}")]
    Injection(String),

    /// Traversal-level failure. Recovered per node by the extractor, only
    /// surfaced when a whole operation could not start.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// The backend service is unreachable.
    #[error("{0}")]
    Network(String),

    /// The backend accepted the request but did not answer in time.
    #[error("{0}")]
    Timeout(String),

    /// The backend answered with a 5xx status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The backend answered with another non-success status.
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// The backend body could not be parsed.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Malformed request or missing required request fields.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The operation succeeded but produced no usable text.
    #[error("Empty result: {0}")]
    EmptyResult(String),

    /// Persisted state could not be read or written.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ContextError {
    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ContextError::Network(_))
    }

    /// Lookup failures mean "nothing to do here", not a fault.
    pub fn is_lookup(&self) -> bool {
        matches!(self, ContextError::Lookup(_))
    }
}
