//! Gateway error types.

use carryover_protocols::ContextError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// No connection could be made to the service.
    #[error("Could not reach the context service at {base_url}. Is it running?")]
    Unreachable { base_url: String },

    /// Connected, but no answer arrived within the client timeout.
    #[error("The context service at {base_url} did not answer within {timeout_secs}s")]
    Timeout { base_url: String, timeout_secs: u64 },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The call succeeded but carried no usable text.
    #[error("Empty result: {0}")]
    Empty(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl From<GatewayError> for ContextError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unreachable { .. } | GatewayError::Client(_) => {
                ContextError::Network(err.to_string())
            }
            GatewayError::Timeout { .. } => ContextError::Timeout(err.to_string()),
            GatewayError::Server { status, message } => ContextError::Server { status, message },
            GatewayError::Http { status } => ContextError::Http { status },
            GatewayError::Malformed(msg) => ContextError::MalformedResponse(msg),
            GatewayError::Empty(msg) => ContextError::EmptyResult(msg),
        }
    }
}
