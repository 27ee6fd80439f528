//! Error types for the Lark client.

use thiserror::Error;

/// Result type for Lark client operations.
pub type Result<T> = std::result::Result<T, LarkError>;

#[derive(Debug, Error)]
pub enum LarkError {
    /// Transport failure (connection refused, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Lark answered with a non-zero business code
    #[error("Lark API error {code}: {message}")]
    Api { code: i64, message: String },

    /// Non-2xx response whose body was not a Lark envelope
    #[error("Lark returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Successful envelope without the `data` the endpoint documents
    #[error("Lark response for {0} carried no data")]
    MissingData(&'static str),
}
