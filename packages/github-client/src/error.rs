use thiserror::Error;

pub type Result<T> = std::result::Result<T, GithubError>;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The `sha` sent with a write no longer matches the file on the branch.
    #[error("{path} changed since it was read")]
    Conflict { path: String },

    #[error("{path} not found")]
    NotFound { path: String },

    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unsupported content encoding: {0}")]
    Encoding(String),

    #[error("Failed to decode content: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("File content is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
