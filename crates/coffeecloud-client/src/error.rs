//! Client error types for the CoffeeCloud API

/// Error type for CoffeeCloud API operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("auth failed: {0}")]
    AuthFailed(String),

    #[error("request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("request timeout")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Classify a transport error, separating timeouts from other failures
    pub fn transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Http(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
