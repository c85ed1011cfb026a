// Error types for the Eliona client

/// Errors that can occur while talking to the Eliona API
#[derive(Debug, thiserror::Error)]
pub enum ElionaError {
    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Asset upsert for {0} returned no id")]
    MissingAssetId(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ElionaError>;
