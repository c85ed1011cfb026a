// Error taxonomy of a sync cycle

use coffeecloud_client::ClientError;
use coffeecloud_eliona::ElionaError;

use crate::filter::FilterError;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Login to the source failed; aborts the cycle
    #[error("authentication failed: {0}")]
    Auth(#[source] ClientError),

    /// A source listing could not be retrieved; aborts the cycle
    #[error("fetching {resource} failed: {source}")]
    Fetch {
        resource: &'static str,
        #[source]
        source: ClientError,
    },

    /// The entity is skipped
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Aborts publishing for the current project
    #[error("creating asset '{identifier}' failed: {source}")]
    AssetCreation {
        identifier: String,
        #[source]
        source: ElionaError,
    },

    /// Aborts publishing for the current project
    #[error("upserting data of asset '{identifier}' failed: {source}")]
    DataUpsert {
        identifier: String,
        #[source]
        source: ElionaError,
    },

    #[error("store error: {0:#}")]
    Store(anyhow::Error),
}

impl SyncError {
    pub fn fetch(resource: &'static str) -> impl FnOnce(ClientError) -> Self {
        move |source| SyncError::Fetch { resource, source }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
