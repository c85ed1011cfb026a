//! Persistence traits for the storage abstraction layer
//!
//! Both backends, external database (MySQL/PostgreSQL) and in-memory, implement
//! every trait so callers can hold whichever slice of the interface they need.

pub mod asset;
pub mod configuration;

pub use asset::AssetPersistence;
pub use configuration::ConfigurationPersistence;

use async_trait::async_trait;

use crate::model::StorageMode;

/// Unified persistence service trait
#[async_trait]
pub trait PersistenceService: ConfigurationPersistence + AssetPersistence + Send + Sync {
    /// Get the current storage mode
    fn storage_mode(&self) -> StorageMode;

    /// Health check for the storage backend
    async fn health_check(&self) -> anyhow::Result<()>;
}
