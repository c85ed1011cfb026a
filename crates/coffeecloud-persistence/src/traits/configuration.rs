//! Configuration persistence trait

use async_trait::async_trait;

use crate::model::Configuration;

/// Tenant configuration storage operations
#[async_trait]
pub trait ConfigurationPersistence: Send + Sync {
    /// All valid configurations ordered by id; invalid rows are skipped
    async fn configuration_find_all(&self) -> anyhow::Result<Vec<Configuration>>;

    /// Find a configuration by id
    async fn configuration_get(&self, id: i64) -> anyhow::Result<Option<Configuration>>;

    /// Store a new configuration; the id of the argument is ignored and assigned
    async fn configuration_create(&self, configuration: &Configuration)
    -> anyhow::Result<Configuration>;

    /// Replace every field except `active`; returns false when the id is unknown
    async fn configuration_update(&self, configuration: &Configuration) -> anyhow::Result<bool>;

    /// Delete a configuration together with its asset mappings
    async fn configuration_delete(&self, id: i64) -> anyhow::Result<bool>;

    /// Set the running flag of a configuration
    async fn configuration_set_active(&self, id: i64, active: bool) -> anyhow::Result<bool>;
}
