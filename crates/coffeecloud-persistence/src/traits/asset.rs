//! Asset identity persistence trait

use async_trait::async_trait;

use crate::model::AssetMapping;

/// Storage of (configuration, project, global identifier) to platform asset id links
#[async_trait]
pub trait AssetPersistence: Send + Sync {
    /// Look up the platform asset id of an identity
    async fn asset_get_id(
        &self,
        configuration_id: i64,
        project_id: &str,
        global_asset_id: &str,
    ) -> anyhow::Result<Option<i32>>;

    /// Record an identity; inserting an already known identity succeeds and keeps
    /// the stored asset id
    async fn asset_insert(&self, mapping: &AssetMapping) -> anyhow::Result<()>;

    /// Number of identities recorded for a configuration
    async fn asset_count(&self, configuration_id: i64) -> anyhow::Result<u64>;
}
