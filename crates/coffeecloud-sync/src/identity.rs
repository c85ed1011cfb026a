//! Create-or-reuse resolution of target platform assets
//!
//! Look up the identity, otherwise create the asset on the platform and record
//! the mapping. The id returned is always the recorded one. A crash between creation and recording creates a duplicate asset
//! in the next cycle.

use std::sync::Arc;

use coffeecloud_eliona::{Asset, AssetPlatform};
use coffeecloud_persistence::{AssetMapping, AssetPersistence};
use tracing::{debug, info, warn};

use crate::error::{Result, SyncError};

#[derive(Clone)]
pub struct AssetIdentityCache {
    store: Arc<dyn AssetPersistence>,
    platform: Arc<dyn AssetPlatform>,
}

impl AssetIdentityCache {
    pub fn new(store: Arc<dyn AssetPersistence>, platform: Arc<dyn AssetPlatform>) -> Self {
        Self { store, platform }
    }

    /// Platform id of `asset` for this configuration, creating it the first time
    pub async fn create_asset_first_time(&self, configuration_id: i64, asset: &Asset) -> Result<i32> {
        let project_id = asset.project_id.as_str();
        let identifier = asset.global_asset_identifier.as_str();

        if let Some(asset_id) = self
            .store
            .asset_get_id(configuration_id, project_id, identifier)
            .await
            .map_err(SyncError::Store)?
        {
            debug!(configuration_id, project_id, unique_identifier = identifier, asset_id, "Reusing asset");
            return Ok(asset_id);
        }

        let asset_id = self
            .platform
            .upsert_asset(asset)
            .await
            .map_err(|source| SyncError::AssetCreation {
                identifier: identifier.to_string(),
                source,
            })?;

        self.store
            .asset_insert(&AssetMapping {
                configuration_id,
                project_id: project_id.to_string(),
                global_asset_id: identifier.to_string(),
                asset_id,
            })
            .await
            .map_err(SyncError::Store)?;

        // A concurrent insert may have won; the stored mapping is authoritative
        let stored_id = self
            .store
            .asset_get_id(configuration_id, project_id, identifier)
            .await
            .map_err(SyncError::Store)?
            .unwrap_or(asset_id);
        if stored_id != asset_id {
            warn!(
                configuration_id,
                project_id,
                unique_identifier = identifier,
                created = asset_id,
                stored = stored_id,
                "Identity already recorded, using stored asset"
            );
            return Ok(stored_id);
        }

        info!(configuration_id, project_id, unique_identifier = identifier, asset_id, "Created asset");
        Ok(asset_id)
    }
}
