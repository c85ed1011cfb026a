//! In-memory persistence backend
//!
//! Used when no database is configured. State is lost on restart, so asset
//! identities are re-created on the target platform after every start.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::model::*;
use crate::traits::*;

type AssetKey = (i64, String, String);

/// DashMap backed persistence service
pub struct MemoryPersistService {
    configurations: DashMap<i64, Configuration>,
    assets: DashMap<AssetKey, i32>,
    next_id: AtomicI64,
}

impl Default for MemoryPersistService {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPersistService {
    pub fn new() -> Self {
        Self {
            configurations: DashMap::new(),
            assets: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl PersistenceService for MemoryPersistService {
    fn storage_mode(&self) -> StorageMode {
        StorageMode::Memory
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl ConfigurationPersistence for MemoryPersistService {
    async fn configuration_find_all(&self) -> anyhow::Result<Vec<Configuration>> {
        let mut configurations: Vec<Configuration> = self
            .configurations
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        configurations.sort_by_key(|c| c.id);
        Ok(configurations)
    }

    async fn configuration_get(&self, id: i64) -> anyhow::Result<Option<Configuration>> {
        Ok(self.configurations.get(&id).map(|entry| entry.value().clone()))
    }

    async fn configuration_create(
        &self,
        configuration: &Configuration,
    ) -> anyhow::Result<Configuration> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = Configuration {
            id,
            ..configuration.clone()
        };
        self.configurations.insert(id, stored.clone());
        Ok(stored)
    }

    async fn configuration_update(&self, configuration: &Configuration) -> anyhow::Result<bool> {
        match self.configurations.get_mut(&configuration.id) {
            Some(mut entry) => {
                let active = entry.active;
                *entry = Configuration {
                    active,
                    ..configuration.clone()
                };
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn configuration_delete(&self, id: i64) -> anyhow::Result<bool> {
        self.assets.retain(|(configuration_id, _, _), _| *configuration_id != id);
        Ok(self.configurations.remove(&id).is_some())
    }

    async fn configuration_set_active(&self, id: i64, active: bool) -> anyhow::Result<bool> {
        match self.configurations.get_mut(&id) {
            Some(mut entry) => {
                entry.active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl AssetPersistence for MemoryPersistService {
    async fn asset_get_id(
        &self,
        configuration_id: i64,
        project_id: &str,
        global_asset_id: &str,
    ) -> anyhow::Result<Option<i32>> {
        let key = (
            configuration_id,
            project_id.to_string(),
            global_asset_id.to_string(),
        );
        Ok(self.assets.get(&key).map(|entry| *entry.value()))
    }

    async fn asset_insert(&self, mapping: &AssetMapping) -> anyhow::Result<()> {
        self.assets
            .entry((
                mapping.configuration_id,
                mapping.project_id.clone(),
                mapping.global_asset_id.clone(),
            ))
            .or_insert(mapping.asset_id);
        Ok(())
    }

    async fn asset_count(&self, configuration_id: i64) -> anyhow::Result<u64> {
        let count = self
            .assets
            .iter()
            .filter(|entry| entry.key().0 == configuration_id)
            .count();
        Ok(count as u64)
    }
}
