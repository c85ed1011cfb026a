//! Test doubles shared by the sync integration tests

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use coffeecloud_eliona::{Asset, AssetPlatform, Data, ElionaError};
use coffeecloud_persistence::{Configuration, ConfigurationDraft};

/// Asset platform that hands out sequential ids and records every call
#[derive(Default)]
pub struct RecordingPlatform {
    next_id: AtomicI32,
    pub assets: Mutex<Vec<Asset>>,
    pub data: Mutex<Vec<Data>>,
    failing_project: Option<String>,
}

impl RecordingPlatform {
    pub fn failing_for(project_id: &str) -> Self {
        Self {
            failing_project: Some(project_id.to_string()),
            ..Default::default()
        }
    }

    pub fn assets(&self) -> Vec<Asset> {
        self.assets.lock().unwrap().clone()
    }

    pub fn data(&self) -> Vec<Data> {
        self.data.lock().unwrap().clone()
    }

    pub fn asset(&self, identifier: &str) -> Option<Asset> {
        self.assets()
            .into_iter()
            .find(|a| a.global_asset_identifier == identifier)
    }
}

#[async_trait]
impl AssetPlatform for RecordingPlatform {
    async fn upsert_asset(&self, asset: &Asset) -> Result<i32, ElionaError> {
        if self.failing_project.as_deref() == Some(asset.project_id.as_str()) {
            return Err(ElionaError::RequestFailed {
                status: 500,
                body: "project unavailable".to_string(),
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut created = asset.clone();
        created.id = Some(id);
        self.assets.lock().unwrap().push(created);
        Ok(id)
    }

    async fn upsert_data(&self, data: &Data) -> Result<(), ElionaError> {
        self.data.lock().unwrap().push(data.clone());
        Ok(())
    }
}

pub fn configuration(url: &str, project_ids: &[&str]) -> Configuration {
    ConfigurationDraft {
        url: Some(url.to_string()),
        username: Some("barista".to_string()),
        password: Some("crema".to_string()),
        api_key: Some("tenant-key".to_string()),
        refresh_interval: Some(60),
        project_ids: Some(project_ids.iter().map(|p| p.to_string()).collect()),
        ..Default::default()
    }
    .validate(1)
    .unwrap()
}
