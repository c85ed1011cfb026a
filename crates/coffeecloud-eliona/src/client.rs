// ElionaClient - asset and data upserts against the Eliona API v2

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::config::ElionaClientConfig;
use crate::error::{ElionaError, Result};
use crate::model::{Asset, Data};

pub const API_KEY_HEADER: &str = "X-API-Key";
pub const ASSETS_PATH: &str = "/assets";
pub const DATA_PATH: &str = "/data";

/// Target platform operations used by the sync engine
#[async_trait]
pub trait AssetPlatform: Send + Sync {
    /// Create or update an asset and return its platform id
    async fn upsert_asset(&self, asset: &Asset) -> Result<i32>;

    /// Write the current attribute values of one asset subtype
    async fn upsert_data(&self, data: &Data) -> Result<()>;
}

/// HTTP client for the Eliona API
pub struct ElionaClient {
    client: Client,
    config: ElionaClientConfig,
}

impl ElionaClient {
    pub fn new(config: ElionaClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { client, config })
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        let url = self.build_url(path);
        debug!("PUT {}", url);

        let response = self
            .client
            .put(&url)
            .header(API_KEY_HEADER, &self.config.api_token)
            .json(body)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<Option<T>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ElionaError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

#[async_trait]
impl AssetPlatform for ElionaClient {
    async fn upsert_asset(&self, asset: &Asset) -> Result<i32> {
        let upserted: Option<Asset> = self.put(ASSETS_PATH, asset).await?;
        upserted
            .and_then(|a| a.id)
            .ok_or_else(|| ElionaError::MissingAssetId(asset.global_asset_identifier.clone()))
    }

    async fn upsert_data(&self, data: &Data) -> Result<()> {
        let _: Option<serde_json::Value> = self.put(DATA_PATH, data).await?;
        Ok(())
    }
}
