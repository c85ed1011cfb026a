//! One synchronization cycle for one configuration

use std::sync::Arc;

use async_trait::async_trait;
use coffeecloud_client::{HttpClientConfig, SourceConnector};
use coffeecloud_eliona::AssetPlatform;
use coffeecloud_persistence::{AssetPersistence, Configuration};
use tracing::info;

use crate::collector::collect_machine_groups;
use crate::error::{Result, SyncError};
use crate::filter::CompiledFilter;
use crate::publisher::{PublishReport, Publisher};

/// Summary of a finished cycle
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub groups: usize,
    pub machines: usize,
    pub publish: PublishReport,
}

/// Runs cycles on behalf of the scheduler
#[async_trait]
pub trait CycleRunner: Send + Sync {
    async fn run_cycle(&self, configuration: &Configuration) -> Result<CycleReport>;
}

pub struct SyncEngine {
    connector: Arc<dyn SourceConnector>,
    publisher: Publisher,
}

impl SyncEngine {
    pub fn new(
        connector: Arc<dyn SourceConnector>,
        platform: Arc<dyn AssetPlatform>,
        assets: Arc<dyn AssetPersistence>,
    ) -> Self {
        Self {
            connector,
            publisher: Publisher::new(assets, platform),
        }
    }
}

/// Source transport settings of a configuration
pub fn source_config(configuration: &Configuration) -> HttpClientConfig {
    HttpClientConfig::new(&configuration.url)
        .with_auth(&configuration.username, &configuration.password)
        .with_api_key(&configuration.api_key)
        .with_timeout(configuration.request_timeout())
}

#[async_trait]
impl CycleRunner for SyncEngine {
    async fn run_cycle(&self, configuration: &Configuration) -> Result<CycleReport> {
        let filter = CompiledFilter::compile(&configuration.asset_filter);

        let session = self
            .connector
            .open(&source_config(configuration))
            .await
            .map_err(SyncError::Auth)?;

        let groups = collect_machine_groups(session.as_ref(), &filter, configuration.id).await?;
        let mut report = CycleReport {
            groups: groups.len(),
            machines: groups.iter().map(|g| g.machines.len()).sum(),
            publish: PublishReport::default(),
        };

        if configuration.project_ids.is_empty() {
            info!(
                configuration_id = configuration.id,
                "No project id defined, nothing is sent to Eliona"
            );
            return Ok(report);
        }

        report.publish = self.publisher.publish(configuration, &groups).await;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffeecloud_persistence::ConfigurationDraft;

    #[test]
    fn test_source_config_carries_credentials_and_timeout() {
        let configuration = ConfigurationDraft {
            url: Some("https://cloud.example.com".to_string()),
            username: Some("barista".to_string()),
            password: Some("crema".to_string()),
            api_key: Some("key".to_string()),
            request_timeout: Some(15),
            ..Default::default()
        }
        .validate(1)
        .unwrap();

        let config = source_config(&configuration);
        assert_eq!(config.base_url, "https://cloud.example.com");
        assert_eq!(config.username, "barista");
        assert_eq!(config.password, "crema");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.timeout_ms, 15_000);
    }
}
