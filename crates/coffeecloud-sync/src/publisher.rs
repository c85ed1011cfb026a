//! Publishing of the root/group/machine hierarchy and machine data per project

use std::sync::Arc;

use chrono::Utc;
use coffeecloud_eliona::{Asset, AssetPlatform, Data, DataSubtype};
use coffeecloud_persistence::{AssetPersistence, Configuration};
use tracing::{error, info};

use crate::attribute::Attributed;
use crate::error::{Result, SyncError};
use crate::identity::AssetIdentityCache;
use crate::model::{
    GROUP_ASSET_TYPE, MACHINE_ASSET_TYPE, Machine, MachineGroup, ROOT_ASSET_NAME, ROOT_ASSET_TYPE,
    root_unique_identifier,
};

const PUBLISHED_SUBTYPES: [DataSubtype; 2] = [DataSubtype::Input, DataSubtype::Status];

/// Outcome of publishing one cycle
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub projects_published: usize,
    pub projects_failed: usize,
}

pub struct Publisher {
    identities: AssetIdentityCache,
    platform: Arc<dyn AssetPlatform>,
}

impl Publisher {
    pub fn new(store: Arc<dyn AssetPersistence>, platform: Arc<dyn AssetPlatform>) -> Self {
        Self {
            identities: AssetIdentityCache::new(store, platform.clone()),
            platform,
        }
    }

    /// Publish to every project; a failing project does not stop the others
    pub async fn publish(&self, configuration: &Configuration, groups: &[MachineGroup]) -> PublishReport {
        let mut report = PublishReport::default();

        for project_id in &configuration.project_ids {
            match self.publish_project(configuration.id, project_id, groups).await {
                Ok(machines) => {
                    report.projects_published += 1;
                    info!(
                        configuration_id = configuration.id,
                        project_id = %project_id,
                        "Published {} groups and {} machines",
                        groups.len(),
                        machines
                    );
                }
                Err(e) => {
                    report.projects_failed += 1;
                    error!(
                        configuration_id = configuration.id,
                        project_id = %project_id,
                        "Publishing aborted: {}",
                        e
                    );
                }
            }
        }

        report
    }

    async fn publish_project(
        &self,
        configuration_id: i64,
        project_id: &str,
        groups: &[MachineGroup],
    ) -> Result<usize> {
        let root = Asset::new(
            project_id,
            &root_unique_identifier(),
            ROOT_ASSET_TYPE,
            ROOT_ASSET_NAME,
            None,
        );
        let root_id = self.identities.create_asset_first_time(configuration_id, &root).await?;

        let mut machines = 0;
        for group in groups {
            let group_asset = Asset::new(
                project_id,
                &group.unique_identifier(),
                GROUP_ASSET_TYPE,
                &group.group_name,
                Some(root_id),
            );
            let group_id = self
                .identities
                .create_asset_first_time(configuration_id, &group_asset)
                .await?;

            for machine in &group.machines {
                let machine_asset = Asset::new(
                    project_id,
                    &machine.unique_identifier(),
                    MACHINE_ASSET_TYPE,
                    &machine.machine_name,
                    Some(group_id),
                );
                let machine_id = self
                    .identities
                    .create_asset_first_time(configuration_id, &machine_asset)
                    .await?;

                self.upsert_machine_data(machine_id, machine).await?;
                machines += 1;
            }
        }

        Ok(machines)
    }

    async fn upsert_machine_data(&self, asset_id: i32, machine: &Machine) -> Result<()> {
        let timestamp = Utc::now();

        for subtype in PUBLISHED_SUBTYPES {
            let payload = machine.data_payload(subtype);
            if payload.is_empty() {
                continue;
            }

            let data = Data {
                asset_id,
                subtype,
                timestamp: Some(timestamp),
                data: payload,
                asset_type_name: Some(MACHINE_ASSET_TYPE.to_string()),
            };
            self.platform
                .upsert_data(&data)
                .await
                .map_err(|source| SyncError::DataUpsert {
                    identifier: machine.unique_identifier(),
                    source,
                })?;
        }

        Ok(())
    }
}
