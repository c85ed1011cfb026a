//! Merged entities published to the target platform

use serde::{Deserialize, Serialize};

pub const ROOT_ASSET_TYPE: &str = "coffeecloud_root";
pub const GROUP_ASSET_TYPE: &str = "coffeecloud_group";
pub const MACHINE_ASSET_TYPE: &str = "coffeecloud_machine";

pub const ROOT_SOURCE_ID: &str = "coffeecloud_root";
pub const ROOT_ASSET_NAME: &str = "Coffeecloud Root";

/// Cross-system stable key of an asset: `{assetType}_{sourceId}`
pub fn unique_identifier(asset_type: &str, source_id: &str) -> String {
    format!("{}_{}", asset_type, source_id)
}

pub fn root_unique_identifier() -> String {
    unique_identifier(ROOT_ASSET_TYPE, ROOT_SOURCE_ID)
}

/// Machine record after merging the machine, error and health listings
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub machine_id: String,
    pub machine_name: String,
    /// Join key across the source listings
    pub serial_number: String,
    pub firmware: Option<i64>,
    pub cup_count: Option<i64>,
    pub hours_since_cleaned: Option<i64>,
    pub engine_status: Option<String>,
    pub error_code: Option<i64>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl Machine {
    pub fn unique_identifier(&self) -> String {
        unique_identifier(MACHINE_ASSET_TYPE, &self.machine_id)
    }
}

/// Group retained by the filter, with its retained machines
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineGroup {
    pub group_id: u64,
    pub group_name: String,
    pub machines: Vec<Machine>,
}

impl MachineGroup {
    pub fn new(group_id: u64, group_name: &str) -> Self {
        Self {
            group_id,
            group_name: group_name.to_string(),
            machines: Vec::new(),
        }
    }

    pub fn unique_identifier(&self) -> String {
        unique_identifier(GROUP_ASSET_TYPE, &self.group_id.to_string())
    }
}
