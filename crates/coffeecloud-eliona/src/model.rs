//! Eliona API payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Asset as accepted and returned by `PUT /assets`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub project_id: String,
    pub global_asset_identifier: String,
    #[serde(default)]
    pub name: Option<String>,
    pub asset_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_locational_asset_id: Option<i32>,
    #[serde(default)]
    pub device_ids: Vec<String>,
}

impl Asset {
    /// Build an asset whose global identifier doubles as its only device id
    pub fn new(
        project_id: &str,
        global_asset_identifier: &str,
        asset_type: &str,
        name: &str,
        parent_locational_asset_id: Option<i32>,
    ) -> Self {
        Self {
            id: None,
            project_id: project_id.to_string(),
            global_asset_identifier: global_asset_identifier.to_string(),
            name: Some(name.to_string()),
            asset_type: asset_type.to_string(),
            description: Some(format!("{} ({})", name, global_asset_identifier)),
            parent_locational_asset_id,
            device_ids: vec![global_asset_identifier.to_string()],
        }
    }
}

/// Attribute subtype of a data record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSubtype {
    Input,
    Status,
}

/// Attribute values of one asset and subtype for `PUT /data`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Data {
    pub asset_id: i32,
    pub subtype: DataSubtype,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_type_name: Option<String>,
}
