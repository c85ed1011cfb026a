//! Record types returned by the CoffeeCloud API
//!
//! Fields the service does not rely on are optional so partially populated
//! records still decode.

use serde::{Deserialize, Serialize};

use crate::paging::NaturalKey;

/// Machine group as returned by `GET /rest/groups`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub serial_numbers: Vec<String>,
}

/// Device origin; `sn` is the serial number joining the listings
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    #[serde(default)]
    pub sn: String,
    #[serde(default)]
    pub fw: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Relay {
    #[serde(default)]
    pub location: Vec<f64>,
}

/// Machine overview record from `POST /rest/overview/data`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineRecord {
    pub id: String,
    #[serde(default)]
    pub machine_name: String,
    #[serde(default)]
    pub origin: Origin,
    #[serde(default)]
    pub number_of_cups: Option<i64>,
    #[serde(default)]
    pub relay: Option<Relay>,
    #[serde(default)]
    pub hours_since_clean: Option<i64>,
}

/// Latest error of a machine from `POST /rest/dashboard/error/search`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineErrorRecord {
    #[serde(default)]
    pub origin: Origin,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_short: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Health KPI of a machine from `POST /rest/dashboard/healthkpi`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    #[serde(default)]
    pub origin: Origin,
    #[serde(default)]
    pub health_status: Option<String>,
}

impl NaturalKey for Group {
    fn natural_key(&self) -> String {
        self.id.to_string()
    }
}

impl NaturalKey for MachineRecord {
    fn natural_key(&self) -> String {
        self.origin.sn.clone()
    }
}

impl NaturalKey for MachineErrorRecord {
    fn natural_key(&self) -> String {
        self.origin.sn.clone()
    }
}

impl NaturalKey for HealthRecord {
    fn natural_key(&self) -> String {
        self.origin.sn.clone()
    }
}
