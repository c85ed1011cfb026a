//! Statically declared attribute registries
//!
//! Each entity type lists its attributes once: the name used by filter rules and
//! data payloads, whether filter rules may reference it, the data subtype it is
//! published under, and an accessor.

use std::sync::LazyLock;

use coffeecloud_eliona::DataSubtype;
use serde_json::Value;

use crate::model::{Machine, MachineGroup};

/// Current value of one attribute
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Number(i64),
    Unset,
}

impl AttributeValue {
    fn text(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }

    fn optional_text(value: &Option<String>) -> Self {
        value.as_deref().map_or(AttributeValue::Unset, Self::text)
    }

    fn optional_number(value: Option<i64>) -> Self {
        value.map_or(AttributeValue::Unset, AttributeValue::Number)
    }

    /// String form matched by filter rules; unset values flatten to ""
    pub fn flatten(&self) -> String {
        match self {
            AttributeValue::Text(text) => text.clone(),
            AttributeValue::Number(number) => number.to_string(),
            AttributeValue::Unset => String::new(),
        }
    }

    /// JSON form for data payloads; unset values are omitted
    pub fn to_json(&self) -> Option<Value> {
        match self {
            AttributeValue::Text(text) => Some(Value::from(text.as_str())),
            AttributeValue::Number(number) => Some(Value::from(*number)),
            AttributeValue::Unset => None,
        }
    }
}

/// Declaration of one attribute of `T`
pub struct AttributeDef<T> {
    pub name: &'static str,
    pub filterable: bool,
    pub subtype: Option<DataSubtype>,
    accessor: fn(&T) -> AttributeValue,
}

impl<T> AttributeDef<T> {
    fn new(name: &'static str, accessor: fn(&T) -> AttributeValue) -> Self {
        Self {
            name,
            filterable: false,
            subtype: None,
            accessor,
        }
    }

    fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    fn subtype(mut self, subtype: DataSubtype) -> Self {
        self.subtype = Some(subtype);
        self
    }

    pub fn value(&self, entity: &T) -> AttributeValue {
        (self.accessor)(entity)
    }
}

/// Entity with a declared attribute registry
pub trait Attributed: Sized + 'static {
    fn attributes() -> &'static [AttributeDef<Self>];

    /// Flattened value of a filterable attribute; `None` for unknown names
    fn filter_attribute(&self, name: &str) -> Option<String> {
        Self::attributes()
            .iter()
            .find(|def| def.filterable && def.name == name)
            .map(|def| def.value(self).flatten())
    }

    /// Set attributes published under `subtype`
    fn data_payload(&self, subtype: DataSubtype) -> serde_json::Map<String, Value> {
        Self::attributes()
            .iter()
            .filter(|def| def.subtype == Some(subtype))
            .filter_map(|def| def.value(self).to_json().map(|v| (def.name.to_string(), v)))
            .collect()
    }
}

type GroupAttribute = AttributeDef<MachineGroup>;
type MachineAttribute = AttributeDef<Machine>;

static GROUP_ATTRIBUTES: LazyLock<Vec<AttributeDef<MachineGroup>>> = LazyLock::new(|| {
    vec![
        GroupAttribute::new("group_id", |g| AttributeValue::Text(g.group_id.to_string()))
            .filterable(),
        GroupAttribute::new("group_name", |g| AttributeValue::text(&g.group_name)).filterable(),
    ]
});

static MACHINE_ATTRIBUTES: LazyLock<Vec<AttributeDef<Machine>>> = LazyLock::new(|| {
    vec![
        MachineAttribute::new("machine_id", |m| AttributeValue::text(&m.machine_id)).filterable(),
        MachineAttribute::new("machine_name", |m| AttributeValue::text(&m.machine_name)).filterable(),
        MachineAttribute::new("serial_number", |m| AttributeValue::text(&m.serial_number))
            .filterable(),
        MachineAttribute::new("firmware", |m| AttributeValue::optional_number(m.firmware))
            .filterable(),
        MachineAttribute::new("cub_count", |m| AttributeValue::optional_number(m.cup_count))
            .subtype(DataSubtype::Input),
        MachineAttribute::new("engine_status", |m| {
            AttributeValue::optional_text(&m.engine_status)
        })
        .filterable()
        .subtype(DataSubtype::Status),
        MachineAttribute::new("hours_since_cleaned", |m| {
            AttributeValue::optional_number(m.hours_since_cleaned)
        })
        .subtype(DataSubtype::Status),
        MachineAttribute::new("error_code", |m| AttributeValue::optional_number(m.error_code))
            .filterable()
            .subtype(DataSubtype::Status),
        MachineAttribute::new("error", |m| AttributeValue::optional_text(&m.error))
            .filterable()
            .subtype(DataSubtype::Status),
        MachineAttribute::new("error_description", |m| {
            AttributeValue::optional_text(&m.error_description)
        })
        .subtype(DataSubtype::Status),
    ]
});

impl Attributed for MachineGroup {
    fn attributes() -> &'static [AttributeDef<Self>] {
        &GROUP_ATTRIBUTES
    }
}

impl Attributed for Machine {
    fn attributes() -> &'static [AttributeDef<Self>] {
        &MACHINE_ATTRIBUTES
    }
}
