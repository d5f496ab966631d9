//! Configuration document model.
//!
//! The same serde derives drive both representations: YAML through
//! `serde_yaml` and JSON through `serde_json`. Field names follow the
//! configuration format the web editor works with.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Root document exchanged between the YAML and JSON representations.
///
/// Top-level collections are tri-state: absent, present but empty, or
/// populated. Only [`normalize`](super::normalize) collapses the empty case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigurationDocument {
    /// Frontend listen address, passed through untouched.
    #[serde(
        rename = "listenAddressSingleHTTPFrontend",
        deserialize_with = "null_as_default"
    )]
    pub listen_address: String,

    /// Log level of the configured system, passed through untouched.
    #[serde(deserialize_with = "null_as_default")]
    pub log_level: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Action>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<Entity>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboards: Option<Vec<Dashboard>>,
}

/// A user-triggerable command descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Action {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub shell: String,

    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub icon: String,

    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub id: String,

    /// Execution timeout in seconds. Zero means "not set".
    #[serde(skip_serializing_if = "is_zero", deserialize_with = "null_as_default")]
    pub timeout: i64,

    /// Name of an [`Entity`]; never resolved here.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub entity: String,

    #[serde(skip_serializing_if = "is_false", deserialize_with = "null_as_default")]
    pub hidden: bool,

    /// Free-form argument descriptors. Their schema belongs to the
    /// configured system, so they are carried as ordered JSON maps.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub arguments: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entity {
    #[serde(deserialize_with = "null_as_default")]
    pub file: String,

    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dashboard {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,

    /// Heterogeneous dashboard entries, passed through unchanged.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub contents: Vec<Value>,
}

/// Treats an explicit `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}
