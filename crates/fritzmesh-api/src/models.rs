// Mesh feed wire types
//
// Models for the mesh-list JSON document and the flat host list. The feed's
// shape is not contractually stable across firmware versions, so every field
// is optional and deserializes leniently: a value of the wrong JSON type falls
// back to its default instead of failing the whole document.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, json_type_name};

// ── Lenient field helpers ────────────────────────────────────────────

/// Deserialize `T`, substituting `T::default()` when the value has the wrong type.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Deserialize a list, dropping entries that cannot be read as `T`.
///
/// A non-array value yields an empty list.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| T::deserialize(item).ok())
        .collect())
}

// ── Snapshot ─────────────────────────────────────────────────────────

/// Top-level mesh snapshot document.
///
/// ```json
/// { "schema_version": "5.2", "nodes": [ ... ] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSnapshot {
    #[serde(default, deserialize_with = "lenient")]
    pub schema_version: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub nodes: Vec<RawNode>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl RawSnapshot {
    /// Read a typed snapshot out of an already-parsed JSON document.
    ///
    /// Fails only if the top level is not an object; every other
    /// irregularity degrades to defaults.
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        if !value.is_object() {
            return Err(Error::Shape {
                expected: "object",
                found: json_type_name(value),
            });
        }
        Self::deserialize(value).map_err(|e| Error::deserialization(&e, &value.to_string()))
    }
}

/// Parse snapshot text into a JSON document, checking the top-level shape.
pub fn parse_snapshot(body: &str) -> Result<Value, Error> {
    let value: Value = serde_json::from_str(body).map_err(|e| Error::deserialization(&e, body))?;
    if !value.is_object() {
        return Err(Error::Shape {
            expected: "object",
            found: json_type_name(&value),
        });
    }
    Ok(value)
}

// ── Node ─────────────────────────────────────────────────────────────

/// One device in the mesh list: a hub (`is_meshed`) or an ordinary client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(default, deserialize_with = "lenient")]
    pub uid: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub device_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub device_mac_address: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub device_model: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub device_manufacturer: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub device_firmware_version: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_meshed: bool,
    /// "master", "slave", or "unknown"
    #[serde(default, deserialize_with = "lenient")]
    pub mesh_role: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub ip_addresses: Vec<RawIpAddress>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub node_interfaces: Vec<RawInterface>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Address entry on a node, e.g. `{ "version": "IPv4", "value": "192.168.178.20/24" }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawIpAddress {
    #[serde(default, deserialize_with = "lenient")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<String>,
}

// ── Interface & link ─────────────────────────────────────────────────

/// Network interface on a node. `name` encodes band or port (`"AP:5G:0"`, `"LAN:1"`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawInterface {
    #[serde(default, deserialize_with = "lenient")]
    pub uid: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    /// "WLAN", "LAN", or something else
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub interface_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub mac_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub node_links: Vec<RawLink>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Point-to-point link between two node interfaces. Rates are kbit/s.
///
/// Both endpoints usually carry a copy of the same link record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLink {
    #[serde(default, deserialize_with = "lenient")]
    pub uid: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub link_type: Option<String>,
    /// "CONNECTED" or "DISCONNECTED"
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub node_1_uid: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub node_2_uid: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub node_interface_1_uid: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub node_interface_2_uid: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub cur_data_rate_rx: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub cur_data_rate_tx: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub max_data_rate_rx: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub max_data_rate_tx: u64,
}

// ── Host list ────────────────────────────────────────────────────────

/// Entry from the router's flat host inventory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub mac: String,
    #[serde(default, deserialize_with = "lenient")]
    pub ip: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    /// Whether the host is currently active.
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub interface_type: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Parse host-list text. The top level must be an array; unreadable
/// entries are dropped.
pub fn parse_host_list(body: &str) -> Result<Vec<HostEntry>, Error> {
    let value: Value = serde_json::from_str(body).map_err(|e| Error::deserialization(&e, body))?;
    let Value::Array(items) = value else {
        return Err(Error::Shape {
            expected: "array",
            found: json_type_name(&value),
        });
    };
    Ok(items
        .into_iter()
        .filter_map(|item| HostEntry::deserialize(item).ok())
        .collect())
}
