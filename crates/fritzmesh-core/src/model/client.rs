// ── Client domain types ──

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use super::link::{LinkMedium, LinkState, Throughput};
use super::mac::MacAddress;

/// A leaf network participant: phone, laptop, IoT device.
///
/// Built fresh on every reconstruction pass. Only enrichment mutates it
/// afterwards (`ip`, `name`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDevice {
    pub uid: String,
    pub name: String,
    pub mac: MacAddress,
    pub medium: LinkMedium,
    pub state: LinkState,
    pub ip: Option<IpAddr>,
    #[serde(flatten)]
    pub throughput: Throughput,
    /// Raw label of the hub interface it hangs off, e.g. `"AP:5G:0"` or `"LAN:1"`.
    pub interface_name: String,
}

impl ClientDevice {
    /// Whether the hub currently reports a live link to this client.
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Band or port encoded in the interface label (`"AP:5G:0"` → `"5G"`).
    pub fn band(&self) -> Option<&str> {
        let mut parts = self.interface_name.split(':');
        match (parts.next(), parts.next()) {
            (Some("AP"), Some(band)) if !band.is_empty() => Some(band),
            _ => None,
        }
    }
}
