// ── Hub domain types ──

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use strum::{Display, EnumString};

use super::client::ClientDevice;
use super::link::{LinkMedium, LinkState, Throughput};
use super::mac::MacAddress;

/// Mesh role as reported by the feed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum HubRole {
    Master,
    Slave,
    #[default]
    Unknown,
}

impl HubRole {
    pub fn from_feed(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(r) if r.eq_ignore_ascii_case("master") => Self::Master,
            Some(r) if r.eq_ignore_ascii_case("slave") => Self::Slave,
            _ => Self::Unknown,
        }
    }

    /// Primary sort key: master first, everything else after.
    pub(crate) fn sort_rank(self) -> u8 {
        match self {
            Self::Master => 0,
            _ => 1,
        }
    }
}

/// The link from a hub to its upstream parent, recorded on the child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uplink {
    pub parent_uid: String,
    pub medium: LinkMedium,
    pub state: LinkState,
    pub interface_name: String,
    #[serde(flatten)]
    pub throughput: Throughput,
}

/// A topology-participating relay: the master router or a repeater.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshHub {
    pub uid: String,
    pub name: String,
    pub mac: MacAddress,
    pub role: HubRole,
    pub model: String,
    pub vendor: String,
    pub firmware: String,
    pub ip: Option<IpAddr>,
    /// Attached clients, in feed enumeration order.
    pub clients: Vec<ClientDevice>,
    pub uplink: Option<Uplink>,
}

impl MeshHub {
    pub fn is_master(&self) -> bool {
        self.role == HubRole::Master
    }

    pub fn parent_uid(&self) -> Option<&str> {
        self.uplink.as_ref().map(|u| u.parent_uid.as_str())
    }

    /// Number of clients with a live link to this hub.
    pub fn connected_clients(&self) -> usize {
        self.clients.iter().filter(|c| c.is_connected()).count()
    }
}
