// ── Topology aggregate ──

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

use super::client::ClientDevice;
use super::hub::MeshHub;
use super::mac::MacAddress;

/// Schema version reported when the feed omits it.
pub const UNKNOWN_SCHEMA_VERSION: &str = "unknown";

/// How a parent was chosen for a daisy-chained slave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChainInference {
    /// The owner's interface label carried the uplink marker.
    UplinkMarker,
    /// No marker; the link owner was assumed to be upstream.
    Fallback,
}

/// Conditions the reconstruction tolerated but a consumer may want to surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologyWarning {
    /// More than one hub claims the master role. Order is unaffected;
    /// the first by name sorts first.
    MultipleMasters { uids: Vec<String> },
    /// A slave's parent was inferred from naming, not from roles.
    HeuristicParent {
        child_uid: String,
        parent_uid: String,
        inference: ChainInference,
    },
}

/// Root aggregate of one reconstruction pass.
///
/// Owns every hub and client it reports. `raw` keeps the untouched input
/// document for diagnostics and is not serialized.
#[derive(Debug, Clone, Serialize)]
pub struct Topology {
    pub schema_version: String,
    /// Master first, then the rest by name.
    pub hubs: Vec<MeshHub>,
    pub unassigned_clients: Vec<ClientDevice>,
    pub warnings: Vec<TopologyWarning>,
    #[serde(skip)]
    pub raw: Value,
}

impl Topology {
    pub fn master(&self) -> Option<&MeshHub> {
        self.hubs.iter().find(|h| h.is_master())
    }

    pub fn hub(&self, uid: &str) -> Option<&MeshHub> {
        self.hubs.iter().find(|h| h.uid == uid)
    }

    /// Hubs whose recorded parent is `uid`, in hub order.
    pub fn children_of<'a>(&'a self, uid: &'a str) -> impl Iterator<Item = &'a MeshHub> + 'a {
        self.hubs.iter().filter(move |h| h.parent_uid() == Some(uid))
    }

    /// Hubs that have no recorded parent, or whose parent is not a known hub.
    pub fn roots(&self) -> impl Iterator<Item = &MeshHub> {
        self.hubs
            .iter()
            .filter(|h| h.parent_uid().is_none_or(|p| self.hub(p).is_none()))
    }

    /// Every client, attached or not, paired with the hub that owns it.
    pub fn all_clients(&self) -> impl Iterator<Item = (&ClientDevice, Option<&MeshHub>)> {
        self.hubs
            .iter()
            .flat_map(|h| h.clients.iter().map(move |c| (c, Some(h))))
            .chain(self.unassigned_clients.iter().map(|c| (c, None)))
    }

    pub fn client_count(&self) -> usize {
        self.hubs.iter().map(|h| h.clients.len()).sum::<usize>() + self.unassigned_clients.len()
    }

    /// Find a client by hardware address.
    pub fn find_client(&self, mac: &MacAddress) -> Option<(&ClientDevice, Option<&MeshHub>)> {
        self.all_clients().find(|(c, _)| &c.mac == mac)
    }
}
