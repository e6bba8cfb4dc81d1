// ── MAC-keyed lookup index ──
//
// Consumers correlate hubs and clients across refreshes by hardware address.
// The index is rebuilt from scratch on every refresh and never mutated.

use indexmap::IndexMap;

use crate::model::{ClientDevice, MacAddress, MeshHub, Topology};

/// A client together with the uid of the hub it is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedClient {
    pub client: ClientDevice,
    /// `None` for unassigned clients.
    pub hub_uid: Option<String>,
}

/// Hubs and clients keyed by normalized MAC, in topology order.
///
/// Entries without a hardware address are not indexed. If a MAC repeats,
/// the later entry replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct MeshIndex {
    hubs_by_mac: IndexMap<MacAddress, MeshHub>,
    clients_by_mac: IndexMap<MacAddress, IndexedClient>,
}

impl MeshIndex {
    pub fn from_topology(topology: &Topology) -> Self {
        let hubs_by_mac = topology
            .hubs
            .iter()
            .filter(|h| !h.mac.is_empty())
            .map(|h| (h.mac.clone(), h.clone()))
            .collect();

        let clients_by_mac = topology
            .all_clients()
            .filter(|(c, _)| !c.mac.is_empty())
            .map(|(c, hub)| {
                (
                    c.mac.clone(),
                    IndexedClient {
                        client: c.clone(),
                        hub_uid: hub.map(|h| h.uid.clone()),
                    },
                )
            })
            .collect();

        Self {
            hubs_by_mac,
            clients_by_mac,
        }
    }

    pub fn hub(&self, mac: &MacAddress) -> Option<&MeshHub> {
        self.hubs_by_mac.get(mac)
    }

    pub fn client(&self, mac: &MacAddress) -> Option<&IndexedClient> {
        self.clients_by_mac.get(mac)
    }

    pub fn hubs(&self) -> impl Iterator<Item = &MeshHub> {
        self.hubs_by_mac.values()
    }

    pub fn clients(&self) -> impl Iterator<Item = &IndexedClient> {
        self.clients_by_mac.values()
    }

    pub fn hub_count(&self) -> usize {
        self.hubs_by_mac.len()
    }

    pub fn client_count(&self) -> usize {
        self.clients_by_mac.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::reconstruct::reconstruct;
    use serde_json::json;

    fn topology() -> Topology {
        reconstruct(json!({
            "nodes": [
                {
                    "uid": "m", "device_name": "Box", "is_meshed": true, "mesh_role": "master",
                    "device_mac_address": "3C:A6:2F:00:00:01",
                    "node_interfaces": [{ "uid": "m-if", "name": "AP:5G:0", "type": "WLAN", "node_links": [{
                        "state": "CONNECTED",
                        "node_1_uid": "m", "node_interface_1_uid": "m-if",
                        "node_2_uid": "phone", "node_interface_2_uid": "p-if"
                    }] }]
                },
                { "uid": "phone", "device_name": "Phone", "device_mac_address": "AA:BB:CC:00:00:01" },
                { "uid": "tv", "device_name": "TV", "device_mac_address": "aa-bb-cc-00-00-02" },
                { "uid": "nomac", "device_name": "Mystery" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn indexes_hubs_and_clients_by_normalized_mac() {
        let index = MeshIndex::from_topology(&topology());

        assert_eq!(index.hub_count(), 1);
        assert_eq!(index.hub(&"3c:a6:2f:00:00:01".parse().unwrap()).unwrap().uid, "m");

        let phone = index.client(&MacAddress::new("AA:BB:CC:00:00:01")).unwrap();
        assert_eq!(phone.hub_uid.as_deref(), Some("m"));

        let tv = index.client(&MacAddress::new("aa:bb:cc:00:00:02")).unwrap();
        assert_eq!(tv.hub_uid, None);
    }

    #[test]
    fn clients_without_mac_are_skipped() {
        let index = MeshIndex::from_topology(&topology());
        assert_eq!(index.client_count(), 2);
        assert!(index.clients().all(|c| c.client.uid != "nomac"));
    }
}
