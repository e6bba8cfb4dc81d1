// ── Link classifier ──
//
// Single pass over the deduplicated link graph. Hub-to-client links become
// pending attachments; hub-to-hub links are handed to the parent resolver.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::model::{ClientDevice, LinkMedium, LinkState, Throughput, TopologyWarning, Uplink};

use super::graph::{LinkGraph, MeshLink};
use super::index::{IndexedNode, NodeIndex};
use super::parent::{self, Endpoint};

/// Everything classification learned, ready for assembly.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    /// Client uid → (owning hub uid, client). Re-attaching a client moves it
    /// to the last hub that claimed it.
    pub attachments: IndexMap<String, (String, ClientDevice)>,
    /// Child hub uid → uplink towards its parent. First claim wins.
    pub parents: HashMap<String, Uplink>,
    pub warnings: Vec<TopologyWarning>,
}

impl Accumulator {
    fn attach(&mut self, hub: &IndexedNode<'_>, client: &IndexedNode<'_>, link: &MeshLink<'_>) {
        let device = ClientDevice {
            uid: client.uid.to_owned(),
            name: client.name.clone(),
            mac: client.mac.clone(),
            medium: LinkMedium::from_feed(link.interface.interface_type.as_deref()),
            state: LinkState::from_feed(link.link.state.as_deref()),
            ip: client.ip,
            throughput: Throughput::from(link.link),
            interface_name: link.interface.name.clone().unwrap_or_default(),
        };
        if let Some((previous, _)) = self
            .attachments
            .insert(client.uid.to_owned(), (hub.uid.to_owned(), device))
        {
            trace!(client = client.uid, previous = %previous, hub = hub.uid, "client re-attached");
        }
    }

    fn link_hubs(&mut self, owner: &IndexedNode<'_>, peer: &IndexedNode<'_>, link: &MeshLink<'_>) {
        let state = LinkState::from_feed(link.link.state.as_deref());
        if !state.is_connected() {
            trace!(owner = owner.uid, peer = peer.uid, %state, "backbone link not connected, skipping");
            return;
        }

        let interface_name = link.interface.name.as_deref().unwrap_or_default();
        let Some(claim) = parent::resolve(
            Endpoint { uid: owner.uid, role: owner.role },
            Endpoint { uid: peer.uid, role: peer.role },
            interface_name,
        ) else {
            trace!(
                owner = owner.uid,
                owner_role = %owner.role,
                peer = peer.uid,
                peer_role = %peer.role,
                "no parent relationship for role pair"
            );
            return;
        };

        match self.parents.entry(claim.child.to_owned()) {
            Entry::Occupied(existing) => {
                trace!(
                    child = claim.child,
                    kept = %existing.get().parent_uid,
                    ignored = claim.parent,
                    "parent already recorded"
                );
            }
            Entry::Vacant(slot) => {
                if let Some(inference) = claim.inference {
                    debug!(
                        child = claim.child,
                        parent = claim.parent,
                        %inference,
                        "chained repeater parent inferred from interface naming"
                    );
                    self.warnings.push(TopologyWarning::HeuristicParent {
                        child_uid: claim.child.to_owned(),
                        parent_uid: claim.parent.to_owned(),
                        inference,
                    });
                }
                slot.insert(Uplink {
                    parent_uid: claim.parent.to_owned(),
                    medium: LinkMedium::from_feed(link.interface.interface_type.as_deref()),
                    state,
                    interface_name: interface_name.to_owned(),
                    throughput: Throughput::from(link.link),
                });
            }
        }
    }
}

/// Classify every link in `graph` against the node table.
pub(crate) fn classify(index: &NodeIndex<'_>, graph: &LinkGraph<'_>) -> Accumulator {
    let mut acc = Accumulator::default();

    for link in graph.iter() {
        if link.owner == link.peer {
            trace!(node = link.owner, "self-link, skipping");
            continue;
        }
        let (Some(owner), Some(peer)) = (index.get(link.owner), index.get(link.peer)) else {
            trace!(owner = link.owner, peer = link.peer, "link endpoint not indexed, skipping");
            continue;
        };

        match (owner.is_hub, peer.is_hub) {
            (true, false) => acc.attach(owner, peer, link),
            (true, true) => acc.link_hubs(owner, peer, link),
            // Client-owned records are not authoritative for attachment.
            (false, _) => {}
        }
    }

    acc
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::ChainInference;
    use fritzmesh_api::RawNode;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn run(doc: Value) -> Accumulator {
        let raw: Vec<RawNode> = serde_json::from_value(doc).unwrap();
        let index = NodeIndex::build(&raw);
        let graph = LinkGraph::build(&index);
        classify(&index, &graph)
    }

    fn link(n1: &str, n2: &str, state: &str) -> Value {
        json!({
            "state": state,
            "node_1_uid": n1,
            "node_interface_1_uid": format!("{n1}-if"),
            "node_2_uid": n2,
            "node_interface_2_uid": format!("{n2}-if"),
            "cur_data_rate_rx": 100,
            "cur_data_rate_tx": 200,
            "max_data_rate_rx": 300,
            "max_data_rate_tx": 400
        })
    }

    fn hub(uid: &str, role: &str, iface: &str, kind: &str, links: Vec<Value>) -> Value {
        json!({
            "uid": uid,
            "device_name": uid,
            "is_meshed": true,
            "mesh_role": role,
            "node_interfaces": [{ "uid": format!("{uid}-if"), "name": iface, "type": kind, "node_links": links }]
        })
    }

    fn client(uid: &str, mac: &str) -> Value {
        json!({ "uid": uid, "device_name": uid, "device_mac_address": mac })
    }

    #[test]
    fn hub_to_client_link_attaches_with_link_details() {
        let acc = run(json!([
            hub("m", "master", "AP:5G:0", "WLAN", vec![link("m", "phone", "CONNECTED")]),
            client("phone", "AA:BB:CC:00:00:01")
        ]));

        let (hub_uid, device) = acc.attachments.get("phone").unwrap();
        assert_eq!(hub_uid, "m");
        assert_eq!(device.medium, LinkMedium::Wireless);
        assert_eq!(device.state, LinkState::Connected);
        assert_eq!(device.interface_name, "AP:5G:0");
        assert_eq!(device.mac.as_str(), "aa:bb:cc:00:00:01");
        assert_eq!(
            device.throughput,
            Throughput { cur_rx_kbps: 100, cur_tx_kbps: 200, max_rx_kbps: 300, max_tx_kbps: 400 }
        );
    }

    #[test]
    fn disconnected_clients_are_still_attached() {
        let acc = run(json!([
            hub("m", "master", "LAN:1", "LAN", vec![link("m", "pc", "DISCONNECTED")]),
            client("pc", "aa:bb:cc:00:00:02")
        ]));
        let (_, device) = acc.attachments.get("pc").unwrap();
        assert_eq!(device.state, LinkState::Disconnected);
        assert_eq!(device.medium, LinkMedium::Wired);
    }

    #[test]
    fn orphaned_peer_is_skipped() {
        let acc = run(json!([hub("m", "master", "LAN:1", "LAN", vec![link("m", "ghost", "CONNECTED")])]));
        assert!(acc.attachments.is_empty());
        assert!(acc.parents.is_empty());
    }

    #[test]
    fn client_owned_link_attaches_nothing() {
        let acc = run(json!([
            { "uid": "phone", "node_interfaces": [{ "uid": "phone-if", "node_links": [link("phone", "tv", "CONNECTED")] }] },
            client("tv", "aa:bb:cc:00:00:03")
        ]));
        assert!(acc.attachments.is_empty());
    }

    #[test]
    fn last_hub_claiming_a_client_wins() {
        let acc = run(json!([
            hub("m", "master", "AP:2G:0", "WLAN", vec![link("m", "phone", "DISCONNECTED")]),
            hub("s", "slave", "AP:5G:0", "WLAN", vec![link("s", "phone", "CONNECTED")]),
            client("phone", "aa:bb:cc:00:00:04")
        ]));
        assert_eq!(acc.attachments.len(), 1);
        let (hub_uid, device) = acc.attachments.get("phone").unwrap();
        assert_eq!(hub_uid, "s");
        assert_eq!(device.state, LinkState::Connected);
    }

    #[test]
    fn master_slave_backbone_records_uplink_on_child() {
        let acc = run(json!([
            hub("m", "master", "LAN:2", "LAN", vec![link("m", "s", "CONNECTED")]),
            hub("s", "slave", "LAN:1", "LAN", vec![link("m", "s", "CONNECTED")])
        ]));
        let uplink = acc.parents.get("s").unwrap();
        assert_eq!(uplink.parent_uid, "m");
        assert_eq!(uplink.medium, LinkMedium::Wired);
        assert_eq!(uplink.interface_name, "LAN:2");
        assert!(!acc.parents.contains_key("m"));
        assert!(acc.warnings.is_empty());
    }

    #[test]
    fn disconnected_backbone_is_ignored() {
        let acc = run(json!([
            hub("m", "master", "LAN:2", "LAN", vec![link("m", "s", "DISCONNECTED")]),
            hub("s", "slave", "LAN:1", "LAN", vec![])
        ]));
        assert!(acc.parents.is_empty());
    }

    #[test]
    fn first_parent_claim_wins() {
        let acc = run(json!([
            hub("m", "master", "AP:5G:0", "WLAN", vec![link("m", "s", "CONNECTED")]),
            hub("x", "master", "AP:5G:0", "WLAN", vec![link("x", "s", "CONNECTED")]),
            hub("s", "slave", "WLAN", "WLAN", vec![])
        ]));
        assert_eq!(acc.parents.get("s").unwrap().parent_uid, "m");
    }

    #[test]
    fn chained_slaves_record_heuristic_warning() {
        let acc = run(json!([
            hub("leaf", "slave", "Uplink:5G", "WLAN", vec![link("leaf", "mid", "CONNECTED")]),
            hub("mid", "slave", "AP:5G:0", "WLAN", vec![])
        ]));
        assert_eq!(acc.parents.get("leaf").unwrap().parent_uid, "mid");
        assert_eq!(
            acc.warnings,
            vec![TopologyWarning::HeuristicParent {
                child_uid: "leaf".into(),
                parent_uid: "mid".into(),
                inference: ChainInference::UplinkMarker,
            }]
        );
    }
}
