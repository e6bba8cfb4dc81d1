// ── Topology reconstruction ──
//
// Pure transform from one raw mesh snapshot to one rooted hierarchy:
//
//   raw → NodeIndex → LinkGraph → classify (+ parent resolver)
//       → assemble (hubs) + collect (unassigned) → Topology
//
// No I/O, no shared state. Safe to call concurrently on independent inputs.

mod assemble;
mod classify;
mod graph;
mod index;
mod parent;
mod unassigned;

use serde_json::Value;
use tracing::debug;

use fritzmesh_api::RawSnapshot;

use crate::error::CoreError;
use crate::model::{Topology, UNKNOWN_SCHEMA_VERSION};

pub use parent::UPLINK_MARKER;

/// Rebuild the mesh hierarchy from a raw snapshot document.
///
/// Field-level irregularities degrade to defaults and orphaned link
/// endpoints are skipped. Only a document whose top level is not a JSON
/// object is rejected.
pub fn reconstruct(raw: Value) -> Result<Topology, CoreError> {
    let snapshot = RawSnapshot::from_value(&raw)?;

    let index = index::NodeIndex::build(&snapshot.nodes);
    let graph = graph::LinkGraph::build(&index);
    let mut acc = classify::classify(&index, &graph);
    let unassigned_clients = unassigned::collect(&index, &acc);
    let hubs = assemble::assemble(&index, &mut acc);

    debug!(
        nodes = index.len(),
        links = graph.len(),
        hubs = hubs.len(),
        attached = acc.attachments.len(),
        unassigned = unassigned_clients.len(),
        warnings = acc.warnings.len(),
        "mesh topology reconstructed"
    );

    let schema_version = snapshot
        .schema_version
        .clone()
        .unwrap_or_else(|| UNKNOWN_SCHEMA_VERSION.to_owned());
    let warnings = acc.warnings;

    Ok(Topology {
        schema_version,
        hubs,
        unassigned_clients,
        warnings,
        raw,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{ChainInference, HubRole, LinkMedium, LinkState, TopologyWarning};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Master M with wireless client C1, slave S wired to M, S with wireless
    /// client C2. Every link is listed by both endpoints, as the feed does.
    fn two_hub_mesh() -> Value {
        let m_c1 = json!({
            "uid": "l-1", "type": "WLAN", "state": "CONNECTED",
            "node_1_uid": "m", "node_interface_1_uid": "m-ap5",
            "node_2_uid": "c1", "node_interface_2_uid": "c1-wlan",
            "cur_data_rate_rx": 866_000, "cur_data_rate_tx": 780_000,
            "max_data_rate_rx": 1_200_000, "max_data_rate_tx": 1_200_000
        });
        let m_s = json!({
            "uid": "l-2", "type": "LAN", "state": "CONNECTED",
            "node_1_uid": "m", "node_interface_1_uid": "m-lan2",
            "node_2_uid": "s", "node_interface_2_uid": "s-lan1",
            "cur_data_rate_rx": 1_000_000, "cur_data_rate_tx": 1_000_000
        });
        let s_c2 = json!({
            "uid": "l-3", "type": "WLAN", "state": "CONNECTED",
            "node_1_uid": "s", "node_interface_1_uid": "s-ap2",
            "node_2_uid": "c2", "node_interface_2_uid": "c2-wlan"
        });

        json!({
            "schema_version": "5.3.1",
            "nodes": [
                {
                    "uid": "s", "device_name": "FRITZ!Repeater 3000", "is_meshed": true, "mesh_role": "slave",
                    "device_mac_address": "3C:A6:2F:00:00:02",
                    "node_interfaces": [
                        { "uid": "s-lan1", "name": "LAN:1", "type": "LAN", "node_links": [m_s] },
                        { "uid": "s-ap2", "name": "AP:2G:0", "type": "WLAN", "node_links": [s_c2] }
                    ]
                },
                {
                    "uid": "m", "device_name": "FRITZ!Box 7590", "is_meshed": true, "mesh_role": "master",
                    "device_mac_address": "3C:A6:2F:00:00:01",
                    "ip_addresses": [{ "version": "IPv4", "value": "192.168.178.1/24" }],
                    "node_interfaces": [
                        { "uid": "m-ap5", "name": "AP:5G:0", "type": "WLAN", "node_links": [m_c1] },
                        { "uid": "m-lan2", "name": "LAN:2", "type": "LAN", "node_links": [m_s] }
                    ]
                },
                {
                    "uid": "c1", "device_name": "Pixel 8", "device_mac_address": "AA:BB:CC:00:00:01",
                    "node_interfaces": [{ "uid": "c1-wlan", "name": "WLAN", "type": "WLAN", "node_links": [m_c1] }]
                },
                {
                    "uid": "c2", "device_name": "MacBook", "device_mac_address": "AA:BB:CC:00:00:02",
                    "node_interfaces": [{ "uid": "c2-wlan", "name": "WLAN", "type": "WLAN", "node_links": [s_c2] }]
                }
            ]
        })
    }

    #[test]
    fn master_and_wired_slave_with_one_client_each() {
        let topology = reconstruct(two_hub_mesh()).unwrap();

        assert_eq!(topology.schema_version, "5.3.1");
        let uids: Vec<&str> = topology.hubs.iter().map(|h| h.uid.as_str()).collect();
        assert_eq!(uids, ["m", "s"]);

        let m = &topology.hubs[0];
        assert_eq!(m.role, HubRole::Master);
        assert_eq!(m.ip.unwrap().to_string(), "192.168.178.1");
        assert!(m.uplink.is_none());
        let c1: Vec<&str> = m.clients.iter().map(|c| c.uid.as_str()).collect();
        assert_eq!(c1, ["c1"]);
        assert_eq!(m.clients[0].medium, LinkMedium::Wireless);
        assert_eq!(m.clients[0].state, LinkState::Connected);
        assert_eq!(m.clients[0].throughput.cur_rx_kbps, 866_000);

        let s = &topology.hubs[1];
        let c2: Vec<&str> = s.clients.iter().map(|c| c.uid.as_str()).collect();
        assert_eq!(c2, ["c2"]);
        let uplink = s.uplink.as_ref().unwrap();
        assert_eq!(uplink.parent_uid, "m");
        assert_eq!(uplink.medium, LinkMedium::Wired);
        assert_eq!(uplink.interface_name, "LAN:2");
        assert_eq!(uplink.throughput.cur_tx_kbps, 1_000_000);

        assert!(topology.unassigned_clients.is_empty());
        assert!(topology.warnings.is_empty());
        assert_eq!(topology.client_count(), 2);
    }

    #[test]
    fn lone_non_hub_node_is_unassigned() {
        let topology = reconstruct(json!({
            "schema_version": "5.3.1",
            "nodes": [
                { "uid": "m", "device_name": "Box", "is_meshed": true, "mesh_role": "master" },
                { "uid": "tv", "device_name": "TV", "device_mac_address": "aa:bb:cc:00:00:09" }
            ]
        }))
        .unwrap();

        assert_eq!(topology.unassigned_clients.len(), 1);
        let tv = &topology.unassigned_clients[0];
        assert_eq!(tv.uid, "tv");
        assert_eq!(tv.state, LinkState::Unknown);
        assert_eq!(tv.medium, LinkMedium::Unknown);
    }

    #[test]
    fn every_client_appears_exactly_once() {
        let topology = reconstruct(two_hub_mesh()).unwrap();
        let mut macs: Vec<String> = topology
            .all_clients()
            .map(|(c, _)| c.mac.to_string())
            .collect();
        let total = macs.len();
        macs.sort();
        macs.dedup();
        assert_eq!(macs.len(), total);
        assert_eq!(total, 2);
    }

    #[test]
    fn reconstruction_is_idempotent() {
        let first = reconstruct(two_hub_mesh()).unwrap();
        let second = reconstruct(two_hub_mesh()).unwrap();
        assert_eq!(first.hubs, second.hubs);
        assert_eq!(first.unassigned_clients, second.unassigned_clients);
    }

    #[test]
    fn input_is_retained_untouched() {
        let raw = two_hub_mesh();
        let topology = reconstruct(raw.clone()).unwrap();
        assert_eq!(topology.raw, raw);
    }

    #[test]
    fn missing_fields_degrade_to_defaults() {
        let topology = reconstruct(json!({})).unwrap();
        assert_eq!(topology.schema_version, UNKNOWN_SCHEMA_VERSION);
        assert!(topology.hubs.is_empty());
        assert!(topology.unassigned_clients.is_empty());

        let topology = reconstruct(json!({ "schema_version": 7, "nodes": "garbage" })).unwrap();
        assert_eq!(topology.schema_version, UNKNOWN_SCHEMA_VERSION);
        assert!(topology.hubs.is_empty());
    }

    #[test]
    fn non_object_input_is_rejected() {
        let err = reconstruct(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput { .. }));
        assert!(reconstruct(json!("mesh")).is_err());
    }

    #[test]
    fn daisy_chain_resolves_through_uplink_marker() {
        let m_s1 = json!({
            "state": "CONNECTED", "node_1_uid": "m", "node_interface_1_uid": "m-ap",
            "node_2_uid": "s1", "node_interface_2_uid": "s1-up"
        });
        let s2_s1 = json!({
            "state": "CONNECTED", "node_1_uid": "s2", "node_interface_1_uid": "s2-up",
            "node_2_uid": "s1", "node_interface_2_uid": "s1-ap"
        });
        let topology = reconstruct(json!({
            "nodes": [
                { "uid": "m", "device_name": "Box", "is_meshed": true, "mesh_role": "master",
                  "node_interfaces": [{ "uid": "m-ap", "name": "AP:5G:0", "type": "WLAN", "node_links": [m_s1] }] },
                { "uid": "s1", "device_name": "Hallway", "is_meshed": true, "mesh_role": "slave",
                  "node_interfaces": [
                      { "uid": "s1-up", "name": "UPLINK:5G:0", "type": "WLAN", "node_links": [m_s1] },
                      { "uid": "s1-ap", "name": "AP:5G:0", "type": "WLAN", "node_links": [s2_s1] }
                  ] },
                { "uid": "s2", "device_name": "Garden", "is_meshed": true, "mesh_role": "slave",
                  "node_interfaces": [{ "uid": "s2-up", "name": "UPLINK:5G:0", "type": "WLAN", "node_links": [s2_s1] }] }
            ]
        }))
        .unwrap();

        assert_eq!(topology.hub("s1").unwrap().parent_uid(), Some("m"));
        assert_eq!(topology.hub("s2").unwrap().parent_uid(), Some("s1"));
        let roots: Vec<&str> = topology.roots().map(|h| h.uid.as_str()).collect();
        assert_eq!(roots, ["m"]);
        assert!(matches!(
            topology.warnings.as_slice(),
            [TopologyWarning::HeuristicParent { child_uid, .. }] if child_uid == "s2"
        ));
    }

    fn backbone(owner: &str, peer: &str) -> Value {
        json!({
            "state": "CONNECTED",
            "node_1_uid": owner, "node_interface_1_uid": format!("{owner}-if"),
            "node_2_uid": peer, "node_interface_2_uid": format!("{peer}-if")
        })
    }

    fn meshed(uid: &str, role: &str, iface: &str, links: Vec<Value>) -> Value {
        json!({
            "uid": uid, "device_name": uid, "is_meshed": true, "mesh_role": role,
            "node_interfaces": [{ "uid": format!("{uid}-if"), "name": iface, "type": "WLAN", "node_links": links }]
        })
    }

    #[test]
    fn chained_slaves_without_marker_use_owner_as_parent() {
        let s2_s1 = backbone("s2", "s1");
        let topology = reconstruct(json!({
            "nodes": [
                meshed("m", "master", "AP:5G:0", vec![backbone("m", "s2")]),
                meshed("s1", "slave", "AP:2G:0", vec![s2_s1.clone()]),
                meshed("s2", "slave", "AP:5G:0", vec![s2_s1])
            ]
        }))
        .unwrap();

        assert_eq!(topology.hub("s1").unwrap().parent_uid(), Some("s2"));
        assert_eq!(topology.hub("s2").unwrap().parent_uid(), Some("m"));
        assert_eq!(
            topology.warnings,
            vec![TopologyWarning::HeuristicParent {
                child_uid: "s1".into(),
                parent_uid: "s2".into(),
                inference: ChainInference::Fallback,
            }]
        );
    }

    #[test]
    fn client_order_follows_hub_enumeration() {
        let m_c1 = backbone("m", "c1");
        let m_c2 = backbone("m", "c2");
        let topology = reconstruct(json!({
            "nodes": [
                { "uid": "c2", "device_mac_address": "aa:bb:cc:00:00:02",
                  "node_interfaces": [{ "uid": "c2-if", "node_links": [m_c2] }] },
                { "uid": "c1", "device_mac_address": "aa:bb:cc:00:00:01",
                  "node_interfaces": [{ "uid": "c1-if", "node_links": [m_c1] }] },
                meshed("m", "master", "AP:5G:0", vec![m_c1, m_c2])
            ]
        }))
        .unwrap();

        let clients: Vec<&str> = topology.hubs[0].clients.iter().map(|c| c.uid.as_str()).collect();
        assert_eq!(clients, ["c1", "c2"]);
    }

    #[test]
    fn contested_parent_goes_to_first_owner_enumerated() {
        let x_s = backbone("x", "s");
        let m_s = backbone("m", "s");
        let topology = reconstruct(json!({
            "nodes": [
                meshed("s", "slave", "UPLINK:5G:0", vec![m_s.clone(), x_s.clone()]),
                meshed("x", "master", "AP:5G:0", vec![x_s]),
                meshed("m", "master", "AP:5G:0", vec![m_s])
            ]
        }))
        .unwrap();

        assert_eq!(topology.hub("s").unwrap().parent_uid(), Some("x"));
    }

    #[test]
    fn link_listed_only_by_client_leaves_it_unassigned() {
        let topology = reconstruct(json!({
            "nodes": [
                { "uid": "m", "device_name": "Box", "is_meshed": true, "mesh_role": "master" },
                { "uid": "c", "device_mac_address": "aa:bb:cc:00:00:03",
                  "node_interfaces": [{ "uid": "c-if", "name": "WLAN", "node_links": [backbone("m", "c")] }] }
            ]
        }))
        .unwrap();

        assert!(topology.hubs[0].clients.is_empty());
        let unassigned: Vec<&str> = topology.unassigned_clients.iter().map(|c| c.uid.as_str()).collect();
        assert_eq!(unassigned, ["c"]);
    }

    #[test]
    fn peer_side_uplink_label_does_not_decide_direction() {
        // Only "b" lists the link, on an uplink-named interface; "a" owns it.
        let topology = reconstruct(json!({
            "nodes": [
                meshed("m", "master", "AP:5G:0", vec![backbone("m", "a")]),
                { "uid": "a", "device_name": "a", "is_meshed": true, "mesh_role": "slave" },
                meshed("b", "slave", "UPLINK:5G:0", vec![backbone("a", "b")])
            ]
        }))
        .unwrap();

        assert_eq!(topology.hub("b").unwrap().parent_uid(), None);
        assert!(topology.warnings.is_empty());
    }
}
