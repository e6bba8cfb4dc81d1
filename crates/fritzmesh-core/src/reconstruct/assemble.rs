// ── Hierarchy assembler ──

use std::collections::HashMap;

use tracing::warn;

use crate::model::{ClientDevice, MeshHub, TopologyWarning, Uplink};

use super::classify::Accumulator;
use super::index::{IndexedNode, NodeIndex};

/// Build the ordered hub list from the node table and classification result.
///
/// Takes the recorded parents out of the accumulator. Hubs come out master
/// first, then by name; the sort is stable so equal names keep feed order.
pub(crate) fn assemble(index: &NodeIndex<'_>, acc: &mut Accumulator) -> Vec<MeshHub> {
    let mut clients_by_hub: HashMap<&str, Vec<ClientDevice>> = HashMap::new();
    for (hub_uid, client) in acc.attachments.values() {
        clients_by_hub
            .entry(hub_uid.as_str())
            .or_default()
            .push(client.clone());
    }

    let mut hubs: Vec<MeshHub> = index
        .hubs()
        .map(|node| {
            let clients = clients_by_hub.remove(node.uid).unwrap_or_default();
            let uplink = acc.parents.remove(node.uid);
            hub_from(node, clients, uplink)
        })
        .collect();

    let masters: Vec<String> = hubs
        .iter()
        .filter(|h| h.is_master())
        .map(|h| h.uid.clone())
        .collect();
    if masters.len() > 1 {
        warn!(uids = ?masters, "more than one hub reports the master role");
        acc.warnings.push(TopologyWarning::MultipleMasters { uids: masters });
    }

    hubs.sort_by(|a, b| {
        a.role
            .sort_rank()
            .cmp(&b.role.sort_rank())
            .then_with(|| a.name.cmp(&b.name))
    });
    hubs
}

fn hub_from(node: &IndexedNode<'_>, clients: Vec<ClientDevice>, uplink: Option<Uplink>) -> MeshHub {
    MeshHub {
        uid: node.uid.to_owned(),
        name: node.name.clone(),
        mac: node.mac.clone(),
        role: node.role,
        model: node.model.clone(),
        vendor: node.vendor.clone(),
        firmware: node.firmware.clone(),
        ip: node.ip,
        clients,
        uplink,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::reconstruct::{classify::classify, graph::LinkGraph};
    use fritzmesh_api::RawNode;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn build(doc: Value) -> (Vec<MeshHub>, Accumulator) {
        let raw: Vec<RawNode> = serde_json::from_value(doc).unwrap();
        let index = NodeIndex::build(&raw);
        let graph = LinkGraph::build(&index);
        let mut acc = classify(&index, &graph);
        let hubs = assemble(&index, &mut acc);
        (hubs, acc)
    }

    fn hub(uid: &str, name: &str, role: &str) -> Value {
        json!({ "uid": uid, "device_name": name, "is_meshed": true, "mesh_role": role })
    }

    #[test]
    fn master_first_then_by_name() {
        let (hubs, acc) = build(json!([
            hub("s2", "Repeater Kitchen", "slave"),
            hub("u", "Attic", "unknown"),
            hub("m", "Zebra Box", "master"),
            hub("s1", "Repeater Attic", "slave")
        ]));
        let names: Vec<&str> = hubs.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["Zebra Box", "Attic", "Repeater Attic", "Repeater Kitchen"]);
        assert!(acc.warnings.is_empty());
    }

    #[test]
    fn equal_names_keep_feed_order() {
        let (hubs, _) = build(json!([
            hub("b", "Repeater", "slave"),
            hub("a", "Repeater", "slave")
        ]));
        let uids: Vec<&str> = hubs.iter().map(|h| h.uid.as_str()).collect();
        assert_eq!(uids, ["b", "a"]);
    }

    #[test]
    fn multiple_masters_are_reported() {
        let (hubs, acc) = build(json!([
            hub("m2", "Box B", "master"),
            hub("m1", "Box A", "master")
        ]));
        assert_eq!(hubs[0].uid, "m1");
        assert_eq!(
            acc.warnings,
            vec![TopologyWarning::MultipleMasters { uids: vec!["m2".into(), "m1".into()] }]
        );
    }

    #[test]
    fn non_hub_nodes_are_not_hubs() {
        let (hubs, _) = build(json!([
            hub("m", "Box", "master"),
            { "uid": "phone", "mesh_role": "master" }
        ]));
        assert_eq!(hubs.len(), 1);
    }
}
