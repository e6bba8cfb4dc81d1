// ── Unassigned-client collector ──

use crate::model::{ClientDevice, LinkMedium, LinkState, Throughput};

use super::classify::Accumulator;
use super::index::NodeIndex;

/// Non-hub nodes no hub claimed, in feed order. No link data exists for
/// them, so medium and state stay unknown.
pub(crate) fn collect(index: &NodeIndex<'_>, acc: &Accumulator) -> Vec<ClientDevice> {
    index
        .iter()
        .filter(|node| !node.is_hub && !acc.attachments.contains_key(node.uid))
        .map(|node| ClientDevice {
            uid: node.uid.to_owned(),
            name: node.name.clone(),
            mac: node.mac.clone(),
            medium: LinkMedium::Unknown,
            state: LinkState::Unknown,
            ip: node.ip,
            throughput: Throughput::default(),
            interface_name: String::new(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::reconstruct::{classify::classify, graph::LinkGraph};
    use fritzmesh_api::RawNode;
    use serde_json::json;

    #[test]
    fn unclaimed_non_hubs_are_collected() {
        let raw: Vec<RawNode> = serde_json::from_value(json!([
            {
                "uid": "m", "is_meshed": true, "mesh_role": "master",
                "node_interfaces": [{ "uid": "m-if", "name": "LAN:1", "type": "LAN", "node_links": [{
                    "state": "CONNECTED",
                    "node_1_uid": "m", "node_interface_1_uid": "m-if",
                    "node_2_uid": "pc", "node_interface_2_uid": "pc-if"
                }] }]
            },
            { "uid": "pc", "device_mac_address": "aa:bb:cc:00:00:01" },
            { "uid": "printer", "device_name": "Printer", "device_mac_address": "aa:bb:cc:00:00:02" },
            { "uid": "s", "is_meshed": true, "mesh_role": "slave" }
        ]))
        .unwrap();
        let index = NodeIndex::build(&raw);
        let acc = classify(&index, &LinkGraph::build(&index));

        let unassigned = collect(&index, &acc);
        assert_eq!(unassigned.len(), 1);
        let printer = &unassigned[0];
        assert_eq!(printer.name, "Printer");
        assert_eq!(printer.state, LinkState::Unknown);
        assert_eq!(printer.medium, LinkMedium::Unknown);
        assert_eq!(printer.interface_name, "");
    }
}
