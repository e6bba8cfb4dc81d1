// ── Node indexer ──
//
// Flattens the raw node list into a uid-keyed table of the scalar fields
// later stages need, keeping a borrow of the raw node for link traversal.

use std::net::{IpAddr, Ipv4Addr};

use indexmap::IndexMap;

use fritzmesh_api::{RawIpAddress, RawNode};

use crate::model::{HubRole, MacAddress};

/// Working record for one node. Borrows the raw node for its interfaces.
#[derive(Debug)]
pub(crate) struct IndexedNode<'a> {
    pub uid: &'a str,
    pub name: String,
    pub mac: MacAddress,
    pub ip: Option<IpAddr>,
    pub model: String,
    pub vendor: String,
    pub firmware: String,
    pub is_hub: bool,
    pub role: HubRole,
    pub raw: &'a RawNode,
}

impl<'a> IndexedNode<'a> {
    fn from_raw(raw: &'a RawNode) -> Self {
        let uid = raw.uid.as_deref().unwrap_or_default();
        Self {
            uid,
            name: raw.device_name.clone().unwrap_or_else(|| uid.to_owned()),
            mac: MacAddress::new(raw.device_mac_address.as_deref().unwrap_or_default()),
            ip: first_ipv4(&raw.ip_addresses),
            model: raw.device_model.clone().unwrap_or_default(),
            vendor: raw.device_manufacturer.clone().unwrap_or_default(),
            firmware: raw.device_firmware_version.clone().unwrap_or_default(),
            is_hub: raw.is_meshed,
            role: HubRole::from_feed(raw.mesh_role.as_deref()),
            raw,
        }
    }
}

/// Uid-keyed node table, in feed enumeration order.
///
/// Nodes without a uid are indexed under `""`. A repeated uid replaces the
/// earlier record but keeps its position.
#[derive(Debug, Default)]
pub(crate) struct NodeIndex<'a> {
    nodes: IndexMap<&'a str, IndexedNode<'a>>,
}

impl<'a> NodeIndex<'a> {
    pub fn build(raw_nodes: &'a [RawNode]) -> Self {
        let mut nodes = IndexMap::with_capacity(raw_nodes.len());
        for raw in raw_nodes {
            let node = IndexedNode::from_raw(raw);
            nodes.insert(node.uid, node);
        }
        Self { nodes }
    }

    pub fn get(&self, uid: &str) -> Option<&IndexedNode<'a>> {
        self.nodes.get(uid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedNode<'a>> {
        self.nodes.values()
    }

    pub fn hubs(&self) -> impl Iterator<Item = &IndexedNode<'a>> {
        self.iter().filter(|n| n.is_hub)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// First IPv4 entry with a non-empty value, CIDR suffix stripped.
fn first_ipv4(addresses: &[RawIpAddress]) -> Option<IpAddr> {
    let value = addresses
        .iter()
        .filter(|a| {
            a.version
                .as_deref()
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("ipv4"))
        })
        .find_map(|a| a.value.as_deref().map(str::trim).filter(|v| !v.is_empty()))?;
    let host = value.split('/').next().unwrap_or(value);
    host.parse::<Ipv4Addr>().ok().map(IpAddr::V4)
}
