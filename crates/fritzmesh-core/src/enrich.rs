// ── Enrichment ──
//
// Backfills client addresses and display names from the router's flat host
// inventory. Best-effort: a missing host list leaves the topology as-is.

use std::collections::HashMap;
use std::net::IpAddr;

use tracing::{debug, trace};

use fritzmesh_api::HostEntry;

use crate::model::{ClientDevice, MacAddress, Topology};

/// Names longer than this look like raw identifiers rather than something a
/// person typed, and may be replaced by the host list's name.
pub const NAME_REPLACE_THRESHOLD: usize = 20;

/// Apply host-list data to every client in `topology`, attached or not.
///
/// For each client with a matching hardware address the IP is always taken
/// from the host record. The name is replaced only when the host supplies
/// one and the current name is empty or longer than
/// [`NAME_REPLACE_THRESHOLD`] characters.
pub fn enrich(topology: &mut Topology, hosts: &[HostEntry]) {
    let by_mac: HashMap<MacAddress, &HostEntry> = hosts
        .iter()
        .map(|h| (MacAddress::new(&h.mac), h))
        .filter(|(mac, _)| !mac.is_empty())
        .collect();
    if by_mac.is_empty() {
        debug!("host list empty, nothing to enrich");
        return;
    }

    let mut matched = 0usize;
    let clients = topology
        .hubs
        .iter_mut()
        .flat_map(|h| h.clients.iter_mut())
        .chain(topology.unassigned_clients.iter_mut());
    for client in clients {
        if let Some(host) = by_mac.get(&client.mac) {
            apply(client, host);
            matched += 1;
        }
    }

    debug!(hosts = by_mac.len(), matched, "enriched clients from host list");
}

fn apply(client: &mut ClientDevice, host: &HostEntry) {
    client.ip = host
        .ip
        .as_deref()
        .map(str::trim)
        .and_then(|ip| ip.parse::<IpAddr>().ok());

    let Some(name) = host.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
        return;
    };
    if client.name.is_empty() || client.name.chars().count() > NAME_REPLACE_THRESHOLD {
        trace!(mac = %client.mac, from = %client.name, to = name, "replacing client name");
        client.name = name.to_owned();
    }
}
