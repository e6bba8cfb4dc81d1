//! Client command handlers.

use serde::Serialize;
use tabled::Tabled;

use fritzmesh_core::{ClientDevice, Coordinator, MacAddress, MeshHub, Source, Topology};

use crate::cli::{ClientListArgs, ClientsArgs, ClientsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

/// A client paired with the hub it hangs off, for listing.
#[derive(Debug, Serialize)]
struct ClientEntry<'a> {
    #[serde(flatten)]
    client: &'a ClientDevice,
    hub_uid: Option<&'a str>,
    #[serde(skip)]
    hub_name: Option<&'a str>,
}

impl<'a> ClientEntry<'a> {
    fn new(client: &'a ClientDevice, hub: Option<&'a MeshHub>) -> Self {
        Self {
            client,
            hub_uid: hub.map(|h| h.uid.as_str()),
            hub_name: hub.map(|h| h.name.as_str()),
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "UID")]
    uid: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Medium")]
    medium: String,
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Hub")]
    hub: String,
}

impl From<&ClientEntry<'_>> for ClientRow {
    fn from(e: &ClientEntry<'_>) -> Self {
        let c = e.client;
        Self {
            uid: c.uid.clone(),
            name: c.name.clone(),
            ip: c.ip.map(|ip| ip.to_string()).unwrap_or_default(),
            mac: c.mac.to_string(),
            medium: c.medium.to_string(),
            band: c.band().unwrap_or_default().to_owned(),
            state: c.state.to_string(),
            hub: e.hub_name.unwrap_or("(unassigned)").to_owned(),
        }
    }
}

fn detail(e: &ClientEntry<'_>) -> String {
    let c = e.client;
    [
        format!("UID:       {}", c.uid),
        format!("Name:      {}", c.name),
        format!("MAC:       {}", c.mac),
        format!("IP:        {}", util::or_dash(c.ip)),
        format!("Hub:       {}", util::or_dash(e.hub_name)),
        format!("Medium:    {}", c.medium),
        format!("Band:      {}", util::or_dash(c.band())),
        format!("State:     {}", c.state),
        format!("Interface: {}", util::or_dash(Some(&c.interface_name).filter(|s| !s.is_empty()))),
        format!(
            "Rate:      {}/{} kbit/s rx/tx (max {}/{})",
            c.throughput.cur_rx_kbps,
            c.throughput.cur_tx_kbps,
            c.throughput.max_rx_kbps,
            c.throughput.max_tx_kbps
        ),
    ]
    .join("\n")
}

/// Apply list filters, preserving topology order.
fn select<'a>(
    topology: &'a Topology,
    args: &ClientListArgs,
) -> Result<Vec<ClientEntry<'a>>, CliError> {
    let hub_uid = args
        .hub
        .as_deref()
        .map(|h| util::resolve_hub(topology, h).map(|hub| hub.uid.as_str()))
        .transpose()?;

    Ok(topology
        .all_clients()
        .filter(|(_, hub)| !args.unassigned || hub.is_none())
        .filter(|(_, hub)| hub_uid.is_none_or(|uid| hub.is_some_and(|h| h.uid == uid)))
        .filter(|(c, _)| !args.connected || c.is_connected())
        .map(|(c, hub)| ClientEntry::new(c, hub))
        .collect())
}

/// Find a client by MAC address, falling back to uid.
fn find<'a>(topology: &'a Topology, identifier: &str) -> Result<ClientEntry<'a>, CliError> {
    let mac = MacAddress::new(identifier);
    topology
        .find_client(&mac)
        .filter(|(c, _)| !c.mac.is_empty())
        .or_else(|| topology.all_clients().find(|(c, _)| c.uid == identifier))
        .map(|(c, hub)| ClientEntry::new(c, hub))
        .ok_or_else(|| CliError::NotFound {
            resource_type: "client".into(),
            identifier: identifier.into(),
            list_command: "clients list".into(),
        })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    coordinator: &Coordinator<Source>,
    args: ClientsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let snapshot = util::fetch_snapshot(coordinator).await?;
    let topology = &snapshot.topology;

    match args.command {
        ClientsCommand::List(list) => {
            let entries = select(topology, &list)?;
            let out = output::render_list(&global.output, &entries, |e| ClientRow::from(e), |e| {
                e.client.mac.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClientsCommand::Get { client } => {
            let entry = find(topology, &client)?;
            let out = output::render_single(&global.output, &entry, detail, |e| {
                e.client.uid.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mesh() -> Topology {
        fritzmesh_core::reconstruct(json!({
            "nodes": [
                {
                    "uid": "n-1", "device_name": "Box", "mesh_role": "master", "is_meshed": true,
                    "node_interfaces": [{ "uid": "i-1", "name": "AP:2G:0", "type": "WLAN", "node_links": [
                        { "state": "CONNECTED", "node_1_uid": "n-1", "node_2_uid": "n-10" },
                        { "state": "DISCONNECTED", "node_1_uid": "n-1", "node_2_uid": "n-11" }
                    ]}]
                },
                { "uid": "n-10", "device_name": "Phone", "device_mac_address": "AA:00:00:00:00:10" },
                { "uid": "n-11", "device_name": "Laptop", "device_mac_address": "AA:00:00:00:00:11" },
                { "uid": "n-20", "device_name": "Printer" }
            ]
        }))
        .unwrap()
    }

    fn args(hub: Option<&str>, unassigned: bool, connected: bool) -> ClientListArgs {
        ClientListArgs {
            hub: hub.map(Into::into),
            unassigned,
            connected,
        }
    }

    fn uids(entries: &[ClientEntry<'_>]) -> Vec<String> {
        entries.iter().map(|e| e.client.uid.clone()).collect()
    }

    #[test]
    fn filters_narrow_the_listing() {
        let topo = mesh();
        assert_eq!(uids(&select(&topo, &args(None, false, false)).unwrap()), ["n-10", "n-11", "n-20"]);
        assert_eq!(uids(&select(&topo, &args(None, true, false)).unwrap()), ["n-20"]);
        assert_eq!(uids(&select(&topo, &args(Some("Box"), false, true)).unwrap()), ["n-10"]);
        assert!(select(&topo, &args(Some("nope"), false, false)).is_err());
    }

    #[test]
    fn find_by_mac_or_uid() {
        let topo = mesh();
        let entry = find(&topo, "aa-00-00-00-00-11").unwrap();
        assert_eq!(entry.client.uid, "n-11");
        assert_eq!(entry.hub_uid, Some("n-1"));
        assert_eq!(find(&topo, "n-20").unwrap().hub_uid, None);
        assert!(matches!(find(&topo, "ff:ff:ff:ff:ff:ff"), Err(CliError::NotFound { .. })));
    }
}
