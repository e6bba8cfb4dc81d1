//! Topology tree rendering.

use std::collections::HashSet;

use fritzmesh_core::{ClientDevice, Coordinator, MeshHub, Source, Topology, TopologyWarning};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, Painter};

use super::util;

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(coordinator: &Coordinator<Source>, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = util::fetch_snapshot(coordinator).await?;
    let painter = Painter::new(&global.color);
    let out = output::render_single(
        &global.output,
        &snapshot.topology,
        |t| render_tree(t, painter),
        plain_lines,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// `hub<TAB>parent` and `client<TAB>hub` pairs, one per line.
fn plain_lines(topology: &Topology) -> String {
    let hubs = topology
        .hubs
        .iter()
        .map(|h| format!("{}\t{}", h.uid, h.parent_uid().unwrap_or("-")));
    let clients = topology
        .all_clients()
        .map(|(c, hub)| format!("{}\t{}", c.uid, hub.map_or("-", |h| h.uid.as_str())));
    hubs.chain(clients).collect::<Vec<_>>().join("\n")
}

// ── Tree ────────────────────────────────────────────────────────────

/// Render the hub hierarchy as an indented tree.
///
/// Roots are walked in hub order; each hub lists its clients before its
/// child hubs. A hub reached twice (a parent cycle) is printed once.
pub fn render_tree(topology: &Topology, painter: Painter) -> String {
    let mut lines = Vec::new();
    let mut seen = HashSet::new();

    for root in topology.roots() {
        lines.push(hub_label(root, painter));
        walk(topology, root, "", painter, &mut seen, &mut lines);
    }

    // Hubs only reachable through a cycle have no root above them.
    for hub in &topology.hubs {
        if !seen.contains(hub.uid.as_str()) {
            lines.push(format!("{} {}", hub_label(hub, painter), painter.warning("(cycle)")));
            walk(topology, hub, "", painter, &mut seen, &mut lines);
        }
    }

    if !topology.unassigned_clients.is_empty() {
        lines.push(String::new());
        lines.push(painter.heading("Unassigned"));
        for client in &topology.unassigned_clients {
            lines.push(format!("  {}", client_label(client, painter)));
        }
    }

    if !topology.warnings.is_empty() {
        lines.push(String::new());
        lines.push(painter.heading("Warnings"));
        for warning in &topology.warnings {
            lines.push(format!("  {}", painter.warning(&describe_warning(warning))));
        }
    }

    lines.join("\n")
}

fn walk<'a>(
    topology: &'a Topology,
    hub: &'a MeshHub,
    prefix: &str,
    painter: Painter,
    seen: &mut HashSet<&'a str>,
    lines: &mut Vec<String>,
) {
    if !seen.insert(hub.uid.as_str()) {
        return;
    }

    let children: Vec<&MeshHub> = topology.children_of(&hub.uid).collect();
    let total = hub.clients.len() + children.len();
    let mut position = 0;

    for client in &hub.clients {
        position += 1;
        let branch = if position == total { "└── " } else { "├── " };
        lines.push(format!("{prefix}{branch}{}", client_label(client, painter)));
    }

    for child in children {
        position += 1;
        let last = position == total;
        let branch = if last { "└── " } else { "├── " };
        if seen.contains(child.uid.as_str()) {
            lines.push(format!(
                "{prefix}{branch}{} {}",
                hub_label(child, painter),
                painter.warning("(cycle)")
            ));
            continue;
        }
        lines.push(format!("{prefix}{branch}{}", hub_label(child, painter)));
        let next = format!("{prefix}{}", if last { "    " } else { "│   " });
        walk(topology, child, &next, painter, seen, lines);
    }
}

fn hub_label(hub: &MeshHub, painter: Painter) -> String {
    let detail = if hub.mac.is_empty() {
        format!("({})", hub.role)
    } else {
        format!("({}, {})", hub.role, hub.mac)
    };
    let mut label = format!("{} {}", painter.heading(&hub.name), painter.dim(&detail));
    if let Some(ip) = hub.ip {
        label.push_str(&format!(" {ip}"));
    }
    if let Some(ref uplink) = hub.uplink {
        let state = uplink.state.to_string();
        let state = if uplink.state.is_connected() {
            painter.ok(&state)
        } else {
            painter.warning(&state)
        };
        label.push_str(&format!(" via {} {state}", uplink.medium));
    }
    label
}

fn client_label(client: &ClientDevice, painter: Painter) -> String {
    let mut label = format!("{} {}", client.name, painter.dim(&client.mac.to_string()));
    if let Some(ip) = client.ip {
        label.push_str(&format!(" {ip}"));
    }
    label.push_str(&format!(" {}", client.medium));
    if let Some(band) = client.band() {
        label.push_str(&format!(" {band}"));
    }
    let state = client.state.to_string();
    if client.is_connected() {
        label.push_str(&format!(" {}", painter.ok(&state)));
    } else {
        label.push_str(&format!(" {}", painter.warning(&state)));
    }
    label
}

fn describe_warning(warning: &TopologyWarning) -> String {
    match warning {
        TopologyWarning::MultipleMasters { uids } => {
            format!("multiple master hubs reported: {}", uids.join(", "))
        }
        TopologyWarning::HeuristicParent {
            child_uid,
            parent_uid,
            inference,
        } => format!("{child_uid} placed under {parent_uid} ({inference})"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::ColorMode;
    use serde_json::json;

    fn plain() -> Painter {
        Painter::new(&ColorMode::Never)
    }

    fn mesh() -> Topology {
        fritzmesh_core::reconstruct(json!({
            "nodes": [
                {
                    "uid": "n-1", "device_name": "Box", "mesh_role": "master", "is_meshed": true,
                    "node_interfaces": [
                        { "uid": "i-1", "name": "LAN:1", "type": "LAN", "node_links": [
                            { "state": "CONNECTED", "node_1_uid": "n-1", "node_2_uid": "n-2",
                              "node_interface_1_uid": "i-1", "node_interface_2_uid": "i-2" }
                        ]},
                        { "uid": "i-3", "name": "AP:5G:0", "type": "WLAN", "node_links": [
                            { "state": "CONNECTED", "node_1_uid": "n-1", "node_2_uid": "n-10",
                              "node_interface_1_uid": "i-3", "node_interface_2_uid": "i-10" }
                        ]}
                    ]
                },
                { "uid": "n-2", "device_name": "Repeater", "mesh_role": "slave", "is_meshed": true,
                  "node_interfaces": [{ "uid": "i-2", "name": "LAN:1", "type": "LAN" }] },
                { "uid": "n-10", "device_name": "Phone", "device_mac_address": "AA:00:00:00:00:10" },
                { "uid": "n-20", "device_name": "Printer" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn tree_nests_repeater_under_master() {
        let out = render_tree(&mesh(), plain());
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("Box (master"));
        assert!(lines[1].starts_with("├── Phone aa:00:00:00:00:10 wireless 5G connected"));
        assert!(lines[2].starts_with("└── Repeater (slave"));
        assert!(lines[2].ends_with("via wired connected"));
        assert!(out.contains("Unassigned\n  Printer"));
    }

    #[test]
    fn cyclic_parents_terminate() {
        let mut topo = mesh();
        // Force n-1 and n-2 to claim each other.
        let uplink = topo.hubs[1].uplink.clone().unwrap();
        let mut back = uplink.clone();
        back.parent_uid = "n-2".into();
        topo.hubs[0].uplink = Some(back);
        let out = render_tree(&topo, plain());
        assert_eq!(out.matches("Repeater (slave").count(), 1);
        assert!(out.contains("(cycle)"));
    }

    #[test]
    fn plain_lists_parent_pairs() {
        let out = plain_lines(&mesh());
        assert!(out.contains("n-2\tn-1"));
        assert!(out.contains("n-10\tn-1"));
        assert!(out.contains("n-20\t-"));
    }
}
