//! Hub command handlers.

use tabled::Tabled;

use fritzmesh_core::{Coordinator, MeshHub, Source};

use crate::cli::{GlobalOpts, HubsArgs, HubsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct HubRow {
    #[tabled(rename = "UID")]
    uid: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Parent")]
    parent: String,
    #[tabled(rename = "Uplink")]
    uplink: String,
    #[tabled(rename = "Clients")]
    clients: String,
}

impl From<&MeshHub> for HubRow {
    fn from(h: &MeshHub) -> Self {
        Self {
            uid: h.uid.clone(),
            name: h.name.clone(),
            role: h.role.to_string(),
            mac: h.mac.to_string(),
            ip: h.ip.map(|ip| ip.to_string()).unwrap_or_default(),
            parent: h.parent_uid().unwrap_or_default().to_owned(),
            uplink: h
                .uplink
                .as_ref()
                .map(|u| format!("{} {}", u.medium, u.state))
                .unwrap_or_default(),
            clients: format!("{}/{}", h.connected_clients(), h.clients.len()),
        }
    }
}

fn detail(h: &MeshHub) -> String {
    let mut lines = vec![
        format!("UID:       {}", h.uid),
        format!("Name:      {}", h.name),
        format!("Role:      {}", h.role),
        format!("MAC:       {}", h.mac),
        format!("IP:        {}", util::or_dash(h.ip)),
        format!("Model:     {}", h.model),
        format!("Vendor:    {}", h.vendor),
        format!("Firmware:  {}", h.firmware),
    ];
    if let Some(ref u) = h.uplink {
        lines.push(format!("Parent:    {}", u.parent_uid));
        lines.push(format!("Uplink:    {} {} ({})", u.medium, u.state, u.interface_name));
        lines.push(format!(
            "Rate:      {}/{} kbit/s rx/tx (max {}/{})",
            u.throughput.cur_rx_kbps,
            u.throughput.cur_tx_kbps,
            u.throughput.max_rx_kbps,
            u.throughput.max_tx_kbps
        ));
    }
    lines.push(format!(
        "Clients:   {} ({} connected)",
        h.clients.len(),
        h.connected_clients()
    ));
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    coordinator: &Coordinator<Source>,
    args: HubsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let snapshot = util::fetch_snapshot(coordinator).await?;
    let topology = &snapshot.topology;

    match args.command {
        HubsCommand::List => {
            let out = output::render_list(
                &global.output,
                &topology.hubs,
                |h| HubRow::from(h),
                |h| h.uid.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HubsCommand::Get { hub } => {
            let found = util::resolve_hub(topology, &hub)?;
            let out = output::render_single(&global.output, found, detail, |h| h.uid.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
