//! Shared helpers for command handlers.

use std::sync::Arc;

use fritzmesh_core::{Coordinator, MacAddress, MeshHub, MeshSnapshot, Source, Topology};

use crate::error::CliError;

/// Run one refresh and return the published snapshot.
pub async fn fetch_snapshot(
    coordinator: &Coordinator<Source>,
) -> Result<Arc<MeshSnapshot>, CliError> {
    tracing::debug!(source = %coordinator.source().describe(), "fetching mesh snapshot");
    Ok(coordinator.refresh().await?)
}

/// Resolve a hub by uid, MAC address, or case-insensitive name.
pub fn resolve_hub<'a>(
    topology: &'a Topology,
    identifier: &str,
) -> Result<&'a MeshHub, CliError> {
    let mac = MacAddress::new(identifier);
    topology
        .hub(identifier)
        .or_else(|| topology.hubs.iter().find(|h| !h.mac.is_empty() && h.mac == mac))
        .or_else(|| {
            topology
                .hubs
                .iter()
                .find(|h| h.name.eq_ignore_ascii_case(identifier.trim()))
        })
        .ok_or_else(|| CliError::NotFound {
            resource_type: "hub".into(),
            identifier: identifier.into(),
            list_command: "hubs list".into(),
        })
}

/// `-` for empty or absent values in detail views.
pub fn or_dash(value: Option<impl ToString>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}
