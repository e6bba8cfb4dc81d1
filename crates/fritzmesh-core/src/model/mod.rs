// ── Domain model ──
//
// Canonical types produced by reconstruction and consumed by the CLI.

pub mod client;
pub mod hub;
pub mod link;
pub mod mac;
pub mod topology;

pub use client::ClientDevice;
pub use hub::{HubRole, MeshHub, Uplink};
pub use link::{LinkMedium, LinkState, Throughput};
pub use mac::MacAddress;
pub use topology::{ChainInference, Topology, TopologyWarning, UNKNOWN_SCHEMA_VERSION};
