//! Mesh topology layer between `fritzmesh-api` and consumers (CLI).
//!
//! The centrepiece is [`reconstruct`], a pure transform from one raw mesh
//! snapshot into a rooted [`Topology`]: a master hub, the repeaters chained
//! beneath it, and the clients attached to each. [`enrich`] then backfills
//! client addresses and names from the router's host list.
//!
//! [`Coordinator`] wraps both around a [`fritzmesh_api::MeshSource`] and
//! republishes the result on a timer through `watch` channels.

pub mod config;
pub mod coordinator;
pub mod enrich;
pub mod error;
pub mod model;
pub mod reconstruct;
pub mod source;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{
    Credentials, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, DebugMode, MeshConfig, SourceConfig,
};
pub use coordinator::{Coordinator, MeshSnapshot, RefreshState};
pub use enrich::{NAME_REPLACE_THRESHOLD, enrich};
pub use error::CoreError;
pub use reconstruct::{UPLINK_MARKER, reconstruct};
pub use source::Source;
pub use store::{IndexedClient, MeshIndex};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ChainInference, ClientDevice, HubRole, LinkMedium, LinkState, MacAddress, MeshHub, Throughput,
    Topology, TopologyWarning, UNKNOWN_SCHEMA_VERSION, Uplink,
};
