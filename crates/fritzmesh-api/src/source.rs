// Fetch seam between the reconstruction core and whatever produces the feed.

use std::future::Future;

use serde_json::Value;

use crate::error::Error;
use crate::models::HostEntry;

/// Anything that can produce a raw mesh snapshot and the flat host list.
///
/// Implementations do I/O only; they never interpret the topology. The
/// snapshot is returned as a JSON document (checked to be an object) so the
/// caller can retain it verbatim for diagnostics.
pub trait MeshSource: Send + Sync {
    /// Fetch the raw mesh snapshot document.
    fn fetch_topology(&self) -> impl Future<Output = Result<Value, Error>> + Send;

    /// Fetch the secondary host inventory used for enrichment.
    fn fetch_hosts(&self) -> impl Future<Output = Result<Vec<HostEntry>, Error>> + Send;
}
