// Local JSON file source
//
// Reads a saved snapshot (and optionally a saved host list) from disk.
// Used for offline troubleshooting with a captured mesh document.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::models::{HostEntry, parse_host_list, parse_snapshot};
use crate::source::MeshSource;

/// Mesh source backed by JSON files on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    mesh_path: PathBuf,
    hosts_path: Option<PathBuf>,
}

impl JsonFileSource {
    /// Create a source reading the snapshot from `mesh_path`.
    pub fn new(mesh_path: impl Into<PathBuf>) -> Self {
        Self {
            mesh_path: mesh_path.into(),
            hosts_path: None,
        }
    }

    /// Also read a host list from `hosts_path`. Without one, the host list is empty.
    pub fn with_hosts(mut self, hosts_path: impl Into<PathBuf>) -> Self {
        self.hosts_path = Some(hosts_path.into());
        self
    }

    pub fn mesh_path(&self) -> &Path {
        &self.mesh_path
    }

    pub fn hosts_path(&self) -> Option<&Path> {
        self.hosts_path.as_deref()
    }
}

async fn read_text(path: &Path) -> Result<String, Error> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })
}

impl MeshSource for JsonFileSource {
    async fn fetch_topology(&self) -> Result<Value, Error> {
        debug!(path = %self.mesh_path.display(), "reading mesh snapshot file");
        let body = read_text(&self.mesh_path).await?;
        parse_snapshot(&body)
    }

    async fn fetch_hosts(&self) -> Result<Vec<HostEntry>, Error> {
        let Some(ref path) = self.hosts_path else {
            return Ok(Vec::new());
        };
        debug!(path = %path.display(), "reading host list file");
        let body = read_text(path).await?;
        parse_host_list(&body)
    }
}
