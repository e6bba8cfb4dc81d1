// ── Configured mesh source ──
//
// Runtime dispatch over the concrete fetch sources, chosen from config.

use serde_json::Value;

use fritzmesh_api::{HostEntry, HttpSource, HttpSourceConfig, JsonFileSource, MeshSource};

use crate::config::SourceConfig;
use crate::error::CoreError;

/// The source selected by a [`SourceConfig`].
pub enum Source {
    File(JsonFileSource),
    Http(HttpSource),
}

impl Source {
    pub fn from_config(config: &SourceConfig) -> Result<Self, CoreError> {
        match config {
            SourceConfig::File {
                mesh_path,
                hosts_path,
            } => {
                let mut source = JsonFileSource::new(mesh_path);
                if let Some(hosts) = hosts_path {
                    source = source.with_hosts(hosts);
                }
                Ok(Self::File(source))
            }
            SourceConfig::Http {
                mesh_url,
                hosts_url,
                credentials,
                timeout,
                accept_invalid_certs,
            } => {
                let mut http = HttpSourceConfig::new(mesh_url.clone());
                http.hosts_url.clone_from(hosts_url);
                http.timeout = *timeout;
                http.accept_invalid_certs = *accept_invalid_certs;
                if let Some(creds) = credentials {
                    http.username = Some(creds.username.clone());
                    http.password = Some(creds.password.clone());
                }
                Ok(Self::Http(HttpSource::new(http)?))
            }
        }
    }

    /// Short human label for logs and status output.
    pub fn describe(&self) -> String {
        match self {
            Self::File(s) => s.mesh_path().display().to_string(),
            Self::Http(s) => s.config().mesh_url.to_string(),
        }
    }
}

impl MeshSource for Source {
    async fn fetch_topology(&self) -> Result<Value, fritzmesh_api::Error> {
        match self {
            Self::File(s) => s.fetch_topology().await,
            Self::Http(s) => s.fetch_topology().await,
        }
    }

    async fn fetch_hosts(&self) -> Result<Vec<HostEntry>, fritzmesh_api::Error> {
        match self {
            Self::File(s) => s.fetch_hosts().await,
            Self::Http(s) => s.fetch_hosts().await,
        }
    }
}
