// HTTP JSON source
//
// Fetches the mesh snapshot and host list as JSON documents over HTTP(S).
// Wraps `reqwest::Client` with timeout, optional basic auth, and optional
// acceptance of the self-signed certificates home routers ship with.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{HostEntry, parse_host_list, parse_snapshot};
use crate::source::MeshSource;

/// Connection settings for [`HttpSource`].
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    /// Endpoint serving the mesh snapshot document.
    pub mesh_url: Url,
    /// Endpoint serving the host list. `None` means no enrichment data.
    pub hosts_url: Option<Url>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub timeout: Duration,
    /// Accept any certificate (for self-signed routers).
    pub accept_invalid_certs: bool,
}

impl HttpSourceConfig {
    pub fn new(mesh_url: Url) -> Self {
        Self {
            mesh_url,
            hosts_url: None,
            username: None,
            password: None,
            timeout: Duration::from_secs(10),
            accept_invalid_certs: false,
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("fritzmesh/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// Mesh source fetching both documents over HTTP.
pub struct HttpSource {
    http: reqwest::Client,
    config: HttpSourceConfig,
}

impl HttpSource {
    pub fn new(config: HttpSourceConfig) -> Result<Self, Error> {
        let http = config.build_client()?;
        Ok(Self { http, config })
    }

    /// Create a source with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, config: HttpSourceConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &HttpSourceConfig {
        &self.config
    }

    /// GET `url` and return the body text, mapping non-2xx statuses to errors.
    async fn get_text(&self, url: &Url) -> Result<String, Error> {
        debug!("GET {}", url);

        let mut builder = self.http.get(url.clone());
        if let Some(ref user) = self.config.username {
            let password = self.config.password.as_ref().map(|p| p.expose_secret());
            builder = builder.basic_auth(user, password);
        }

        let resp = builder.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        trace!(status = status.as_u16(), "response received");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
                preview: body.chars().take(200).collect(),
            });
        }

        resp.text().await.map_err(Error::Transport)
    }
}

impl MeshSource for HttpSource {
    async fn fetch_topology(&self) -> Result<Value, Error> {
        let body = self.get_text(&self.config.mesh_url).await?;
        parse_snapshot(&body)
    }

    async fn fetch_hosts(&self) -> Result<Vec<HostEntry>, Error> {
        let Some(ref url) = self.config.hosts_url else {
            return Ok(Vec::new());
        };
        let body = self.get_text(url).await?;
        parse_host_list(&body)
    }
}
