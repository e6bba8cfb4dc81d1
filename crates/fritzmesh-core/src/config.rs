// ── Runtime source configuration ──
//
// These types describe where the mesh snapshot comes from and how often to
// poll it. They carry credential data but never touch disk: the CLI builds
// a `MeshConfig` from its profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use strum::{Display, EnumString};
use url::Url;

/// Default poll period between refreshes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Default per-request timeout for remote sources.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Basic-auth credentials for a remote source.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// Where snapshots are read from.
#[derive(Debug, Clone)]
pub enum SourceConfig {
    /// Local JSON documents (captured feed dumps).
    File {
        mesh_path: PathBuf,
        hosts_path: Option<PathBuf>,
    },
    /// JSON documents served over HTTP(S).
    Http {
        mesh_url: Url,
        hosts_url: Option<Url>,
        credentials: Option<Credentials>,
        timeout: Duration,
        /// Skip certificate verification (self-signed router certificates).
        accept_invalid_certs: bool,
    },
}

/// What to do with each raw snapshot for troubleshooting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DebugMode {
    #[default]
    Off,
    /// Log the raw document at debug level.
    Log,
    /// Write the raw document, pretty-printed, to the dump path.
    File,
    LogAndFile,
}

impl DebugMode {
    pub fn logs(self) -> bool {
        matches!(self, Self::Log | Self::LogAndFile)
    }

    pub fn dumps(self) -> bool {
        matches!(self, Self::File | Self::LogAndFile)
    }
}

/// Configuration for one mesh source and its polling behaviour.
#[derive(Debug, Clone)]
pub struct MeshConfig {
    pub source: SourceConfig,
    /// Fetch the host list and enrich clients after reconstruction.
    pub enrich: bool,
    pub poll_interval: Duration,
    pub debug_mode: DebugMode,
    /// Target of raw snapshot dumps when `debug_mode` writes files.
    pub debug_dump_path: Option<PathBuf>,
}

impl MeshConfig {
    pub fn new(source: SourceConfig) -> Self {
        Self {
            source,
            enrich: true,
            poll_interval: DEFAULT_POLL_INTERVAL,
            debug_mode: DebugMode::Off,
            debug_dump_path: None,
        }
    }
}
