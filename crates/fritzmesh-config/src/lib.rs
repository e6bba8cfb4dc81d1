//! Shared configuration for the fritzmesh CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `fritzmesh_core::MeshConfig`. The CLI adds
//! flag-aware wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use fritzmesh_core::{Credentials, DebugMode, MeshConfig, SourceConfig};

/// Keyring service name under which profile passwords are stored.
pub const KEYRING_SERVICE: &str = "fritzmesh";

/// Environment variable consulted for the password after `password_env`.
pub const PASSWORD_ENV: &str = "FRITZMESH_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named mesh source profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between refreshes in watch mode.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    fritzmesh_core::DEFAULT_TIMEOUT.as_secs()
}
fn default_poll_interval() -> u64 {
    fritzmesh_core::DEFAULT_POLL_INTERVAL.as_secs()
}

/// Where a profile reads its snapshots from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Http,
}

/// A named mesh source profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// "file" or "http". Inferred from which of `mesh_file`/`mesh_url` is set.
    pub source: Option<SourceKind>,

    /// Path to a captured mesh snapshot (file source).
    pub mesh_file: Option<PathBuf>,

    /// Path to a captured host list (file source).
    pub hosts_file: Option<PathBuf>,

    /// Mesh snapshot endpoint (http source).
    pub mesh_url: Option<String>,

    /// Host list endpoint (http source).
    pub hosts_url: Option<String>,

    /// Username for basic auth.
    pub username: Option<String>,

    /// Password in plaintext. Keyring or env var is preferred.
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Accept self-signed certificates.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override poll interval (seconds).
    pub poll_interval: Option<u64>,

    /// "off", "log", "file", or "log_and_file".
    pub debug_mode: Option<String>,

    /// Where raw snapshots are written when `debug_mode` writes files.
    pub debug_dump_path: Option<PathBuf>,
}

impl Profile {
    /// Explicit `source`, or inferred: a URL means http, anything else file.
    pub fn source_kind(&self) -> SourceKind {
        self.source.unwrap_or(if self.mesh_url.is_some() {
            SourceKind::Http
        } else {
            SourceKind::File
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "fritzmesh", "fritzmesh").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("fritzmesh");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + `FRITZMESH_*` environment.
///
/// Nested keys use a double underscore: `FRITZMESH_DEFAULTS__OUTPUT=json`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FRITZMESH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write it to `path`, creating parent dirs.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Keyring entry name for a profile's password.
pub fn keyring_key(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

/// Resolve the source password from the credential chain.
///
/// Order: the profile's `password_env` variable, `FRITZMESH_PASSWORD`, the
/// system keyring, plaintext in config. `None` when nothing is configured.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. Global env var
    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Some(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_key(profile_name)) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    profile.password.clone().map(SecretString::from)
}

/// Resolve basic-auth credentials, if the profile names a user.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Option<Credentials>, ConfigError> {
    let Some(username) = profile.username.clone() else {
        return Ok(None);
    };
    let password = resolve_password(profile, profile_name).ok_or_else(|| {
        ConfigError::NoCredentials {
            profile: profile_name.into(),
        }
    })?;
    Ok(Some(Credentials { username, password }))
}

fn parse_url(field: &str, raw: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })
}

/// Build a `MeshConfig` from a profile, without CLI flag overrides.
pub fn profile_to_mesh_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<MeshConfig, ConfigError> {
    let source = match profile.source_kind() {
        SourceKind::File => {
            let mesh_path = profile
                .mesh_file
                .clone()
                .ok_or_else(|| ConfigError::Validation {
                    field: "mesh_file".into(),
                    reason: format!("profile '{profile_name}' uses a file source but sets no mesh_file"),
                })?;
            SourceConfig::File {
                mesh_path,
                hosts_path: profile.hosts_file.clone(),
            }
        }
        SourceKind::Http => {
            let raw = profile
                .mesh_url
                .as_deref()
                .ok_or_else(|| ConfigError::Validation {
                    field: "mesh_url".into(),
                    reason: format!("profile '{profile_name}' uses an http source but sets no mesh_url"),
                })?;
            let hosts_url = profile
                .hosts_url
                .as_deref()
                .map(|u| parse_url("hosts_url", u))
                .transpose()?;
            SourceConfig::Http {
                mesh_url: parse_url("mesh_url", raw)?,
                hosts_url,
                credentials: resolve_credentials(profile, profile_name)?,
                timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
                accept_invalid_certs: profile.insecure.unwrap_or(false),
            }
        }
    };

    let debug_mode = match profile.debug_mode.as_deref() {
        None => DebugMode::Off,
        Some(raw) => raw.parse().map_err(|_| ConfigError::Validation {
            field: "debug_mode".into(),
            reason: format!("expected 'off', 'log', 'file', or 'log_and_file', got '{raw}'"),
        })?,
    };

    let mut config = MeshConfig::new(source);
    config.poll_interval =
        Duration::from_secs(profile.poll_interval.unwrap_or(defaults.poll_interval));
    config.debug_mode = debug_mode;
    config.debug_dump_path.clone_from(&profile.debug_dump_path);
    Ok(config)
}
