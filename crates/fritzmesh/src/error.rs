//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use fritzmesh_config::ConfigError;
use fritzmesh_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Source ───────────────────────────────────────────────────────
    #[error("Could not reach mesh source at {url}")]
    #[diagnostic(
        code(fritzmesh::connection_failed),
        help(
            "Check that the router is reachable and the URL is correct.\n\
             Reason: {reason}\n\
             Self-signed certificate? Try: fritzmesh topology --insecure"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Mesh source timed out")]
    #[diagnostic(
        code(fritzmesh::timeout),
        help("Increase timeout with --timeout or check router responsiveness.")
    )]
    Timeout,

    #[error("Mesh source rejected the request (HTTP {status})")]
    #[diagnostic(code(fritzmesh::source_rejected), help("{message}"))]
    SourceRejected { status: u16, message: String },

    #[error("Cannot read {path}")]
    #[diagnostic(code(fritzmesh::source_io), help("{reason}"))]
    SourceIo { path: String, reason: String },

    #[error("Invalid mesh document: {message}")]
    #[diagnostic(
        code(fritzmesh::invalid_input),
        help("The snapshot must be a JSON object with a `nodes` array.")
    )]
    InvalidInput { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(fritzmesh::not_found),
        help("Run: fritzmesh {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fritzmesh::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(fritzmesh::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: fritzmesh config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No mesh source configured")]
    #[diagnostic(
        code(fritzmesh::no_config),
        help(
            "Pass --mesh-file or --mesh-url, or create a profile with: fritzmesh config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(fritzmesh::no_credentials),
        help(
            "Store a password with: fritzmesh config set-password --profile {profile}\n\
             Or set FRITZMESH_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(fritzmesh::config))]
    Config { message: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Cannot serialize output: {0}")]
    #[diagnostic(code(fritzmesh::json))]
    Json(#[from] serde_json::Error),

    #[error("Cannot serialize output: {0}")]
    #[diagnostic(code(fritzmesh::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::Timeout => CliError::Timeout,
            CoreError::SourceRejected { status, message } => {
                CliError::SourceRejected { status, message }
            }
            CoreError::Io { path, reason } => CliError::SourceIo { path, reason },
            CoreError::InvalidInput { message } => CliError::InvalidInput { message },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{entity_type}s list"),
                resource_type: entity_type.into(),
                identifier,
            },
            CoreError::Config { message } | CoreError::Internal(message) => {
                CliError::Config { message }
            }
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
