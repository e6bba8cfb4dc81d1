// ── Core error types ──
//
// User-facing errors from fritzmesh-core. Consumers never see HTTP status
// codes or JSON parse failures directly; the `From<fritzmesh_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Source errors ────────────────────────────────────────────────
    #[error("Cannot reach mesh source at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Mesh source timed out")]
    Timeout,

    #[error("Mesh source rejected the request (HTTP {status}): {message}")]
    SourceRejected { status: u16, message: String },

    #[error("Cannot read {path}: {reason}")]
    Io { path: String, reason: String },

    // ── Data errors ──────────────────────────────────────────────────
    /// The input document violates the top-level type contract.
    #[error("Invalid mesh document: {message}")]
    InvalidInput { message: String },

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the next poll might succeed without intervention.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout => true,
            Self::SourceRejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fritzmesh_api::Error> for CoreError {
    fn from(err: fritzmesh_api::Error) -> Self {
        match err {
            fritzmesh_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                }
            }
            fritzmesh_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            fritzmesh_api::Error::Status {
                status,
                url,
                preview,
            } => CoreError::SourceRejected {
                status,
                message: format!("{url}: {preview}"),
            },
            fritzmesh_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            fritzmesh_api::Error::Io { path, source } => CoreError::Io {
                path,
                reason: source.to_string(),
            },
            fritzmesh_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidInput { message }
            }
            err @ fritzmesh_api::Error::Shape { .. } => CoreError::InvalidInput {
                message: err.to_string(),
            },
        }
    }
}
