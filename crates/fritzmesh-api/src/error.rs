use thiserror::Error;

/// Top-level error type for the `fritzmesh-api` crate.
///
/// Covers every way a fetch source can fail: transport, local I/O, and
/// documents whose top-level shape is not what the feed contract promises.
/// Field-level irregularities are never errors; they deserialize to defaults.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The endpoint answered with a non-success status.
    #[error("HTTP {status} from {url}: {preview}")]
    Status {
        status: u16,
        url: String,
        preview: String,
    },

    /// TLS setup error while building the HTTP client.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Local files ─────────────────────────────────────────────────
    /// Reading a snapshot or host-list file failed.
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON parsing failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The document parsed, but its top level has the wrong JSON type.
    #[error("Expected a JSON {expected} at the top level, got {found}")]
    Shape {
        expected: &'static str,
        found: &'static str,
    },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on the next poll.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Build a [`Error::Deserialization`] carrying a short preview of the body.
    pub(crate) fn deserialization(err: &serde_json::Error, body: &str) -> Self {
        let preview: String = body.chars().take(200).collect();
        Self::Deserialization {
            message: format!("{err} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    }
}

/// Human-readable name of a JSON value's type, for shape errors.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
