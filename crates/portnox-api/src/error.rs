use serde::Deserialize;
use thiserror::Error;

/// Remote error code meaning "account not found".
pub const ACCOUNT_NOT_FOUND_CODE: i64 = 5357;

/// Top-level error type for the `portnox-api` crate.
///
/// Covers every failure mode of a single call or a retried call:
/// client construction, transport, HTTP status, and response decoding.
/// `portnox-core` maps these into domain diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Client construction ─────────────────────────────────────────
    /// The API key cannot be carried in an HTTP header.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot have path segments appended (e.g. `mailto:`).
    #[error("Base URL cannot be used as an API root: {0}")]
    InvalidBaseUrl(String),

    /// The underlying `reqwest::Client` could not be built.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    // ── HTTP status ─────────────────────────────────────────────────
    /// HTTP 429. The only failure the retry controller retries.
    #[error("API request failed with status: 429 Too Many Requests")]
    RateLimited { body: String },

    /// Any other status >= 400. `body` is kept so callers can inspect
    /// the `{InternalErrorCode, InternalError}` convention.
    #[error("API request failed with status: {status} {reason}")]
    RequestFailed {
        status: u16,
        reason: String,
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// Request payload could not be encoded.
    #[error("Failed to encode request payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Decode { message: String, body: String },
}

/// Structured error body the Portnox API attaches to 4xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteError {
    #[serde(rename = "InternalErrorCode")]
    pub code: i64,
    #[serde(rename = "InternalError", default)]
    pub message: Option<String>,
}

impl Error {
    /// Returns `true` for HTTP 429 responses.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Returns `true` if this is a transient transport error.
    ///
    /// Not consulted by the retry controller, which only retries 429s.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimited { .. } => true,
            _ => false,
        }
    }

    /// HTTP status code, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::RequestFailed { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Parse the `{InternalErrorCode, InternalError}` body, if present.
    pub fn remote_error(&self) -> Option<RemoteError> {
        match self {
            Self::RequestFailed { body, .. } | Self::RateLimited { body } => {
                serde_json::from_str(body).ok()
            }
            _ => None,
        }
    }

    /// Returns `true` for HTTP 404 or the remote "account not found" code.
    pub fn is_not_found(&self) -> bool {
        if self.status() == Some(404) {
            return true;
        }
        self.remote_error()
            .is_some_and(|e| e.code == ACCOUNT_NOT_FOUND_CODE)
    }
}
