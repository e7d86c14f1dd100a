// ── Core error types ──
//
// Domain errors surfaced by resource operations. Callers see validation
// failures, missing accounts, and rejected API calls; the transport
// detail stays attached as text. `From<portnox_api::Error>` does the mapping.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    /// Declared configuration rejected before any network call.
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// Provider configuration is unusable (empty key, bad base URL).
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    /// Remote reported the account as absent (HTTP 404 or code 5357).
    #[error("Account not found: {name}")]
    AccountNotFound { name: String },

    /// A search returned no account for the requested name.
    #[error("No account found with name {name}")]
    NoAccountInSearch { name: String },

    /// The account response lacked an `AgentlessOptions` block.
    #[error("AgentlessOptions not found in response for account {name}")]
    MissingAgentlessOptions { name: String },

    /// An import filter named addresses that the account does not hold.
    #[error("None of the specified MAC addresses were found in account {name}")]
    ImportFilterUnmatched { name: String },

    // ── Remote errors ────────────────────────────────────────────────
    #[error("Cannot reach Portnox API: {reason}")]
    ConnectionFailed { reason: String },

    /// Still rate limited after every allowed attempt.
    #[error("Rate limited by Portnox API after exhausting retries")]
    RateLimited,

    #[error("API error: {message}")]
    Api {
        message: String,
        /// `InternalErrorCode` from the response body, when present.
        code: Option<i64>,
        status: Option<u16>,
    },

    /// The API answered with a body that is not the expected JSON shape.
    #[error("Malformed API response: {message}")]
    Decode { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<portnox_api::Error> for CoreError {
    fn from(err: portnox_api::Error) -> Self {
        use portnox_api::Error as ApiError;

        let code = err.remote_error().map(|remote| remote.code);
        match err {
            ApiError::Authentication { message } => CoreError::Config { message },
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("Base URL cannot be used as an API root: {url}"),
            },
            ApiError::ClientBuild(reason) => CoreError::Config {
                message: format!("Failed to build HTTP client: {reason}"),
            },
            ApiError::Transport(e) => CoreError::ConnectionFailed {
                reason: e.to_string(),
            },
            ApiError::RateLimited { .. } => CoreError::RateLimited,
            ApiError::RequestFailed { status, reason, .. } => CoreError::Api {
                message: format!("API request failed with status: {status} {reason}"),
                code,
                status: Some(status),
            },
            ApiError::Encode(e) => CoreError::Internal(format!("Failed to encode payload: {e}")),
            ApiError::Decode { message, body: _ } => CoreError::Decode { message },
        }
    }
}
