// ── Core error types ──
//
// User-facing errors from showroom-core. Consumers never see HTTP status
// codes or JSON parse failures directly: the `From<showroom_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

use crate::model::ContactConflict;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session ──────────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Session expired -- log in again")]
    SessionExpired,

    #[error("Not logged in")]
    NotAuthenticated,

    // ── Flow control ─────────────────────────────────────────────────
    /// A superseded request. Never surfaced to the user.
    #[error("Request cancelled")]
    Cancelled,

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// Malformed intent input: a programming defect in the caller.
    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    // ── Backend errors ───────────────────────────────────────────────
    #[error("{}", .0.message)]
    ContactConflict(ContactConflict),

    #[error("API error: {}", message.as_deref().unwrap_or("no message"))]
    Api {
        /// Message the server attached, if any.
        message: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out")]
    Timeout,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Message shown to the user in an alert.
    ///
    /// Server-provided text wins; otherwise the generic fallback.
    pub fn alert_message(&self) -> String {
        match self {
            Self::Api {
                message: Some(message),
                ..
            } => message.clone(),
            Self::ContactConflict(conflict) => conflict.message.clone(),
            Self::ValidationFailed { message } | Self::AuthenticationFailed { message } => {
                message.clone()
            }
            _ => crate::model::FALLBACK_ALERT_MESSAGE.to_owned(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<showroom_api::Error> for CoreError {
    fn from(err: showroom_api::Error) -> Self {
        match err {
            showroom_api::Error::Unauthorized => CoreError::SessionExpired,
            showroom_api::Error::Cancelled => CoreError::Cancelled,
            showroom_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            showroom_api::Error::Conflict(conflict) => CoreError::ContactConflict(conflict),
            showroom_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else if e.status().map(|s| s.as_u16()) == Some(401) {
                    CoreError::SessionExpired
                } else {
                    CoreError::Api {
                        message: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            showroom_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            showroom_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            showroom_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
