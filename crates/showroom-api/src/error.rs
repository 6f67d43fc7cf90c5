use thiserror::Error;

use crate::models::ContactConflict;

/// Top-level error type for the `showroom-api` crate.
///
/// Covers every failure mode of the backend REST surface: authentication,
/// cancellation, transport, structured conflicts, and decoding.
/// `showroom-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The backend answered 401: the session cookie is missing or expired.
    #[error("Session expired or not authenticated")]
    Unauthorized,

    // ── Cancellation ────────────────────────────────────────────────
    /// The request's cancellation token fired before a response arrived.
    #[error("Request cancelled")]
    Cancelled,

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-success response, carrying the server's `{ message }` if present.
    #[error("Backend error (HTTP {status}): {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// Delete rejected because contacts are still referenced by vehicles.
    #[error("Contact conflict: {}", .0.message)]
    Conflict(ContactConflict),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the request was abandoned through its token.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns `true` if the backend rejected the session.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Unauthorized => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::UNAUTHORIZED),
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The message the server attached to the failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            Self::Conflict(conflict) => Some(&conflict.message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_from_api_error() {
        let err = Error::Api {
            status: 400,
            message: Some("Mobile already registered".into()),
        };
        assert_eq!(err.server_message(), Some("Mobile already registered"));
        assert!(!err.is_transient());
    }

    #[test]
    fn server_errors_are_transient() {
        let err = Error::Api {
            status: 503,
            message: None,
        };
        assert!(err.is_transient());
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn cancelled_is_not_unauthorized() {
        assert!(Error::Cancelled.is_cancelled());
        assert!(!Error::Cancelled.is_unauthorized());
        assert!(Error::Unauthorized.is_unauthorized());
    }
}
