//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use showroom_config::ConfigError;
use showroom_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the backend at {url}")]
    #[diagnostic(
        code(showroom::connection_failed),
        help(
            "Check that the backend is reachable.\n\
             Reason: {reason}\n\
             Self-signed staging server? Try --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Session ──────────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(showroom::auth_failed),
        help(
            "Verify your email and password.\n\
             Store a new password with: showroom config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("Not logged in for profile '{profile}'")]
    #[diagnostic(code(showroom::not_logged_in), help("Run: showroom auth login"))]
    NotLoggedIn { profile: String },

    #[error("Session for profile '{profile}' has expired")]
    #[diagnostic(code(showroom::session_expired), help("Run: showroom auth login"))]
    SessionExpired { profile: String },

    #[error("Account {email} is not verified yet")]
    #[diagnostic(
        code(showroom::unverified),
        help("Follow the verification link sent to {email}, then log in again.")
    )]
    Unverified { email: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(showroom::no_credentials),
        help(
            "Configure credentials with: showroom config init\n\
             Or set SHOWROOM_EMAIL and SHOWROOM_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(showroom::not_found),
        help("Run: showroom {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(
        code(showroom::contact_conflict),
        help(
            "Contacts still referenced as buyers: {buyers}\n\
             Vehicles sold to them: {vehicles}\n\
             Reassign or delete those vehicles first."
        )
    )]
    Conflict {
        message: String,
        buyers: String,
        vehicles: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({status}): {message}")]
    #[diagnostic(code(showroom::api_error))]
    ApiError { status: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(showroom::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(showroom::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: showroom config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(showroom::no_config),
        help(
            "Create one with: showroom config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(showroom::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(showroom::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out")]
    #[diagnostic(
        code(showroom::timeout),
        help("Increase timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(showroom::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("YAML rendering failed: {0}")]
    #[diagnostic(code(showroom::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(showroom::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. }
            | Self::NotLoggedIn { .. }
            | Self::SessionExpired { .. }
            | Self::Unverified { .. }
            | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: "current".into(),
                message,
            },

            CoreError::SessionExpired => CliError::SessionExpired {
                profile: "current".into(),
            },

            CoreError::NotAuthenticated => CliError::NotLoggedIn {
                profile: "current".into(),
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::InvariantViolation { message } => CliError::Validation {
                field: "filter".into(),
                reason: message,
            },

            CoreError::ContactConflict(conflict) => CliError::Conflict {
                buyers: list_or_dash(&conflict.associated_buyer_ids),
                vehicles: list_or_dash(&conflict.associated_vehicle_ids),
                message: conflict.message,
            },

            CoreError::Api { message, status } => CliError::ApiError {
                status: status.map_or_else(|| "-".into(), |s| s.to_string()),
                message: message.unwrap_or_else(|| "no message".into()),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Cancelled => CliError::Internal("request was cancelled".into()),

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => CliError::Config(Box::new(other)),
        }
    }
}

fn list_or_dash(ids: &[String]) -> String {
    if ids.is_empty() {
        "-".into()
    } else {
        ids.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showroom_core::ContactConflict;

    #[test]
    fn conflict_keeps_identities() {
        let err = CliError::from(CoreError::ContactConflict(ContactConflict {
            message: "Contact is a buyer".into(),
            associated_buyer_ids: vec!["c1".into()],
            associated_vehicle_ids: vec!["v1".into(), "v2".into()],
        }));
        assert_eq!(err.exit_code(), exit_code::CONFLICT);
        let CliError::Conflict { vehicles, .. } = err else {
            panic!("expected a conflict");
        };
        assert_eq!(vehicles, "v1, v2");
    }

    #[test]
    fn session_errors_exit_with_auth_code() {
        assert_eq!(
            CliError::from(CoreError::SessionExpired).exit_code(),
            exit_code::AUTH
        );
        assert_eq!(
            CliError::from(CoreError::ValidationFailed {
                message: "name is required".into()
            })
            .exit_code(),
            exit_code::USAGE
        );
    }
}
