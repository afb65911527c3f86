//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use campus_config::ConfigError;
use campus_core::CoreError;

pub mod exit_code {
    #[allow(dead_code)]
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Cannot reach the server at {url}")]
    #[diagnostic(
        code(campus::connection_failed),
        help(
            "Check that the backend is running and the API URL is right.\n\
             Try: campus --api-url http://localhost:8000/api whoami"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(campus::timeout),
        help("Increase the timeout with --timeout or check the backend.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Not logged in")]
    #[diagnostic(code(campus::not_logged_in), help("Run: campus login"))]
    NotLoggedIn,

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(campus::auth_failed),
        help("Check your email and password, then run: campus login")
    )]
    AuthFailed { message: String },

    #[error("{message}")]
    #[diagnostic(code(campus::forbidden), help("Log in with an account that has access."))]
    Forbidden { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(campus::not_found),
        help("Run: campus {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(code(campus::conflict))]
    Conflict { message: String },

    // ── Backend ──────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(campus::api_error))]
    Api { status: Option<u16>, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(campus::validation))]
    Validation { field: String, reason: String },

    #[error("{message}")]
    #[diagnostic(code(campus::invalid_input))]
    InvalidInput { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(campus::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: campus config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(campus::no_config),
        help(
            "Create one with: campus config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(campus::config))]
    Config(String),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(campus::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(campus::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout => exit_code::CONNECTION,
            Self::NotLoggedIn | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::InvalidInput { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        // Action headlines stay in the message; the root picks the exit code.
        let message = err.user_message();
        match err.root() {
            CoreError::Unreachable { url, reason } => CliError::ConnectionFailed {
                url: url.clone(),
                reason: reason.clone(),
            },
            CoreError::Timeout { .. } => CliError::Timeout,
            CoreError::NotAuthenticated | CoreError::SessionExpired => CliError::NotLoggedIn,
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                message: message.clone(),
            },
            CoreError::Forbidden { .. } => CliError::Forbidden { message },
            CoreError::Rejected { status: 403, .. } => CliError::Forbidden { message },
            CoreError::Rejected { status: 409, .. } => CliError::Conflict { message },
            CoreError::Rejected { status, .. } => CliError::Api {
                status: Some(*status),
                message,
            },
            CoreError::NotFound { message: what } => CliError::NotFound {
                resource_type: "resource".into(),
                identifier: what.clone(),
                list_command: "--help".into(),
            },
            CoreError::Validation { .. } => CliError::Api {
                status: Some(422),
                message,
            },
            CoreError::InvalidInput { .. } | CoreError::ModalAlreadyOpen => {
                CliError::InvalidInput { message }
            }
            CoreError::Config { message } => CliError::Config(message.clone()),
            CoreError::ActionFailed { .. } | CoreError::Internal(_) => {
                CliError::Api {
                    status: None,
                    message,
                }
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => CliError::NoConfig { path },
            ConfigError::ProfileNotFound { name, available } => {
                CliError::ProfileNotFound { name, available }
            }
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn action_headline_survives_mapping() {
        let core = CoreError::Rejected {
            status: 409,
            message: "Grade exists".into(),
        }
        .in_action("Failed to add grade");
        let cli = CliError::from(core);
        assert_eq!(cli.to_string(), "Failed to add grade: Grade exists");
        assert_eq!(cli.exit_code(), exit_code::CONFLICT);
    }

    #[test]
    fn session_errors_exit_with_auth_code() {
        assert_eq!(
            CliError::from(CoreError::SessionExpired).exit_code(),
            exit_code::AUTH
        );
        assert_eq!(
            CliError::from(CoreError::invalid("Email and password are required")).exit_code(),
            exit_code::USAGE
        );
    }
}
