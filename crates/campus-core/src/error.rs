// ── Core error types ──
//
// User-facing errors from campus-core. Consumers never see reqwest or
// serde failures directly; the `From<campus_api::Error>` impl folds
// transport-layer errors into the three outcomes a user can act on:
// the server is unreachable, the server said no (with its message),
// or something unexpected happened.

use std::collections::BTreeMap;

use thiserror::Error;

/// Fallback text when nothing more specific is known.
pub const FALLBACK_MESSAGE: &str = "Something went wrong";

/// Shown when no response was received at all.
pub const UNREACHABLE_MESSAGE: &str = "Cannot reach the server";

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the server at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Session expired -- log in again")]
    SessionExpired,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Access denied: {view} requires one of {required}")]
    Forbidden { view: String, required: String },

    // ── Backend errors ───────────────────────────────────────────────
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Rejected by server (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    // ── Local errors ─────────────────────────────────────────────────
    /// Input rejected before any request was sent.
    #[error("{message}")]
    InvalidInput { message: String },

    #[error("Another dialog is already open")]
    ModalAlreadyOpen,

    /// A user action failed; `action` is the headline shown to the user.
    #[error("{action}: {source}")]
    ActionFailed {
        action: &'static str,
        #[source]
        source: Box<CoreError>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Wrap `self` under a user-facing action headline.
    pub fn in_action(self, action: &'static str) -> Self {
        Self::ActionFailed {
            action,
            source: Box::new(self),
        }
    }

    /// Text to show the user.
    ///
    /// No response yields [`UNREACHABLE_MESSAGE`], a server-provided
    /// message is shown verbatim, anything else falls back to
    /// [`FALLBACK_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            Self::Unreachable { .. } | Self::Timeout { .. } => UNREACHABLE_MESSAGE.into(),
            Self::AuthenticationFailed { message }
            | Self::NotFound { message }
            | Self::Rejected { message, .. }
            | Self::Validation { message, .. }
            | Self::InvalidInput { message }
            | Self::Config { message } => non_empty_or_fallback(message),
            Self::SessionExpired => "Your session has expired. Please log in again.".into(),
            Self::NotAuthenticated => "You are not logged in".into(),
            Self::Forbidden { view, .. } => format!("You do not have access to {view}"),
            Self::ModalAlreadyOpen => "Close the open dialog first".into(),
            Self::ActionFailed { action, source } => {
                format!("{action}: {}", source.user_message())
            }
            Self::Internal(_) => FALLBACK_MESSAGE.into(),
        }
    }

    /// `true` when no response was received from the backend.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Unreachable { .. } | Self::Timeout { .. } => true,
            Self::ActionFailed { source, .. } => source.is_unreachable(),
            _ => false,
        }
    }

    /// `true` when logging in again may fix the failure.
    pub fn needs_login(&self) -> bool {
        match self {
            Self::SessionExpired | Self::NotAuthenticated => true,
            Self::ActionFailed { source, .. } => source.needs_login(),
            _ => false,
        }
    }

    /// The innermost error beneath any action headlines.
    pub fn root(&self) -> &CoreError {
        match self {
            Self::ActionFailed { source, .. } => source.root(),
            other => other,
        }
    }
}

fn non_empty_or_fallback(message: &str) -> String {
    if message.trim().is_empty() {
        FALLBACK_MESSAGE.into()
    } else {
        message.to_owned()
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<campus_api::Error> for CoreError {
    fn from(err: campus_api::Error) -> Self {
        match err {
            campus_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            campus_api::Error::InvalidToken => CoreError::AuthenticationFailed {
                message: "Stored token is not a valid header value".into(),
            },
            campus_api::Error::SessionExpired => CoreError::SessionExpired,
            campus_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() || e.is_request() {
                    CoreError::Unreachable {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else if e.status().map(|s| s.as_u16()) == Some(404) {
                    CoreError::NotFound {
                        message: e.url().map(|u| u.path().to_string()).unwrap_or_default(),
                    }
                } else {
                    CoreError::Internal(e.to_string())
                }
            }
            campus_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            campus_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            campus_api::Error::Tls(msg) => CoreError::Unreachable {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            campus_api::Error::Api {
                status: 404,
                message,
            } => CoreError::NotFound { message },
            campus_api::Error::Api { status, message } => CoreError::Rejected { status, message },
            campus_api::Error::Validation { message, errors } => CoreError::Validation {
                message,
                fields: errors,
            },
            campus_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn backend_message_is_shown_verbatim() {
        let err = CoreError::from(campus_api::Error::Api {
            status: 409,
            message: "Grade already exists".into(),
        });
        assert_eq!(err.user_message(), "Grade already exists");
    }

    #[test]
    fn timeouts_read_as_unreachable() {
        let err = CoreError::from(campus_api::Error::Timeout { timeout_secs: 30 });
        assert!(err.is_unreachable());
        assert_eq!(err.user_message(), UNREACHABLE_MESSAGE);
    }

    #[test]
    fn unknown_failures_fall_back() {
        let err = CoreError::from(campus_api::Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        });
        assert_eq!(err.user_message(), FALLBACK_MESSAGE);

        let blank = CoreError::Rejected {
            status: 500,
            message: "  ".into(),
        };
        assert_eq!(blank.user_message(), FALLBACK_MESSAGE);
    }

    #[test]
    fn action_headline_wraps_detail() {
        let err = CoreError::from(campus_api::Error::Validation {
            message: "The name has already been taken.".into(),
            errors: BTreeMap::new(),
        })
        .in_action("Failed to add grade");
        assert_eq!(
            err.user_message(),
            "Failed to add grade: The name has already been taken."
        );
        assert!(matches!(err.root(), CoreError::Validation { .. }));
    }

    #[test]
    fn not_found_status_maps_to_not_found() {
        let err = CoreError::from(campus_api::Error::Api {
            status: 404,
            message: "No query results for model".into(),
        });
        assert!(matches!(err, CoreError::NotFound { .. }));
    }
}
