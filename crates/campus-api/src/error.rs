use std::collections::BTreeMap;

use thiserror::Error;

/// Top-level error type for the `campus-api` crate.
///
/// Covers every failure mode of the REST surface: authentication,
/// transport, backend-reported errors, and payload decoding.
/// `campus-core` maps these into user-facing messages.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (wrong credentials, disabled account, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The bearer token could not be encoded as a header value.
    #[error("Invalid bearer token")]
    InvalidToken,

    /// The backend rejected the stored token (HTTP 401).
    #[error("Session expired -- log in again")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or handshake error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Error response carrying the backend's `message` field.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP 422 with per-field validation messages.
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        errors: BTreeMap<String, Vec<String>>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if logging in again might resolve this error.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::SessionExpired)
    }

    /// Returns `true` if no response was received from the backend.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// The backend-provided `message`, if this error carries one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Authentication { message }
            | Self::Api { message, .. }
            | Self::Validation { message, .. } => Some(message),
            _ => None,
        }
    }

    /// HTTP status of a backend error response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Validation { .. } => Some(422),
            Self::SessionExpired => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_only_for_server_errors() {
        let err = Error::Api {
            status: 409,
            message: "Grade already exists".into(),
        };
        assert_eq!(err.backend_message(), Some("Grade already exists"));
        assert_eq!(err.status(), Some(409));

        assert_eq!(Error::SessionExpired.backend_message(), None);
        assert!(Error::SessionExpired.is_auth_expired());
    }

    #[test]
    fn timeout_is_transient() {
        assert!(Error::Timeout { timeout_secs: 30 }.is_transient());
        assert!(
            !Error::Api {
                status: 500,
                message: String::new()
            }
            .is_transient()
        );
    }

    #[test]
    fn not_found_from_status() {
        let err = Error::Api {
            status: 404,
            message: "No query results".into(),
        };
        assert!(err.is_not_found());
    }
}
