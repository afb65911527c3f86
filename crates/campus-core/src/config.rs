// ── Runtime connection configuration ──
//
// Describes *how* to reach a campus backend: URL, optional stored token,
// TLS trust and timeout. The CLI/TUI builds a `ClientConfig` from the
// config file and flags; core never reads config files itself.

use std::time::Duration;

use campus_api::transport::TlsMode;
use campus_api::{CampusClient, TransportConfig};
use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Extra CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (local development servers).
    DangerAcceptInvalid,
}

/// Configuration for one backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:8000/api`.
    pub api_url: Url,
    /// Bearer token from a previous login, if any.
    pub token: Option<SecretString>,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_token(mut self, token: Option<SecretString>) -> Self {
        self.token = token;
        self
    }

    pub(crate) fn build_client(&self) -> Result<CampusClient, CoreError> {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        let transport = TransportConfig {
            tls,
            timeout: self.timeout,
        };

        let client = CampusClient::new(self.api_url.as_str(), &transport)?;
        if let Some(token) = &self.token {
            client.set_token(Some(token.clone()));
        }
        Ok(client)
    }
}
