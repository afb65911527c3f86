//! CLI configuration: thin wrapper around `campus_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--api-url, --token, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use campus_core::{ClientConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use campus_config::{
    Config, Profile, clear_token, config_path, load_config_or_default, save_config, store_token,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Translate the active profile + global flags into a `ClientConfig`.
///
/// Flag values win over profile values. A missing profile is fine as long
/// as nothing but defaults is needed; an explicitly named one must exist.
pub fn resolve_client_config(
    global: &GlobalOpts,
    config: &Config,
    profile_name: &str,
) -> Result<ClientConfig, CliError> {
    let fallback = Profile::default();
    let profile = match config.profiles.get(profile_name) {
        Some(profile) => profile,
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name.into(),
                available: config.profile_names(),
            });
        }
        None => &fallback,
    };

    // 1. URL (flag > env > profile)
    let url_str = global.api_url.as_deref().unwrap_or(&profile.api_url);
    let url = campus_config::parse_api_url(url_str)?;

    // 2. Token (flag > profile chain)
    let token = global
        .token
        .clone()
        .map(SecretString::from)
        .or_else(|| campus_config::resolve_token(profile, profile_name));

    // 3. TLS
    let tls = if global.insecure || profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut client = ClientConfig::new(url).with_token(token);
    client.tls = tls;
    client.timeout = Duration::from_secs(global.timeout);
    Ok(client)
}
