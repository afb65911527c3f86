//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::SecretString;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking the token.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "api_url = \"{}\"", p.api_url);
        if let Some(ref email) = p.email {
            let _ = writeln!(out, "email = \"{email}\"");
        }
        if p.token.is_some() {
            let _ = writeln!(out, "token = \"****\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

/// Same shape as the file, with the plaintext token masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some("****".into());
        }
    }
    cfg
}

fn profile_missing(cfg: &Config, name: &str) -> CliError {
    CliError::ProfileNotFound {
        name: name.into(),
        available: cfg.profile_names(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let path = config::config_path()?;
            eprintln!("Campus CLI configuration");
            eprintln!("   Config path: {}\n", path.display());

            let mut cfg = config::load_config_or_default();

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default(config::active_profile_name(global, &cfg))
                .interact_text()
                .map_err(prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("API URL")
                .default(campus_config::DEFAULT_API_URL.into())
                .validate_with(|raw: &String| {
                    campus_config::parse_api_url(raw)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let email: String = Input::new()
                .with_prompt("Email (optional)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            profile.api_url = api_url;
            profile.email = Some(email.trim().to_owned()).filter(|e| !e.is_empty());

            let make_default = cfg.profiles.len() == 1
                || Select::new()
                    .with_prompt(format!("Make '{profile_name}' the default profile?"))
                    .items(&["Yes", "No"])
                    .default(0)
                    .interact()
                    .map_err(prompt_err)?
                    == 0;
            if make_default {
                cfg.default_profile = Some(profile_name.clone());
            }

            let written = config::save_config(&cfg)?;
            eprintln!("\n✓ Configuration written to {}", written.display());
            eprintln!("  Profile: {profile_name}");
            eprintln!("\n  Next: campus --profile {profile_name} login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(global.output, &cfg, format_config_redacted, |_| {
                "config".into()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            let path = config::config_path()?;
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let active = config::active_profile_name(global, &cfg);
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: campus config init");
            } else {
                for (name, profile) in &cfg.profiles {
                    let marker = if *name == active { " *" } else { "" };
                    println!("{name}{marker}\t{}", profile.api_url);
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_missing(&cfg, &name));
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(profile_missing(&cfg, &profile_name));
            }

            let token = rpassword::prompt_password("Token: ").map_err(prompt_err)?;
            if token.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "token cannot be empty".into(),
                });
            }
            config::store_token(&profile_name, &SecretString::from(token.trim().to_owned()))?;
            eprintln!("✓ Token stored in system keyring for '{profile_name}'");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Profile;

    use super::*;

    fn sample() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "school".into(),
            Profile {
                api_url: "https://school.test/api".into(),
                email: Some("admin@school.test".into()),
                token: Some("secret-token".into()),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn show_masks_token() {
        let text = format_config_redacted(&sample());
        assert!(text.contains("[profiles.school]"));
        assert!(text.contains("token = \"****\""));
        assert!(!text.contains("secret-token"));
    }

    #[test]
    fn structured_output_masks_token_too() {
        let cfg = redacted(&sample());
        assert_eq!(cfg.profiles["school"].token.as_deref(), Some("****"));
        assert_eq!(cfg.profiles["school"].email.as_deref(), Some("admin@school.test"));
    }
}
