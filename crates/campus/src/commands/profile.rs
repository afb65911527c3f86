//! Own-account handlers.

use secrecy::SecretString;

use campus_api::models::{Preferences, User};
use campus_core::{PreferenceKey, View};

use crate::cli::{PrefKey, ProfileArgs, ProfileCommand};
use crate::error::CliError;
use crate::output;

use super::Ctx;
use super::util::{prompt_err, with_spinner};

const ALL_KEYS: [PreferenceKey; 4] = [
    PreferenceKey::Notifications,
    PreferenceKey::DarkMode,
    PreferenceKey::Biometric,
    PreferenceKey::Analytics,
];

impl From<PrefKey> for PreferenceKey {
    fn from(k: PrefKey) -> Self {
        match k {
            PrefKey::Notifications => Self::Notifications,
            PrefKey::DarkMode => Self::DarkMode,
            PrefKey::Biometric => Self::Biometric,
            PrefKey::Analytics => Self::Analytics,
        }
    }
}

fn prefs_detail(prefs: &Preferences, color: bool) -> String {
    let pairs: Vec<(&str, String)> = ALL_KEYS
        .iter()
        .map(|key| (label(*key), output::flag(key.get(prefs), color)))
        .collect();
    output::detail(&pairs)
}

fn label(key: PreferenceKey) -> &'static str {
    match key {
        PreferenceKey::Notifications => "Notifications",
        PreferenceKey::DarkMode => "Dark mode",
        PreferenceKey::Biometric => "Biometric",
        PreferenceKey::Analytics => "Analytics",
    }
}

fn user_detail(user: &User, color: bool) -> String {
    let account = output::detail(&[
        ("Name", user.name.clone()),
        ("Email", user.email.clone()),
        ("Role", user.role.to_string()),
    ]);
    format!("{account}\n\n{}", prefs_detail(&user.preferences(), color))
}

pub async fn handle(ctx: &Ctx<'_>, args: ProfileArgs) -> Result<(), CliError> {
    ctx.guard(View::Settings)?;
    let editor = ctx.campus.profile();
    let color = ctx.color();

    match args.command {
        ProfileCommand::Show => {
            let user = editor.user()?;
            let out = output::render_single(
                ctx.global.output,
                &user,
                |u| user_detail(u, color),
                |u| u.email.clone(),
            )?;
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }

        ProfileCommand::Update { name, email } => {
            let current = editor.user()?;
            let name = name.unwrap_or(current.name);
            let email = email.unwrap_or(current.email);
            let user = with_spinner(
                "Saving…",
                ctx.global.quiet,
                editor.update_personal(&name, &email),
            )
            .await?;
            output::notice(
                &format!("Profile updated: {} <{}>", user.name, user.email),
                ctx.global.quiet,
            );
            Ok(())
        }

        ProfileCommand::Password => {
            let password =
                SecretString::from(rpassword::prompt_password("New password: ").map_err(prompt_err)?);
            let confirmation = SecretString::from(
                rpassword::prompt_password("Confirm password: ").map_err(prompt_err)?,
            );
            with_spinner(
                "Saving…",
                ctx.global.quiet,
                editor.change_password(&password, &confirmation),
            )
            .await?;
            output::notice("Password changed", ctx.global.quiet);
            Ok(())
        }

        ProfileCommand::Prefs { toggle } => {
            let prefs = match toggle {
                Some(key) => {
                    with_spinner(
                        "Saving…",
                        ctx.global.quiet,
                        editor.toggle_preference(key.into()),
                    )
                    .await?
                }
                None => editor.user()?.preferences(),
            };
            let out = output::render_single(
                ctx.global.output,
                &prefs,
                |p| prefs_detail(p, color),
                |p| {
                    ALL_KEYS
                        .iter()
                        .filter(|k| k.get(p))
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            )?;
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferences_render_one_line_each() {
        let out = prefs_detail(&Preferences::default(), false);
        assert_eq!(out.lines().count(), 4);
        assert!(out.contains("Dark mode      -"));
        assert!(out.contains("Notifications  ✓"));
    }

    #[test]
    fn cli_keys_match_core_keys() {
        assert_eq!(PreferenceKey::from(PrefKey::DarkMode), PreferenceKey::DarkMode);
        assert_eq!(PreferenceKey::from(PrefKey::DarkMode).to_string(), "dark-mode");
    }
}
