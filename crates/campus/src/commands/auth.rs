//! login / logout / whoami / dashboard.

use dialoguer::Input;
use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use campus_core::{DashboardSummary, nav};

use crate::cli::LoginArgs;
use crate::config::{self, Profile};
use crate::error::CliError;
use crate::output;

use super::Ctx;
use super::util::{prompt_err, with_spinner};

// ── Login ───────────────────────────────────────────────────────────

pub async fn login(ctx: &Ctx<'_>, args: LoginArgs) -> Result<(), CliError> {
    let remembered = ctx
        .config
        .profiles
        .get(&ctx.profile)
        .and_then(|p| p.email.clone());

    let email = match args.email {
        Some(email) => email,
        None => {
            let mut input = Input::<String>::new().with_prompt("Email");
            if let Some(ref email) = remembered {
                input = input.default(email.clone());
            }
            input.interact_text().map_err(prompt_err)?
        }
    };
    let password = match args.password {
        Some(pw) => SecretString::from(pw),
        None => SecretString::from(rpassword::prompt_password("Password: ").map_err(prompt_err)?),
    };

    let (user, token) = with_spinner(
        "Logging in…",
        ctx.global.quiet,
        ctx.campus.session().login(&email, &password),
    )
    .await?;

    persist_session(ctx, &email, &token, args.plaintext)?;
    output::notice(
        &format!(
            "Logged in as {} ({})",
            output::highlight(&user.name, ctx.color()),
            user.role
        ),
        ctx.global.quiet,
    );
    Ok(())
}

/// Remember the email and keep the token in the keyring (or the file).
fn persist_session(
    ctx: &Ctx<'_>,
    email: &str,
    token: &SecretString,
    plaintext: bool,
) -> Result<(), CliError> {
    let mut cfg = ctx.config.clone();
    let profile = cfg.profiles.entry(ctx.profile.clone()).or_insert_with(|| Profile {
        api_url: ctx.campus.client().base_url().to_string(),
        ..Profile::default()
    });
    profile.email = Some(email.trim().to_owned());

    let stored_in_keyring = !plaintext
        && match config::store_token(&ctx.profile, token) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "keyring unavailable; keeping token in config file");
                false
            }
        };
    profile.token = (!stored_in_keyring).then(|| token.expose_secret().to_owned());

    config::save_config(&cfg)?;
    Ok(())
}

// ── Logout ──────────────────────────────────────────────────────────

pub async fn logout(ctx: &Ctx<'_>) -> Result<(), CliError> {
    if ctx.campus.client().has_token() {
        if let Err(e) = ctx.campus.session().logout().await {
            warn!(error = %e, "server logout failed");
        }
    }

    config::clear_token(&ctx.profile)?;

    let mut cfg = ctx.config.clone();
    if let Some(profile) = cfg.profiles.get_mut(&ctx.profile) {
        if profile.token.take().is_some() {
            config::save_config(&cfg)?;
        }
    }

    output::notice("Logged out", ctx.global.quiet);
    Ok(())
}

// ── Whoami ──────────────────────────────────────────────────────────

pub fn whoami(ctx: &Ctx<'_>) -> Result<(), CliError> {
    let user = ctx.campus.session().require_user()?;
    let out = output::render_single(
        ctx.global.output,
        &user,
        |u| {
            let views = nav::allowed_views(u.role)
                .into_iter()
                .map(|v| v.title())
                .collect::<Vec<_>>()
                .join(", ");
            output::detail(&[
                ("Name", u.name.clone()),
                ("Email", u.email.clone()),
                ("Role", u.role.to_string()),
                ("Profile", ctx.profile.clone()),
                ("Views", views),
            ])
        },
        |u| u.email.clone(),
    )?;
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}

// ── Dashboard ───────────────────────────────────────────────────────

pub async fn dashboard(ctx: &Ctx<'_>) -> Result<(), CliError> {
    let summary = with_spinner("Loading…", ctx.global.quiet, ctx.campus.summary()).await?;
    let out = output::render_single(ctx.global.output, &summary, summary_detail, |s| {
        s.announcements.to_string()
    })?;
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}

fn summary_detail(s: &DashboardSummary) -> String {
    let mut pairs = Vec::new();
    if let Some(n) = s.teachers {
        pairs.push(("Teachers", n.to_string()));
    }
    if let Some(n) = s.students {
        pairs.push(("Students", n.to_string()));
    }
    if let Some(n) = s.parents {
        pairs.push(("Parents", n.to_string()));
    }
    pairs.push(("Announcements", s.announcements.to_string()));
    if let Some(n) = s.unread_feedback {
        pairs.push(("Unread feedback", n.to_string()));
    }
    output::detail(&pairs)
}
