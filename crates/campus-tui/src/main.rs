//! `campus-tui`: terminal dashboard for a school administration backend.
//!
//! Built on [ratatui](https://ratatui.rs). A background data bridge owns the
//! `campus-core` state holders (hierarchy editor, list pages, boards) and
//! pushes snapshots into the UI action loop; screens only render snapshots
//! and send requests back.
//!
//! Logs go to a file (default `/tmp/campus-tui.log`) so they never draw over
//! the terminal UI.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use campus_config::Profile;
use campus_core::Campus;

use crate::app::App;

/// Terminal dashboard for school administration.
#[derive(Parser, Debug)]
#[command(name = "campus-tui", version, about)]
struct Cli {
    /// Config profile to use
    #[arg(short = 'p', long, env = "CAMPUS_PROFILE")]
    profile: Option<String>,

    /// API root URL (overrides the profile)
    #[arg(short = 'u', long, env = "CAMPUS_API_URL")]
    api_url: Option<String>,

    /// Log file path
    #[arg(long, default_value = "/tmp/campus-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. The returned guard flushes pending lines on drop and
/// must live as long as the app.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "campus_tui={level},campus_core={level},campus_api={level}"
        ))
    });

    let dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("."));
    let file_name = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("campus-tui.log"));

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Build the backend handle from the config file plus flag overrides.
fn build_campus(cli: &Cli) -> Result<(Campus, String)> {
    let cfg = campus_config::load_config_or_default();
    let profile_name = cfg.active_profile_name(cli.profile.as_deref());

    let fallback = Profile::default();
    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile,
        None if cli.profile.is_some() => {
            return Err(eyre!(
                "profile '{profile_name}' not found (available: {})",
                cfg.profile_names()
            ));
        }
        None => &fallback,
    };

    let mut client = campus_config::profile_to_client_config(profile, &profile_name, &cfg.defaults)?;
    if let Some(ref raw) = cli.api_url {
        client.api_url = campus_config::parse_api_url(raw)?;
    }

    Ok((Campus::new(&client)?, profile_name))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks first so a panic during setup still restores the terminal
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let (campus, profile) = build_campus(&cli)?;
    info!(
        url = %campus.client().base_url(),
        profile = %profile,
        "starting campus-tui"
    );

    let mut app = App::new(campus, profile);
    app.run().await?;

    Ok(())
}
