mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use campus_core::{Campus, SessionState};

use crate::cli::{Cli, Command};
use crate::commands::Ctx;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a backend
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "campus", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let cfg = config::load_config_or_default();
            let profile = config::active_profile_name(&cli.global, &cfg);
            let client_config = config::resolve_client_config(&cli.global, &cfg, &profile)?;
            let campus = Campus::new(&client_config)?;
            let ctx = Ctx {
                campus,
                global: &cli.global,
                config: cfg,
                profile,
            };

            tracing::debug!(command = ?cmd, profile = %ctx.profile, "dispatching command");
            match cmd {
                Command::Login(args) => commands::auth::login(&ctx, args).await,
                Command::Logout => commands::auth::logout(&ctx).await,
                cmd => {
                    let state = ctx.campus.session().restore().await;
                    if !matches!(state, SessionState::Authenticated(_)) {
                        return Err(CliError::NotLoggedIn);
                    }
                    commands::dispatch(cmd, &ctx).await
                }
            }
        }
    }
}
