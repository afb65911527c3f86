//! Command dispatch: bridges CLI args -> core state holders -> output.

pub mod academics;
pub mod announcements;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod config_cmd;
pub mod feedback;
pub mod parents;
pub mod profile;
pub mod students;
pub mod teachers;
pub mod util;

use campus_core::{Campus, View, nav};

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Everything a handler needs for one invocation.
pub struct Ctx<'a> {
    pub campus: Campus,
    pub global: &'a GlobalOpts,
    pub config: Config,
    pub profile: String,
}

impl Ctx<'_> {
    /// Refuse early when the logged-in role may not open `view`.
    pub fn guard(&self, view: View) -> Result<(), CliError> {
        let user = self.campus.session().require_user()?;
        nav::can_access(user.role, view)?;
        Ok(())
    }

    pub fn color(&self) -> bool {
        crate::output::should_color(self.global.color)
    }
}

/// Dispatch a command that needs an authenticated session.
pub async fn dispatch(cmd: Command, ctx: &Ctx<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Whoami => auth::whoami(ctx),
        Command::Dashboard => auth::dashboard(ctx).await,
        Command::Academics(args) => academics::handle(ctx, args).await,
        Command::Teachers(args) => teachers::handle(ctx, args).await,
        Command::Students(args) => students::handle(ctx, args).await,
        Command::Parents(args) => parents::handle(ctx, args).await,
        Command::Feedback(args) => feedback::handle(ctx, args).await,
        Command::Announcements(args) => announcements::handle(ctx, args).await,
        Command::Classes(args) => classes::handle(ctx, args).await,
        Command::Subjects(args) => classes::handle_subjects(ctx, args).await,
        Command::Attendance(args) => attendance::handle(ctx, args).await,
        Command::Profile(args) => profile::handle(ctx, args).await,
        // Handled before a session is restored
        Command::Login(_) | Command::Logout | Command::Config(_) | Command::Completions(_) => {
            Err(CliError::InvalidInput {
                message: "command does not need a session".into(),
            })
        }
    }
}
