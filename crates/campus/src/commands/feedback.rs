//! Feedback handlers.

use tabled::Tabled;

use campus_api::FeedbackId;
use campus_api::models::{Feedback, FeedbackKind};
use campus_core::View;
use campus_core::lists::FeedbackForm;

use crate::cli::{FeedbackArgs, FeedbackCommand, FeedbackType, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::Ctx;
use super::util::{self, with_spinner};

const PREVIEW_CHARS: usize = 60;

#[derive(Tabled)]
struct FeedbackRow {
    #[tabled(rename = "ID")]
    id: FeedbackId,
    #[tabled(rename = "Type")]
    kind: FeedbackKind,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Read")]
    read: String,
}

fn preview(message: &str) -> String {
    let flat = message.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(PREVIEW_CHARS - 1).collect();
    format!("{cut}…")
}

impl From<FeedbackType> for FeedbackKind {
    fn from(t: FeedbackType) -> Self {
        match t {
            FeedbackType::Feedback => Self::Feedback,
            FeedbackType::Bug => Self::Bug,
            FeedbackType::Suggestion => Self::Suggestion,
        }
    }
}

pub async fn handle(ctx: &Ctx<'_>, args: FeedbackArgs) -> Result<(), CliError> {
    ctx.guard(View::Feedback)?;
    let mut board = ctx.campus.feedback();
    let color = ctx.color();

    match args.command {
        FeedbackCommand::List { search, unread } => {
            util::fetch(board.list().resource(), ctx.global.quiet).await?;
            board
                .list_mut()
                .set_search(search.search.unwrap_or_default());
            let items: Vec<Feedback> = board
                .list()
                .filtered()
                .into_iter()
                .filter(|f| !unread || !f.is_read)
                .collect();
            let out = output::render_list(
                ctx.global.output,
                &items,
                |f| FeedbackRow {
                    id: f.id,
                    kind: f.kind,
                    from: f.author().to_owned(),
                    message: preview(&f.message),
                    date: util::short_date(f.created_at()),
                    read: output::flag(f.is_read, color),
                },
                |f| f.id.to_string(),
            )?;
            output::print_output(&out, ctx.global.quiet);
            output::notice(
                &format!("{} unread", board.unread_count()),
                ctx.global.quiet || ctx.global.output != OutputFormat::Table,
            );
            Ok(())
        }

        FeedbackCommand::Send { message, kind } => {
            let form = FeedbackForm {
                message,
                kind: kind.into(),
            };
            with_spinner("Sending…", ctx.global.quiet, board.send(&form)).await?;
            output::notice("Thanks! Your feedback was sent", ctx.global.quiet);
            Ok(())
        }

        FeedbackCommand::Read { id } => {
            let id = FeedbackId(id);
            with_spinner("Saving…", ctx.global.quiet, board.mark_read(id)).await?;
            output::notice(&format!("Marked feedback {id} as read"), ctx.global.quiet);
            Ok(())
        }

        FeedbackCommand::Delete { id } => {
            let id = FeedbackId(id);
            if !util::confirm(&format!("Delete feedback {id}?"), ctx.global.yes)? {
                return Ok(());
            }
            with_spinner("Deleting…", ctx.global.quiet, board.delete(id)).await?;
            output::notice(&format!("Deleted feedback {id}"), ctx.global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_messages_are_shortened_on_one_line() {
        assert_eq!(preview("short\nnote"), "short note");
        let long = "x".repeat(100);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), PREVIEW_CHARS);
        assert!(shown.ends_with('…'));
    }

    #[test]
    fn flag_type_maps_to_wire_kind() {
        assert_eq!(FeedbackKind::from(FeedbackType::Bug), FeedbackKind::Bug);
        assert_eq!(
            FeedbackKind::from(FeedbackType::Suggestion).to_string(),
            "suggestion"
        );
    }
}
