//! Announcement handlers.

use tabled::Tabled;

use campus_api::models::{Announcement, AnnouncementAudience};
use campus_api::{AnnouncementId, ClassId};
use campus_core::View;
use campus_core::announcements::{AnnouncementForm, filter_by_audience};

use crate::cli::{AnnouncementsArgs, AnnouncementsCommand, Audience};
use crate::error::CliError;
use crate::output;

use super::Ctx;
use super::util::{self, with_spinner};

#[derive(Tabled)]
struct AnnouncementRow {
    #[tabled(rename = "ID")]
    id: AnnouncementId,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Audience")]
    audience: String,
    #[tabled(rename = "By")]
    author: String,
    #[tabled(rename = "Date")]
    date: String,
}

impl From<&Announcement> for AnnouncementRow {
    fn from(a: &Announcement) -> Self {
        Self {
            id: a.id,
            title: a.title.clone(),
            audience: audience_label(a),
            author: a.author().to_owned(),
            date: util::short_date(a.created_at()),
        }
    }
}

fn audience_label(a: &Announcement) -> String {
    match (a.target_role, a.target_class_id) {
        (AnnouncementAudience::Class, Some(class)) => format!("class {class}"),
        (role, _) => role.to_string(),
    }
}

impl From<Audience> for AnnouncementAudience {
    fn from(a: Audience) -> Self {
        match a {
            Audience::All => Self::All,
            Audience::Teacher => Self::Teacher,
            Audience::Student => Self::Student,
            Audience::Parent => Self::Parent,
            Audience::Class => Self::Class,
        }
    }
}

pub async fn handle(ctx: &Ctx<'_>, args: AnnouncementsArgs) -> Result<(), CliError> {
    ctx.guard(View::Announcements)?;
    let mut board = ctx.campus.announcements();

    match args.command {
        AnnouncementsCommand::List { search, audience } => {
            util::fetch(board.list().resource(), ctx.global.quiet).await?;
            board
                .list_mut()
                .set_search(search.search.unwrap_or_default());
            let matching = board.list().filtered();
            let shown: Vec<Announcement> =
                filter_by_audience(&matching, audience.map(AnnouncementAudience::from))
                    .into_iter()
                    .cloned()
                    .collect();
            let out = output::render_list(
                ctx.global.output,
                &shown,
                |a| AnnouncementRow::from(a),
                |a| a.id.to_string(),
            )?;
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }

        AnnouncementsCommand::Create {
            title,
            message,
            audience,
            class,
        } => {
            let form = AnnouncementForm {
                title,
                message,
                target_role: audience.into(),
                target_class_id: class.map(ClassId::from),
            };
            with_spinner("Publishing…", ctx.global.quiet, board.publish(&form)).await?;
            output::notice("Announcement published", ctx.global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn announcement(role: AnnouncementAudience, class: Option<u64>) -> Announcement {
        Announcement {
            id: AnnouncementId(1),
            title: "Exams".into(),
            message: "Start Monday".into(),
            target_role: role,
            target_class_id: class.map(ClassId::from),
            created_at: Some("2024-09-02T08:00:00Z".into()),
            user: None,
        }
    }

    #[test]
    fn rows_name_the_audience_and_fallback_author() {
        let row = AnnouncementRow::from(&announcement(AnnouncementAudience::Class, Some(3)));
        assert_eq!(row.audience, "class 3");
        assert_eq!(row.author, "System Admin");
        assert_eq!(row.date, "Sep 02, 2024");

        let row = AnnouncementRow::from(&announcement(AnnouncementAudience::Parent, None));
        assert_eq!(row.audience, "parent");
    }
}
