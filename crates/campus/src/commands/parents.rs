//! Parent handlers.

use tabled::Tabled;

use campus_api::models::ParentRecord;
use campus_api::{ParentId, StudentId};
use campus_core::View;
use campus_core::lists::ParentForm;

use crate::cli::{ParentsArgs, ParentsCommand, PersonFields};
use crate::error::CliError;
use crate::output;

use super::Ctx;
use super::util::{self, with_spinner};

#[derive(Tabled)]
struct ParentRow {
    #[tabled(rename = "ID")]
    id: ParentId,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Children")]
    children: String,
}

impl From<&ParentRecord> for ParentRow {
    fn from(p: &ParentRecord) -> Self {
        Self {
            id: p.id,
            name: p.user.name.clone(),
            email: p.user.email.clone(),
            children: children(p),
        }
    }
}

fn children(p: &ParentRecord) -> String {
    p.students
        .iter()
        .map(|s| s.user.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn detail(p: &ParentRecord) -> String {
    let linked = p
        .students
        .iter()
        .map(|s| format!("{} ({})", s.user.name, s.id))
        .collect::<Vec<_>>()
        .join(", ");
    output::detail(&[
        ("ID", p.id.to_string()),
        ("Name", p.user.name.clone()),
        ("Email", p.user.email.clone()),
        ("Children", linked),
    ])
}

pub async fn handle(ctx: &Ctx<'_>, args: ParentsArgs) -> Result<(), CliError> {
    ctx.guard(View::Parents)?;
    let mut page = ctx.campus.parents();

    match args.command {
        ParentsCommand::List(search) => {
            util::fetch(page.list().resource(), ctx.global.quiet).await?;
            page.list_mut().set_search(search.search.unwrap_or_default());
            let parents = page.list().filtered();
            let out = output::render_list(
                ctx.global.output,
                &parents,
                |p| ParentRow::from(p),
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }

        ParentsCommand::Get { id } => {
            let parent = get(ctx, ParentId(id)).await?;
            let out = output::render_single(ctx.global.output, &parent, detail, |p| {
                p.id.to_string()
            })?;
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }

        ParentsCommand::Create { fields, students } => {
            let mut form = ParentForm::default();
            apply_fields(&mut form, fields, students);
            let payload = form.payload(true)?;
            with_spinner("Creating…", ctx.global.quiet, page.list().create(&payload)).await?;
            output::notice(&format!("Created parent {}", payload.name), ctx.global.quiet);
            Ok(())
        }

        ParentsCommand::Update {
            id,
            fields,
            students,
        } => {
            let id = ParentId(id);
            let existing = get(ctx, id).await?;
            let mut form = ParentForm::from_record(&existing);
            apply_fields(&mut form, fields, students);
            let payload = form.payload(false)?;
            with_spinner("Saving…", ctx.global.quiet, page.list().update(id, &payload)).await?;
            output::notice(&format!("Updated parent {id}"), ctx.global.quiet);
            Ok(())
        }

        ParentsCommand::Delete { id } => {
            let id = ParentId(id);
            if !util::confirm(&format!("Delete parent {id}?"), ctx.global.yes)? {
                return Ok(());
            }
            with_spinner("Deleting…", ctx.global.quiet, page.list().delete(id)).await?;
            output::notice(&format!("Deleted parent {id}"), ctx.global.quiet);
            Ok(())
        }
    }
}

async fn get(ctx: &Ctx<'_>, id: ParentId) -> Result<ParentRecord, CliError> {
    let result = with_spinner(
        "Loading…",
        ctx.global.quiet,
        ctx.campus.client().get_parent(id),
    )
    .await;
    util::found(result, "Parent", id, "parents list")
}

/// `--student` replaces the linked set when given at least once.
fn apply_fields(form: &mut ParentForm, fields: PersonFields, students: Vec<u64>) {
    util::overlay(&mut form.name, fields.name);
    util::overlay(&mut form.email, fields.email);
    util::overlay(&mut form.password, fields.password);
    if !students.is_empty() {
        form.student_ids.clear();
        for id in students {
            if !form.is_linked(StudentId(id)) {
                form.toggle_student(StudentId(id));
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn blank() -> PersonFields {
        PersonFields {
            name: None,
            email: None,
            password: None,
        }
    }

    #[test]
    fn student_flags_replace_links_without_duplicates() {
        let mut form = ParentForm {
            name: "Pat".into(),
            email: "pat@home.test".into(),
            password: String::new(),
            student_ids: vec![StudentId(1)],
        };
        apply_fields(&mut form, blank(), vec![4, 5, 4]);
        assert_eq!(form.student_ids, vec![StudentId(4), StudentId(5)]);

        apply_fields(&mut form, blank(), Vec::new());
        assert_eq!(form.student_ids, vec![StudentId(4), StudentId(5)]);
    }
}
