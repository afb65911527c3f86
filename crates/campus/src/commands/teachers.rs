//! Teacher handlers.

use tabled::Tabled;

use campus_api::models::TeacherRecord;
use campus_api::{ClassId, SubjectId, TeacherId};
use campus_core::View;
use campus_core::lists::{AssignmentRow, TeacherForm};

use crate::cli::{PersonFields, TeachersArgs, TeachersCommand};
use crate::error::CliError;
use crate::output;

use super::Ctx;
use super::util::{self, with_spinner};

#[derive(Tabled)]
struct TeacherRow {
    #[tabled(rename = "ID")]
    id: TeacherId,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Subjects")]
    subjects: String,
    #[tabled(rename = "Classes")]
    classes: String,
}

impl From<&TeacherRecord> for TeacherRow {
    fn from(t: &TeacherRecord) -> Self {
        Self {
            id: t.id,
            name: t.user.name.clone(),
            email: t.user.email.clone(),
            subjects: t.subject_names().join(", "),
            classes: t.class_labels().join(", "),
        }
    }
}

fn detail(t: &TeacherRecord) -> String {
    let assignments = t
        .assignments
        .iter()
        .map(|a| {
            let class = a
                .school_class
                .as_ref()
                .map_or_else(|| a.class_id.to_string(), |c| match c.section.as_deref() {
                    Some(section) => format!("{} {section}", c.name),
                    None => c.name.clone(),
                });
            let subject = a
                .subject
                .as_ref()
                .map_or_else(|| a.subject_id.to_string(), |s| s.name.clone());
            format!("{class} / {subject}")
        })
        .collect::<Vec<_>>()
        .join("\n               ");
    output::detail(&[
        ("ID", t.id.to_string()),
        ("Name", t.user.name.clone()),
        ("Email", t.user.email.clone()),
        ("Assignments", assignments),
    ])
}

pub async fn handle(ctx: &Ctx<'_>, args: TeachersArgs) -> Result<(), CliError> {
    ctx.guard(View::Teachers)?;
    let mut page = ctx.campus.teachers();

    match args.command {
        TeachersCommand::List(search) => {
            util::fetch(page.resource(), ctx.global.quiet).await?;
            page.set_search(search.search.unwrap_or_default());
            let teachers = page.filtered();
            let out = output::render_list(
                ctx.global.output,
                &teachers,
                |t| TeacherRow::from(t),
                |t| t.id.to_string(),
            )?;
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }

        TeachersCommand::Get { id } => {
            let teacher = get(ctx, TeacherId(id)).await?;
            let out = output::render_single(ctx.global.output, &teacher, detail, |t| {
                t.id.to_string()
            })?;
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }

        TeachersCommand::Create {
            fields,
            assignments,
        } => {
            let mut form = TeacherForm::default();
            apply_fields(&mut form, fields);
            form.assignments = parse_assignments(&assignments)?;
            let payload = form.payload(true)?;
            with_spinner("Creating…", ctx.global.quiet, page.create(&payload)).await?;
            output::notice(&format!("Created teacher {}", payload.name), ctx.global.quiet);
            Ok(())
        }

        TeachersCommand::Update {
            id,
            fields,
            assignments,
        } => {
            let id = TeacherId(id);
            let existing = get(ctx, id).await?;
            let mut form = TeacherForm::from_record(&existing);
            apply_fields(&mut form, fields);
            if !assignments.is_empty() {
                form.assignments = parse_assignments(&assignments)?;
            }
            let payload = form.payload(false)?;
            with_spinner("Saving…", ctx.global.quiet, page.update(id, &payload)).await?;
            output::notice(&format!("Updated teacher {id}"), ctx.global.quiet);
            Ok(())
        }

        TeachersCommand::Delete { id } => {
            let id = TeacherId(id);
            if !util::confirm(&format!("Delete teacher {id}?"), ctx.global.yes)? {
                return Ok(());
            }
            with_spinner("Deleting…", ctx.global.quiet, page.delete(id)).await?;
            output::notice(&format!("Deleted teacher {id}"), ctx.global.quiet);
            Ok(())
        }
    }
}

async fn get(ctx: &Ctx<'_>, id: TeacherId) -> Result<TeacherRecord, CliError> {
    let result = with_spinner(
        "Loading…",
        ctx.global.quiet,
        ctx.campus.client().get_teacher(id),
    )
    .await;
    util::found(result, "Teacher", id, "teachers list")
}

fn apply_fields(form: &mut TeacherForm, fields: PersonFields) {
    util::overlay(&mut form.name, fields.name);
    util::overlay(&mut form.email, fields.email);
    util::overlay(&mut form.password, fields.password);
}

fn parse_assignments(raw: &[String]) -> Result<Vec<AssignmentRow>, CliError> {
    raw.iter()
        .map(|pair| {
            let (class, subject) = util::parse_pair(pair)?;
            Ok(AssignmentRow {
                class_id: Some(ClassId::from(class)),
                subject_id: Some(SubjectId(subject)),
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn assignment_flags_become_rows() {
        let rows = parse_assignments(&["3:7".into(), "4:7".into()]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].class_id, Some(ClassId::from(4)));
        assert_eq!(rows[1].subject_id, Some(SubjectId(7)));
        assert!(parse_assignments(&["nope".into()]).is_err());
    }

    #[test]
    fn update_keeps_unset_fields() {
        let mut form = TeacherForm {
            name: "Ada".into(),
            email: "ada@school.test".into(),
            ..TeacherForm::default()
        };
        apply_fields(
            &mut form,
            PersonFields {
                name: None,
                email: Some("ada@campus.test".into()),
                password: None,
            },
        );
        assert_eq!(form.name, "Ada");
        assert_eq!(form.email, "ada@campus.test");
        assert!(form.password.is_empty());
    }
}
