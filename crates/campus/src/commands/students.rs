//! Student handlers.

use tabled::Tabled;

use campus_api::models::StudentRecord;
use campus_api::{ClassId, StudentId};
use campus_core::View;
use campus_core::lists::{GradeFilter, StudentForm, filter_students, top_performers};

use crate::cli::{OutputFormat, PersonFields, StudentsArgs, StudentsCommand};
use crate::error::CliError;
use crate::output;

use super::Ctx;
use super::util::{self, with_spinner};

#[derive(Tabled)]
struct StudentRow {
    #[tabled(rename = "ID")]
    id: StudentId,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Average")]
    average: String,
}

impl From<&StudentRecord> for StudentRow {
    fn from(s: &StudentRecord) -> Self {
        Self {
            id: s.id,
            name: s.user.name.clone(),
            email: s.user.email.clone(),
            class: class_label(s),
            average: score(s),
        }
    }
}

#[derive(Tabled)]
struct RankRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Average")]
    average: String,
}

fn class_label(s: &StudentRecord) -> String {
    s.school_class.as_ref().map_or_else(String::new, |c| match c.section.as_deref() {
        Some(section) => format!("{} {section}", c.name),
        None => c.name.clone(),
    })
}

fn score(s: &StudentRecord) -> String {
    s.grades_avg_score
        .map_or_else(|| "-".into(), |avg| format!("{avg:.1}"))
}

fn detail(s: &StudentRecord) -> String {
    output::detail(&[
        ("ID", s.id.to_string()),
        ("Name", s.user.name.clone()),
        ("Email", s.user.email.clone()),
        ("Class", class_label(s)),
        ("Average", score(s)),
    ])
}

pub async fn handle(ctx: &Ctx<'_>, args: StudentsArgs) -> Result<(), CliError> {
    ctx.guard(View::Students)?;
    let page = ctx.campus.students();

    match args.command {
        StudentsCommand::List { search, grade } => {
            let students = util::fetch(page.resource(), ctx.global.quiet).await?;
            let filter: GradeFilter = grade.as_deref().unwrap_or("all").parse().unwrap_or_default();
            let query = search.search.unwrap_or_default();
            let matching: Vec<StudentRecord> = filter_students(&students, &query, &filter)
                .into_iter()
                .cloned()
                .collect();
            let out = output::render_list(
                ctx.global.output,
                &matching,
                |s| StudentRow::from(s),
                |s| s.id.to_string(),
            )?;
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }

        StudentsCommand::Get { id } => {
            let student = get(ctx, StudentId(id)).await?;
            let out = output::render_single(ctx.global.output, &student, detail, |s| {
                s.id.to_string()
            })?;
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }

        StudentsCommand::Create { fields, class } => {
            let mut form = StudentForm::default();
            apply_fields(&mut form, fields, class);
            let payload = form.payload(true)?;
            with_spinner("Creating…", ctx.global.quiet, page.create(&payload)).await?;
            output::notice(&format!("Created student {}", payload.name), ctx.global.quiet);
            Ok(())
        }

        StudentsCommand::Update { id, fields, class } => {
            let id = StudentId(id);
            let existing = get(ctx, id).await?;
            let mut form = StudentForm::from_record(&existing);
            apply_fields(&mut form, fields, class);
            let payload = form.payload(false)?;
            with_spinner("Saving…", ctx.global.quiet, page.update(id, &payload)).await?;
            output::notice(&format!("Updated student {id}"), ctx.global.quiet);
            Ok(())
        }

        StudentsCommand::Delete { id } => {
            let id = StudentId(id);
            if !util::confirm(&format!("Delete student {id}?"), ctx.global.yes)? {
                return Ok(());
            }
            with_spinner("Deleting…", ctx.global.quiet, page.delete(id)).await?;
            output::notice(&format!("Deleted student {id}"), ctx.global.quiet);
            Ok(())
        }

        StudentsCommand::Top { limit } => {
            let students = util::fetch(page.resource(), ctx.global.quiet).await?;
            let ranked: Vec<StudentRecord> = top_performers(&students, limit)
                .into_iter()
                .cloned()
                .collect();
            let rows: Vec<RankRow> = ranked
                .iter()
                .enumerate()
                .map(|(i, s)| RankRow {
                    rank: i + 1,
                    name: s.user.name.clone(),
                    class: class_label(s),
                    average: score(s),
                })
                .collect();
            let out = match ctx.global.output {
                OutputFormat::Table => output::render_table(&rows),
                format => output::render_list(format, &ranked, |s| StudentRow::from(s), |s| {
                    s.id.to_string()
                })?,
            };
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }
    }
}

async fn get(ctx: &Ctx<'_>, id: StudentId) -> Result<StudentRecord, CliError> {
    let result = with_spinner(
        "Loading…",
        ctx.global.quiet,
        ctx.campus.client().get_student(id),
    )
    .await;
    util::found(result, "Student", id, "students list")
}

fn apply_fields(form: &mut StudentForm, fields: PersonFields, class: Option<u64>) {
    util::overlay(&mut form.name, fields.name);
    util::overlay(&mut form.email, fields.email);
    util::overlay(&mut form.password, fields.password);
    if let Some(class) = class {
        form.class_id = Some(ClassId::from(class));
    }
}
