//! Class and subject catalog handlers.

use tabled::Tabled;

use campus_api::models::{CatalogSubject, SchoolClass};
use campus_api::{ClassId, SubjectId};
use campus_core::{CoreError, View};

use crate::cli::{ClassesArgs, ClassesCommand, SubjectsArgs, SubjectsCommand};
use crate::error::CliError;
use crate::output;

use super::Ctx;
use super::util::{self, with_spinner};

#[derive(Tabled)]
struct ClassRow {
    #[tabled(rename = "ID")]
    id: ClassId,
    #[tabled(rename = "Class")]
    label: String,
}

#[derive(Tabled)]
struct SubjectRow {
    #[tabled(rename = "ID")]
    id: SubjectId,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Code")]
    code: String,
}

fn roster(class: &SchoolClass) -> String {
    let mut out = output::detail(&[
        ("ID", class.id.to_string()),
        ("Class", class.label()),
        ("Students", class.students.len().to_string()),
    ]);
    for student in &class.students {
        out.push_str(&format!("\n{:>5}  {}", student.id.get(), student.user.name));
    }
    out
}

pub async fn handle(ctx: &Ctx<'_>, args: ClassesArgs) -> Result<(), CliError> {
    let client = ctx.campus.client();

    match args.command {
        ClassesCommand::List { mine } => {
            let classes = if mine {
                ctx.guard(View::MyClasses)?;
                with_spinner("Loading…", ctx.global.quiet, client.my_classes()).await
            } else {
                with_spinner("Loading…", ctx.global.quiet, client.list_classes()).await
            }
            .map_err(CoreError::from)?;
            let out = output::render_list(
                ctx.global.output,
                &classes,
                |c| ClassRow {
                    id: c.id,
                    label: c.label(),
                },
                |c| c.id.to_string(),
            )?;
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }

        ClassesCommand::Get { id } => {
            let id = ClassId::from(id);
            let result = with_spinner("Loading…", ctx.global.quiet, client.get_class(id)).await;
            let class = util::found(result, "Class", id, "classes list")?;
            let out = output::render_single(ctx.global.output, &class, roster, |c| {
                c.id.to_string()
            })?;
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }
    }
}

pub async fn handle_subjects(ctx: &Ctx<'_>, args: SubjectsArgs) -> Result<(), CliError> {
    match args.command {
        SubjectsCommand::List => {
            let subjects: Vec<CatalogSubject> = with_spinner(
                "Loading…",
                ctx.global.quiet,
                ctx.campus.client().list_subjects(),
            )
            .await
            .map_err(CoreError::from)?;
            let out = output::render_list(
                ctx.global.output,
                &subjects,
                |s| SubjectRow {
                    id: s.id,
                    name: s.name.clone(),
                    code: s.code.clone().unwrap_or_default(),
                },
                |s| s.id.to_string(),
            )?;
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }
    }
}
