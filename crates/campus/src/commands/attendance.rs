//! Attendance handlers.

use chrono::NaiveDate;
use tabled::Tabled;

use campus_api::models::AttendanceStatus;
use campus_api::{ClassId, StudentId};
use campus_core::{AttendanceSheet, View};

use crate::cli::{AttendanceArgs, AttendanceCommand, OutputFormat};
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
struct MarkRow {
    #[tabled(rename = "ID")]
    id: StudentId,
    #[tabled(rename = "Student")]
    name: String,
    #[tabled(rename = "Status")]
    status: AttendanceStatus,
}

pub async fn handle(ctx: &Ctx<'_>, args: AttendanceArgs) -> Result<(), CliError> {
    ctx.guard(View::Attendance)?;
    let mut desk = ctx.campus.attendance();

    match args.command {
        AttendanceCommand::Classes => {
            let classes = util::fetch(desk.classes(), ctx.global.quiet).await?;
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

        AttendanceCommand::Mark {
            class,
            date,
            absent,
            late,
            excused,
        } => {
            let date = match date {
                Some(raw) => parse_date(&raw)?,
                None => chrono::Local::now().date_naive(),
            };
            with_spinner(
                "Loading roster…",
                ctx.global.quiet,
                desk.open_class(ClassId::from(class), date),
            )
            .await?;

            let Some(sheet) = desk.sheet_mut() else {
                return Err(CliError::InvalidInput {
                    message: "Please select a class".into(),
                });
            };
            apply_marks(sheet, &absent, &late, &excused)?;

            let submission = sheet.submission();
            let rows: Vec<MarkRow> = sheet
                .rows()
                .map(|(name, id, status)| MarkRow {
                    id,
                    name: name.to_owned(),
                    status,
                })
                .collect();
            let summary = format!(
                "{} present, {} absent, {} late, {} excused",
                sheet.count(AttendanceStatus::Present),
                sheet.count(AttendanceStatus::Absent),
                sheet.count(AttendanceStatus::Late),
                sheet.count(AttendanceStatus::Excused),
            );

            with_spinner("Saving…", ctx.global.quiet, desk.submit()).await?;

            let out = match ctx.global.output {
                OutputFormat::Table => output::render_table(&rows),
                format => output::render_single(format, &submission, |_| String::new(), |s| {
                    s.class_id.to_string()
                })?,
            };
            output::print_output(&out, ctx.global.quiet);
            output::notice(
                &format!("Attendance saved for {date}: {summary}"),
                ctx.global.quiet,
            );
            Ok(())
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| CliError::Validation {
        field: "date".into(),
        reason: format!("expected YYYY-MM-DD, got '{raw}'"),
    })
}

/// Everyone starts present; later flags win for a student listed twice.
fn apply_marks(
    sheet: &mut AttendanceSheet,
    absent: &[u64],
    late: &[u64],
    excused: &[u64],
) -> Result<(), CliError> {
    for (ids, status) in [
        (absent, AttendanceStatus::Absent),
        (late, AttendanceStatus::Late),
        (excused, AttendanceStatus::Excused),
    ] {
        for id in ids {
            sheet.mark(StudentId(*id), status)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use campus_api::models::{SchoolClass, StudentRecord, UserRef};

    use super::*;

    fn sheet() -> AttendanceSheet {
        let student = |id: u64, name: &str| StudentRecord {
            id: StudentId(id),
            user: UserRef {
                id: None,
                name: name.into(),
                email: format!("{name}@school.test"),
            },
            class_id: None,
            school_class: None,
            grades_avg_score: None,
        };
        let class = SchoolClass {
            id: ClassId::from(3),
            name: "9th".into(),
            section: Some("A".into()),
            students: vec![student(11, "ana"), student(12, "ben"), student(13, "cy")],
        };
        AttendanceSheet::new(class, NaiveDate::from_ymd_opt(2024, 9, 2).unwrap())
    }

    #[test]
    fn flags_mark_students_and_rest_stay_present() {
        let mut sheet = sheet();
        apply_marks(&mut sheet, &[12], &[13], &[]).unwrap();
        assert_eq!(sheet.status(StudentId(11)), Some(AttendanceStatus::Present));
        assert_eq!(sheet.status(StudentId(12)), Some(AttendanceStatus::Absent));
        assert_eq!(sheet.status(StudentId(13)), Some(AttendanceStatus::Late));
    }

    #[test]
    fn unknown_student_is_rejected() {
        let mut sheet = sheet();
        let err = apply_marks(&mut sheet, &[99], &[], &[]).unwrap_err();
        assert!(err.to_string().contains("Student 99 is not in this class"));
    }

    #[test]
    fn dates_must_be_iso() {
        assert_eq!(
            parse_date("2024-09-02").unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
        );
        assert!(parse_date("02/09/2024").is_err());
    }
}
