//! Academic hierarchy and schedule handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use campus_api::models::{Grade, ScheduleEntry, Weekday};
use campus_api::{GradeKey, ScheduleId, SectionId, SubjectId};
use campus_core::academics::schedule::timeslots;
use campus_core::{AcademicItem, HierarchyEditor, ScheduleDraft, View};

use crate::cli::{
    AcademicsArgs, AcademicsCommand, Day, GradeCommand, ScheduleCommand, SectionCommand,
    SubjectCommand,
};
use crate::error::CliError;
use crate::output;

use super::Ctx;
use super::util::{self, with_spinner};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    id: ScheduleId,
    #[tabled(rename = "Day")]
    day: Weekday,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Room")]
    room: String,
}

impl From<&ScheduleEntry> for EntryRow {
    fn from(e: &ScheduleEntry) -> Self {
        Self {
            id: e.id,
            day: e.day_of_week,
            time: format!("{} - {}", e.start_hm(), e.end_hm()),
            subject: e.subject_name().to_owned(),
            room: e.room_label().to_owned(),
        }
    }
}

/// One row per slot, one column per weekday.
#[derive(Tabled)]
struct GridRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Mon")]
    mon: String,
    #[tabled(rename = "Tue")]
    tue: String,
    #[tabled(rename = "Wed")]
    wed: String,
    #[tabled(rename = "Thu")]
    thu: String,
    #[tabled(rename = "Fri")]
    fri: String,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Ctx<'_>, args: AcademicsArgs) -> Result<(), CliError> {
    ctx.guard(View::Academics)?;
    let mut editor = ctx.campus.hierarchy_editor();
    let quiet = ctx.global.quiet;

    match args.command {
        AcademicsCommand::Tree { search, students } => {
            load(&mut editor, quiet).await?;
            if let Some(query) = search {
                editor.set_search(query);
            }
            let grades = editor.filtered_grades();
            let out = output::render_single(
                ctx.global.output,
                &grades,
                |g| render_tree(g, students),
                |g| {
                    g.iter()
                        .map(|grade| grade.name.to_string())
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            )?;
            output::print_output(&out, quiet);
            Ok(())
        }

        AcademicsCommand::Grade { command } => grade(ctx, &mut editor, command).await,
        AcademicsCommand::Section { command } => section(ctx, &mut editor, command).await,
        AcademicsCommand::Subject { command } => subject(ctx, &mut editor, command).await,
        AcademicsCommand::Schedule { command } => schedule(ctx, &mut editor, command).await,
    }
}

async fn grade(
    ctx: &Ctx<'_>,
    editor: &mut HierarchyEditor,
    command: GradeCommand,
) -> Result<(), CliError> {
    match command {
        GradeCommand::Add { name } => {
            editor.add_grade(&name).await?;
            output::notice(&format!("Grade '{}' added", name.trim()), ctx.global.quiet);
        }
        GradeCommand::Rename { grade, name } => {
            load(editor, ctx.global.quiet).await?;
            let item = find_grade(editor, &grade)?;
            editor.update(&item, &name).await?;
            output::notice(&format!("Grade renamed to '{}'", name.trim()), ctx.global.quiet);
        }
        GradeCommand::Delete { grade } => {
            load(editor, ctx.global.quiet).await?;
            let item = find_grade(editor, &grade)?;
            if !confirm_delete(ctx, &item)? {
                return Ok(());
            }
            editor.delete(&item).await?;
            output::notice("Grade deleted", ctx.global.quiet);
        }
    }
    Ok(())
}

async fn section(
    ctx: &Ctx<'_>,
    editor: &mut HierarchyEditor,
    command: SectionCommand,
) -> Result<(), CliError> {
    match command {
        SectionCommand::Add { grade, name } => {
            editor.add_section(&GradeKey::new(grade), &name).await?;
            output::notice("Section added", ctx.global.quiet);
        }
        SectionCommand::Rename { id, name } => {
            load(editor, ctx.global.quiet).await?;
            let item = find_section(editor, SectionId(id))?;
            editor.update(&item, &name).await?;
            output::notice("Section renamed", ctx.global.quiet);
        }
        SectionCommand::Delete { id } => {
            load(editor, ctx.global.quiet).await?;
            let item = find_section(editor, SectionId(id))?;
            if !confirm_delete(ctx, &item)? {
                return Ok(());
            }
            editor.delete(&item).await?;
            output::notice("Section deleted", ctx.global.quiet);
        }
    }
    Ok(())
}

async fn subject(
    ctx: &Ctx<'_>,
    editor: &mut HierarchyEditor,
    command: SubjectCommand,
) -> Result<(), CliError> {
    match command {
        SubjectCommand::Add { grade, name, code } => {
            editor.add_subject(&GradeKey::new(grade), &name, &code).await?;
            output::notice("Subject added", ctx.global.quiet);
        }
        SubjectCommand::Rename { id, name } => {
            load(editor, ctx.global.quiet).await?;
            let item = find_subject(editor, SubjectId(id))?;
            editor.update(&item, &name).await?;
            output::notice("Subject renamed", ctx.global.quiet);
        }
        SubjectCommand::Delete { id } => {
            load(editor, ctx.global.quiet).await?;
            let item = find_subject(editor, SubjectId(id))?;
            if !confirm_delete(ctx, &item)? {
                return Ok(());
            }
            editor.delete(&item).await?;
            output::notice("Subject removed", ctx.global.quiet);
        }
    }
    Ok(())
}

async fn schedule(
    ctx: &Ctx<'_>,
    editor: &mut HierarchyEditor,
    command: ScheduleCommand,
) -> Result<(), CliError> {
    let quiet = ctx.global.quiet;
    load(editor, quiet).await?;

    match command {
        ScheduleCommand::Show { section } => {
            focus(editor, section.map(SectionId)).await?;
            let entries = editor.schedule().data();
            let heading = selection_label(editor);
            let out = output::render_single(
                ctx.global.output,
                &*entries,
                |e| format!("{heading}\n{}", render_grid(e)),
                |e| e.iter().map(|x| x.id.to_string()).collect::<Vec<_>>().join("\n"),
            )?;
            output::print_output(&out, quiet);
        }
        ScheduleCommand::List { section } => {
            focus(editor, section.map(SectionId)).await?;
            let entries = editor.schedule().data();
            let sorted: Vec<ScheduleEntry> = timeslots(&entries).into_iter().cloned().collect();
            let out = output::render_list(
                ctx.global.output,
                &sorted,
                |e| EntryRow::from(e),
                |e| e.id.to_string(),
            )?;
            output::print_output(&out, quiet);
        }
        ScheduleCommand::Add {
            section,
            subject,
            day,
            start,
            end,
            room,
        } => {
            focus(editor, Some(SectionId(section))).await?;
            let draft = ScheduleDraft {
                subject_id: Some(SubjectId(subject)),
                day_of_week: weekday(day),
                start_time: start,
                end_time: end,
                room,
            };
            editor.add_schedule_entry(&draft).await?;
            output::notice("Schedule entry added", quiet);
        }
        ScheduleCommand::Delete { section, id } => {
            focus(editor, Some(SectionId(section))).await?;
            if !util::confirm(&format!("Delete schedule entry {id}?"), ctx.global.yes)? {
                return Ok(());
            }
            editor.delete_schedule_entry(ScheduleId(id)).await?;
            output::notice("Schedule entry deleted", quiet);
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn load(editor: &mut HierarchyEditor, quiet: bool) -> Result<(), CliError> {
    let outcome = with_spinner("Loading hierarchy…", quiet, editor.refresh()).await;
    util::settle(editor.hierarchy(), outcome)?;
    Ok(())
}

/// Point the editor at `section` (or keep the default) and load its schedule.
async fn focus(editor: &mut HierarchyEditor, section: Option<SectionId>) -> Result<(), CliError> {
    if let Some(id) = section {
        let grades = editor.grades();
        let owner = grades
            .iter()
            .find(|g| g.section(id).is_some())
            .ok_or_else(|| not_found("section", &id.to_string()))?;
        editor.select_grade(&owner.name).await?;
        editor.select_section(id).await?;
    }
    editor.show_calendar().await;
    if let Some(message) = editor.schedule().error() {
        return Err(CliError::Api {
            status: None,
            message,
        });
    }
    Ok(())
}

fn find_grade(editor: &HierarchyEditor, name: &str) -> Result<AcademicItem, CliError> {
    let key = GradeKey::new(name.trim());
    editor
        .grades()
        .iter()
        .find(|g| g.name == key)
        .map(AcademicItem::grade)
        .ok_or_else(|| not_found("grade", name))
}

fn find_section(editor: &HierarchyEditor, id: SectionId) -> Result<AcademicItem, CliError> {
    editor
        .grades()
        .iter()
        .find_map(|g| g.section(id).map(|s| AcademicItem::section(g, s)))
        .ok_or_else(|| not_found("section", &id.to_string()))
}

fn find_subject(editor: &HierarchyEditor, id: SubjectId) -> Result<AcademicItem, CliError> {
    editor
        .grades()
        .iter()
        .find_map(|g| g.subject(id).map(|s| AcademicItem::subject(g, s)))
        .ok_or_else(|| not_found("subject", &id.to_string()))
}

fn not_found(kind: &str, identifier: &str) -> CliError {
    CliError::NotFound {
        resource_type: kind.into(),
        identifier: identifier.into(),
        list_command: "academics tree".into(),
    }
}

fn confirm_delete(ctx: &Ctx<'_>, item: &AcademicItem) -> Result<bool, CliError> {
    util::confirm(
        &format!("Delete {item}? This cannot be undone."),
        ctx.global.yes,
    )
}

fn selection_label(editor: &HierarchyEditor) -> String {
    match (editor.selected_grade(), editor.selected_section()) {
        (Some(g), Some(s)) => format!("{} / Section {}", g.name, s.name),
        (Some(g), None) => format!("{} (no sections)", g.name),
        _ => "No grade selected".into(),
    }
}

fn weekday(day: Day) -> Weekday {
    match day {
        Day::Monday => Weekday::Monday,
        Day::Tuesday => Weekday::Tuesday,
        Day::Wednesday => Weekday::Wednesday,
        Day::Thursday => Weekday::Thursday,
        Day::Friday => Weekday::Friday,
    }
}

// ── Rendering ───────────────────────────────────────────────────────

pub(crate) fn render_tree(grades: &[Grade], with_students: bool) -> String {
    if grades.is_empty() {
        return "No grades found".into();
    }
    let mut out = String::new();
    for grade in grades {
        let _ = writeln!(out, "{}", grade.name);
        let _ = writeln!(out, "├─ Sections ({})", grade.sections.len());
        for (i, section) in grade.sections.iter().enumerate() {
            let last = i + 1 == grade.sections.len();
            let branch = if last { "└─" } else { "├─" };
            let _ = writeln!(
                out,
                "│  {branch} {}  #{}  {} students",
                section.name, section.id, section.students_count
            );
            if with_students {
                let stem = if last { " " } else { "│" };
                for student in &section.students {
                    let _ = writeln!(out, "│  {stem}    {} {}", student.badge(), student.name);
                }
            }
        }
        let _ = writeln!(out, "└─ Subjects ({})", grade.subjects.len());
        for (i, subject) in grade.subjects.iter().enumerate() {
            let branch = if i + 1 == grade.subjects.len() { "└─" } else { "├─" };
            let code = subject.code.as_deref().unwrap_or("-");
            let _ = writeln!(out, "   {branch} {}  [{code}]  #{}", subject.name, subject.id);
        }
    }
    out.trim_end().to_owned()
}

pub(crate) fn render_grid(entries: &[ScheduleEntry]) -> String {
    let grid = campus_core::academics::ScheduleGrid::new(entries);
    let cell = |e: Option<&ScheduleEntry>| {
        e.map(|e| format!("{}\n{}", e.subject_name(), e.room_label()))
            .unwrap_or_default()
    };
    let rows: Vec<GridRow> = grid
        .rows()
        .into_iter()
        .map(|(slot, cells)| {
            let mut cells = cells.into_iter();
            let mut next = || cell(cells.next().flatten());
            GridRow {
                time: slot.label(),
                mon: next(),
                tue: next(),
                wed: next(),
                thu: next(),
                fri: next(),
            }
        })
        .collect();
    output::render_table(&rows)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn grades() -> Vec<Grade> {
        serde_json::from_value(json!([{
            "name": "9th",
            "sections": [
                { "id": 12, "name": "A", "students_count": 2,
                  "students": [{ "id": 7, "name": "Ada" }, { "id": 8, "name": "Alan" }] },
                { "id": 13, "name": "B", "students_count": 0 }
            ],
            "subjects": [{ "id": 3, "name": "Physics", "code": "PHY-9" }]
        }]))
        .unwrap()
    }

    #[test]
    fn tree_lists_sections_and_subjects() {
        insta::assert_snapshot!(render_tree(&grades(), true), @r"
        9th
        ├─ Sections (2)
        │  ├─ A  #12  2 students
        │  │    S007 Ada
        │  │    S008 Alan
        │  └─ B  #13  0 students
        └─ Subjects (1)
           └─ Physics  [PHY-9]  #3
        ");
    }

    #[test]
    fn empty_tree_says_so() {
        assert_eq!(render_tree(&[], false), "No grades found");
    }

    #[test]
    fn grid_places_entry_in_slot() {
        let entries: Vec<ScheduleEntry> = serde_json::from_value(json!([{
            "id": 1, "subject_id": 3, "subject": { "id": 3, "name": "Physics" },
            "day_of_week": "Tuesday", "start_time": "09:45:00", "end_time": "11:15:00",
            "room": "Lab 2", "class_id": 12
        }]))
        .unwrap();
        let grid = render_grid(&entries);
        assert!(grid.contains("09:45 - 11:15"));
        assert!(grid.contains("Physics"));
        assert!(grid.contains("Lab 2"));
    }
}
