//! Academics screen: the grade tree and the weekly schedule grid, with
//! the editor's dialogs drawn on top.

use std::mem;

use campus_api::models::{Grade, ScheduleEntry, Weekday};
use campus_api::{GradeKey, SubjectId};
use campus_core::academics::schedule::{SELECT_GRADE_AND_SECTION, timeslots};
use campus_core::academics::{ModalPhase, SLOTS, ScheduleGrid, TreeRow};
use campus_core::{AcademicItem, ModalKind, ScheduleDraft, ViewMode};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use strum::IntoEnumIterator;
use throbber_widgets_tui::ThrobberState;

use crate::action::{
    AcademicsRequest, AcademicsSnapshot, Action, ConfirmAction, Notification, Request,
};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets::{self, Cursor, form::Form, form::TextField, picker::Choice};

fn academics(request: AcademicsRequest) -> Option<Action> {
    Some(Action::Request(Request::Academics(request)))
}

// ── Dialog fields ─────────────────────────────────────────────────────

/// Local field state for the editor's open dialog.
struct Dialog {
    /// The dialog as opened; identity fields are taken from here.
    kind: ModalKind,
    form: Option<Form>,
    /// Subject ids behind the subject picker, in option order.
    subjects: Vec<SubjectId>,
}

impl Dialog {
    fn new(kind: &ModalKind, grade: Option<&Grade>) -> Self {
        let mut subjects = Vec::new();
        let form = match kind {
            ModalKind::AddGrade { name } => Some(Form::new(vec![
                TextField::with_value("Grade name", name).into(),
            ])),
            ModalKind::AddSection { name, .. } => Some(Form::new(vec![
                TextField::with_value("Section name", name).into(),
            ])),
            ModalKind::AddSubject { name, code, .. } => Some(Form::new(vec![
                TextField::with_value("Subject name", name).into(),
                TextField::with_value("Code (optional)", code).into(),
            ])),
            ModalKind::Edit { value, .. } => Some(Form::new(vec![
                TextField::with_value("Name", value).into(),
            ])),
            ModalKind::AddSchedule { draft } => {
                let available = grade.map(|g| g.subjects.as_slice()).unwrap_or_default();
                subjects = available.iter().map(|s| s.id).collect();
                let subject_index = draft
                    .subject_id
                    .and_then(|id| subjects.iter().position(|&s| s == id))
                    .unwrap_or(0);
                let day_index = Weekday::iter()
                    .position(|d| d == draft.day_of_week)
                    .unwrap_or(0);
                Some(Form::new(vec![
                    Choice::new("Subject", available.iter().map(|s| s.name.clone()).collect())
                        .with_index(subject_index)
                        .into(),
                    Choice::new("Day", Weekday::iter().map(|d| d.to_string()).collect())
                        .with_index(day_index)
                        .into(),
                    TextField::with_value("Start (HH:MM)", &draft.start_time).into(),
                    TextField::with_value("End (HH:MM)", &draft.end_time).into(),
                    TextField::with_value("Room (optional)", &draft.room).into(),
                ]))
            }
            ModalKind::Delete { .. } | ModalKind::Timeslots => None,
        };
        Self {
            kind: kind.clone(),
            form,
            subjects,
        }
    }

    /// The opened dialog with the typed values filled in.
    fn fill(&self) -> ModalKind {
        let Some(form) = &self.form else {
            return self.kind.clone();
        };
        match &self.kind {
            ModalKind::AddGrade { .. } => ModalKind::AddGrade {
                name: form.value(0).to_owned(),
            },
            ModalKind::AddSection { grade, .. } => ModalKind::AddSection {
                grade: grade.clone(),
                name: form.value(0).to_owned(),
            },
            ModalKind::AddSubject { grade, .. } => ModalKind::AddSubject {
                grade: grade.clone(),
                name: form.value(0).to_owned(),
                code: form.value(1).to_owned(),
            },
            ModalKind::Edit { item, .. } => ModalKind::Edit {
                item: item.clone(),
                value: form.value(0).to_owned(),
            },
            ModalKind::AddSchedule { draft } => ModalKind::AddSchedule {
                draft: ScheduleDraft {
                    subject_id: self.subjects.get(form.choice(0)).copied(),
                    day_of_week: Weekday::iter()
                        .nth(form.choice(1))
                        .unwrap_or(draft.day_of_week),
                    start_time: form.value(2).to_owned(),
                    end_time: form.value(3).to_owned(),
                    room: form.value(4).to_owned(),
                },
            },
            other => other.clone(),
        }
    }
}

// ── Screen ────────────────────────────────────────────────────────────

pub struct AcademicsScreen {
    snapshot: AcademicsSnapshot,
    cursor: Cursor,
    /// Calendar cell cursor: (weekday index, slot index).
    cell: (usize, usize),
    dialog: Option<Dialog>,
    search: String,
    throbber: ThrobberState,
    focused: bool,
}

impl AcademicsScreen {
    pub fn new() -> Self {
        Self {
            snapshot: AcademicsSnapshot::default(),
            cursor: Cursor::default(),
            cell: (0, 0),
            dialog: None,
            search: String::new(),
            throbber: ThrobberState::default(),
            focused: false,
        }
    }

    fn rows(&self) -> Vec<TreeRow<'_>> {
        self.snapshot.tree.visible_rows(&self.snapshot.grades)
    }

    fn selected_grade(&self) -> Option<&Grade> {
        let key = self.snapshot.selection.grade.as_ref()?;
        self.snapshot.grades.iter().find(|g| &g.name == key)
    }

    /// Grade owning the row under the cursor.
    fn cursor_grade(&self) -> Option<GradeKey> {
        match self.rows().get(self.cursor.index())? {
            TreeRow::Grade(g) | TreeRow::Section(g, _) | TreeRow::Subject(g, _) => {
                Some(g.name.clone())
            }
            TreeRow::Student(section, _) => self
                .snapshot
                .grades
                .iter()
                .find(|g| g.section(section.id).is_some())
                .map(|g| g.name.clone()),
        }
    }

    fn cursor_day(&self) -> Weekday {
        Weekday::iter().nth(self.cell.0).unwrap_or(Weekday::Monday)
    }

    fn cursor_entry(&self) -> Option<&ScheduleEntry> {
        let slot = SLOTS.get(self.cell.1)?;
        ScheduleGrid::new(&self.snapshot.schedule).cell(self.cursor_day(), slot)
    }

    /// Neighbouring grade for `{` / `}`, wrapping.
    fn step_grade(&self, forward: bool) -> Option<GradeKey> {
        let grades = &self.snapshot.grades;
        let len = grades.len();
        if len == 0 {
            return None;
        }
        let current = self
            .snapshot
            .selection
            .grade
            .as_ref()
            .and_then(|key| grades.iter().position(|g| &g.name == key));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        grades.get(next).map(|g| g.name.clone())
    }

    fn sync_dialog(&mut self) {
        let Some(modal) = &self.snapshot.modal else {
            self.dialog = None;
            return;
        };
        // Rebuild only for a different dialog so typed values survive a failed submit
        let stale = self
            .dialog
            .as_ref()
            .is_none_or(|d| mem::discriminant(&d.kind) != mem::discriminant(&modal.kind));
        if stale {
            let kind = modal.kind.clone();
            self.dialog = Some(Dialog::new(&kind, self.selected_grade()));
        }
    }

    // ── Keys ─────────────────────────────────────────────────────────

    fn handle_dialog_key(&mut self, key: KeyEvent) -> Option<Action> {
        let phase = self.snapshot.modal.as_ref().map(|m| &m.phase);
        if phase == Some(&ModalPhase::Submitting) {
            return None;
        }
        let dialog = self.dialog.as_mut()?;
        match (&dialog.kind, key.code) {
            (_, KeyCode::Esc) => academics(AcademicsRequest::CloseModal),
            (ModalKind::Timeslots, KeyCode::Enter | KeyCode::Char('q')) => {
                academics(AcademicsRequest::CloseModal)
            }
            (ModalKind::Delete { .. }, KeyCode::Char('y' | 'Y') | KeyCode::Enter) => {
                academics(AcademicsRequest::SubmitModal(dialog.kind.clone()))
            }
            (ModalKind::Delete { .. }, KeyCode::Char('n' | 'N')) => {
                academics(AcademicsRequest::CloseModal)
            }
            (_, KeyCode::Enter) if dialog.form.is_some() => {
                academics(AcademicsRequest::SubmitModal(dialog.fill()))
            }
            _ => {
                if let Some(form) = dialog.form.as_mut() {
                    form.handle_key(key);
                }
                None
            }
        }
    }

    fn handle_tree_key(&mut self, key: KeyEvent) -> Option<Action> {
        let len = self.rows().len();
        if self.cursor.handle_key(key, len) {
            return None;
        }
        let row = self.rows().get(self.cursor.index()).copied();
        let item = row.and_then(|r| r.item());
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => match row? {
                TreeRow::Grade(g) => academics(AcademicsRequest::ToggleGrade(g.name.clone())),
                TreeRow::Section(_, s) => academics(AcademicsRequest::ToggleSection(s.id)),
                TreeRow::Student(..) | TreeRow::Subject(..) => None,
            },
            KeyCode::Char('a') => academics(AcademicsRequest::OpenModal(ModalKind::add_grade())),
            KeyCode::Char('s') => {
                let grade = self.cursor_grade()?;
                academics(AcademicsRequest::OpenModal(ModalKind::add_section(grade)))
            }
            KeyCode::Char('u') => {
                let grade = self.cursor_grade()?;
                academics(AcademicsRequest::OpenModal(ModalKind::add_subject(grade)))
            }
            KeyCode::Char('e') => academics(AcademicsRequest::OpenModal(ModalKind::edit(item?))),
            KeyCode::Char('d') => {
                academics(AcademicsRequest::OpenModal(ModalKind::Delete { item: item? }))
            }
            KeyCode::Char('c') => academics(AcademicsRequest::ToggleView),
            _ => None,
        }
    }

    fn handle_calendar_key(&mut self, key: KeyEvent) -> Option<Action> {
        let last_day = Weekday::iter().count().saturating_sub(1);
        let last_slot = SLOTS.len().saturating_sub(1);
        let (day, slot) = &mut self.cell;
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => *day = day.saturating_sub(1),
            KeyCode::Right | KeyCode::Char('l') => *day = (*day + 1).min(last_day),
            KeyCode::Up | KeyCode::Char('k') => *slot = slot.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *slot = (*slot + 1).min(last_slot),
            KeyCode::Char('[') => return academics(AcademicsRequest::CycleSection { forward: false }),
            KeyCode::Char(']') => return academics(AcademicsRequest::CycleSection { forward: true }),
            KeyCode::Char('{') => {
                return academics(AcademicsRequest::SelectGrade(self.step_grade(false)?));
            }
            KeyCode::Char('}') => {
                return academics(AcademicsRequest::SelectGrade(self.step_grade(true)?));
            }
            KeyCode::Char('a') => {
                if self.snapshot.selection.section.is_none() {
                    return Some(Action::Notify(Notification::error(SELECT_GRADE_AND_SECTION)));
                }
                let slot = SLOTS.get(self.cell.1)?;
                let draft = ScheduleDraft::in_slot(self.cursor_day(), slot);
                return academics(AcademicsRequest::OpenModal(ModalKind::AddSchedule { draft }));
            }
            KeyCode::Char('x') => {
                let entry = self.cursor_entry()?;
                return Some(Action::ShowConfirm(ConfirmAction::DeleteScheduleEntry {
                    id: entry.id,
                    label: format!(
                        "{} ({} {})",
                        entry.subject_name(),
                        entry.day_of_week.short(),
                        entry.start_hm()
                    ),
                }));
            }
            KeyCode::Char('t') => {
                return academics(AcademicsRequest::OpenModal(ModalKind::Timeslots));
            }
            KeyCode::Char('c') => return academics(AcademicsRequest::ToggleView),
            _ => {}
        }
        None
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn header(&self) -> Line<'static> {
        let view = self.snapshot.view;
        let mut spans = vec![
            Span::raw(" "),
            Span::styled(" Hierarchy ", theme::tab(view == ViewMode::Hierarchy)),
            Span::styled(" Calendar ", theme::tab(view == ViewMode::Calendar)),
            Span::raw("   "),
        ];
        if let Some(grade) = self.selected_grade() {
            let section = self
                .snapshot
                .selection
                .section
                .and_then(|id| grade.section(id))
                .map_or("-", |s| s.name.as_str());
            spans.push(Span::styled(
                format!("{} · Section {section}", grade.name),
                theme::hint(),
            ));
        }
        Line::from(spans)
    }

    fn render_tree(&self, frame: &mut Frame, area: Rect) {
        let tree = &self.snapshot.tree;
        let rows = self.rows();
        let shown = rows.len();
        let table_rows = rows.into_iter().map(|row| {
            let indent = "  ".repeat(row.depth());
            let (label, detail, style) = match row {
                TreeRow::Grade(g) => {
                    let marker = if tree.is_grade_expanded(&g.name) { "▾" } else { "▸" };
                    (
                        format!("{marker} {}", g.name),
                        format!("{} sections · {} subjects", g.sections.len(), g.subjects.len()),
                        theme::title(),
                    )
                }
                TreeRow::Section(_, s) => {
                    let marker = if tree.is_section_expanded(s.id) { "▾" } else { "▸" };
                    (
                        format!("{marker} Section {}", s.name),
                        format!("{} students", s.students_count),
                        theme::row(),
                    )
                }
                TreeRow::Student(_, st) => (
                    format!("  {} {}", st.badge(), st.name),
                    String::new(),
                    theme::hint(),
                ),
                TreeRow::Subject(_, sub) => (
                    format!("◆ {}", sub.name),
                    sub.code.clone().unwrap_or_default(),
                    Style::default().fg(theme::AMBER),
                ),
            };
            Row::new(vec![
                Cell::from(format!("{indent}{label}")),
                Cell::from(detail).style(theme::hint()),
            ])
            .style(style)
        });

        let title = if self.search.is_empty() {
            format!(" Grades ({}) ", self.snapshot.grades.len())
        } else {
            format!(" Grades · {shown} rows · \"{}\" ", self.search)
        };
        let table = Table::new(table_rows, [Constraint::Percentage(60), Constraint::Percentage(40)])
            .row_highlight_style(theme::selected())
            .block(widgets::panel(title, self.focused));
        frame.render_stateful_widget(table, area, &mut self.cursor.state());
    }

    fn render_calendar(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::panel(" Weekly schedule ".into(), self.focused);
        if self.snapshot.selection.section.is_none() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled(format!("  {SELECT_GRADE_AND_SECTION}"), theme::hint())),
                    Line::from(Span::styled("  { } pick a grade, [ ] a section", theme::hint())),
                ]),
                inner,
            );
            return;
        }

        let grid = ScheduleGrid::new(&self.snapshot.schedule);
        let header = Row::new(
            std::iter::once("Time".to_owned()).chain(Weekday::iter().map(|d| d.short().to_owned())),
        )
        .style(theme::table_header());

        let rows = grid.rows().into_iter().enumerate().map(|(slot_index, (slot, cells))| {
            let mut row = vec![Cell::from(Text::from(vec![
                Line::from(slot.start),
                Line::from(Span::styled(slot.end, theme::hint())),
            ]))];
            for (day_index, entry) in cells.into_iter().enumerate() {
                let mut cell = match entry {
                    Some(e) => Cell::from(Text::from(vec![
                        Line::from(e.subject_name().to_owned()),
                        Line::from(e.room_label().to_owned()),
                    ]))
                    .style(theme::subject(e.subject_id)),
                    None => Cell::from(""),
                };
                if (day_index, slot_index) == self.cell {
                    cell = cell.style(
                        entry
                            .map_or_else(theme::row, |e| theme::subject(e.subject_id))
                            .add_modifier(Modifier::REVERSED),
                    );
                }
                row.push(cell);
            }
            Row::new(row).height(2).bottom_margin(1)
        });

        let widths = std::iter::once(Constraint::Length(7))
            .chain(Weekday::iter().map(|_| Constraint::Fill(1)));
        frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
    }

    fn render_dialog(&self, frame: &mut Frame, area: Rect, dialog: &Dialog) {
        let Some(modal) = &self.snapshot.modal else {
            return;
        };
        let body_height = match (&dialog.form, &dialog.kind) {
            (Some(form), _) => form.height(),
            (None, ModalKind::Timeslots) => {
                u16::try_from(self.snapshot.schedule.len().clamp(1, 12)).unwrap_or(12)
            }
            (None, _) => 2,
        };
        let rect = widgets::centered(area, 64, body_height + 5);
        let inner = widgets::dialog(frame, rect, &modal.kind.title(), theme::border(true));
        let [body, message, hints] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        match (&dialog.form, &dialog.kind) {
            (Some(form), _) => form.render(frame, body),
            (None, ModalKind::Delete { item }) => {
                let extra = match item {
                    AcademicItem::Grade { .. } => "Its sections and subjects go with it.",
                    _ => "This cannot be undone.",
                };
                frame.render_widget(
                    Paragraph::new(vec![
                        Line::from(format!(" Delete {item}?")),
                        Line::from(Span::styled(format!(" {extra}"), theme::hint())),
                    ]),
                    body,
                );
            }
            (None, _) => {
                let entries = timeslots(&self.snapshot.schedule);
                let lines: Vec<Line> = if entries.is_empty() {
                    vec![Line::from(Span::styled(" No schedule entries yet", theme::hint()))]
                } else {
                    entries
                        .into_iter()
                        .map(|e| {
                            Line::from(vec![
                                Span::styled(
                                    format!(" {} {}–{} ", e.day_of_week.short(), e.start_hm(), e.end_hm()),
                                    theme::hint(),
                                ),
                                Span::styled(format!(" {} ", e.subject_name()), theme::subject(e.subject_id)),
                                Span::styled(format!("  {}", e.room_label()), theme::hint()),
                            ])
                        })
                        .collect()
                };
                frame.render_widget(Paragraph::new(lines), body);
            }
        }

        let status = match &modal.phase {
            ModalPhase::Editing => Line::from(""),
            ModalPhase::Submitting => Line::from(Span::styled(" Saving…", theme::hint())),
            ModalPhase::Failed(msg) => Line::from(Span::styled(format!(" {msg}"), theme::error())),
        };
        frame.render_widget(Paragraph::new(status), message);

        let pairs: &[(&str, &str)] = match dialog.kind {
            ModalKind::Delete { .. } => &[("y", "delete"), ("n", "cancel")],
            ModalKind::Timeslots => &[("Esc", "close")],
            ModalKind::AddSchedule { .. } => {
                &[("Tab", "next"), ("←/→", "choose"), ("Enter", "save"), ("Esc", "cancel")]
            }
            _ => &[("Tab", "next"), ("Enter", "save"), ("Esc", "cancel")],
        };
        frame.render_widget(Paragraph::new(widgets::hints(pairs)), hints);
    }
}

impl Component for AcademicsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.snapshot.modal.is_some() {
            return Ok(self.handle_dialog_key(key));
        }
        Ok(match self.snapshot.view {
            ViewMode::Hierarchy => self.handle_tree_key(key),
            ViewMode::Calendar => self.handle_calendar_key(key),
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::AcademicsUpdated(snapshot) => {
                self.snapshot = (**snapshot).clone();
                let len = self.rows().len();
                self.cursor.clamp(len);
                self.sync_dialog();
            }
            Action::Loading(ScreenId::Academics) => self.snapshot.loading = true,
            Action::SearchInput(query) => self.search.clone_from(query),
            Action::Tick => {
                if self.snapshot.loading {
                    self.throbber.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [header, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);
        frame.render_widget(Paragraph::new(self.header()), header);

        let pairs: &[(&str, &str)] = match self.snapshot.view {
            ViewMode::Hierarchy => {
                self.render_tree(frame, body);
                &[
                    ("Enter", "expand"),
                    ("a/s/u", "add grade/section/subject"),
                    ("e", "edit"),
                    ("d", "delete"),
                    ("c", "calendar"),
                ]
            }
            ViewMode::Calendar => {
                self.render_calendar(frame, body);
                &[
                    ("{ }", "grade"),
                    ("[ ]", "section"),
                    ("a", "add"),
                    ("x", "remove"),
                    ("t", "timeslots"),
                    ("c", "tree"),
                ]
            }
        };
        widgets::status_line(
            frame,
            status,
            self.snapshot.loading,
            self.snapshot.error.as_deref(),
            &self.throbber,
            pairs,
        );

        if let Some(dialog) = &self.dialog {
            self.render_dialog(frame, area, dialog);
        }
    }

    fn captures_input(&self) -> bool {
        self.snapshot.modal.is_some()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use campus_api::models::{Section, SectionStudent, Subject};
    use campus_api::{SectionId, StudentId};
    use campus_core::academics::{Modal, ScheduleSelection, TreeState};
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn press(screen: &mut AcademicsScreen, code: KeyCode) -> Option<Action> {
        screen.handle_key_event(key(code)).unwrap()
    }

    fn type_text(screen: &mut AcademicsScreen, text: &str) {
        for c in text.chars() {
            press(screen, KeyCode::Char(c));
        }
    }

    fn grades() -> Vec<Grade> {
        vec![
            Grade {
                name: GradeKey::from("9th"),
                sections: vec![Section {
                    id: SectionId(1),
                    name: "A".into(),
                    students_count: 1,
                    students: vec![SectionStudent {
                        id: StudentId(7),
                        name: "Ada".into(),
                    }],
                }],
                subjects: vec![
                    Subject {
                        id: SubjectId(1),
                        name: "Math".into(),
                        code: Some("MTH".into()),
                    },
                    Subject {
                        id: SubjectId(2),
                        name: "Physics".into(),
                        code: None,
                    },
                ],
            },
            Grade {
                name: GradeKey::from("10th"),
                sections: Vec::new(),
                subjects: Vec::new(),
            },
        ]
    }

    fn snapshot() -> AcademicsSnapshot {
        let grades = grades();
        let mut tree = TreeState::default();
        tree.reset_defaults(&grades);
        AcademicsSnapshot {
            grades: Arc::new(grades),
            tree,
            ..AcademicsSnapshot::default()
        }
    }

    fn screen_with(snapshot: AcademicsSnapshot) -> AcademicsScreen {
        let mut screen = AcademicsScreen::new();
        screen
            .update(&Action::AcademicsUpdated(Box::new(snapshot)))
            .unwrap();
        screen
    }

    fn with_modal(mut snapshot: AcademicsSnapshot, kind: ModalKind, phase: ModalPhase) -> AcademicsSnapshot {
        snapshot.modal = Some(Modal { kind, phase });
        snapshot
    }

    fn calendar() -> AcademicsSnapshot {
        AcademicsSnapshot {
            view: ViewMode::Calendar,
            selection: ScheduleSelection {
                grade: Some(GradeKey::from("9th")),
                section: Some(SectionId(1)),
            },
            ..snapshot()
        }
    }

    fn opened(action: Option<Action>) -> ModalKind {
        match action {
            Some(Action::Request(Request::Academics(AcademicsRequest::OpenModal(kind)))) => kind,
            other => panic!("unexpected {other:?}"),
        }
    }

    fn submitted(action: Option<Action>) -> ModalKind {
        match action {
            Some(Action::Request(Request::Academics(AcademicsRequest::SubmitModal(kind)))) => kind,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn enter_toggles_the_grade_under_the_cursor() {
        let mut screen = screen_with(snapshot());
        // 9th, Section A, Ada, Math, Physics, 10th
        assert_eq!(screen.rows().len(), 6);
        match press(&mut screen, KeyCode::Enter) {
            Some(Action::Request(Request::Academics(AcademicsRequest::ToggleGrade(key)))) => {
                assert_eq!(key, GradeKey::from("9th"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn add_section_targets_the_owning_grade() {
        let mut screen = screen_with(snapshot());
        // Cursor on the student row
        press(&mut screen, KeyCode::Char('j'));
        press(&mut screen, KeyCode::Char('j'));
        assert_eq!(
            opened(press(&mut screen, KeyCode::Char('s'))),
            ModalKind::add_section(GradeKey::from("9th"))
        );
    }

    #[test]
    fn students_are_not_editable() {
        let mut screen = screen_with(snapshot());
        press(&mut screen, KeyCode::Char('j'));
        press(&mut screen, KeyCode::Char('j'));
        assert!(press(&mut screen, KeyCode::Char('e')).is_none());
        assert!(press(&mut screen, KeyCode::Char('d')).is_none());
    }

    #[test]
    fn subject_dialog_submits_typed_values() {
        let kind = ModalKind::add_subject(GradeKey::from("9th"));
        let mut screen = screen_with(with_modal(snapshot(), kind, ModalPhase::Editing));
        assert!(screen.captures_input());

        type_text(&mut screen, "Chemistry");
        press(&mut screen, KeyCode::Tab);
        type_text(&mut screen, "CHM");
        assert_eq!(
            submitted(press(&mut screen, KeyCode::Enter)),
            ModalKind::AddSubject {
                grade: GradeKey::from("9th"),
                name: "Chemistry".into(),
                code: "CHM".into(),
            }
        );
    }

    #[test]
    fn failed_submit_keeps_typed_values() {
        let mut screen = screen_with(with_modal(snapshot(), ModalKind::add_grade(), ModalPhase::Editing));
        type_text(&mut screen, "9th");
        screen
            .update(&Action::AcademicsUpdated(Box::new(with_modal(
                snapshot(),
                ModalKind::AddGrade { name: "9th".into() },
                ModalPhase::Failed("Grade already exists".into()),
            ))))
            .unwrap();
        type_text(&mut screen, "-b");
        assert_eq!(
            submitted(press(&mut screen, KeyCode::Enter)),
            ModalKind::AddGrade { name: "9th-b".into() }
        );
    }

    #[test]
    fn keys_are_ignored_while_submitting() {
        let mut screen = screen_with(with_modal(
            snapshot(),
            ModalKind::add_grade(),
            ModalPhase::Submitting,
        ));
        assert!(press(&mut screen, KeyCode::Esc).is_none());
    }

    #[test]
    fn add_entry_needs_a_section() {
        let mut screen = screen_with(AcademicsSnapshot {
            view: ViewMode::Calendar,
            ..snapshot()
        });
        match press(&mut screen, KeyCode::Char('a')) {
            Some(Action::Notify(n)) => assert_eq!(n.message, SELECT_GRADE_AND_SECTION),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn add_entry_prefills_the_cursor_slot() {
        let mut screen = screen_with(calendar());
        press(&mut screen, KeyCode::Right);
        press(&mut screen, KeyCode::Down);
        assert_eq!(
            opened(press(&mut screen, KeyCode::Char('a'))),
            ModalKind::AddSchedule {
                draft: ScheduleDraft::in_slot(Weekday::Tuesday, &SLOTS[1]),
            }
        );
    }

    #[test]
    fn schedule_dialog_maps_the_subject_picker_to_ids() {
        let draft = ScheduleDraft::in_slot(Weekday::Wednesday, &SLOTS[2]);
        let mut screen = screen_with(with_modal(
            calendar(),
            ModalKind::AddSchedule { draft },
            ModalPhase::Editing,
        ));
        press(&mut screen, KeyCode::Right);
        for _ in 0..4 {
            press(&mut screen, KeyCode::Tab);
        }
        type_text(&mut screen, "B12");

        match submitted(press(&mut screen, KeyCode::Enter)) {
            ModalKind::AddSchedule { draft } => {
                assert_eq!(draft.subject_id, Some(SubjectId(2)));
                assert_eq!(draft.day_of_week, Weekday::Wednesday);
                assert_eq!(draft.start_time, SLOTS[2].start);
                assert_eq!(draft.room, "B12");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn grade_stepping_wraps() {
        let mut screen = screen_with(calendar());
        match press(&mut screen, KeyCode::Char('}')) {
            Some(Action::Request(Request::Academics(AcademicsRequest::SelectGrade(key)))) => {
                assert_eq!(key, GradeKey::from("10th"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(screen.step_grade(false), Some(GradeKey::from("10th")));
    }
}
