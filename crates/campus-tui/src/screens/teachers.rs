//! Teachers screen: staff table with subject and class assignments.

use campus_api::models::TeacherRecord;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, Wrap};

use super::ListView;
use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets;

pub struct TeachersScreen {
    view: ListView<TeacherRecord>,
}

impl TeachersScreen {
    pub fn new() -> Self {
        Self {
            view: ListView::default(),
        }
    }

    fn render_detail(frame: &mut Frame, area: Rect, teacher: &TeacherRecord) {
        let block = widgets::panel(format!(" {} ", teacher.user.name), false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Email     ", theme::hint()),
                Span::styled(teacher.user.email.clone(), theme::row()),
            ]),
            Line::from(""),
            Line::from(Span::styled("Assignments", theme::table_header())),
        ];
        if teacher.assignments.is_empty() {
            lines.push(Line::from(Span::styled("  none", theme::hint())));
        }
        for assignment in &teacher.assignments {
            let subject = assignment
                .subject
                .as_ref()
                .map_or_else(|| assignment.subject_id.to_string(), |s| s.name.clone());
            let class = assignment.school_class.as_ref().map_or_else(
                || assignment.class_id.to_string(),
                |c| match c.section.as_deref() {
                    Some(section) => format!("{} {section}", c.name),
                    None => c.name.clone(),
                },
            );
            lines.push(Line::from(vec![
                Span::styled(format!("  {subject:<16}"), theme::row()),
                Span::styled(class, theme::hint()),
            ]));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

impl Component for TeachersScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let len = self.view.snapshot.items.len();
        if self.view.navigate(key, len) {
            return Ok(None);
        }
        match key.code {
            KeyCode::Enter => self.view.detail_open = !self.view.detail_open,
            KeyCode::Esc if self.view.detail_open => self.view.detail_open = false,
            KeyCode::Char('d') => {
                if let Some(teacher) = self.view.selected() {
                    return Ok(Some(Action::ShowConfirm(ConfirmAction::DeleteTeacher {
                        id: teacher.id,
                        name: teacher.user.name.clone(),
                    })));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::TeachersUpdated(snapshot) => self.view.apply(snapshot),
            Action::Loading(ScreenId::Teachers) => self.view.set_loading(),
            Action::SearchInput(query) => self.view.search.clone_from(query),
            Action::Tick => self.view.tick(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [body, status] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

        let selected = self.view.selected().filter(|_| self.view.detail_open);
        let (table_area, detail_area) = if selected.is_some() {
            let [left, right] =
                Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .areas(body);
            (left, Some(right))
        } else {
            (body, None)
        };

        let items = &self.view.snapshot.items;
        let header = Row::new(["Name", "Email", "Subjects", "Classes"]).style(theme::table_header());
        let rows = items.iter().map(|t| {
            Row::new(vec![
                Cell::from(t.user.name.clone()),
                Cell::from(t.user.email.clone()),
                Cell::from(t.subject_names().join(", ")),
                Cell::from(t.class_labels().join(", ")),
            ])
            .style(theme::row())
        });
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(22),
                Constraint::Percentage(28),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ],
        )
        .header(header)
        .row_highlight_style(theme::selected())
        .block(widgets::panel(
            self.view.title("Teachers", items.len()),
            self.view.focused,
        ));
        frame.render_stateful_widget(table, table_area, &mut self.view.cursor.state());

        if let (Some(teacher), Some(detail)) = (selected, detail_area) {
            Self::render_detail(frame, detail, teacher);
        }

        widgets::status_line(
            frame,
            status,
            self.view.snapshot.loading,
            self.view.error(),
            &self.view.throbber,
            &[("j/k", "move"), ("Enter", "details"), ("d", "delete"), ("/", "search")],
        );
    }

    fn set_focused(&mut self, focused: bool) {
        self.view.focused = focused;
    }
}
