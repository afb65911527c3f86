//! Students screen: roster table with class filter tabs and a top
//! performers panel.

use campus_api::models::StudentRecord;
use campus_core::lists::{GradeFilter, class_names, filter_students, top_performers};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};

use super::ListView;
use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets;

const TOP_PERFORMERS: usize = 5;

pub struct StudentsScreen {
    view: ListView<StudentRecord>,
    filter: GradeFilter,
}

impl StudentsScreen {
    pub fn new() -> Self {
        Self {
            view: ListView::default(),
            filter: GradeFilter::All,
        }
    }

    /// Rows after the class filter; the search was applied upstream.
    fn visible(&self) -> Vec<&StudentRecord> {
        filter_students(&self.view.snapshot.items, "", &self.filter)
    }

    /// All → first class → … → last class → All.
    fn cycle_filter(&mut self) {
        let names = class_names(&self.view.snapshot.items);
        self.filter = match &self.filter {
            GradeFilter::All => names.first().cloned().map_or(GradeFilter::All, GradeFilter::Named),
            GradeFilter::Named(current) => names
                .iter()
                .position(|n| n == current)
                .and_then(|i| names.get(i + 1))
                .cloned()
                .map_or(GradeFilter::All, GradeFilter::Named),
        };
        self.view.cursor.select(0, self.visible().len());
    }

    fn filter_tabs(&self) -> Line<'static> {
        let mut spans = vec![Span::raw(" ")];
        let mut push = |label: &str, active: bool| {
            spans.push(Span::styled(format!(" {label} "), theme::tab(active)));
        };
        push("All", self.filter == GradeFilter::All);
        for name in class_names(&self.view.snapshot.items) {
            let active = matches!(&self.filter, GradeFilter::Named(n) if *n == name);
            push(&name, active);
        }
        Line::from(spans)
    }

    fn render_top(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::panel(" Top performers ".into(), false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = top_performers(&self.view.snapshot.items, TOP_PERFORMERS)
            .into_iter()
            .enumerate()
            .map(|(rank, s)| {
                Line::from(vec![
                    Span::styled(format!("{}. ", rank + 1), theme::hint()),
                    Span::styled(format!("{:<20}", s.user.name), theme::row()),
                    Span::styled(
                        format!("{:.1}", s.average()),
                        Style::default().fg(score_color(s.average())),
                    ),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn score_color(score: f64) -> ratatui::style::Color {
    if score >= 85.0 {
        theme::EMERALD
    } else if score >= 70.0 {
        theme::AMBER
    } else {
        theme::ROSE
    }
}

impl Component for StudentsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let len = self.visible().len();
        if self.view.navigate(key, len) {
            return Ok(None);
        }
        let selected = self
            .visible()
            .get(self.view.cursor.index())
            .map(|s| (s.id, s.user.name.clone()));
        match key.code {
            KeyCode::Char('f') => self.cycle_filter(),
            KeyCode::Char('d') => {
                if let Some((id, name)) = selected {
                    return Ok(Some(Action::ShowConfirm(ConfirmAction::DeleteStudent { id, name })));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::StudentsUpdated(snapshot) => {
                self.view.apply(snapshot);
                // Drop a filter whose class vanished
                if let GradeFilter::Named(name) = &self.filter {
                    if !class_names(&snapshot.items).contains(name) {
                        self.filter = GradeFilter::All;
                    }
                }
                self.view.cursor.clamp(self.visible().len());
            }
            Action::Loading(ScreenId::Students) => self.view.set_loading(),
            Action::SearchInput(query) => self.view.search.clone_from(query),
            Action::Tick => self.view.tick(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [tabs, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);
        frame.render_widget(Paragraph::new(self.filter_tabs()), tabs);

        let [table_area, top_area] =
            Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)]).areas(body);

        let visible = self.visible();
        let header = Row::new(["Name", "Email", "Class", "Avg"]).style(theme::table_header());
        let rows = visible.iter().map(|s| {
            Row::new(vec![
                Cell::from(s.user.name.clone()),
                Cell::from(s.user.email.clone()),
                Cell::from(s.class_name().unwrap_or("-").to_owned()),
                Cell::from(Span::styled(
                    format!("{:.1}", s.average()),
                    Style::default().fg(score_color(s.average())),
                )),
            ])
            .style(theme::row())
        });
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(30),
                Constraint::Percentage(38),
                Constraint::Percentage(20),
                Constraint::Percentage(12),
            ],
        )
        .header(header)
        .row_highlight_style(theme::selected())
        .block(widgets::panel(
            self.view.title("Students", visible.len()),
            self.view.focused,
        ));
        frame.render_stateful_widget(table, table_area, &mut self.view.cursor.state());

        self.render_top(frame, top_area);

        widgets::status_line(
            frame,
            status,
            self.view.snapshot.loading,
            self.view.error(),
            &self.view.throbber,
            &[("j/k", "move"), ("f", "class filter"), ("d", "delete"), ("/", "search")],
        );
    }

    fn set_focused(&mut self, focused: bool) {
        self.view.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use campus_api::StudentId;
    use campus_api::models::{ClassRef, UserRef};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::action::ListSnapshot;

    fn student(id: u64, name: &str, class: &str) -> StudentRecord {
        StudentRecord {
            id: StudentId(id),
            user: UserRef {
                name: name.into(),
                ..UserRef::default()
            },
            class_id: None,
            school_class: Some(ClassRef {
                name: class.into(),
                ..ClassRef::default()
            }),
            grades_avg_score: None,
        }
    }

    fn loaded() -> StudentsScreen {
        let mut screen = StudentsScreen::new();
        screen
            .update(&Action::StudentsUpdated(ListSnapshot {
                items: Arc::new(vec![
                    student(1, "Ada", "Grade 1"),
                    student(2, "Ben", "Grade 2"),
                    student(3, "Cy", "Grade 1"),
                ]),
                total: 3,
                loading: false,
                error: None,
            }))
            .unwrap();
        screen
    }

    fn names(screen: &StudentsScreen) -> Vec<String> {
        screen.visible().iter().map(|s| s.user.name.clone()).collect()
    }

    #[test]
    fn filter_cycles_through_classes_and_back() {
        let mut screen = loaded();
        let f = KeyEvent::from(KeyCode::Char('f'));

        screen.handle_key_event(f).unwrap();
        assert_eq!(names(&screen), vec!["Ada", "Cy"]);
        screen.handle_key_event(f).unwrap();
        assert_eq!(names(&screen), vec!["Ben"]);
        screen.handle_key_event(f).unwrap();
        assert_eq!(screen.filter, GradeFilter::All);
        assert_eq!(names(&screen).len(), 3);
    }

    #[test]
    fn delete_uses_the_filtered_row() {
        let mut screen = loaded();
        screen.handle_key_event(KeyEvent::from(KeyCode::Char('f'))).unwrap();
        screen.handle_key_event(KeyEvent::from(KeyCode::Char('j'))).unwrap();
        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('d')))
            .unwrap();
        match action {
            Some(Action::ShowConfirm(ConfirmAction::DeleteStudent { id, .. })) => {
                assert_eq!(id, StudentId(3));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn filter_resets_when_its_class_disappears() {
        let mut screen = loaded();
        screen.handle_key_event(KeyEvent::from(KeyCode::Char('f'))).unwrap();
        screen
            .update(&Action::StudentsUpdated(ListSnapshot {
                items: Arc::new(vec![student(2, "Ben", "Grade 2")]),
                total: 1,
                loading: false,
                error: None,
            }))
            .unwrap();
        assert_eq!(screen.filter, GradeFilter::All);
    }
}
