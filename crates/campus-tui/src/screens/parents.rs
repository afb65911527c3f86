//! Parents screen: guardians and the students linked to them.

use campus_api::models::ParentRecord;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};

use super::ListView;
use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets;

pub struct ParentsScreen {
    view: ListView<ParentRecord>,
}

impl ParentsScreen {
    pub fn new() -> Self {
        Self {
            view: ListView::default(),
        }
    }
}

fn children(parent: &ParentRecord) -> String {
    if parent.students.is_empty() {
        return "-".into();
    }
    parent
        .students
        .iter()
        .map(|s| s.user.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Component for ParentsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let len = self.view.snapshot.items.len();
        if self.view.navigate(key, len) {
            return Ok(None);
        }
        match key.code {
            KeyCode::Enter => self.view.detail_open = !self.view.detail_open,
            KeyCode::Esc if self.view.detail_open => self.view.detail_open = false,
            KeyCode::Char('d') => {
                if let Some(parent) = self.view.selected() {
                    return Ok(Some(Action::ShowConfirm(ConfirmAction::DeleteParent {
                        id: parent.id,
                        name: parent.user.name.clone(),
                    })));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ParentsUpdated(snapshot) => self.view.apply(snapshot),
            Action::Loading(ScreenId::Parents) => self.view.set_loading(),
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
        let header = Row::new(["Name", "Email", "Children"]).style(theme::table_header());
        let rows = items.iter().map(|p| {
            Row::new(vec![
                Cell::from(p.user.name.clone()),
                Cell::from(p.user.email.clone()),
                Cell::from(children(p)),
            ])
            .style(theme::row())
        });
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(30),
                Constraint::Percentage(35),
                Constraint::Percentage(35),
            ],
        )
        .header(header)
        .row_highlight_style(theme::selected())
        .block(widgets::panel(
            self.view.title("Parents", items.len()),
            self.view.focused,
        ));
        frame.render_stateful_widget(table, table_area, &mut self.view.cursor.state());

        if let (Some(parent), Some(detail)) = (selected, detail_area) {
            let block = widgets::panel(format!(" {} ", parent.user.name), false);
            let inner = block.inner(detail);
            frame.render_widget(block, detail);

            let mut lines = vec![
                Line::from(vec![
                    Span::styled("Email     ", theme::hint()),
                    Span::styled(parent.user.email.clone(), theme::row()),
                ]),
                Line::from(""),
                Line::from(Span::styled("Children", theme::table_header())),
            ];
            for child in &parent.students {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<20}", child.user.name), theme::row()),
                    Span::styled(child.class_name().unwrap_or("-").to_owned(), theme::hint()),
                ]));
            }
            frame.render_widget(Paragraph::new(lines), inner);
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
