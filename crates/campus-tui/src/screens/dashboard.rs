//! Dashboard screen: greeting and headline counts.

use campus_api::models::User;
use campus_core::DashboardSummary;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use throbber_widgets_tui::ThrobberState;

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets;

pub struct DashboardScreen {
    user: Option<User>,
    summary: Option<DashboardSummary>,
    loading: bool,
    throbber: ThrobberState,
    focused: bool,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            user: None,
            summary: None,
            loading: false,
            throbber: ThrobberState::default(),
            focused: false,
        }
    }

    /// `(label, value, accent)` for every count the role can see.
    fn cards(&self) -> Vec<(&'static str, usize, Color)> {
        let Some(summary) = &self.summary else {
            return Vec::new();
        };
        let mut cards = Vec::new();
        if let Some(n) = summary.teachers {
            cards.push(("Teachers", n, theme::INDIGO));
        }
        if let Some(n) = summary.students {
            cards.push(("Students", n, theme::SKY));
        }
        if let Some(n) = summary.parents {
            cards.push(("Parents", n, theme::EMERALD));
        }
        cards.push(("Announcements", summary.announcements, theme::AMBER));
        if let Some(n) = summary.unread_feedback {
            cards.push(("Unread feedback", n, theme::ROSE));
        }
        cards
    }
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match key.code {
            KeyCode::Char('x') => Some(Action::ShowConfirm(ConfirmAction::Logout)),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Session(state) => {
                self.user = state.user().cloned();
                if self.user.is_none() {
                    self.summary = None;
                }
            }
            Action::Loading(ScreenId::Dashboard) => self.loading = true,
            Action::SummaryUpdated(summary) => {
                self.summary = Some(summary.clone());
                self.loading = false;
            }
            // A failed summary arrives only as a toast
            Action::Notify(_) => self.loading = false,
            Action::Tick if self.loading => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::panel(" Dashboard ".into(), self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [greeting, cards_area, _, status] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner);

        let (name, role) = self
            .user
            .as_ref()
            .map_or(("", String::new()), |u| (u.name.as_str(), u.role.to_string()));
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(vec![
                    Span::styled(format!("  Welcome back, {name}"), theme::title()),
                    Span::styled(format!("  ({role})"), theme::hint()),
                ]),
            ]),
            greeting,
        );

        let cards = self.cards();
        if !cards.is_empty() {
            let columns = Layout::horizontal(cards.iter().map(|_| Constraint::Fill(1)))
                .spacing(1)
                .split(cards_area);
            for ((label, value, accent), column) in cards.iter().zip(columns.iter()) {
                let card = widgets::panel(format!(" {label} "), false)
                    .border_style(Style::default().fg(*accent));
                let card_inner = card.inner(*column);
                frame.render_widget(card, *column);
                frame.render_widget(
                    Paragraph::new(vec![
                        Line::from(""),
                        Line::from(Span::styled(
                            value.to_string(),
                            Style::default().fg(*accent).add_modifier(Modifier::BOLD),
                        )),
                    ])
                    .alignment(Alignment::Center),
                    card_inner,
                );
            }
        }

        widgets::status_line(
            frame,
            status,
            self.loading,
            None,
            &self.throbber,
            &[("r", "refresh"), ("x", "log out")],
        );
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn non_admin_sees_only_announcements() {
        let mut screen = DashboardScreen::new();
        screen
            .update(&Action::SummaryUpdated(DashboardSummary {
                announcements: 4,
                ..DashboardSummary::default()
            }))
            .unwrap();
        let labels: Vec<_> = screen.cards().iter().map(|c| (c.0, c.1)).collect();
        assert_eq!(labels, vec![("Announcements", 4)]);
    }

    #[test]
    fn admin_cards_in_order() {
        let mut screen = DashboardScreen::new();
        screen
            .update(&Action::SummaryUpdated(DashboardSummary {
                teachers: Some(3),
                students: Some(40),
                parents: Some(22),
                announcements: 2,
                unread_feedback: Some(1),
            }))
            .unwrap();
        let labels: Vec<_> = screen.cards().iter().map(|c| c.0).collect();
        assert_eq!(
            labels,
            vec!["Teachers", "Students", "Parents", "Announcements", "Unread feedback"]
        );
    }

    #[test]
    fn x_asks_before_logging_out() {
        let mut screen = DashboardScreen::new();
        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('x')))
            .unwrap();
        assert!(matches!(
            action,
            Some(Action::ShowConfirm(ConfirmAction::Logout))
        ));
    }
}
