//! Feedback screen: the admin inbox, plus a compose dialog for everyone.

use campus_api::models::{Feedback, FeedbackKind, Role};
use campus_core::lists::FeedbackForm;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, Wrap};

use super::ListView;
use crate::action::{Action, ConfirmAction, Notification, NotificationLevel, Request};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets::{self, form::Form, form::TextField, picker::Choice};

const KINDS: [FeedbackKind; 3] = [
    FeedbackKind::Feedback,
    FeedbackKind::Bug,
    FeedbackKind::Suggestion,
];

const MESSAGE: usize = 0;
const KIND: usize = 1;

fn kind_color(kind: FeedbackKind) -> ratatui::style::Color {
    match kind {
        FeedbackKind::Feedback => theme::SKY,
        FeedbackKind::Bug => theme::ROSE,
        FeedbackKind::Suggestion => theme::AMBER,
    }
}

pub struct FeedbackScreen {
    view: ListView<Feedback>,
    unread: usize,
    role: Option<Role>,
    compose: Option<Form>,
    /// A send is in flight; the dialog waits for its result.
    sending: bool,
}

impl FeedbackScreen {
    pub fn new() -> Self {
        Self {
            view: ListView::default(),
            unread: 0,
            role: None,
            compose: None,
            sending: false,
        }
    }

    fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    fn open_compose(&mut self) {
        self.compose = Some(Form::new(vec![
            TextField::new("Message").into(),
            Choice::new("Type", KINDS.iter().map(ToString::to_string).collect()).into(),
        ]));
        self.sending = false;
    }

    fn handle_compose_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.sending {
            return None;
        }
        let form = self.compose.as_mut()?;
        match key.code {
            KeyCode::Esc => {
                self.compose = None;
                None
            }
            KeyCode::Enter => {
                let feedback = FeedbackForm {
                    message: form.value(MESSAGE).to_owned(),
                    kind: KINDS.get(form.choice(KIND)).copied().unwrap_or_default(),
                };
                if let Err(e) = feedback.validate() {
                    return Some(Action::Notify(Notification::error(e.user_message())));
                }
                self.sending = true;
                Some(Action::Request(Request::SendFeedback(feedback)))
            }
            _ => {
                form.handle_key(key);
                None
            }
        }
    }

    fn render_compose(&self, frame: &mut Frame, area: Rect, form: &Form) {
        let dialog = widgets::centered(area, 60, form.height() + 4);
        let inner = widgets::dialog(frame, dialog, "Send Feedback", theme::border(true));
        let [fields, hints] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);
        form.render(frame, fields);
        let line = if self.sending {
            Line::from(Span::styled(" Sending…", theme::hint()))
        } else {
            widgets::hints(&[("Tab", "next"), ("←/→", "type"), ("Enter", "send"), ("Esc", "cancel")])
        };
        frame.render_widget(Paragraph::new(line), hints);
    }

    fn render_inbox(&self, frame: &mut Frame, area: Rect) {
        let selected = self.view.selected().filter(|_| self.view.detail_open);
        let (table_area, detail_area) = if selected.is_some() {
            let [top, bottom] =
                Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .areas(area);
            (top, Some(bottom))
        } else {
            (area, None)
        };

        let items = &self.view.snapshot.items;
        let header = Row::new(["", "Type", "From", "Date", "Message"]).style(theme::table_header());
        let rows = items.iter().map(|f| {
            let style = if f.is_read {
                theme::row()
            } else {
                theme::row().add_modifier(Modifier::BOLD)
            };
            Row::new(vec![
                Cell::from(if f.is_read { " " } else { "●" })
                    .style(Style::default().fg(theme::INDIGO)),
                Cell::from(f.kind.to_string()).style(Style::default().fg(kind_color(f.kind))),
                Cell::from(f.author().to_owned()),
                Cell::from(
                    f.created_at()
                        .map(|t| t.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                ),
                Cell::from(f.message.lines().next().unwrap_or_default().to_owned()),
            ])
            .style(style)
        });
        let title = format!(
            "{}· {} unread ",
            self.view.title("Feedback", items.len()),
            self.unread
        );
        let table = Table::new(
            rows,
            [
                Constraint::Length(2),
                Constraint::Length(11),
                Constraint::Percentage(20),
                Constraint::Length(11),
                Constraint::Min(20),
            ],
        )
        .header(header)
        .row_highlight_style(theme::selected())
        .block(widgets::panel(title, self.view.focused));
        frame.render_stateful_widget(table, table_area, &mut self.view.cursor.state());

        if let (Some(feedback), Some(detail)) = (selected, detail_area) {
            let block = widgets::panel(format!(" {} · {} ", feedback.kind, feedback.author()), false);
            let inner = block.inner(detail);
            frame.render_widget(block, detail);
            frame.render_widget(
                Paragraph::new(feedback.message.clone()).wrap(Wrap { trim: false }),
                inner,
            );
        }
    }
}

impl Component for FeedbackScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.compose.is_some() {
            return Ok(self.handle_compose_key(key));
        }
        if key.code == KeyCode::Char('n') {
            self.open_compose();
            return Ok(None);
        }
        if !self.is_admin() {
            return Ok(None);
        }

        let len = self.view.snapshot.items.len();
        if self.view.navigate(key, len) {
            return Ok(None);
        }
        let Some((id, is_read)) = self.view.selected().map(|f| (f.id, f.is_read)) else {
            return Ok(None);
        };
        Ok(match key.code {
            KeyCode::Enter => {
                self.view.detail_open = !self.view.detail_open;
                None
            }
            KeyCode::Esc if self.view.detail_open => {
                self.view.detail_open = false;
                None
            }
            KeyCode::Char('m') if !is_read => Some(Action::Request(Request::MarkFeedbackRead(id))),
            KeyCode::Char('d') => Some(Action::ShowConfirm(ConfirmAction::DeleteFeedback { id })),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::FeedbackUpdated(snapshot) => {
                self.view.apply(&snapshot.list);
                self.unread = snapshot.unread;
            }
            Action::Loading(ScreenId::Feedback) => self.view.set_loading(),
            Action::SearchInput(query) => self.view.search.clone_from(query),
            Action::Session(state) => self.role = state.user().map(|u| u.role),
            Action::Notify(n) if self.sending => {
                self.sending = false;
                if n.level == NotificationLevel::Success {
                    self.compose = None;
                }
            }
            Action::Tick => self.view.tick(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [body, status] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

        if self.is_admin() {
            self.render_inbox(frame, body);
            widgets::status_line(
                frame,
                status,
                self.view.snapshot.loading,
                self.view.error(),
                &self.view.throbber,
                &[
                    ("j/k", "move"),
                    ("Enter", "read"),
                    ("m", "mark read"),
                    ("d", "delete"),
                    ("n", "new"),
                ],
            );
        } else {
            let block = widgets::panel(" Feedback ".into(), self.view.focused);
            let inner = block.inner(body);
            frame.render_widget(block, body);
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  Report a bug, suggest an improvement, or just say hello.",
                    theme::row(),
                )),
                Line::from(Span::styled(
                    "  Messages go to the school administrators.",
                    theme::hint(),
                )),
            ];
            frame.render_widget(Paragraph::new(lines), inner);
            frame.render_widget(Paragraph::new(widgets::hints(&[("n", "write feedback")])), status);
        }

        if let Some(form) = &self.compose {
            self.render_compose(frame, area, form);
        }
    }

    fn captures_input(&self) -> bool {
        self.compose.is_some()
    }

    fn set_focused(&mut self, focused: bool) {
        self.view.focused = focused;
        if !focused && !self.sending {
            self.compose = None;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use campus_api::models::User;
    use campus_api::{FeedbackId, UserId};
    use campus_core::SessionState;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::action::{FeedbackSnapshot, ListSnapshot};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn signed_in(role: Role) -> FeedbackScreen {
        let mut screen = FeedbackScreen::new();
        screen
            .update(&Action::Session(SessionState::Authenticated(User {
                id: UserId(1),
                name: "Sam".into(),
                email: "sam@school.test".into(),
                role,
                settings: None,
            })))
            .unwrap();
        screen
    }

    fn item(id: u64, is_read: bool) -> Feedback {
        Feedback {
            id: FeedbackId(id),
            message: format!("note {id}"),
            kind: FeedbackKind::Bug,
            is_read,
            created_at: None,
            user: None,
        }
    }

    fn with_inbox(mut screen: FeedbackScreen) -> FeedbackScreen {
        screen
            .update(&Action::FeedbackUpdated(FeedbackSnapshot {
                list: ListSnapshot {
                    items: Arc::new(vec![item(1, true), item(2, false)]),
                    total: 2,
                    loading: false,
                    error: None,
                },
                unread: 1,
            }))
            .unwrap();
        screen
    }

    #[test]
    fn mark_read_only_for_unread_rows() {
        let mut screen = with_inbox(signed_in(Role::Admin));
        assert!(screen.handle_key_event(key(KeyCode::Char('m'))).unwrap().is_none());

        screen.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Char('m'))).unwrap();
        assert!(matches!(
            action,
            Some(Action::Request(Request::MarkFeedbackRead(FeedbackId(2))))
        ));
    }

    #[test]
    fn non_admins_cannot_touch_the_inbox() {
        let mut screen = with_inbox(signed_in(Role::Student));
        assert!(screen.handle_key_event(key(KeyCode::Char('d'))).unwrap().is_none());
    }

    #[test]
    fn anyone_can_send_feedback() {
        let mut screen = signed_in(Role::Parent);
        screen.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        for c in "Bus is late".chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        screen.handle_key_event(key(KeyCode::Tab)).unwrap();
        screen.handle_key_event(key(KeyCode::Right)).unwrap();

        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        match action {
            Some(Action::Request(Request::SendFeedback(form))) => {
                assert_eq!(form.message, "Bus is late");
                assert_eq!(form.kind, FeedbackKind::Bug);
            }
            other => panic!("unexpected {other:?}"),
        }

        // A failed send keeps what was typed
        screen
            .update(&Action::Notify(Notification::error("Network error")))
            .unwrap();
        assert!(screen.captures_input());
        assert!(!screen.sending);
    }

    #[test]
    fn empty_message_is_rejected_locally() {
        let mut screen = signed_in(Role::Teacher);
        screen.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(action, Some(Action::Notify(_))));
        assert!(!screen.sending);
    }
}
