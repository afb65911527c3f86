//! Sign-in screen. Shown until the session settles on a user.

use campus_core::SessionState;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use secrecy::SecretString;
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::action::{Action, Notification, Request};
use crate::component::Component;
use crate::theme;
use crate::widgets::{self, form::Form, form::TextField};

const EMAIL: usize = 0;
const PASSWORD: usize = 1;

pub struct LoginScreen {
    form: Form,
    session: SessionState,
    /// Set on submit, cleared when the session settles again.
    submitting: bool,
    throbber: ThrobberState,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self {
            form: login_form(""),
            session: SessionState::Uninitialized,
            submitting: false,
            throbber: ThrobberState::default(),
        }
    }

    fn busy(&self) -> bool {
        self.submitting
            || matches!(
                self.session,
                SessionState::Uninitialized | SessionState::Loading
            )
    }

    fn submit(&mut self) -> Option<Action> {
        let email = self.form.value(EMAIL).trim().to_owned();
        let password = self.form.value(PASSWORD);
        if email.is_empty() || password.is_empty() {
            return Some(Action::Notify(Notification::error(
                "Email and password are required",
            )));
        }
        self.submitting = true;
        Some(Action::Request(Request::Login {
            email,
            password: SecretString::from(password.to_owned()),
        }))
    }
}

fn login_form(email: &str) -> Form {
    Form::new(vec![
        TextField::with_value("Email", email).into(),
        TextField::new("Password").masked().into(),
    ])
}

impl Component for LoginScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.busy() {
            return Ok(None);
        }
        match key.code {
            KeyCode::Enter if self.form.focus() == EMAIL => {
                self.form.focus_next();
                Ok(None)
            }
            KeyCode::Enter => Ok(self.submit()),
            _ => {
                self.form.handle_key(key);
                Ok(None)
            }
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Session(state) => {
                if state.is_settled() {
                    self.submitting = false;
                    // Never keep a password around after an attempt
                    let email = self.form.value(EMAIL).to_owned();
                    self.form = login_form(&email);
                    if !email.is_empty() {
                        self.form.focus_next();
                    }
                }
                self.session = state.clone();
            }
            Action::Tick if self.busy() => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let dialog = widgets::centered(area, 52, 14);
        let inner = widgets::dialog(frame, dialog, "Campus · Sign in", theme::border(true));

        let [intro, fields, status] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(self.form.height()),
            Constraint::Length(1),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " Sign in with your school account",
                theme::hint(),
            ))),
            intro,
        );

        self.form.render(frame, fields);

        if self.busy() {
            let label = if self.submitting {
                " Signing in…"
            } else {
                " Restoring session…"
            };
            let spinner = Throbber::default()
                .label(label)
                .style(theme::hint())
                .throbber_style(Style::default().fg(theme::INDIGO));
            frame.render_stateful_widget(spinner, status, &mut self.throbber.clone());
        } else {
            frame.render_widget(
                Paragraph::new(widgets::hints(&[
                    ("Tab", "next field"),
                    ("Enter", "sign in"),
                    ("Ctrl+C", "quit"),
                ])),
                status,
            );
        }
    }

    fn captures_input(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ready() -> LoginScreen {
        let mut screen = LoginScreen::new();
        screen
            .update(&Action::Session(SessionState::Anonymous))
            .unwrap();
        screen
    }

    fn type_text(screen: &mut LoginScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn keys_are_ignored_while_restoring() {
        let mut screen = LoginScreen::new();
        type_text(&mut screen, "a");
        assert_eq!(screen.form.value(EMAIL), "");
    }

    #[test]
    fn enter_on_email_moves_to_password_then_submits() {
        let mut screen = ready();
        type_text(&mut screen, "admin@school.test");
        assert!(screen.handle_key_event(key(KeyCode::Enter)).unwrap().is_none());
        type_text(&mut screen, "secret");

        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        match action {
            Some(Action::Request(Request::Login { email, .. })) => {
                assert_eq!(email, "admin@school.test");
            }
            other => panic!("expected login request, got {other:?}"),
        }
        assert!(screen.submitting);
    }

    #[test]
    fn blank_password_is_rejected_locally() {
        let mut screen = ready();
        type_text(&mut screen, "admin@school.test");
        screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(action, Some(Action::Notify(_))));
        assert!(!screen.submitting);
    }

    #[test]
    fn failed_attempt_clears_the_password_only() {
        let mut screen = ready();
        type_text(&mut screen, "admin@school.test");
        screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        type_text(&mut screen, "wrong");
        screen.handle_key_event(key(KeyCode::Enter)).unwrap();

        screen
            .update(&Action::Session(SessionState::Anonymous))
            .unwrap();
        assert_eq!(screen.form.value(EMAIL), "admin@school.test");
        assert_eq!(screen.form.value(PASSWORD), "");
        assert_eq!(screen.form.focus(), PASSWORD);
        assert!(!screen.submitting);
    }

    #[test]
    fn password_renders_masked() {
        let mut screen = ready();
        type_text(&mut screen, "a@b.c");
        screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        type_text(&mut screen, "hunter2");

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("a@b.c"));
        assert!(!text.contains("hunter2"));
        assert!(text.contains("●●●●●●●"));
    }
}
