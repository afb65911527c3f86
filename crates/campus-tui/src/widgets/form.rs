//! Text fields and a tab-ordered form built on `tui-input`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tui_input::{Input, InputRequest};

use super::picker::Choice;
use crate::theme;

pub const FIELD_HEIGHT: u16 = 3;

/// A labelled single-line input.
#[derive(Debug, Clone)]
pub struct TextField {
    label: &'static str,
    input: Input,
    masked: bool,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        Self::with_value(label, "")
    }

    pub fn with_value(label: &'static str, value: &str) -> Self {
        Self {
            label,
            input: Input::new(value.to_owned()),
            masked: false,
        }
    }

    /// Render the value as dots.
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Apply an editing key. Returns false for keys the field ignores.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match edit_request(key) {
            Some(req) => {
                self.input.handle(req);
                true
            }
            None => false,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, active: bool) {
        let block = Block::default()
            .title(format!(" {} ", self.label))
            .title_style(if active { theme::title() } else { theme::hint() })
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border(active));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let width = usize::from(inner.width.max(1));
        let scroll = self.input.visual_scroll(width);
        let shown = if self.masked {
            "\u{25CF}".repeat(self.input.value().chars().count())
        } else {
            self.input.value().to_owned()
        };
        frame.render_widget(
            Paragraph::new(shown)
                .style(Style::default().fg(theme::TEXT))
                .scroll((0, u16::try_from(scroll).unwrap_or(0))),
            inner,
        );

        if active {
            let offset = self.input.visual_cursor().saturating_sub(scroll);
            let x = inner.x + u16::try_from(offset).unwrap_or(0);
            frame.set_cursor_position(Position::new(x.min(inner.right().saturating_sub(1)), inner.y));
        }
    }
}

fn edit_request(key: KeyEvent) -> Option<InputRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('u') if ctrl => Some(InputRequest::DeleteLine),
        KeyCode::Char('w') if ctrl => Some(InputRequest::DeletePrevWord),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(InputRequest::InsertChar(c)),
        KeyCode::Backspace => Some(InputRequest::DeletePrevChar),
        KeyCode::Delete => Some(InputRequest::DeleteNextChar),
        KeyCode::Left => Some(InputRequest::GoToPrevChar),
        KeyCode::Right => Some(InputRequest::GoToNextChar),
        KeyCode::Home => Some(InputRequest::GoToStart),
        KeyCode::End => Some(InputRequest::GoToEnd),
        _ => None,
    }
}

// ── Form ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Field {
    Text(TextField),
    Choice(Choice),
}

impl Field {
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self {
            Self::Text(field) => field.handle_key(key),
            Self::Choice(choice) => choice.handle_key(key),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, active: bool) {
        match self {
            Self::Text(field) => field.render(frame, area, active),
            Self::Choice(choice) => choice.render(frame, area, active),
        }
    }
}

impl From<TextField> for Field {
    fn from(field: TextField) -> Self {
        Self::Text(field)
    }
}

impl From<Choice> for Field {
    fn from(choice: Choice) -> Self {
        Self::Choice(choice)
    }
}

/// Fields with Tab / Shift+Tab focus.
#[derive(Debug, Clone)]
pub struct Form {
    fields: Vec<Field>,
    focus: usize,
}

impl Form {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields, focus: 0 }
    }

    /// Text of field `index`; empty for choices and out-of-range indexes.
    pub fn value(&self, index: usize) -> &str {
        match self.fields.get(index) {
            Some(Field::Text(field)) => field.value(),
            _ => "",
        }
    }

    /// Selected option of choice `index`.
    pub fn choice(&self, index: usize) -> usize {
        match self.fields.get(index) {
            Some(Field::Choice(choice)) => choice.index(),
            _ => 0,
        }
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Focus moves and edits of the focused field. Returns false when the
    /// key is not a form key (Enter, Esc, function keys).
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                true
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                true
            }
            _ => self
                .fields
                .get_mut(self.focus)
                .is_some_and(|field| field.handle_key(key)),
        }
    }

    pub fn height(&self) -> u16 {
        u16::try_from(self.fields.len())
            .unwrap_or(u16::MAX)
            .saturating_mul(FIELD_HEIGHT)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical(
            self.fields
                .iter()
                .map(|_| Constraint::Length(FIELD_HEIGHT)),
        )
        .split(area);
        for (i, (field, row)) in self.fields.iter().zip(rows.iter()).enumerate() {
            field.render(frame, *row, i == self.focus);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut Form, text: &str) {
        for c in text.chars() {
            assert!(form.handle_key(key(KeyCode::Char(c))));
        }
    }

    #[test]
    fn typing_goes_to_the_focused_field() {
        let mut form = Form::new(vec![TextField::new("Name").into(), TextField::new("Code").into()]);
        type_text(&mut form, "Math");
        form.handle_key(key(KeyCode::Tab));
        type_text(&mut form, "MTH");
        form.handle_key(key(KeyCode::Backspace));

        assert_eq!(form.value(0), "Math");
        assert_eq!(form.value(1), "MT");
        assert_eq!(form.focus(), 1);
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = Form::new(vec![
            TextField::new("A").into(),
            Choice::new("B", vec!["x".into(), "y".into()]).into(),
        ]);
        form.handle_key(key(KeyCode::BackTab));
        assert_eq!(form.focus(), 1);
        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.choice(1), 1);
        assert_eq!(form.value(1), "");
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focus(), 0);
    }

    #[test]
    fn ctrl_u_clears_and_enter_is_not_consumed() {
        let mut field = TextField::with_value("Name", "Grade 1");
        assert!(field.handle_key(KeyEvent::new(
            KeyCode::Char('u'),
            KeyModifiers::CONTROL
        )));
        assert_eq!(field.value(), "");
        assert!(!field.handle_key(key(KeyCode::Enter)));
        assert!(!field.handle_key(key(KeyCode::Esc)));
    }
}
