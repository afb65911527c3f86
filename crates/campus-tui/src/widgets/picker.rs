//! Inline `◂ option ▸` selector.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::theme;

#[derive(Debug, Clone)]
pub struct Choice {
    label: &'static str,
    options: Vec<String>,
    index: usize,
}

impl Choice {
    pub fn new(label: &'static str, options: Vec<String>) -> Self {
        Self {
            label,
            options,
            index: 0,
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index.min(self.options.len().saturating_sub(1));
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    fn step(&mut self, forward: bool) {
        let len = self.options.len();
        if len == 0 {
            return;
        }
        self.index = if forward {
            (self.index + 1) % len
        } else {
            (self.index + len - 1) % len
        };
    }

    /// Left/right (or h/l, space) cycle the options.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.step(false),
            KeyCode::Right | KeyCode::Char('l' | ' ') => self.step(true),
            _ => return false,
        }
        true
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

        let arrow = if active { theme::hint_key() } else { theme::hint() };
        let value = self
            .options
            .get(self.index)
            .map_or("(none)", String::as_str);
        let line = Line::from(vec![
            Span::styled("\u{25C2} ", arrow),
            Span::styled(
                value.to_owned(),
                Style::default()
                    .fg(theme::TEXT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" \u{25B8}", arrow),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    #[test]
    fn options_cycle_and_wrap() {
        let mut choice = Choice::new("Day", vec!["Mon".into(), "Tue".into(), "Wed".into()]);
        let left = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        let right = KeyEvent::new(KeyCode::Right, KeyModifiers::NONE);

        assert!(choice.handle_key(left));
        assert_eq!(choice.index(), 2);
        choice.handle_key(right);
        choice.handle_key(right);
        assert_eq!(choice.index(), 1);
    }

    #[test]
    fn empty_choice_ignores_cycling() {
        let mut choice = Choice::new("Subject", Vec::new());
        choice.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        assert_eq!(choice.index(), 0);
        assert!(choice.is_empty());
    }
}
