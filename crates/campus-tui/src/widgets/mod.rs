//! Reusable rendering pieces shared by the screens.

pub mod form;
pub mod picker;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, TableState};
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::theme;

/// Rounded panel with a title, styled by focus.
pub fn panel(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(theme::title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(focused))
}

/// Rect of `width` x `height` centred in `area`, clamped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

/// Blank out `area` and draw a dialog frame over it. Returns the inner rect.
pub fn dialog(frame: &mut Frame, area: Rect, title: &str, accent: Style) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(accent)
        .style(Style::default().bg(theme::BG_PANEL));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// Key hint line: `[("j/k", "move"), ("d", "delete")]`.
pub fn hints(pairs: &[(&str, &str)]) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (key, label) in pairs {
        spans.push(Span::styled(format!("{key} "), theme::hint_key()));
        spans.push(Span::styled(format!("{label}  "), theme::hint()));
    }
    Line::from(spans)
}

/// Spinner while loading, the error when the last fetch failed, else hints.
pub fn status_line(
    frame: &mut Frame,
    area: Rect,
    loading: bool,
    error: Option<&str>,
    throbber: &ThrobberState,
    hint_pairs: &[(&str, &str)],
) {
    if loading {
        let spinner = Throbber::default()
            .label(" Loading…")
            .style(theme::hint())
            .throbber_style(Style::default().fg(theme::INDIGO));
        frame.render_stateful_widget(spinner, area, &mut throbber.clone());
    } else if let Some(error) = error {
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {error}  (r to retry)"), theme::error())),
            area,
        );
    } else {
        frame.render_widget(Paragraph::new(hints(hint_pairs)), area);
    }
}

// ── Table cursor ──────────────────────────────────────────────────────

/// Row cursor over a list of `len` rows.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    state: TableState,
}

impl Cursor {
    pub fn index(&self) -> usize {
        self.state.selected().unwrap_or(0)
    }

    pub fn state(&self) -> TableState {
        self.state.clone()
    }

    pub fn select(&mut self, index: usize, len: usize) {
        self.state.select(Some(index.min(len.saturating_sub(1))));
    }

    /// Keep the cursor in range after the list changed.
    pub fn clamp(&mut self, len: usize) {
        self.select(self.index(), len);
    }

    fn shift(&mut self, delta: isize, len: usize) {
        let next = self.index().saturating_add_signed(delta);
        self.select(next, len);
    }

    /// j/k, arrows, g/G, Ctrl+d/u. Returns false for other keys.
    pub fn handle_key(&mut self, key: KeyEvent, len: usize) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('d') if ctrl => self.shift(10, len),
            KeyCode::Char('u') if ctrl => self.shift(-10, len),
            KeyCode::Char('j') | KeyCode::Down => self.shift(1, len),
            KeyCode::Char('k') | KeyCode::Up => self.shift(-1, len),
            KeyCode::Char('g') | KeyCode::Home => self.select(0, len),
            KeyCode::Char('G') | KeyCode::End => self.select(len.saturating_sub(1), len),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut cursor = Cursor::default();
        assert!(cursor.handle_key(key(KeyCode::Char('k')), 3));
        assert_eq!(cursor.index(), 0);
        cursor.handle_key(key(KeyCode::Char('G')), 3);
        assert_eq!(cursor.index(), 2);
        cursor.handle_key(key(KeyCode::Char('j')), 3);
        assert_eq!(cursor.index(), 2);
        cursor.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL), 3);
        assert_eq!(cursor.index(), 0);
        assert!(!cursor.handle_key(key(KeyCode::Char('x')), 3));
    }

    #[test]
    fn clamp_after_shrink() {
        let mut cursor = Cursor::default();
        cursor.select(5, 10);
        cursor.clamp(2);
        assert_eq!(cursor.index(), 1);
    }

    #[test]
    fn centered_rect_fits_inside() {
        let area = Rect::new(0, 0, 80, 24);
        let r = centered(area, 40, 10);
        assert_eq!((r.x, r.y, r.width, r.height), (20, 7, 40, 10));
        let tiny = centered(Rect::new(0, 0, 20, 5), 40, 10);
        assert_eq!((tiny.width, tiny.height), (18, 3));
    }
}
