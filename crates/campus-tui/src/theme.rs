//! Palette and semantic styles.

use campus_api::SubjectId;
use campus_core::academics::schedule::subject_color;
use ratatui::style::{Color, Modifier, Style};

// ── Palette ───────────────────────────────────────────────────────────

pub const INDIGO: Color = Color::Rgb(99, 102, 241); // #6366f1
pub const SKY: Color = Color::Rgb(56, 189, 248); // #38bdf8
pub const AMBER: Color = Color::Rgb(251, 191, 36); // #fbbf24
pub const EMERALD: Color = Color::Rgb(52, 211, 153); // #34d399
pub const ROSE: Color = Color::Rgb(251, 113, 133); // #fb7185

pub const TEXT: Color = Color::Rgb(203, 213, 225); // #cbd5e1
pub const MUTED: Color = Color::Rgb(100, 116, 139); // #64748b
pub const BG_PANEL: Color = Color::Rgb(15, 23, 42); // #0f172a
pub const BG_SELECTED: Color = Color::Rgb(30, 41, 59); // #1e293b

// ── Styles ────────────────────────────────────────────────────────────

pub fn title() -> Style {
    Style::default().fg(SKY).add_modifier(Modifier::BOLD)
}

pub fn border(focused: bool) -> Style {
    Style::default().fg(if focused { INDIGO } else { MUTED })
}

pub fn table_header() -> Style {
    Style::default().fg(SKY).add_modifier(Modifier::BOLD)
}

pub fn row() -> Style {
    Style::default().fg(TEXT)
}

pub fn selected() -> Style {
    Style::default()
        .fg(INDIGO)
        .bg(BG_SELECTED)
        .add_modifier(Modifier::BOLD)
}

pub fn tab(active: bool) -> Style {
    if active {
        Style::default().fg(INDIGO).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT)
    }
}

pub fn hint() -> Style {
    Style::default().fg(MUTED)
}

pub fn hint_key() -> Style {
    Style::default().fg(SKY).add_modifier(Modifier::BOLD)
}

pub fn error() -> Style {
    Style::default().fg(ROSE)
}

/// Chip style for a subject in the schedule grid.
pub fn subject(id: SubjectId) -> Style {
    let colors = subject_color(id);
    Style::default()
        .fg(hex(colors.text))
        .bg(hex(colors.background))
}

fn hex(raw: &str) -> Color {
    raw.parse().unwrap_or(Color::Reset)
}
