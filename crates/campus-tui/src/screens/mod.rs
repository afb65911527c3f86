//! Screen implementations. Each screen is a top-level Component.

pub mod academics;
pub mod announcements;
pub mod dashboard;
pub mod feedback;
pub mod login;
pub mod parents;
pub mod students;
pub mod teachers;

use crossterm::event::KeyEvent;
use throbber_widgets_tui::ThrobberState;

use crate::action::ListSnapshot;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::widgets::Cursor;

/// One component per screen, sign-in included.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Login, Box::new(login::LoginScreen::new())),
        (
            ScreenId::Dashboard,
            Box::new(dashboard::DashboardScreen::new()),
        ),
        (
            ScreenId::Academics,
            Box::new(academics::AcademicsScreen::new()),
        ),
        (ScreenId::Teachers, Box::new(teachers::TeachersScreen::new())),
        (ScreenId::Students, Box::new(students::StudentsScreen::new())),
        (ScreenId::Parents, Box::new(parents::ParentsScreen::new())),
        (
            ScreenId::Announcements,
            Box::new(announcements::AnnouncementsScreen::new()),
        ),
        (ScreenId::Feedback, Box::new(feedback::FeedbackScreen::new())),
    ]
}

// ── Shared list state ─────────────────────────────────────────────────

/// Snapshot, cursor and spinner shared by the table screens.
pub struct ListView<T> {
    pub snapshot: ListSnapshot<T>,
    pub cursor: Cursor,
    pub search: String,
    pub throbber: ThrobberState,
    pub focused: bool,
    pub detail_open: bool,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self {
            snapshot: ListSnapshot::default(),
            cursor: Cursor::default(),
            search: String::new(),
            throbber: ThrobberState::default(),
            focused: false,
            detail_open: false,
        }
    }
}

impl<T: Clone> ListView<T> {
    pub fn apply(&mut self, snapshot: &ListSnapshot<T>) {
        self.snapshot = snapshot.clone();
        self.cursor.clamp(self.snapshot.items.len());
    }

    pub fn set_loading(&mut self) {
        self.snapshot.loading = true;
    }

    pub fn tick(&mut self) {
        if self.snapshot.loading {
            self.throbber.calc_next();
        }
    }

    pub fn selected(&self) -> Option<&T> {
        self.snapshot.items.get(self.cursor.index())
    }

    /// Cursor keys over `len` rows.
    pub fn navigate(&mut self, key: KeyEvent, len: usize) -> bool {
        self.cursor.handle_key(key, len)
    }

    /// ` Teachers (3 of 12) · "ann" `
    pub fn title(&self, name: &str, shown: usize) -> String {
        let count = if shown == self.snapshot.total {
            format!("{shown}")
        } else {
            format!("{shown} of {}", self.snapshot.total)
        };
        if self.search.is_empty() {
            format!(" {name} ({count}) ")
        } else {
            format!(" {name} ({count}) · \"{}\" ", self.search)
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.snapshot.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn title_shows_filtered_count_and_query() {
        let mut view: ListView<u32> = ListView::default();
        view.apply(&ListSnapshot {
            items: Arc::new(vec![1, 2]),
            total: 5,
            loading: false,
            error: None,
        });
        assert_eq!(view.title("Students", 2), " Students (2 of 5) ");
        view.search = "ann".into();
        assert_eq!(view.title("Students", 2), " Students (2 of 5) · \"ann\" ");
        assert_eq!(view.title("Students", 5), " Students (5) · \"ann\" ");
    }

    #[test]
    fn new_snapshot_keeps_cursor_in_range() {
        let mut view: ListView<u32> = ListView::default();
        view.cursor.select(4, 5);
        view.apply(&ListSnapshot {
            items: Arc::new(vec![7, 8]),
            total: 2,
            loading: false,
            error: None,
        });
        assert_eq!(view.selected(), Some(&8));
    }
}
