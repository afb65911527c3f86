//! Screen identifiers and role-aware tab order.

use std::fmt;

use campus_api::models::Role;
use campus_core::{View, nav};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Dashboard,
    Academics,
    Teachers,
    Students,
    Parents,
    Announcements,
    Feedback,
    /// Sign-in form. Not in the tab bar.
    Login,
}

impl ScreenId {
    /// Every tab in bar order, before role filtering.
    pub const ALL: [ScreenId; 7] = [
        Self::Dashboard,
        Self::Academics,
        Self::Teachers,
        Self::Students,
        Self::Parents,
        Self::Announcements,
        Self::Feedback,
    ];

    pub fn view(self) -> Option<View> {
        match self {
            Self::Dashboard => Some(View::Dashboard),
            Self::Academics => Some(View::Academics),
            Self::Teachers => Some(View::Teachers),
            Self::Students => Some(View::Students),
            Self::Parents => Some(View::Parents),
            Self::Announcements => Some(View::Announcements),
            Self::Feedback => Some(View::Feedback),
            Self::Login => None,
        }
    }

    /// Tabs `role` may open, in bar order.
    pub fn tabs(role: Role) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|s| s.view().is_some_and(|v| nav::can_access(role, v).is_ok()))
            .collect()
    }

    /// 1-based key for this tab in `tabs`, or 0 when absent.
    pub fn number_in(self, tabs: &[Self]) -> usize {
        tabs.iter().position(|&s| s == self).map_or(0, |i| i + 1)
    }

    /// Tab for a number key, counted over the visible tabs only.
    pub fn from_number(n: usize, tabs: &[Self]) -> Option<Self> {
        n.checked_sub(1).and_then(|i| tabs.get(i)).copied()
    }

    pub fn next_in(self, tabs: &[Self]) -> Self {
        cycle(self, tabs, 1)
    }

    pub fn prev_in(self, tabs: &[Self]) -> Self {
        cycle(self, tabs, tabs.len().saturating_sub(1))
    }

    pub fn label(self) -> &'static str {
        match self.view() {
            Some(view) => view.title(),
            None => "Sign in",
        }
    }
}

fn cycle(current: ScreenId, tabs: &[ScreenId], step: usize) -> ScreenId {
    if tabs.is_empty() {
        return current;
    }
    let idx = tabs.iter().position(|&s| s == current).unwrap_or(0);
    tabs.get((idx + step) % tabs.len()).copied().unwrap_or(current)
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn admins_see_every_tab() {
        assert_eq!(ScreenId::tabs(Role::Admin), ScreenId::ALL.to_vec());
    }

    #[test]
    fn teachers_only_get_shared_tabs() {
        let tabs = ScreenId::tabs(Role::Teacher);
        assert_eq!(
            tabs,
            vec![
                ScreenId::Dashboard,
                ScreenId::Announcements,
                ScreenId::Feedback
            ]
        );
        // Number keys count visible tabs only
        assert_eq!(ScreenId::from_number(2, &tabs), Some(ScreenId::Announcements));
        assert_eq!(ScreenId::from_number(4, &tabs), None);
        assert_eq!(ScreenId::from_number(0, &tabs), None);
        assert_eq!(ScreenId::Feedback.number_in(&tabs), 3);
        assert_eq!(ScreenId::Academics.number_in(&tabs), 0);
    }

    #[test]
    fn tab_cycling_wraps() {
        let tabs = ScreenId::tabs(Role::Student);
        assert_eq!(ScreenId::Feedback.next_in(&tabs), ScreenId::Dashboard);
        assert_eq!(ScreenId::Dashboard.prev_in(&tabs), ScreenId::Feedback);
    }
}
