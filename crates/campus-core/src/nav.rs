// Role → view table.

use campus_api::models::Role;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::error::CoreError;

/// A top-level dashboard view.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum View {
    Dashboard,
    Teachers,
    Students,
    Parents,
    Academics,
    Attendance,
    MyClasses,
    Announcements,
    Feedback,
    Settings,
}

const ALL_ROLES: &[Role] = &[Role::Admin, Role::Teacher, Role::Student, Role::Parent];

impl View {
    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Teachers => "Teachers",
            Self::Students => "Students",
            Self::Parents => "Parents",
            Self::Academics => "Academics",
            Self::Attendance => "Attendance",
            Self::MyClasses => "My Classes",
            Self::Announcements => "Announcements",
            Self::Feedback => "Feedback",
            Self::Settings => "Settings",
        }
    }

    /// Roles allowed to open this view.
    pub fn roles(self) -> &'static [Role] {
        match self {
            Self::Teachers | Self::Students | Self::Parents | Self::Academics => &[Role::Admin],
            Self::Attendance => &[Role::Teacher, Role::Admin],
            Self::MyClasses => &[Role::Teacher],
            Self::Dashboard | Self::Announcements | Self::Feedback | Self::Settings => ALL_ROLES,
        }
    }
}

/// Views available to `role`, in navigation order.
pub fn allowed_views(role: Role) -> Vec<View> {
    View::iter().filter(|v| v.roles().contains(&role)).collect()
}

/// Guard a view for `role`.
pub fn can_access(role: Role, view: View) -> Result<(), CoreError> {
    if view.roles().contains(&role) {
        return Ok(());
    }
    let required = view
        .roles()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Err(CoreError::Forbidden {
        view: view.title().to_owned(),
        required,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn admin_sees_everything_but_my_classes() {
        let views = allowed_views(Role::Admin);
        assert!(views.contains(&View::Academics));
        assert!(views.contains(&View::Attendance));
        assert!(!views.contains(&View::MyClasses));
    }

    #[test]
    fn teacher_navigation() {
        assert_eq!(
            allowed_views(Role::Teacher),
            vec![
                View::Dashboard,
                View::Attendance,
                View::MyClasses,
                View::Announcements,
                View::Feedback,
                View::Settings,
            ]
        );
    }

    #[test]
    fn parents_and_students_get_shared_views_only() {
        let expected = vec![
            View::Dashboard,
            View::Announcements,
            View::Feedback,
            View::Settings,
        ];
        assert_eq!(allowed_views(Role::Parent), expected);
        assert_eq!(allowed_views(Role::Student), expected);
    }

    #[test]
    fn guard_reports_required_roles() {
        let err = can_access(Role::Student, View::Academics).unwrap_err();
        match err {
            CoreError::Forbidden { view, required } => {
                assert_eq!(view, "Academics");
                assert_eq!(required, "admin");
            }
            other => panic!("expected Forbidden, got {other:?}"),
        }
        assert!(can_access(Role::Teacher, View::Attendance).is_ok());
    }

    #[test]
    fn view_parses_from_kebab_case() {
        assert_eq!("my-classes".parse::<View>().ok(), Some(View::MyClasses));
    }
}
