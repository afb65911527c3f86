use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::ids::UserId;

/// Account role; decides which views a user may open.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Parent,
}

/// Per-user toggles stored server-side under `settings`.
///
/// Absent keys take the defaults the dashboard has always shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default = "enabled")]
    pub notifications: bool,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default = "enabled")]
    pub biometric: bool,
    #[serde(default = "enabled")]
    pub analytics: bool,
}

fn enabled() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications: true,
            dark_mode: false,
            biometric: true,
            analytics: true,
        }
    }
}

/// The authenticated account, from `GET /me` and `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub settings: Option<Preferences>,
}

impl User {
    pub fn preferences(&self) -> Preferences {
        self.settings.unwrap_or_default()
    }
}

/// The `user` relation nested in teacher/student/parent/feedback records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

/// Response of `PUT /profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_preferences_take_defaults() {
        let prefs: Preferences = serde_json::from_value(json!({ "darkMode": true })).unwrap();
        assert!(prefs.dark_mode);
        assert!(prefs.notifications);
        assert!(prefs.biometric);
        assert!(prefs.analytics);
    }

    #[test]
    fn role_wire_format_is_lowercase() {
        let user: User = serde_json::from_value(json!({
            "id": 1, "name": "Ada", "email": "ada@school.test", "role": "teacher"
        }))
        .unwrap();
        assert_eq!(user.role, Role::Teacher);
        assert_eq!(user.role.to_string(), "teacher");
        assert_eq!(user.preferences(), Preferences::default());
    }
}
