// ── Profile & preferences ──

use campus_api::models::{Preferences, User};
use secrecy::{ExposeSecret, SecretString};
use strum::{Display, EnumIter, EnumString};
use tracing::{info, warn};

use crate::error::CoreError;
use crate::session::Session;

/// One toggle on the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PreferenceKey {
    Notifications,
    DarkMode,
    Biometric,
    Analytics,
}

impl PreferenceKey {
    pub fn get(self, prefs: &Preferences) -> bool {
        match self {
            Self::Notifications => prefs.notifications,
            Self::DarkMode => prefs.dark_mode,
            Self::Biometric => prefs.biometric,
            Self::Analytics => prefs.analytics,
        }
    }

    pub fn set(self, prefs: &mut Preferences, value: bool) {
        match self {
            Self::Notifications => prefs.notifications = value,
            Self::DarkMode => prefs.dark_mode = value,
            Self::Biometric => prefs.biometric = value,
            Self::Analytics => prefs.analytics = value,
        }
    }
}

/// Profile edits for the logged-in user. Every successful response
/// replaces the session user.
#[derive(Debug, Clone)]
pub struct ProfileEditor {
    session: Session,
}

impl ProfileEditor {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn user(&self) -> Result<User, CoreError> {
        self.session.require_user()
    }

    pub async fn update_personal(&self, name: &str, email: &str) -> Result<User, CoreError> {
        self.session.require_user()?;
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() {
            return Err(CoreError::invalid("Name and email are required"));
        }
        let resp = self
            .session
            .client()
            .update_personal(name, email)
            .await
            .map_err(|e| CoreError::from(e).in_action("Failed to update profile"))?;
        info!(user = %resp.user.email, "profile updated");
        self.session.replace_user(resp.user.clone());
        Ok(resp.user)
    }

    pub async fn change_password(
        &self,
        password: &SecretString,
        confirmation: &SecretString,
    ) -> Result<(), CoreError> {
        self.session.require_user()?;
        if password.expose_secret().is_empty() {
            return Err(CoreError::invalid("Password is required"));
        }
        if password.expose_secret() != confirmation.expose_secret() {
            return Err(CoreError::invalid("Passwords do not match"));
        }
        let resp = self
            .session
            .client()
            .change_password(password, confirmation)
            .await
            .map_err(|e| CoreError::from(e).in_action("Failed to change password"))?;
        info!("password changed");
        self.session.replace_user(resp.user);
        Ok(())
    }

    /// Flip one preference and sync it. The previous preferences come back
    /// if the server rejects the change.
    pub async fn toggle_preference(&self, key: PreferenceKey) -> Result<Preferences, CoreError> {
        let user = self.session.require_user()?;
        let previous = user.preferences();
        let mut next = previous;
        key.set(&mut next, !key.get(&previous));

        let mut optimistic = user.clone();
        optimistic.settings = Some(next);
        self.session.replace_user(optimistic);

        match self.session.client().update_preferences(&next).await {
            Ok(resp) => {
                info!(%key, value = key.get(&next), "preference saved");
                let saved = resp.user.preferences();
                self.session.replace_user(resp.user);
                Ok(saved)
            }
            Err(e) => {
                warn!(%key, error = %e, "preference sync failed; restoring previous settings");
                self.session.replace_user(user);
                Err(CoreError::from(e).in_action("Failed to update settings"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn keys_read_and_write_their_flag() {
        let mut prefs = Preferences::default();
        assert!(!PreferenceKey::DarkMode.get(&prefs));
        PreferenceKey::DarkMode.set(&mut prefs, true);
        assert!(prefs.dark_mode);
        assert_eq!("dark-mode".parse::<PreferenceKey>().ok(), Some(PreferenceKey::DarkMode));
    }
}
