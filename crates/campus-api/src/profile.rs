// Profile endpoint
//
// `PUT /profile` accepts one of three disjoint bodies: personal details,
// a password change, or the settings object.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;

use crate::client::CampusClient;
use crate::error::Error;
use crate::models::{Preferences, ProfileResponse};

impl CampusClient {
    /// `PUT /profile` with `{name, email}`
    pub async fn update_personal(&self, name: &str, email: &str) -> Result<ProfileResponse, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
            email: &'a str,
        }

        debug!(email, "updating personal details");
        self.put("profile", &Body { name, email }).await
    }

    /// `PUT /profile` with `{password, password_confirmation}`
    pub async fn change_password(
        &self,
        password: &SecretString,
        confirmation: &SecretString,
    ) -> Result<ProfileResponse, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            password: &'a str,
            password_confirmation: &'a str,
        }

        debug!("changing password");
        self.put(
            "profile",
            &Body {
                password: password.expose_secret(),
                password_confirmation: confirmation.expose_secret(),
            },
        )
        .await
    }

    /// `PUT /profile` with `{settings}`
    pub async fn update_preferences(&self, settings: &Preferences) -> Result<ProfileResponse, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            settings: &'a Preferences,
        }

        debug!(?settings, "syncing preferences");
        self.put("profile", &Body { settings }).await
    }
}
