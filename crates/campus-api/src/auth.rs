// Session endpoints
//
// Token login/logout and the current-user lookup. A successful login
// installs the returned token on the client; logout always drops it.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;

use crate::client::CampusClient;
use crate::error::Error;
use crate::models::{LoginResponse, User};

impl CampusClient {
    /// Authenticate with email + password.
    ///
    /// `POST /login` with `{email, password}`, returning `{access_token, user}`.
    /// The token is installed for all subsequent requests.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
        }

        debug!(email, "logging in");
        let result: Result<LoginResponse, Error> = self
            .post_credentials(
                "login",
                &Body {
                    email,
                    password: password.expose_secret(),
                },
            )
            .await;

        let login = result.map_err(|e| match e {
            Error::Validation { message, .. } | Error::Api { message, .. } => {
                Error::Authentication { message }
            }
            other => other,
        })?;

        self.set_token(Some(SecretString::from(login.access_token.clone())));
        debug!(user = %login.user.email, "login successful");
        Ok(login)
    }

    /// End the session. `POST /logout`
    ///
    /// The local token is cleared even when the request fails.
    pub async fn logout(&self) -> Result<(), Error> {
        let result = self.post_no_response("logout", &serde_json::json!({})).await;
        self.set_token(None);
        result
    }

    /// The authenticated user. `GET /me`
    pub async fn me(&self) -> Result<User, Error> {
        self.get("me").await
    }
}
