// ── Session lifecycle ──
//
// One `Session` per front end, passed by handle. The state machine is
// `Uninitialized → Loading → Authenticated(user) | Anonymous` and every
// transition is published on a `watch` channel.

use std::sync::Arc;

use campus_api::CampusClient;
use campus_api::models::{Role, User};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::CoreError;

/// Where the session currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Loading,
    Authenticated(User),
    Anonymous,
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Authenticated(_) | Self::Anonymous)
    }
}

/// Cheaply cloneable session handle.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: Arc<CampusClient>,
    state: watch::Sender<SessionState>,
}

impl Session {
    pub fn new(client: Arc<CampusClient>) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self {
            inner: Arc::new(SessionInner { client, state }),
        }
    }

    pub fn client(&self) -> &Arc<CampusClient> {
        &self.inner.client
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.state.borrow().user().cloned()
    }

    pub fn role(&self) -> Option<Role> {
        self.inner.state.borrow().user().map(|u| u.role)
    }

    /// The logged-in user, or [`CoreError::NotAuthenticated`].
    pub fn require_user(&self) -> Result<User, CoreError> {
        self.current_user().ok_or(CoreError::NotAuthenticated)
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Resolve the stored token into a user.
    ///
    /// Without a token this settles on `Anonymous` without a request. Any
    /// failure of `GET /me` also settles on `Anonymous`.
    pub async fn restore(&self) -> SessionState {
        if !self.inner.client.has_token() {
            debug!("no stored token; session is anonymous");
            self.publish(SessionState::Anonymous);
            return SessionState::Anonymous;
        }

        self.publish(SessionState::Loading);
        let next = match self.inner.client.me().await {
            Ok(user) => {
                info!(user = %user.email, role = %user.role, "session restored");
                SessionState::Authenticated(user)
            }
            Err(e) => {
                warn!(error = %e, "stored token rejected; session is anonymous");
                self.inner.client.set_token(None);
                SessionState::Anonymous
            }
        };
        self.publish(next.clone());
        next
    }

    /// Log in and return the issued token so the caller can persist it.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<(User, SecretString), CoreError> {
        let email = email.trim();
        if email.is_empty() || password.expose_secret().is_empty() {
            return Err(CoreError::invalid("Email and password are required"));
        }

        self.publish(SessionState::Loading);
        match self.inner.client.login(email, password).await {
            Ok(resp) => {
                info!(user = %resp.user.email, role = %resp.user.role, "logged in");
                self.publish(SessionState::Authenticated(resp.user.clone()));
                Ok((resp.user, SecretString::from(resp.access_token)))
            }
            Err(e) => {
                self.publish(SessionState::Anonymous);
                Err(e.into())
            }
        }
    }

    /// End the session. The local token is gone afterwards even when the
    /// server call fails; that failure is still returned.
    pub async fn logout(&self) -> Result<(), CoreError> {
        let result = self.inner.client.logout().await;
        self.publish(SessionState::Anonymous);
        match result {
            Ok(()) => {
                info!("logged out");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "logout request failed; local session cleared anyway");
                Err(e.into())
            }
        }
    }

    /// Swap in a fresh copy of the user after a profile update.
    pub fn replace_user(&self, user: User) {
        debug!(user = %user.email, "session user replaced");
        self.publish(SessionState::Authenticated(user));
    }

    fn publish(&self, state: SessionState) {
        self.inner.state.send_replace(state);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}
