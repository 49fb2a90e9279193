//! Login, resume and logout.
//!
//! ```text
//! Anonymous --login--> Authenticating --ok + super-admin--> Authenticated
//!                            |
//!                            +--any failure--> Anonymous
//! ```
//!
//! A 200 from the server is necessary but not sufficient: the account must
//! also carry the `super-admin` role. Any other role is treated exactly like
//! bad credentials and nothing is persisted.

use std::sync::{Arc, Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use admin_portal_core::{AdminProfile, AdminRole, BearerToken, Route};

use crate::api::AdminApi;
use crate::error::ClientError;
use crate::notify::{Notification, Notifier};
use crate::session::SessionContext;

/// Authentication state of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated,
}

/// Drives the splash, login, profile and logout flows.
pub struct SessionController {
    api: Arc<dyn AdminApi>,
    session: SessionContext,
    notifier: Arc<dyn Notifier>,
    state: Mutex<AuthState>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl SessionController {
    #[must_use]
    pub fn new(
        api: Arc<dyn AdminApi>,
        session: SessionContext,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            session,
            notifier,
            state: Mutex::new(AuthState::Anonymous),
        }
    }

    /// Current authentication state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: AuthState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Decide where the splash screen goes: home with a stored session,
    /// otherwise the login form.
    pub async fn resume(&self) -> Route {
        if self.session.is_authenticated().await {
            self.set_state(AuthState::Authenticated);
            Route::Home
        } else {
            self.set_state(AuthState::Anonymous);
            Route::Login
        }
    }

    /// Sign in.
    ///
    /// On success the token and profile are persisted and [`Route::Home`] is
    /// returned. On any failure nothing is persisted, one error notification
    /// is emitted and the state returns to [`AuthState::Anonymous`].
    ///
    /// # Errors
    ///
    /// - [`ClientError::InProgress`] if another login is still running
    /// - [`ClientError::Validation`] for a blank email or password
    /// - [`ClientError::Auth`] for rejected credentials or a non-super-admin role
    /// - [`ClientError::Network`] / [`ClientError::Decode`] for transport problems
    /// - [`ClientError::Storage`] if the session could not be saved
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Route, ClientError> {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if *state == AuthState::Authenticating {
                drop(state);
                let err = ClientError::InProgress;
                self.notifier.notify(Notification::from_error(&err));
                return Err(err);
            }
            *state = AuthState::Authenticating;
        }

        let mut guard = StateGuard::new(&self.state);

        match self.attempt_login(email.trim(), password).await {
            Ok(profile) => {
                guard.finish(AuthState::Authenticated);
                info!(email = %profile.email, "Super-admin signed in");
                self.notifier.notify(Notification::success(
                    format!("Welcome back, {}!", profile.email),
                    "You have successfully logged in.",
                ));
                Ok(Route::Home)
            }
            Err(err) => {
                guard.finish(AuthState::Anonymous);
                warn!(error = %err, "Login failed");
                self.notifier.notify(Notification::from_error(&err));
                Err(err)
            }
        }
    }

    async fn attempt_login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AdminProfile, ClientError> {
        if email.is_empty() || password.expose_secret().is_empty() {
            return Err(ClientError::Validation(
                "Email and password are required.".to_string(),
            ));
        }

        let response = self.api.login(email, password).await?;

        let role = response.role.unwrap_or_default();
        if !role.is_super_admin() {
            warn!(role = %role, "Rejecting login for non super-admin account");
            return Err(ClientError::Auth("Login failed. Not super admin".to_string()));
        }

        let token: BearerToken = response
            .token
            .ok_or_else(|| ClientError::Auth("Login failed. No token returned.".to_string()))?;

        let issued_to = response
            .email
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| email.to_string());
        let profile = AdminProfile::new(issued_to, AdminRole::SuperAdmin);

        self.session.persist(&token, &profile).await?;
        Ok(profile)
    }

    /// Cached profile of the signed-in admin, for the profile screen.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Authorization`] when signed out.
    pub async fn profile(&self) -> Result<AdminProfile, ClientError> {
        self.session.profile().await.inspect_err(|err| {
            self.notifier.notify(Notification::from_error(err));
        })
    }

    /// Sign out, removing the token and cached profile together.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] if the store could not be cleared;
    /// the state is left unchanged in that case.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<Route, ClientError> {
        match self.session.clear().await {
            Ok(()) => {
                self.set_state(AuthState::Anonymous);
                info!("Signed out");
                self.notifier
                    .notify(Notification::success("Signed out", "You have been logged out."));
                Ok(Route::Login)
            }
            Err(err) => {
                self.notifier.notify(Notification::from_error(&err));
                Err(err)
            }
        }
    }
}

/// Returns the state to `Anonymous` if a login future is dropped mid-flight.
struct StateGuard<'a> {
    state: &'a Mutex<AuthState>,
    finished: bool,
}

impl<'a> StateGuard<'a> {
    const fn new(state: &'a Mutex<AuthState>) -> Self {
        Self {
            state,
            finished: false,
        }
    }

    fn finish(&mut self, next: AuthState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
        self.finished = true;
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            *self.state.lock().unwrap_or_else(PoisonError::into_inner) = AuthState::Anonymous;
        }
    }
}
