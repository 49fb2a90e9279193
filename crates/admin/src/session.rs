//! Explicit session context threaded into every authenticated call.
//!
//! The token is the only state shared between screens. It is written by the
//! login flow, removed by logout, and read by everything else. Readers treat
//! a missing token, a blank token, or a failing store the same way: the user
//! is not signed in.

use std::sync::Arc;

use tracing::{debug, warn};

use admin_portal_core::{AdminProfile, BearerToken};

use crate::error::ClientError;
use crate::store::{CredentialStore, StoreError, keys};

const NOT_SIGNED_IN: &str = "You are not signed in. Please log in.";

/// Handle to the persisted session.
///
/// Cheap to clone; all clones share the same store.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}

impl SessionContext {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Read the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Authorization`] if no usable token is stored or
    /// the store cannot be read.
    pub async fn token(&self) -> Result<BearerToken, ClientError> {
        match self.store.get(keys::TOKEN).await {
            Ok(Some(raw)) => BearerToken::new(raw)
                .ok_or_else(|| ClientError::Authorization(NOT_SIGNED_IN.to_string())),
            Ok(None) => Err(ClientError::Authorization(NOT_SIGNED_IN.to_string())),
            Err(e) => {
                warn!(error = %e, "Credential store unreadable, treating as signed out");
                Err(ClientError::Authorization(NOT_SIGNED_IN.to_string()))
            }
        }
    }

    /// Returns true if a usable token is stored.
    pub async fn is_authenticated(&self) -> bool {
        self.token().await.is_ok()
    }

    /// Read the cached profile written at login.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Authorization`] if there is no session, or
    /// [`ClientError::Storage`] if the blob cannot be decoded.
    pub async fn profile(&self) -> Result<AdminProfile, ClientError> {
        // The profile is only meaningful alongside a token.
        self.token().await?;

        let raw = match self.store.get(keys::ADMIN_DATA).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Err(ClientError::Authorization(NOT_SIGNED_IN.to_string())),
            Err(e) => {
                warn!(error = %e, "Credential store unreadable, treating as signed out");
                return Err(ClientError::Authorization(NOT_SIGNED_IN.to_string()));
            }
        };

        serde_json::from_str(&raw)
            .map_err(|e| ClientError::Storage(StoreError::Corrupt(format!("adminData: {e}"))))
    }

    /// Persist a freshly issued session.
    ///
    /// The token is written first. If the profile write fails the token is
    /// removed again so no half-written session is left behind.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] if either write fails.
    pub async fn persist(
        &self,
        token: &BearerToken,
        profile: &AdminProfile,
    ) -> Result<(), ClientError> {
        let blob = serde_json::to_string(profile)
            .map_err(|e| ClientError::Storage(StoreError::Corrupt(e.to_string())))?;

        self.store.set(keys::TOKEN, token.expose()).await?;

        if let Err(e) = self.store.set(keys::ADMIN_DATA, &blob).await {
            if let Err(cleanup) = self.store.remove(keys::TOKEN).await {
                warn!(error = %cleanup, "Failed to roll back token after profile write failure");
            }
            return Err(e.into());
        }

        debug!(email = %profile.email, "Session persisted");
        Ok(())
    }

    /// Remove the token and the cached profile.
    ///
    /// Both removals are attempted even if the first fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`ClientError::Storage`] encountered.
    pub async fn clear(&self) -> Result<(), ClientError> {
        let token = self.store.remove(keys::TOKEN).await;
        let profile = self.store.remove(keys::ADMIN_DATA).await;

        token?;
        profile?;

        debug!("Session cleared");
        Ok(())
    }
}
