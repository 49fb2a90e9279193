//! Unified error handling for the admin portal client.

use thiserror::Error;

use crate::store::StoreError;

/// Client-level error type.
///
/// Controllers catch every variant at their boundary and turn it into a
/// user-visible notification; none of them is fatal and none is retried
/// automatically.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Bad credentials, or the account is not a super-admin.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Missing or rejected token on an authenticated call.
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// Required fields missing locally, or rejected by the server.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Transport failure; the request may not have reached the server.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success status from the server.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Credential store failure while writing or clearing the session.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// A request from the same controller is still in flight.
    #[error("A request is already in progress")]
    InProgress,
}

impl ClientError {
    /// Title shown on the error notification.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Auth(_) => "Login failed",
            Self::Authorization(_) => "Not signed in",
            Self::Validation(_) => "Validation error",
            Self::Network(_) => "Network error",
            Self::Server { .. } | Self::Decode(_) => "Server error",
            Self::Storage(_) => "Storage error",
            Self::InProgress => "Please wait",
        }
    }

    /// Message shown on the error notification.
    ///
    /// Unlike `Display`, this omits the category prefix because the title
    /// already carries it.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(msg)
            | Self::Authorization(msg)
            | Self::Validation(msg)
            | Self::Network(msg)
            | Self::Decode(msg) => msg.clone(),
            Self::Server { message, .. } => message.clone(),
            Self::Storage(e) => e.to_string(),
            Self::InProgress => self.to_string(),
        }
    }

    /// Returns true if signing in again could resolve the error.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Authorization(_))
    }
}
