//! Remote admin API.
//!
//! Four operations, each a single request/response round trip with no retry:
//!
//! | Operation | Method & Path | Auth | Success |
//! |---|---|---|---|
//! | [`AdminApi::login`] | `POST /login` | none | 200 |
//! | [`AdminApi::list_admins`] | `GET /users` | Bearer | 200 |
//! | [`AdminApi::create_admin`] | `POST /register` | Bearer | 201 |
//! | [`AdminApi::update_admin`] | `PUT /update/{id}` | Bearer | 200 |
//!
//! Paths are relative to the configured base URL, which includes `/api/v2`.

mod client;
mod types;

pub use client::HttpAdminApi;
pub use types::*;

use async_trait::async_trait;
use secrecy::SecretString;

use admin_portal_core::{AdminFields, AdminId, AdminRecord, BearerToken};

use crate::error::ClientError;

/// Operations the controllers need from the remote API.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Exchange credentials for a token.
    ///
    /// A successful response does not imply the account may use the portal;
    /// the caller still checks the role.
    async fn login(&self, email: &str, password: &SecretString)
    -> Result<LoginResponse, ClientError>;

    /// Fetch every admin record.
    async fn list_admins(&self, token: &BearerToken) -> Result<Vec<AdminRecord>, ClientError>;

    /// Create an admin. Succeeds only on HTTP 201.
    async fn create_admin(
        &self,
        token: &BearerToken,
        fields: &AdminFields,
    ) -> Result<CreatedAdmin, ClientError>;

    /// Update an admin. Succeeds only on HTTP 200. Never transmits a password.
    async fn update_admin(
        &self,
        token: &BearerToken,
        id: &AdminId,
        fields: &AdminFields,
    ) -> Result<Ack, ClientError>;
}
