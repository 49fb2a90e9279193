//! `reqwest` implementation of [`AdminApi`].

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use admin_portal_core::{AdminFields, AdminId, AdminRecord, BearerToken};

use super::types::{
    Ack, AdminListResponse, CreatedAdmin, LoginRequest, LoginResponse, extract_error_message,
};
use super::AdminApi;
use crate::config::ClientConfig;
use crate::error::ClientError;

const LOGIN_FALLBACK: &str = "Login failed. Please try again.";
const LIST_FALLBACK: &str = "Failed to load admins.";
const CREATE_FALLBACK: &str = "Failed to create admin.";
const UPDATE_FALLBACK: &str = "Failed to update admin.";
const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

/// HTTP client for the admin API.
#[derive(Clone)]
pub struct HttpAdminApi {
    /// HTTP client.
    client: Client,
    /// Base URL ending in `/`, e.g. `https://host/api/v2/`.
    base_url: Url,
}

impl std::fmt::Debug for HttpAdminApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAdminApi")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpAdminApi {
    /// Create a client for the configured API.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent(concat!("admin-portal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, config.api_url.clone()))
    }

    /// Create a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Decode(format!("Invalid request URL '{path}': {e}")))
    }
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };

        let response = self
            .client
            .post(self.endpoint("login")?)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response, LOGIN_FALLBACK).await;
            warn!(status = status.as_u16(), %message, "Login rejected by server");
            return Err(ClientError::Auth(message));
        }

        let result: LoginResponse = decode(response).await?;
        debug!(role = ?result.role, "Login response received");
        Ok(result)
    }

    #[instrument(skip(self, token))]
    async fn list_admins(&self, token: &BearerToken) -> Result<Vec<AdminRecord>, ClientError> {
        let response = self
            .client
            .get(self.endpoint("users")?)
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(response, LIST_FALLBACK, false).await);
        }

        let admins = decode::<AdminListResponse>(response).await?.into_admins();
        debug!(count = admins.len(), "Admins fetched");
        Ok(admins)
    }

    #[instrument(skip(self, token, fields), fields(email = %fields.email))]
    async fn create_admin(
        &self,
        token: &BearerToken,
        fields: &AdminFields,
    ) -> Result<CreatedAdmin, ClientError> {
        let response = self
            .client
            .post(self.endpoint("register")?)
            .bearer_auth(token.expose())
            .json(fields)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if status != StatusCode::CREATED {
            return Err(status_error(response, CREATE_FALLBACK, true).await);
        }

        let created: CreatedAdmin = decode_or_default(response).await?;
        debug!(id = ?created.id, "Admin created");
        Ok(created)
    }

    #[instrument(skip(self, token, fields), fields(id = %id))]
    async fn update_admin(
        &self,
        token: &BearerToken,
        id: &AdminId,
        fields: &AdminFields,
    ) -> Result<Ack, ClientError> {
        let body = fields.clone().without_password();
        let path = record_path(id)?;

        let response = self
            .client
            .put(self.endpoint(&path)?)
            .bearer_auth(token.expose())
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(status_error(response, UPDATE_FALLBACK, true).await);
        }

        let ack: Ack = decode_or_default(response).await?;
        debug!(message = ?ack.message, "Admin updated");
        Ok(ack)
    }
}

/// `update/{id}` with the id percent-encoded.
///
/// Ids made only of dots are rejected: URL resolution treats them (encoded
/// or not) as `.`/`..` segments and the request would leave the record path.
fn record_path(id: &AdminId) -> Result<String, ClientError> {
    let raw = id.as_str();
    if raw.trim().is_empty() || raw.chars().all(|c| c == '.') {
        return Err(ClientError::Validation(format!("Invalid admin id '{raw}'.")));
    }
    Ok(format!("update/{}", urlencoding::encode(raw)))
}

// =============================================================================
// Response Handling
// =============================================================================

fn network_error(e: reqwest::Error) -> ClientError {
    warn!(error = %e, "Request did not complete");
    ClientError::Network(format!("Unable to reach the server: {e}"))
}

/// Read the error message from the failed response's own body.
async fn error_message(response: Response, fallback: &str) -> String {
    let body = response.text().await.unwrap_or_default();
    extract_error_message(&body).unwrap_or_else(|| fallback.to_string())
}

/// Map a non-success (or unexpected success) status to a client error.
async fn status_error(response: Response, fallback: &str, is_write: bool) -> ClientError {
    let status = response.status();
    let message = error_message(response, fallback).await;

    warn!(status = status.as_u16(), %message, "Admin API request failed");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ClientError::Authorization(if message == fallback {
                SESSION_EXPIRED.to_string()
            } else {
                message
            })
        }
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY
            if is_write =>
        {
            ClientError::Validation(message)
        }
        _ => ClientError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    response
        .json()
        .await
        .map_err(|e| ClientError::Decode(format!("Failed to parse response: {e}")))
}

/// Like [`decode`], but an empty body yields `T::default()`.
async fn decode_or_default<T: DeserializeOwned + Default>(
    response: Response,
) -> Result<T, ClientError> {
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::Decode(format!("Failed to read response: {e}")))?;

    if body.trim().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(&body)
        .map_err(|e| ClientError::Decode(format!("Failed to parse response: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpAdminApi {
        HttpAdminApi::with_client(Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn test_endpoint_keeps_version_prefix() {
        let api = api("https://example.com/api/v2/");
        assert_eq!(
            api.endpoint("login").unwrap().as_str(),
            "https://example.com/api/v2/login"
        );
        assert_eq!(
            api.endpoint("update/a%2Fb").unwrap().as_str(),
            "https://example.com/api/v2/update/a%2Fb"
        );
    }

    #[test]
    fn test_record_path_encodes_id() {
        assert_eq!(record_path(&AdminId::new("a/b")).unwrap(), "update/a%2Fb");
        assert_eq!(record_path(&AdminId::new("v1.2")).unwrap(), "update/v1.2");
    }

    #[tokio::test]
    async fn test_dot_only_id_is_rejected_before_request() {
        // Nothing listens here; a request would surface as a network error
        let api = api("http://127.0.0.1:9/api/v2/");
        let token = BearerToken::new("t1").unwrap();

        for id in ["..", ".", "  "] {
            let result = api
                .update_admin(&token, &AdminId::new(id), &AdminFields::default())
                .await;
            assert!(
                matches!(result, Err(ClientError::Validation(_))),
                "id {id:?} was not rejected"
            );
        }
    }

    #[test]
    fn test_debug_shows_base_url_only() {
        let debug = format!("{:?}", api("https://example.com/api/v2/"));
        assert!(debug.contains("example.com"));
    }
}
