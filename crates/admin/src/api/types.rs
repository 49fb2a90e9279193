//! Request and response bodies of the admin API.

use serde::{Deserialize, Deserializer, Serialize};

use admin_portal_core::{AdminId, AdminRecord, AdminRole, BearerToken};

/// Body of `POST /login`.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful `POST /login` response.
///
/// Every field is optional on the wire; the session controller decides
/// whether the result is acceptable.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default, deserialize_with = "deserialize_token")]
    pub token: Option<BearerToken>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<AdminRole>,
}

/// `GET /users` response. Accepts both `{"admins": [...]}` and a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AdminListResponse {
    Wrapped {
        #[serde(default)]
        admins: Vec<AdminRecord>,
    },
    Bare(Vec<AdminRecord>),
}

impl AdminListResponse {
    #[must_use]
    pub fn into_admins(self) -> Vec<AdminRecord> {
        match self {
            Self::Wrapped { admins } | Self::Bare(admins) => admins,
        }
    }
}

/// `POST /register` response (HTTP 201).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedAdmin {
    #[serde(default, alias = "_id")]
    pub id: Option<AdminId>,
    #[serde(default)]
    pub email: Option<String>,
}

/// `PUT /update/{id}` acknowledgement (HTTP 200).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

fn deserialize_token<'de, D>(deserializer: D) -> Result<Option<BearerToken>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(BearerToken::new))
}

/// Pull a human-readable message out of an error response body.
///
/// Looks at `message` first, then `error` (either a string or an object
/// with its own `message`). Returns `None` for bodies that are not JSON or
/// carry neither field.
#[must_use]
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let as_text = |v: &serde_json::Value| {
        v.as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
    };

    if let Some(msg) = value.get("message").and_then(as_text) {
        return Some(msg);
    }

    match value.get("error")? {
        serde_json::Value::Object(obj) => obj.get("message").and_then(as_text),
        other => as_text(other),
    }
}
