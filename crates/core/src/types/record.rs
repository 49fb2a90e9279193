//! Admin record types exchanged with the remote API.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::id::AdminId;
use super::role::AdminRole;

/// An admin account as listed by `GET /users`.
///
/// String fields that are missing or `null` on the wire decode to empty
/// strings so a single sparse record cannot fail the whole list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRecord {
    /// Server-assigned identifier; absent for records not yet created.
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<AdminId>,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Role string (free-form apart from `super-admin`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: AdminRole,
    /// Login email.
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    /// Restaurant the admin manages.
    #[serde(default, deserialize_with = "null_as_default")]
    pub restaurant_name: String,
    /// Contact phone number.
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    /// Write-only password. Never read from or written to the wire as part
    /// of a record.
    #[serde(skip)]
    pub password: Option<SecretString>,
    /// Creation instant.
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl AdminRecord {
    /// Returns true if `needle` occurs in the name, email or restaurant
    /// name, ignoring case. An empty needle matches every record.
    ///
    /// `needle` must already be lowercased; see [`AdminRecord::matches`] for
    /// the convenience form.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
            || self.restaurant_name.to_lowercase().contains(needle)
    }

    /// Case-insensitive search over name, email and restaurant name.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.matches_lowercase(&query.to_lowercase())
    }

    /// Returns true when the record carries a usable identifier.
    #[must_use]
    pub fn has_id(&self) -> bool {
        self.id.as_ref().is_some_and(|id| !id.is_blank())
    }
}

/// Editable fields submitted by `POST /register` and `PUT /update/{id}`.
///
/// `password` is serialized only when present; update payloads are built
/// with [`AdminFields::without_password`] so the key never appears.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminFields {
    pub name: String,
    pub role: AdminRole,
    pub email: String,
    pub restaurant_name: String,
    pub phone: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "expose_password"
    )]
    pub password: Option<SecretString>,
}

impl AdminFields {
    /// Drop the password so the payload is safe for an update call.
    #[must_use]
    pub fn without_password(mut self) -> Self {
        self.password = None;
        self
    }
}

impl From<&AdminRecord> for AdminFields {
    fn from(record: &AdminRecord) -> Self {
        Self {
            name: record.name.clone(),
            role: record.role.clone(),
            email: record.email.clone(),
            restaurant_name: record.restaurant_name.clone(),
            phone: record.phone.clone(),
            password: None,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[allow(clippy::ref_option)]
fn expose_password<S>(password: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match password {
        Some(secret) => serializer.serialize_str(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}
