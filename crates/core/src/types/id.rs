//! Opaque identifiers for remote admin records.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of an admin record, assigned by the remote API.
///
/// The client never interprets the value; it is only echoed back in the
/// `PUT /update/{id}` path. Numeric identifiers are accepted on the wire
/// and kept in their decimal string form.
///
/// # Example
///
/// ```rust
/// # use admin_portal_core::AdminId;
/// let id: AdminId = serde_json::from_str("\"65f1c0ffee\"").unwrap();
/// assert_eq!(id.as_str(), "65f1c0ffee");
///
/// let numeric: AdminId = serde_json::from_str("42").unwrap();
/// assert_eq!(numeric.as_str(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AdminId(String);

impl AdminId {
    /// Create a new ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the identifier is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl<'de> Deserialize<'de> for AdminId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

impl fmt::Display for AdminId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AdminId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for AdminId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for AdminId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
