//! Cached profile of the signed-in admin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::AdminRole;

/// Profile blob persisted under the `adminData` key at login.
///
/// Read back by the profile screen without a server round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    /// Email the session was issued to.
    pub email: String,
    /// Role reported by the login response.
    pub role: AdminRole,
    /// When the session was established.
    pub logged_in_at: DateTime<Utc>,
}

impl AdminProfile {
    /// Create a profile stamped with the current time.
    #[must_use]
    pub fn new(email: impl Into<String>, role: AdminRole) -> Self {
        Self {
            email: email.into(),
            role,
            logged_in_at: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_blob_shape() {
        let profile = AdminProfile::new("a@x.com", AdminRole::SuperAdmin);
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["email"], "a@x.com");
        assert_eq!(value["role"], "super-admin");
        assert!(value.get("loggedInAt").is_some());

        let back: AdminProfile = serde_json::from_value(value).unwrap();
        assert_eq!(back, profile);
    }
}
