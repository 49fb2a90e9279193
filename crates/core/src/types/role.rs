//! Admin roles as reported by the remote API.

use serde::{Deserialize, Serialize};

/// Role attached to an admin account.
///
/// Only [`AdminRole::SuperAdmin`] may use the portal. Every other value is
/// carried through verbatim so records with free-form roles (for example
/// `"Manager"`) survive a list/edit round trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AdminRole {
    /// The single role permitted to sign in to the portal.
    SuperAdmin,
    /// Any other role string.
    Other(String),
}

impl AdminRole {
    /// Wire value of the super-admin role.
    pub const SUPER_ADMIN: &'static str = "super-admin";

    /// Returns true for the super-admin role.
    #[must_use]
    pub const fn is_super_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// Returns the role as it appears on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::SuperAdmin => Self::SUPER_ADMIN,
            Self::Other(role) => role,
        }
    }
}

impl Default for AdminRole {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for AdminRole {
    fn from(s: String) -> Self {
        if s == Self::SUPER_ADMIN {
            Self::SuperAdmin
        } else {
            Self::Other(s)
        }
    }
}

impl From<&str> for AdminRole {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<AdminRole> for String {
    fn from(role: AdminRole) -> Self {
        match role {
            AdminRole::SuperAdmin => AdminRole::SUPER_ADMIN.to_owned(),
            AdminRole::Other(role) => role,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_super_admin_is_exact_match() {
        assert!(AdminRole::from("super-admin").is_super_admin());
        assert!(!AdminRole::from("Super-Admin").is_super_admin());
        assert!(!AdminRole::from("super_admin").is_super_admin());
        assert!(!AdminRole::from("manager").is_super_admin());
    }

    #[test]
    fn test_other_role_preserved() {
        let role: AdminRole = serde_json::from_str("\"Manager\"").unwrap();
        assert_eq!(role, AdminRole::Other("Manager".to_owned()));
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"Manager\"");
    }

    #[test]
    fn test_display() {
        assert_eq!(AdminRole::SuperAdmin.to_string(), "super-admin");
    }
}
