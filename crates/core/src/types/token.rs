//! Bearer token wrapper.

use secrecy::{ExposeSecret, SecretString};

/// Opaque session credential returned by `POST /login`.
///
/// Wraps a [`SecretString`] so it never appears in `Debug` output or logs.
#[derive(Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    /// Wrap a raw token. Returns `None` for a blank token, which the
    /// portal treats the same as no token at all.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(SecretString::from(raw)))
        }
    }

    /// Expose the raw token for the `Authorization` header or persistence.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}
