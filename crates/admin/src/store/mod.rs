//! Scoped key-value persistence for the session credential.
//!
//! # Keys
//!
//! - [`keys::TOKEN`] - Bearer token returned by `POST /login`
//! - [`keys::ADMIN_DATA`] - JSON-serialized [`AdminProfile`](admin_portal_core::AdminProfile)
//!
//! Both keys are written at login and removed together at logout.
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local map, for tests and embedding
//! - [`FileStore`] - one JSON document per scope on disk
//!
//! No encryption or integrity protection is applied; values are opaque text.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// Keys used in the credential store.
pub mod keys {
    /// Key for the bearer token.
    pub const TOKEN: &str = "token";

    /// Key for the cached admin profile blob.
    pub const ADMIN_DATA: &str = "adminData";
}

/// Errors that can occur during credential store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend cannot be reached or is disabled.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Filesystem error.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted document could not be decoded.
    #[error("storage corrupted: {0}")]
    Corrupt(String),
}

/// Asynchronous key-value persistence.
///
/// Every operation may fail; callers treat a failure as "not authenticated"
/// rather than propagating a crash.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read a value. `Ok(None)` means the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
