//! Admin Portal client library.
//!
//! Everything the portal screens need below the presentation layer:
//! authenticating a super-admin, keeping the session token, fetching and
//! filtering the admin collection, and creating or updating admin records
//! against the remote API.
//!
//! # Layout
//!
//! - [`store`] - Scoped key-value persistence for the token and profile
//! - [`api`] - HTTP client for the admin API
//! - [`session`] - Explicit session context passed to every authenticated call
//! - [`controllers`] - Session, collection and editor controllers
//! - [`notify`] - User-facing notification sink
//! - [`config`] - Environment-driven configuration
//!
//! # Data flow
//!
//! Session controller → credential store (write token) → API client (read
//! token on each call) → remote server. The collection and editor
//! controllers share nothing but the record handed from one to the other.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod controllers;
pub mod error;
pub mod notify;
pub mod session;
pub mod store;

#[cfg(test)]
mod testing;

pub use error::ClientError;
