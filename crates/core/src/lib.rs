//! Admin Portal Core - Shared types library.
//!
//! This crate provides the types used across the admin portal components:
//! - `admin` - Session, collection and editor controllers plus the API client
//! - `cli` - Command-line front-end driving those controllers
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no credential storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Admin records, roles, identifiers, tokens and navigation routes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
