//! Core types for the admin portal.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod profile;
pub mod record;
pub mod role;
pub mod route;
pub mod token;

pub use id::AdminId;
pub use profile::AdminProfile;
pub use record::{AdminFields, AdminRecord};
pub use role::AdminRole;
pub use route::Route;
pub use token::BearerToken;
