//! One module per screen family.

pub mod admin;
pub mod session;
