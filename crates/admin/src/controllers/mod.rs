//! Screen controllers.
//!
//! Each controller owns the state of one screen and talks to the outside
//! world only through the [`AdminApi`](crate::api::AdminApi), the
//! [`SessionContext`](crate::session::SessionContext) and a
//! [`Notifier`](crate::notify::Notifier). Every error is caught at the
//! controller boundary, reported as one notification, and returned to the
//! caller for rendering. Nothing is retried automatically.

pub mod collection;
pub mod editor;
pub mod session;

pub use collection::{Activation, CollectionController, LoadOutcome, LoadState, filter_admins};
pub use editor::{EditorError, EditorMode, FormState, RecordEditor};
pub use session::{AuthState, SessionController};
