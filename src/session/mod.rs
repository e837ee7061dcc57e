//! Session state: the status model and the store that owns it.

pub mod status;
pub mod store;

pub use status::{Identity, SessionStatus};
pub use store::{Credentials, RedirectTarget, SessionStore};
