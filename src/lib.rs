//! authgate: session-state manager and route guard for single-page
//! applications.
//!
//! SYSTEM CONTEXT
//! ==============
//! A [`SessionStore`] owns the one authoritative [`SessionStatus`] for the
//! application. It mirrors the identity provider's change stream and records
//! the outcome of login, registration, and logout. A [`RouteGuard`] reads that
//! status on every navigation and decides whether to render, show the pending
//! view, or redirect.
//!
//! ```text
//! IdentityProvider ──events──► SessionStore ──watch──► RouteGuard ──► router
//!        ▲                          │
//!        └──── login/register ──────┘──navigation──► router
//! ```
//!
//! The library never installs a `tracing` subscriber; the host does.

pub mod config;
pub mod error;
pub mod forms;
pub mod guard;
pub mod notice;
pub mod provider;
pub mod routes;
pub mod session;

pub use config::{AuthConfig, ConfigError};
pub use error::AuthError;
pub use guard::{Decision, DecisionWatch, RouteGuard, ViewKind};
pub use provider::{IdentityProvider, build_provider};
pub use session::{Credentials, Identity, RedirectTarget, SessionStatus, SessionStore};

/// Build the configured provider and start a store over it.
///
/// # Errors
///
/// Returns an error if the configured provider cannot be built.
pub fn start_from_config(config: &AuthConfig) -> Result<SessionStore, ConfigError> {
    let provider = build_provider(config)?;
    tracing::info!(provider = ?config.provider, "starting session store");
    Ok(SessionStore::start(provider))
}
