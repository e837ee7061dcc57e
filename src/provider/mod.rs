//! Identity providers: the backend that accepts credentials and reports
//! auth-state changes.
//!
//! DESIGN
//! ======
//! `IdentityProvider` is the only seam between the session core and a
//! concrete backend. `build_provider` picks one from [`AuthConfig`]:
//! the in-memory provider for development and tests, or the Identity
//! Toolkit REST provider.

pub mod identity_toolkit;
pub mod listeners;
pub mod memory;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::{AuthConfig, ConfigError, ProviderKind};
use crate::error::AuthError;
use crate::session::Identity;

pub use identity_toolkit::IdentityToolkitProvider;
pub use listeners::Listeners;
pub use memory::MemoryProvider;

// =============================================================================
// EVENTS
// =============================================================================

/// One auth-state change pushed by the provider. `identity` is `None` when the
/// provider has no signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthStateChange {
    pub identity: Option<Identity>,
}

/// Receiving end of a provider subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    events: mpsc::UnboundedReceiver<AuthStateChange>,
}

impl Subscription {
    #[must_use]
    pub fn new(events: mpsc::UnboundedReceiver<AuthStateChange>) -> Self {
        Self { events }
    }

    /// Wait for the next change. Returns `None` once the provider is gone.
    pub async fn next(&mut self) -> Option<AuthStateChange> {
        self.events.recv().await
    }

    /// Take an already-delivered change without waiting.
    pub fn try_next(&mut self) -> Option<AuthStateChange> {
        match self.events.try_recv() {
            Ok(change) => Some(change),
            Err(_) => None,
        }
    }
}

// =============================================================================
// PROVIDER TRAIT
// =============================================================================

/// Backend-neutral async identity provider. Enables mocking in tests.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Sign in with an existing account.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials`, `NetworkUnavailable`, or `ProviderError`.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// `AccountAlreadyExists`, `NetworkUnavailable`, or `ProviderError`.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// End the current session.
    ///
    /// # Errors
    ///
    /// `NetworkUnavailable` or `ProviderError`.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Open a change stream. Delivers the current state first when the
    /// provider has determined it, then every subsequent change.
    fn subscribe(&self) -> Subscription;
}

/// Build the provider selected by `config`.
///
/// # Errors
///
/// Returns an error if the Identity Toolkit provider lacks an API key or its
/// HTTP client fails to build.
pub fn build_provider(config: &AuthConfig) -> Result<Arc<dyn IdentityProvider>, ConfigError> {
    match config.provider {
        ProviderKind::Memory => Ok(Arc::new(MemoryProvider::new())),
        ProviderKind::IdentityToolkit => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| ConfigError::MissingApiKey { var: "AUTH_API_KEY_ENV".into() })?;
            let provider = IdentityToolkitProvider::new(api_key, config.base_url.clone(), config.timeouts)?;
            Ok(Arc::new(provider))
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
