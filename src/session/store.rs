//! Session store, the single owner of `SessionStatus`.
//!
//! ARCHITECTURE
//! ============
//! Two write paths feed one `watch` channel:
//! - the passive path: a background task mirrors every provider change event
//!   into the status (the path of record, including page-reload restore);
//! - the operation path: `login`/`register`/`logout` write their own outcome
//!   as soon as the provider call resolves.
//!
//! Writes are last-write-wins by arrival. Both paths converge on the
//! provider's truth, so neither is given priority and no sequence numbers
//! are attached.
//!
//! The background task holds only a weak reference to the store; dropping the
//! last `SessionStore` handle (or calling [`SessionStore::shutdown`]) stops it
//! and releases the provider subscription.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use super::status::{Identity, SessionStatus};
use crate::error::AuthError;
use crate::provider::{IdentityProvider, Subscription};

const NAVIGATION_CAPACITY: usize = 16;

// =============================================================================
// TYPES
// =============================================================================

/// Email/password pair handed to the provider. Emptiness is checked by the
/// caller (see `forms`), not here.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where a redirect or post-operation navigation should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedirectTarget {
    /// Landing view for signed-in users (e.g. the dashboard).
    ProtectedHome,
    /// Landing view for signed-out users (e.g. the login form).
    AuthHome,
}

#[derive(Debug, Clone, Copy)]
enum UpdateSource {
    Provider,
    Login,
    Register,
    Logout,
}

impl UpdateSource {
    fn as_str(self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Login => "login",
            Self::Register => "register",
            Self::Logout => "logout",
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

struct Inner {
    provider: Arc<dyn IdentityProvider>,
    status: watch::Sender<SessionStatus>,
    pending: watch::Sender<bool>,
    in_flight: Mutex<usize>,
    navigation: broadcast::Sender<RedirectTarget>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

/// Cheap-to-clone handle to the application's one session store. Create it
/// once with [`SessionStore::start`] and pass clones to whatever needs it.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Create the store in `Unknown` status and subscribe to `provider`.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime; the provider subscription
    /// is drained by a spawned task.
    #[must_use]
    pub fn start(provider: Arc<dyn IdentityProvider>) -> Self {
        let (status, _) = watch::channel(SessionStatus::Unknown);
        let (pending, _) = watch::channel(false);
        let (navigation, _) = broadcast::channel(NAVIGATION_CAPACITY);
        let subscription = provider.subscribe();

        let inner = Arc::new(Inner {
            provider,
            status,
            pending,
            in_flight: Mutex::new(0),
            navigation,
            listener: Mutex::new(None),
        });

        let handle = tokio::spawn(mirror_provider(Arc::downgrade(&inner), subscription));
        *inner.listener.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);

        tracing::debug!("session store started");
        Self { inner }
    }

    // -------------------------------------------------------------------------
    // Observables
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.inner.status.borrow().clone()
    }

    /// True while at least one login/register/logout call is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        *self.inner.pending.borrow()
    }

    /// Receiver notified on every status write.
    #[must_use]
    pub fn watch_status(&self) -> watch::Receiver<SessionStatus> {
        self.inner.status.subscribe()
    }

    #[must_use]
    pub fn watch_pending(&self) -> watch::Receiver<bool> {
        self.inner.pending.subscribe()
    }

    /// Navigation requests raised by successful operations.
    #[must_use]
    pub fn navigation(&self) -> broadcast::Receiver<RedirectTarget> {
        self.inner.navigation.subscribe()
    }

    /// Wait until the status has left `Unknown` and return it.
    pub async fn wait_until_known(&self) -> SessionStatus {
        let mut rx = self.watch_status();
        if rx.wait_for(SessionStatus::is_known).await.is_err() {
            return self.status();
        }
        rx.borrow().clone()
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Sign in. On success the status becomes `Authenticated` and
    /// `ProtectedHome` navigation is signalled.
    ///
    /// # Errors
    ///
    /// Propagates the provider's failure; status is left untouched.
    pub async fn login(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        self.authenticate(UpdateSource::Login, credentials).await
    }

    /// Create an account. Same contract as [`SessionStore::login`].
    ///
    /// # Errors
    ///
    /// Propagates the provider's failure; status is left untouched.
    pub async fn register(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        self.authenticate(UpdateSource::Register, credentials).await
    }

    /// Sign out. On success the status becomes `Unauthenticated` and
    /// `AuthHome` navigation is signalled.
    ///
    /// # Errors
    ///
    /// Propagates the provider's failure; status is left untouched.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let _pending = self.inner.begin_pending();
        match self.inner.provider.sign_out().await {
            Ok(()) => {
                self.inner.apply(None, UpdateSource::Logout);
                self.inner.navigate(RedirectTarget::AuthHome);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(code = err.error_code(), error = %err, "logout failed");
                Err(err)
            }
        }
    }

    async fn authenticate(&self, source: UpdateSource, credentials: &Credentials) -> Result<Identity, AuthError> {
        let _pending = self.inner.begin_pending();
        let provider = &self.inner.provider;
        let result = match source {
            UpdateSource::Register => provider.sign_up(credentials.email(), credentials.password()).await,
            _ => provider.sign_in(credentials.email(), credentials.password()).await,
        };

        match result {
            Ok(identity) => {
                self.inner.apply(Some(identity.clone()), source);
                self.inner.navigate(RedirectTarget::ProtectedHome);
                Ok(identity)
            }
            Err(err) => {
                tracing::warn!(
                    operation = source.as_str(),
                    code = err.error_code(),
                    error = %err,
                    "authentication failed"
                );
                Err(err)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Stop mirroring provider events and release the subscription. Later
    /// operations still write their own outcomes.
    pub fn shutdown(&self) {
        self.inner.stop_listener();
    }

    /// Whether the provider subscription is still being drained.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        let listener = self.inner.listener.lock().unwrap_or_else(PoisonError::into_inner);
        listener.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("status", &self.inner.status.borrow().label())
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// INTERNALS
// =============================================================================

impl Inner {
    /// Only writer of `status`. Taking an `Option<Identity>` keeps `Unknown`
    /// unreachable once left.
    fn apply(&self, identity: Option<Identity>, source: UpdateSource) {
        let status = SessionStatus::from_identity(identity);
        tracing::info!(
            status = status.label(),
            user_id = status.identity().map(|i| i.id.as_str()),
            source = source.as_str(),
            "session status updated"
        );
        self.status.send_replace(status);
    }

    fn navigate(&self, target: RedirectTarget) {
        if self.navigation.send(target).is_err() {
            tracing::debug!(?target, "navigation signal had no listeners");
        }
    }

    fn begin_pending(&self) -> PendingGuard<'_> {
        let mut count = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        *count += 1;
        self.pending.send_replace(true);
        PendingGuard { inner: self }
    }

    fn stop_listener(&self) {
        let handle = self.listener.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(handle) = handle {
            handle.abort();
            tracing::debug!("provider subscription released");
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.stop_listener();
    }
}

/// Decrements the in-flight count when an operation resolves or its future is
/// dropped.
struct PendingGuard<'a> {
    inner: &'a Inner,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut count = self.inner.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.inner.pending.send_replace(false);
        }
    }
}

async fn mirror_provider(store: Weak<Inner>, mut subscription: Subscription) {
    while let Some(change) = subscription.next().await {
        let Some(inner) = store.upgrade() else {
            break;
        };
        inner.apply(change.identity, UpdateSource::Provider);
    }
    tracing::debug!("provider change stream ended");
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
