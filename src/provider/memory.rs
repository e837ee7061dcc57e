//! In-process identity provider.
//!
//! Backs development builds without a hosted auth backend and doubles as the
//! provider for integration tests. Accounts live in a map keyed by normalized
//! email; every successful call publishes the resulting state to subscribers,
//! the same way a hosted provider reports its own sign-ins.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use uuid::Uuid;

use super::{IdentityProvider, Listeners, Subscription};
use crate::error::AuthError;
use crate::session::Identity;

struct Account {
    identity: Identity,
    password: String,
}

pub struct MemoryProvider {
    accounts: Mutex<HashMap<String, Account>>,
    listeners: Listeners,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProvider {
    /// Provider with no signed-in user. Subscribers learn that immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::with_listeners(Listeners::determined(None))
    }

    /// Provider still restoring its session. Subscribers hear nothing until
    /// [`MemoryProvider::restore`] is called.
    #[must_use]
    pub fn restoring() -> Self {
        Self::with_listeners(Listeners::new())
    }

    fn with_listeners(listeners: Listeners) -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            listeners,
            offline: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Seed an account and return its identity.
    pub fn add_account(&self, email: &str, password: &str) -> Identity {
        let identity = Identity::new(Uuid::new_v4().to_string(), email.trim());
        let mut accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
        accounts.insert(
            normalize_email(email),
            Account { identity: identity.clone(), password: password.to_owned() },
        );
        identity
    }

    /// Push a state change that did not come from this process, e.g. a
    /// finished session restore, a sign-in elsewhere, or an expiry.
    pub fn restore(&self, identity: Option<Identity>) {
        self.listeners.publish(identity);
    }

    /// While offline every call fails with `NetworkUnavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of sign-in, sign-up and sign-out calls received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.subscriber_count()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<Identity> {
        self.listeners.current_identity()
    }

    fn begin_call(&self) -> Result<(), AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(AuthError::NetworkUnavailable);
        }
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[async_trait::async_trait]
impl IdentityProvider for MemoryProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.begin_call()?;
        let identity = {
            let accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
            match accounts.get(&normalize_email(email)) {
                Some(account) if account.password == password => account.identity.clone(),
                _ => return Err(AuthError::InvalidCredentials),
            }
        };
        self.listeners.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.begin_call()?;
        let identity = {
            let mut accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
            let key = normalize_email(email);
            if accounts.contains_key(&key) {
                return Err(AuthError::AccountAlreadyExists);
            }
            let identity = Identity::new(Uuid::new_v4().to_string(), email.trim());
            accounts.insert(key, Account { identity: identity.clone(), password: password.to_owned() });
            identity
        };
        self.listeners.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.begin_call()?;
        self.listeners.publish(None);
        Ok(())
    }

    fn subscribe(&self) -> Subscription {
        self.listeners.subscribe()
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
