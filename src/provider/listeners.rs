//! Fan-out of auth-state changes to provider subscribers.
//!
//! Remembers the last published state so late subscribers get it on
//! subscribe. Closed subscriptions are pruned on every publish.

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;

use super::{AuthStateChange, Subscription};
use crate::session::Identity;

#[derive(Default)]
struct ListenerState {
    /// `None` until the provider has determined its state.
    current: Option<Option<Identity>>,
    senders: Vec<mpsc::UnboundedSender<AuthStateChange>>,
}

#[derive(Default)]
pub struct Listeners {
    state: Mutex<ListenerState>,
}

impl Listeners {
    /// Listener set whose state is not yet determined; subscribers get nothing
    /// until the first [`Listeners::publish`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener set that already knows its state.
    #[must_use]
    pub fn determined(identity: Option<Identity>) -> Self {
        Self { state: Mutex::new(ListenerState { current: Some(identity), senders: Vec::new() }) }
    }

    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(identity) = &state.current {
            if tx.send(AuthStateChange { identity: identity.clone() }).is_err() {
                tracing::debug!("subscription closed before initial state delivery");
            }
        }
        state.senders.push(tx);
        Subscription::new(rx)
    }

    /// Record `identity` as the current state and push it to every open
    /// subscription.
    pub fn publish(&self, identity: Option<Identity>) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.current = Some(identity.clone());
        state
            .senders
            .retain(|tx| tx.send(AuthStateChange { identity: identity.clone() }).is_ok());
    }

    /// Identity of the current signed-in user, if any.
    #[must_use]
    pub fn current_identity(&self) -> Option<Identity> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.current.clone().flatten()
    }

    #[must_use]
    pub fn is_determined(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.current.is_some()
    }

    /// Number of subscriptions still open.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.senders.retain(|tx| !tx.is_closed());
        state.senders.len()
    }
}

#[cfg(test)]
#[path = "listeners_test.rs"]
mod tests;
