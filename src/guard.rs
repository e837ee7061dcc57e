//! Route guard: decides what a navigation renders from the session status.
//!
//! SYSTEM CONTEXT
//! ==============
//! The router asks the guard on every navigation and again on every status
//! push. `Unknown` never produces a redirect: bouncing on incomplete
//! information would send an already signed-in visitor to the login view on
//! every page reload. The pending view it renders instead carries no
//! privileged data.

use tokio::sync::watch;

use crate::session::{RedirectTarget, SessionStatus, SessionStore};

/// Access class of a requested view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Visible to everyone.
    Public,
    /// Only for signed-out visitors (login, registration).
    AuthOnly,
    /// Only for signed-in users (dashboard).
    ProtectedOnly,
}

/// What the router should do with a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Render the requested view.
    Render,
    /// Render the neutral placeholder until the status is known.
    RenderPending,
    /// Replace the navigation with one to `target`.
    Redirect(RedirectTarget),
}

impl Decision {
    #[must_use]
    pub fn redirect_target(self) -> Option<RedirectTarget> {
        match self {
            Self::Redirect(target) => Some(target),
            Self::Render | Self::RenderPending => None,
        }
    }
}

/// Pure decision table over `(status, kind)`.
#[must_use]
pub fn decide(status: &SessionStatus, kind: ViewKind) -> Decision {
    match (status, kind) {
        (_, ViewKind::Public) => Decision::Render,
        (SessionStatus::Unknown, ViewKind::AuthOnly | ViewKind::ProtectedOnly) => Decision::RenderPending,
        (SessionStatus::Authenticated(_), ViewKind::AuthOnly) => Decision::Redirect(RedirectTarget::ProtectedHome),
        (SessionStatus::Authenticated(_), ViewKind::ProtectedOnly) => Decision::Render,
        (SessionStatus::Unauthenticated, ViewKind::AuthOnly) => Decision::Render,
        (SessionStatus::Unauthenticated, ViewKind::ProtectedOnly) => Decision::Redirect(RedirectTarget::AuthHome),
    }
}

/// Guard bound to the application's session store. Reads the live status on
/// every call.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    store: SessionStore,
}

impl RouteGuard {
    #[must_use]
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn decide(&self, kind: ViewKind) -> Decision {
        decide(&self.store.status(), kind)
    }

    /// Decisions for `kind`, recomputed on every status push.
    #[must_use]
    pub fn watch(&self, kind: ViewKind) -> DecisionWatch {
        DecisionWatch { kind, status: self.store.watch_status(), delivered_current: false }
    }
}

/// Stream of decisions for one view kind.
pub struct DecisionWatch {
    kind: ViewKind,
    status: watch::Receiver<SessionStatus>,
    delivered_current: bool,
}

impl DecisionWatch {
    #[must_use]
    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    /// Decision for the status as of now.
    #[must_use]
    pub fn current(&self) -> Decision {
        decide(&self.status.borrow(), self.kind)
    }

    /// The first call yields the current decision; later calls wait for the
    /// next status push. Returns `None` once the store is gone.
    pub async fn next(&mut self) -> Option<Decision> {
        if self.delivered_current {
            if self.status.changed().await.is_err() {
                return None;
            }
        } else {
            self.delivered_current = true;
        }
        Some(decide(&self.status.borrow_and_update(), self.kind))
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
