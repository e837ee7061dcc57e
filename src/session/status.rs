//! Session status and the identity it carries.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionStatus` is the only state the guard reads. It starts `Unknown` and
//! leaves it on the first provider event or successful operation; nothing in
//! the crate ever writes `Unknown` back.

use serde::{Deserialize, Serialize};

/// Authenticated-user record. Only ever built from provider responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable provider-assigned identifier.
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Identity {
    #[must_use]
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self { id: id.into(), email: email.into(), display_name: None }
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Name to greet the user with: display name when set, else the email.
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Whether the visitor is signed in, signed out, or not yet known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Unknown,
    Authenticated(Identity),
    Unauthenticated,
}

impl SessionStatus {
    /// Status implied by a provider change event.
    #[must_use]
    pub fn from_identity(identity: Option<Identity>) -> Self {
        match identity {
            Some(identity) => Self::Authenticated(identity),
            None => Self::Unauthenticated,
        }
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Unknown | Self::Unauthenticated => None,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Short label for log fields.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Authenticated(_) => "authenticated",
            Self::Unauthenticated => "unauthenticated",
        }
    }
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
