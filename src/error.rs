//! Error taxonomy surfaced by session operations.
//!
//! ERROR HANDLING
//! ==============
//! Every failed provider call produces exactly one `AuthError`, returned as a
//! value. Nothing in this crate retries; `retryable()` is a hint for the UI
//! only.

/// Failures a session operation can report to its caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The provider rejected the email/password pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Registration attempted for an email that already has an account.
    #[error("an account already exists for this email")]
    AccountAlreadyExists,

    /// The provider could not be reached.
    #[error("network unavailable")]
    NetworkUnavailable,

    /// Any other provider-side failure, with the provider's message.
    #[error("provider error: {0}")]
    ProviderError(String),
}

impl AuthError {
    /// Stable machine-readable code for logs and UI lookups.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "E_INVALID_CREDENTIALS",
            Self::AccountAlreadyExists => "E_ACCOUNT_EXISTS",
            Self::NetworkUnavailable => "E_NETWORK_UNAVAILABLE",
            Self::ProviderError(_) => "E_PROVIDER",
        }
    }

    /// Whether a user-initiated resubmission has a chance of succeeding.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::NetworkUnavailable)
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
