//! Login and registration forms.
//!
//! DESIGN
//! ======
//! Field validation happens here, before the session store is touched: an
//! empty field or a mismatched confirmation never reaches the provider.
//! `submit` runs the store operation and maps the outcome to the [`Notice`]
//! the page shows. The store's navigation signal handles the redirect.

use crate::config::AuthConfig;
use crate::notice::Notice;
use crate::session::{Credentials, SessionStore};

pub const LOGIN_SUCCESS: &str = "Login successful!";
pub const LOGIN_FAILED: &str = "Invalid login credentials.";
pub const REGISTER_SUCCESS: &str = "Registration successful!";
pub const REGISTER_FAILED: &str = "An error occurred. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
    ConfirmPassword,
}

impl Field {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Password => "Password",
            Self::ConfirmPassword => "Confirm Password",
        }
    }
}

/// Rejections raised before any provider call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{} is required.", .0.label())]
    MissingField(Field),

    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl FormError {
    /// Notice shown for this rejection.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::MissingField(_) => Notice::info(self.to_string()),
            Self::PasswordMismatch => Notice::error(self.to_string()),
        }
    }
}

fn require(value: &str, field: Field) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(())
}

// =============================================================================
// LOGIN
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    /// # Errors
    ///
    /// `MissingField` for the first empty field, email first.
    pub fn validate(&self) -> Result<Credentials, FormError> {
        require(&self.email, Field::Email)?;
        require(&self.password, Field::Password)?;
        Ok(Credentials::new(self.email.trim(), self.password.as_str()))
    }

    /// Validate, sign in, and return the notice to show, timed by `config`.
    pub async fn submit(&self, store: &SessionStore, config: &AuthConfig) -> Notice {
        let credentials = match self.validate() {
            Ok(credentials) => credentials,
            Err(err) => {
                tracing::debug!(error = %err, "login form rejected");
                return err.notice().configured(config);
            }
        };
        let notice = match store.login(&credentials).await {
            Ok(_) => Notice::success(LOGIN_SUCCESS),
            Err(_) => Notice::error(LOGIN_FAILED),
        };
        notice.configured(config)
    }
}

// =============================================================================
// REGISTER
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>, confirm_password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into(), confirm_password: confirm_password.into() }
    }

    /// # Errors
    ///
    /// `MissingField` for the first empty field, then `PasswordMismatch`.
    pub fn validate(&self) -> Result<Credentials, FormError> {
        require(&self.email, Field::Email)?;
        require(&self.password, Field::Password)?;
        require(&self.confirm_password, Field::ConfirmPassword)?;
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(Credentials::new(self.email.trim(), self.password.as_str()))
    }

    /// Validate, create the account, and return the notice to show. Provider
    /// failures all share one generic message.
    pub async fn submit(&self, store: &SessionStore, config: &AuthConfig) -> Notice {
        let credentials = match self.validate() {
            Ok(credentials) => credentials,
            Err(err) => {
                tracing::debug!(error = %err, "register form rejected");
                return err.notice().configured(config);
            }
        };
        let notice = match store.register(&credentials).await {
            Ok(_) => Notice::success(REGISTER_SUCCESS),
            Err(_) => Notice::error(REGISTER_FAILED),
        };
        notice.configured(config)
    }
}

#[cfg(test)]
#[path = "forms_test.rs"]
mod tests;
