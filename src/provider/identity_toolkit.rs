//! Identity Toolkit REST provider.
//!
//! Thin HTTP wrapper for `accounts:signInWithPassword` and `accounts:signUp`.
//! Pure parsing in `parse_session` / `parse_error` for testability.
//!
//! TRADE-OFFS
//! ==========
//! The session (identity plus ID token) lives in memory only, so a fresh
//! provider always starts signed out. Sign-out is local: the backend keeps no
//! server-side session for password sign-ins.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::{IdentityProvider, Listeners, Subscription};
use crate::config::{ConfigError, ProviderTimeouts};
use crate::error::AuthError;
use crate::session::Identity;

const SIGN_IN_ENDPOINT: &str = "accounts:signInWithPassword";
const SIGN_UP_ENDPOINT: &str = "accounts:signUp";

// =============================================================================
// CLIENT
// =============================================================================

struct ToolkitSession {
    identity: Identity,
    id_token: String,
}

pub struct IdentityToolkitProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    session: Mutex<Option<ToolkitSession>>,
    listeners: Listeners,
}

impl IdentityToolkitProvider {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(api_key: String, base_url: String, timeouts: ProviderTimeouts) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ConfigError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            session: Mutex::new(None),
            listeners: Listeners::determined(None),
        })
    }

    /// ID token of the signed-in user, for authenticating calls to other
    /// backends.
    #[must_use]
    pub fn id_token(&self) -> Option<String> {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        session.as_ref().map(|s| s.id_token.clone())
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}?key={}", self.base_url, self.api_key)
    }

    async fn password_request(&self, endpoint: &str, email: &str, password: &str) -> Result<Identity, AuthError> {
        let body = PasswordRequest { email, password, return_secure_token: true };

        let response = self
            .http
            .post(self.endpoint_url(endpoint))
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(map_transport_error)?;

        if status != 200 {
            let err = parse_error(status, &text);
            tracing::warn!(endpoint, status, code = err.error_code(), "identity toolkit request rejected");
            return Err(err);
        }

        let session = parse_session(&text)?;
        let identity = session.identity.clone();
        {
            let mut current = self.session.lock().unwrap_or_else(PoisonError::into_inner);
            *current = Some(session);
        }
        tracing::info!(endpoint, user_id = %identity.id, "identity toolkit request succeeded");
        self.listeners.publish(Some(identity.clone()));
        Ok(identity)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for IdentityToolkitProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.password_request(SIGN_IN_ENDPOINT, email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.password_request(SIGN_UP_ENDPOINT, email, password).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let previous = {
            let mut current = self.session.lock().unwrap_or_else(PoisonError::into_inner);
            current.take()
        };
        if let Some(session) = previous {
            tracing::info!(user_id = %session.identity.id, "identity toolkit session cleared");
        }
        self.listeners.publish(None);
        Ok(())
    }

    fn subscribe(&self) -> Subscription {
        self.listeners.subscribe()
    }
}

/// The request URL carries the API key, so it is stripped before the error is
/// turned into text.
fn map_transport_error(err: reqwest::Error) -> AuthError {
    let dropped = (err.is_request() || err.is_body()) && err.status().is_none();
    if err.is_connect() || err.is_timeout() || dropped {
        return AuthError::NetworkUnavailable;
    }
    AuthError::ProviderError(err.without_url().to_string())
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    local_id: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
}

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: String,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_session(json: &str) -> Result<ToolkitSession, AuthError> {
    let api: SessionResponse =
        serde_json::from_str(json).map_err(|e| AuthError::ProviderError(format!("response parse failed: {e}")))?;

    let mut identity = Identity::new(api.local_id, api.email);
    if let Some(name) = api.display_name.filter(|n| !n.trim().is_empty()) {
        identity = identity.with_display_name(name);
    }
    Ok(ToolkitSession { identity, id_token: api.id_token })
}

fn parse_error(status: u16, json: &str) -> AuthError {
    match serde_json::from_str::<ErrorEnvelope>(json) {
        Ok(envelope) => classify_error_message(&envelope.error.message),
        Err(_) => AuthError::ProviderError(format!("unexpected response: status {status}")),
    }
}

/// Messages look like `EMAIL_EXISTS` or `WEAK_PASSWORD : Password should be
/// at least 6 characters`; only the leading code decides the variant.
fn classify_error_message(message: &str) -> AuthError {
    let code = message.split(" : ").next().unwrap_or(message).trim();
    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => AuthError::InvalidCredentials,
        "EMAIL_EXISTS" => AuthError::AccountAlreadyExists,
        _ => AuthError::ProviderError(message.to_string()),
    }
}

#[cfg(test)]
#[path = "identity_toolkit_test.rs"]
mod tests;
