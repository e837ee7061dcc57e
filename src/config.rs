//! Auth configuration parsed from environment variables.

pub const DEFAULT_IDENTITY_TOOLKIT_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PROTECTED_HOME: &str = "/dashboard";
pub const DEFAULT_AUTH_HOME: &str = "/login";
pub const DEFAULT_NOTICE_DURATION_MS: u64 = 3000;

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(String),

    /// The API key env var (or the var naming it) is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The provider HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Memory,
    IdentityToolkit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub provider: ProviderKind,
    /// Only present for providers that need one.
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeouts: ProviderTimeouts,
    pub protected_home: String,
    pub auth_home: String,
    pub notice_duration_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Memory,
            api_key: None,
            base_url: DEFAULT_IDENTITY_TOOLKIT_BASE_URL.to_string(),
            timeouts: ProviderTimeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
            protected_home: DEFAULT_PROTECTED_HOME.to_string(),
            auth_home: DEFAULT_AUTH_HOME.to_string(),
            notice_duration_ms: DEFAULT_NOTICE_DURATION_MS,
        }
    }
}

impl AuthConfig {
    /// Build typed auth config from environment variables.
    ///
    /// Optional:
    /// - `AUTH_PROVIDER`: `memory` (default) or `identity_toolkit`
    /// - `AUTH_API_KEY_ENV`: names the env var containing the API key
    ///   (required when `AUTH_PROVIDER=identity_toolkit`)
    /// - `AUTH_BASE_URL`: default Identity Toolkit v1 endpoint
    /// - `AUTH_REQUEST_TIMEOUT_SECS`: default 30
    /// - `AUTH_CONNECT_TIMEOUT_SECS`: default 10
    /// - `AUTH_PROTECTED_HOME`: default `/dashboard`
    /// - `AUTH_HOME`: default `/login`
    /// - `AUTH_NOTICE_DURATION_MS`: default 3000
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown provider or a missing API key.
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider = parse_provider(std::env::var("AUTH_PROVIDER").ok().as_deref())?;

        let api_key = match provider {
            ProviderKind::Memory => None,
            ProviderKind::IdentityToolkit => {
                let key_var = std::env::var("AUTH_API_KEY_ENV")
                    .map_err(|_| ConfigError::MissingApiKey { var: "AUTH_API_KEY_ENV".into() })?;
                let key = std::env::var(&key_var).map_err(|_| ConfigError::MissingApiKey { var: key_var.clone() })?;
                Some(key)
            }
        };

        let base_url = std::env::var("AUTH_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_IDENTITY_TOOLKIT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeouts = ProviderTimeouts {
            request_secs: env_parse("AUTH_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("AUTH_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let protected_home = parse_path("AUTH_PROTECTED_HOME", DEFAULT_PROTECTED_HOME)?;
        let auth_home = parse_path("AUTH_HOME", DEFAULT_AUTH_HOME)?;
        let notice_duration_ms = env_parse("AUTH_NOTICE_DURATION_MS", DEFAULT_NOTICE_DURATION_MS);

        Ok(Self { provider, api_key, base_url, timeouts, protected_home, auth_home, notice_duration_ms })
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

fn parse_provider(raw: Option<&str>) -> Result<ProviderKind, ConfigError> {
    match raw.unwrap_or("memory") {
        "memory" => Ok(ProviderKind::Memory),
        "identity_toolkit" => Ok(ProviderKind::IdentityToolkit),
        other => Err(ConfigError::Parse(format!("unknown AUTH_PROVIDER: {other}"))),
    }
}

fn parse_path(key: &str, default: &str) -> Result<String, ConfigError> {
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    if !value.starts_with('/') {
        return Err(ConfigError::Parse(format!("{key} must be an absolute path, got '{value}'")));
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
