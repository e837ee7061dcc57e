//! Transient user-facing notices (toasts) raised by the auth forms.
//!
//! A notice carries its own display duration; the view layer shows it until
//! [`Notice::is_expired`] reports true and then drops it.

use std::time::{Duration, Instant};

use crate::config::{AuthConfig, DEFAULT_NOTICE_DURATION_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

impl NoticeKind {
    /// CSS class suffix used by the view layer.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    pub duration: Duration,
}

impl Notice {
    #[must_use]
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self { message: message.into(), kind, duration: Duration::from_millis(DEFAULT_NOTICE_DURATION_MS) }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Apply the display duration from `config`.
    #[must_use]
    pub fn configured(self, config: &AuthConfig) -> Self {
        self.with_duration(Duration::from_millis(config.notice_duration_ms))
    }

    /// True once `now` is at least `duration` past `shown_at`.
    #[must_use]
    pub fn is_expired(&self, shown_at: Instant, now: Instant) -> bool {
        now.saturating_duration_since(shown_at) >= self.duration
    }
}

#[cfg(test)]
#[path = "notice_test.rs"]
mod tests;
