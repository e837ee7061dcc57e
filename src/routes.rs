//! Application route table.
//!
//! Maps URL paths to views and their access class, and turns guard decisions
//! into concrete router outcomes. Matching is exact on the path component;
//! unrecognized paths are left to the router's fallback.

use crate::config::{AuthConfig, DEFAULT_AUTH_HOME, DEFAULT_PROTECTED_HOME};
use crate::guard::{Decision, ViewKind, decide};
use crate::session::{RedirectTarget, SessionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`, the entry point that forwards to the right home.
    Root,
    Login,
    Register,
    Dashboard,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Root, Route::Login, Route::Register, Route::Dashboard];

    /// Match a location (query string and fragment ignored, one trailing
    /// slash tolerated).
    #[must_use]
    pub fn from_path(location: &str) -> Option<Self> {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        let path = if path.len() > 1 { path.strip_suffix('/').unwrap_or(path) } else { path };
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
        }
    }

    /// Access class, or `None` for the entry route which never renders
    /// content of its own.
    #[must_use]
    pub fn view_kind(self) -> Option<ViewKind> {
        match self {
            Self::Root => None,
            Self::Login | Self::Register => Some(ViewKind::AuthOnly),
            Self::Dashboard => Some(ViewKind::ProtectedOnly),
        }
    }
}

/// Guard decision for a route. The entry route forwards to the home for the
/// current status and waits on the pending view while it is unknown.
#[must_use]
pub fn route_decision(status: &SessionStatus, route: Route) -> Decision {
    match route.view_kind() {
        Some(kind) => decide(status, kind),
        None => match status {
            SessionStatus::Unknown => Decision::RenderPending,
            SessionStatus::Authenticated(_) => Decision::Redirect(RedirectTarget::ProtectedHome),
            SessionStatus::Unauthenticated => Decision::Redirect(RedirectTarget::AuthHome),
        },
    }
}

/// Concrete paths behind each redirect target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePaths {
    pub protected_home: String,
    pub auth_home: String,
}

impl Default for RoutePaths {
    fn default() -> Self {
        Self { protected_home: DEFAULT_PROTECTED_HOME.to_string(), auth_home: DEFAULT_AUTH_HOME.to_string() }
    }
}

impl RoutePaths {
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self { protected_home: config.protected_home.clone(), auth_home: config.auth_home.clone() }
    }

    #[must_use]
    pub fn path_for(&self, target: RedirectTarget) -> &str {
        match target {
            RedirectTarget::ProtectedHome => &self.protected_home,
            RedirectTarget::AuthHome => &self.auth_home,
        }
    }
}

/// What the router does with one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Render(Route),
    RenderPending,
    /// Replace the current history entry with this path.
    Redirect(String),
}

/// Resolve `location` against the route table. Returns `None` for paths the
/// table does not know.
#[must_use]
pub fn resolve(status: &SessionStatus, location: &str, paths: &RoutePaths) -> Option<Outcome> {
    let route = Route::from_path(location)?;
    let outcome = match route_decision(status, route) {
        Decision::Render => Outcome::Render(route),
        Decision::RenderPending => Outcome::RenderPending,
        Decision::Redirect(target) => Outcome::Redirect(paths.path_for(target).to_string()),
    };
    Some(outcome)
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
