//! Navigation guard: decides whether a route transition may proceed.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs before every client-side transition. The first evaluation in a tab
//! bootstraps the session from the server, so a reload with a live session
//! cookie lands on the requested page instead of the login screen.
//!
//! Session state is re-read after every await: a 401 redirect, logout or
//! login elsewhere may have changed it while the guard was suspended.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::routes::AppRoutes;
use crate::net::client::Transport;
use crate::state::session::{SessionStatus, SessionStore};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    /// `redirect` is the full originally requested location, query included.
    RedirectToLogin { redirect: String },
    RedirectToHome,
}

impl GuardDecision {
    /// Location to navigate to instead, or `None` to proceed.
    #[must_use]
    pub fn location(&self, routes: &AppRoutes) -> Option<String> {
        match self {
            Self::Proceed => None,
            Self::RedirectToLogin { redirect } => Some(routes.login_location(redirect)),
            Self::RedirectToHome => Some(routes.home_path().to_owned()),
        }
    }
}

/// One transition attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationRequest {
    /// Target location including query.
    pub to: String,
    pub from: Option<String>,
}

impl NavigationRequest {
    #[must_use]
    pub fn new(to: impl Into<String>) -> Self {
        Self { to: to.into(), from: None }
    }

    #[must_use]
    pub fn with_origin(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

/// Last location the guard evaluated, used as the origin of the next one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationHistory {
    last: Option<String>,
}

impl NavigationHistory {
    /// Request for a transition to `to`, originating at the previous target.
    pub fn next(&mut self, to: &str) -> NavigationRequest {
        let request = NavigationRequest::new(to);
        match self.last.replace(to.to_owned()) {
            Some(from) => request.with_origin(from),
            None => request,
        }
    }
}

/// Pure decision for a target given a settled session status.
#[must_use]
pub fn decide(routes: &AppRoutes, target: &str, status: SessionStatus) -> GuardDecision {
    let authenticated = status == SessionStatus::Authenticated;
    if routes.requires_auth(target) && !authenticated {
        return GuardDecision::RedirectToLogin { redirect: target.to_owned() };
    }
    if routes.is_login(target) && authenticated {
        return GuardDecision::RedirectToHome;
    }
    GuardDecision::Proceed
}

/// Evaluate the guard for `request`, bootstrapping the session if needed.
pub async fn guard_navigation<T: Transport + 'static>(
    store: &SessionStore<T>,
    routes: &AppRoutes,
    request: &NavigationRequest,
) -> GuardDecision {
    store.ensure_populated().await;
    store.settled().await;

    let decision = decide(routes, &request.to, store.status());
    log::debug!(
        "guard: {} -> {} = {decision:?}",
        request.from.as_deref().unwrap_or("(entry)"),
        request.to
    );
    decision
}
