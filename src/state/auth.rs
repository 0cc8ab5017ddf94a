//! Reactive view of the session for rendering.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read `RwSignal<AuthState>` from context. The signal is a mirror
//! written only by the session store's observer; components never set it.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use super::session::{Session, SessionStatus};
use crate::net::types::User;

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub status: SessionStatus,
    pub user: Option<User>,
    /// True until the first login, logout or refresh has settled, and while a
    /// refresh is running.
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { status: SessionStatus::Anonymous, user: None, loading: true }
    }
}

impl AuthState {
    #[must_use]
    pub fn from_session(session: &Session, populated: bool) -> Self {
        Self {
            status: session.status(),
            user: session.user().cloned(),
            loading: !populated || session.status() == SessionStatus::Refreshing,
        }
    }
}
