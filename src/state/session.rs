//! Session store: the single authority on "is the user signed in".
//!
//! ARCHITECTURE
//! ============
//! One store per tab, shared through cheap `Rc` clones. Fields are private;
//! the only mutators are `login`, `logout` and `fetch_current_user`. Everyone
//! else reads snapshots or subscribes to changes.
//!
//! CONCURRENCY
//! ===========
//! Runs on the browser event loop, so there are no data races, only
//! interleavings across awaits. Two rules keep those safe:
//!
//! - At most one refresh is in flight. It is cached as a `Shared` future and
//!   later callers await the same one instead of issuing another request.
//! - Every mutation bumps `generation`. A refresh applies its result only if
//!   the generation is still the one it started under, so a logout (or login)
//!   that lands mid-refresh can't be overwritten by the stale answer.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};

use crate::net::api::{AuthApi, login_failure_message};
use crate::net::client::{ApiError, Transport};
use crate::net::types::{Credentials, User};

/// Authentication status with the profile folded in.
///
/// The user lives inside `Authenticated`, so status and profile can never
/// disagree.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Session {
    #[default]
    Anonymous,
    Refreshing,
    Authenticated(User),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Anonymous,
    Refreshing,
    Authenticated,
}

impl Session {
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        match self {
            Self::Anonymous => SessionStatus::Anonymous,
            Self::Refreshing => SessionStatus::Refreshing,
            Self::Authenticated(_) => SessionStatus::Authenticated,
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

type PendingRefresh = Shared<LocalBoxFuture<'static, ()>>;
type Observer = Box<dyn Fn(&Session, bool)>;

#[derive(Default)]
struct StoreState {
    session: Session,
    generation: u64,
    /// Set once a login, logout or refresh has settled.
    populated: bool,
    pending: Option<PendingRefresh>,
}

struct StoreInner<T> {
    auth: AuthApi<T>,
    state: RefCell<StoreState>,
    observers: RefCell<Vec<Observer>>,
}

pub struct SessionStore<T> {
    inner: Rc<StoreInner<T>>,
}

impl<T> Clone for SessionStore<T> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<T> StoreInner<T> {
    /// Apply `update` and notify observers if the session or the populated
    /// flag changed.
    fn transition(&self, update: impl FnOnce(&mut StoreState)) {
        let (before, was_populated, after, populated) = {
            let mut state = self.state.borrow_mut();
            let before = state.session.clone();
            let was_populated = state.populated;
            update(&mut state);
            (before, was_populated, state.session.clone(), state.populated)
        };
        if before == after && was_populated == populated {
            return;
        }
        log::info!("session: {:?} -> {:?}", before.status(), after.status());
        for observer in self.observers.borrow().iter() {
            observer(&after, populated);
        }
    }

    fn finish_refresh(&self, generation: u64, result: Result<User, ApiError>) {
        if self.state.borrow().generation != generation {
            log::debug!("session: discarding superseded refresh (generation {generation})");
            return;
        }
        self.transition(|state| {
            state.pending = None;
            state.populated = true;
            state.session = match result {
                Ok(user) => Session::Authenticated(user),
                Err(err) => {
                    log::debug!("session: refresh failed: {err}");
                    Session::Anonymous
                }
            };
        });
    }

    /// Drop any in-flight refresh result and set the session directly.
    fn supersede(&self, session: Session) {
        self.transition(|state| {
            state.generation += 1;
            state.pending = None;
            state.populated = true;
            state.session = session;
        });
    }
}

impl<T: Transport + 'static> SessionStore<T> {
    #[must_use]
    pub fn new(auth: AuthApi<T>) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                auth,
                state: RefCell::new(StoreState::default()),
                observers: RefCell::new(Vec::new()),
            }),
        }
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.inner.state.borrow().session.clone()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.inner.state.borrow().session.status()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().session.user().cloned()
    }

    /// Whether any login, logout or refresh has settled in this tab.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.inner.state.borrow().populated
    }

    /// Observe every session change together with the populated flag.
    ///
    /// Observers run synchronously after the change is applied and must not
    /// subscribe further observers.
    pub fn subscribe(&self, observer: impl Fn(&Session, bool) + 'static) {
        self.inner.observers.borrow_mut().push(Box::new(observer));
    }

    /// Sign in. On failure the current session is left as it was.
    ///
    /// # Errors
    ///
    /// Returns the server-supplied message, or a generic one when the error
    /// payload carries none.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), String> {
        match self.inner.auth.login(credentials).await {
            Ok(user) => {
                self.inner.supersede(Session::Authenticated(user));
                Ok(())
            }
            Err(err) => {
                log::warn!("session: login failed: {err}");
                Err(login_failure_message(&err))
            }
        }
    }

    /// Sign out. Local state ends `Anonymous` whether or not the server call
    /// succeeds.
    pub async fn logout(&self) {
        // Clear up front so a refresh resolving during the request is ignored.
        self.inner.supersede(Session::Anonymous);
        if let Err(err) = self.inner.auth.logout().await {
            log::warn!("session: logout request failed: {err}");
        }
        // A refresh started while the request was in flight may have seen the
        // still-valid server session.
        self.inner.supersede(Session::Anonymous);
    }

    /// Re-establish the session from the server. Never fails: errors settle
    /// as `Anonymous`. Concurrent callers share one request.
    pub async fn fetch_current_user(&self) {
        self.refresh_handle().await;
    }

    /// Run the first refresh if nothing has populated the session yet.
    pub async fn ensure_populated(&self) {
        if !self.is_populated() {
            self.fetch_current_user().await;
        }
    }

    /// Wait until no refresh is in flight.
    pub async fn settled(&self) {
        loop {
            let pending = self.inner.state.borrow().pending.clone();
            match pending {
                Some(pending) => pending.await,
                None => return,
            }
        }
    }

    fn refresh_handle(&self) -> PendingRefresh {
        if let Some(pending) = self.inner.state.borrow().pending.clone() {
            return pending;
        }

        let generation = {
            let mut state = self.inner.state.borrow_mut();
            state.generation += 1;
            state.generation
        };
        let inner = Rc::clone(&self.inner);
        let refresh = async move {
            let result = inner.auth.current_user().await;
            inner.finish_refresh(generation, result);
        }
        .boxed_local()
        .shared();

        self.inner.transition(|state| {
            state.pending = Some(refresh.clone());
            state.session = Session::Refreshing;
        });
        refresh
    }
}
