//! Bearer-token persistence for token-based auth mode.
//!
//! SYSTEM CONTEXT
//! ==============
//! The token is cached in memory and mirrored to `localStorage` in the browser
//! build so a reload keeps the session. Off-browser only the memory copy exists.

#[cfg(test)]
#[path = "token_store_test.rs"]
mod token_store_test;

use std::cell::RefCell;
use std::rc::Rc;

/// `localStorage` key holding the bearer token.
pub const AUTH_TOKEN_KEY: &str = "sentinel.auth_token";

#[derive(Clone, Debug, Default)]
pub struct TokenStore {
    cached: Rc<RefCell<Option<String>>>,
}

impl TokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token, loading it from storage on first use.
    #[must_use]
    pub fn get(&self) -> Option<String> {
        if let Some(token) = self.cached.borrow().as_ref() {
            return Some(token.clone());
        }
        let loaded = load_token();
        self.cached.borrow_mut().clone_from(&loaded);
        loaded
    }

    pub fn set(&self, token: &str) {
        *self.cached.borrow_mut() = Some(token.to_owned());
        save_token(Some(token));
    }

    pub fn clear(&self) {
        *self.cached.borrow_mut() = None;
        save_token(None);
    }
}

fn load_token() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
        storage.get_item(AUTH_TOKEN_KEY).ok().flatten().filter(|t| !t.is_empty())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

fn save_token(token: Option<&str>) {
    #[cfg(feature = "hydrate")]
    {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
            return;
        };
        let _ = match token {
            Some(token) => storage.set_item(AUTH_TOKEN_KEY, token),
            None => storage.remove_item(AUTH_TOKEN_KEY),
        };
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = token;
    }
}
