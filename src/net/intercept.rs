//! Interceptors installed on the shared client.
//!
//! DESIGN
//! ======
//! The 401 reaction lives here rather than in callers so background calls
//! outside the guarded navigation flow get the same recovery path. A 401 is
//! terminal for the current session: no retry, no token refresh, just a full
//! reload into the login screen.

#[cfg(test)]
#[path = "intercept_test.rs"]
mod intercept_test;

use std::cell::Cell;

use super::client::{ApiClient, ApiError, ApiRequest, RequestInterceptor, ResponseInterceptor, Transport};
use super::config::{ApiConfig, AuthMode};
use crate::util::navigation::Navigator;
use crate::util::token_store::TokenStore;

/// Attaches `Authorization: Bearer <token>` when a token is stored, and drops
/// the token on any 401.
///
/// The drop applies to calls that handle 401 themselves too: a stale token
/// rejected by the session probe would otherwise ride along on the next login
/// and fail it.
#[derive(Clone, Debug)]
pub struct BearerToken {
    tokens: TokenStore,
}

impl BearerToken {
    #[must_use]
    pub fn new(tokens: TokenStore) -> Self {
        Self { tokens }
    }
}

impl RequestInterceptor for BearerToken {
    fn on_request(&self, request: &mut ApiRequest) {
        if request.anonymous {
            return;
        }
        if let Some(token) = self.tokens.get() {
            request.set_header("Authorization", format!("Bearer {token}"));
        }
    }
}

impl ResponseInterceptor for BearerToken {
    fn on_error(&self, request: &ApiRequest, error: &ApiError) {
        if error.is_unauthorized() {
            log::debug!("api: 401 from {}, dropping bearer token", request.url);
            self.tokens.clear();
        }
    }
}

/// Sends the whole page to the login screen on the first 401.
///
/// Latches after firing: the page is being replaced, so further 401s from the
/// same burst must not queue more navigations.
pub struct UnauthorizedRedirect<N> {
    navigator: N,
    login_path: String,
    fired: Cell<bool>,
}

impl<N: Navigator> UnauthorizedRedirect<N> {
    #[must_use]
    pub fn new(navigator: N, login_path: &str) -> Self {
        Self { navigator, login_path: login_path.to_owned(), fired: Cell::new(false) }
    }

    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.fired.get()
    }
}

impl<N: Navigator> ResponseInterceptor for UnauthorizedRedirect<N> {
    fn on_error(&self, request: &ApiRequest, error: &ApiError) {
        if !error.is_unauthorized() || request.handles_unauthorized {
            return;
        }
        // Already on the login screen: reloading it again would loop.
        if self.navigator.current_path() == self.login_path {
            return;
        }
        if self.fired.replace(true) {
            return;
        }
        log::warn!("api: 401 from {}, redirecting to {}", request.url, self.login_path);
        self.navigator.hard_redirect(&self.login_path);
    }
}

/// Build the shared client with the interceptor set `config.auth_mode` calls for.
pub fn standard_client<T, N>(
    config: ApiConfig,
    transport: T,
    navigator: N,
    tokens: &TokenStore,
    login_path: &str,
) -> ApiClient<T>
where
    T: Transport,
    N: Navigator + 'static,
{
    let bearer = config.auth_mode == AuthMode::Bearer;
    let mut builder = ApiClient::builder(config, transport);
    if bearer {
        builder = builder
            .request_interceptor(BearerToken::new(tokens.clone()))
            .response_interceptor(BearerToken::new(tokens.clone()));
    }
    builder
        .response_interceptor(UnauthorizedRedirect::new(navigator, login_path))
        .build()
}
