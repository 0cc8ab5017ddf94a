//! Authentication endpoints.
//!
//! ERROR HANDLING
//! ==============
//! Login and the session probe answer 401 as a normal outcome (bad password,
//! no session), so both opt out of the global redirect and let the session
//! store decide. Everything else surfaces `ApiError` to the caller.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::client::{ApiClient, ApiError, RequestOptions, Transport};
use super::types::{Credentials, LOGIN_FAILED_MESSAGE, PasswordChange, User, login_token};
use crate::util::token_store::TokenStore;

const LOGIN_ENDPOINT: &str = "users/login/";
const LOGOUT_ENDPOINT: &str = "users/logout/";
const CURRENT_USER_ENDPOINT: &str = "users/me/";
const CHANGE_PASSWORD_ENDPOINT: &str = "users/change_password/";

/// Message shown for a failed login: server text when present, else generic.
#[must_use]
pub fn login_failure_message(err: &ApiError) -> String {
    err.server_message()
        .map_or_else(|| LOGIN_FAILED_MESSAGE.to_owned(), str::to_owned)
}

fn encode<S: serde::Serialize>(value: &S) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Encode(e.to_string()))
}

pub struct AuthApi<T> {
    client: ApiClient<T>,
    tokens: Option<TokenStore>,
}

impl<T> Clone for AuthApi<T> {
    fn clone(&self) -> Self {
        Self { client: self.client.clone(), tokens: self.tokens.clone() }
    }
}

impl<T: Transport> AuthApi<T> {
    /// `tokens` is only set in bearer mode.
    #[must_use]
    pub fn new(client: ApiClient<T>, tokens: Option<TokenStore>) -> Self {
        Self { client, tokens }
    }

    /// `POST users/login/`. Sent without any stored token; stores the new
    /// bearer token when one is returned.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let opts = RequestOptions::default()
            .body(encode(credentials)?)
            .handles_unauthorized()
            .anonymous();
        let resp = self.client.post(LOGIN_ENDPOINT, opts).await?;
        let user: User = resp.json()?;
        if let (Some(tokens), Some(token)) = (&self.tokens, login_token(&resp.body)) {
            tokens.set(token);
        }
        Ok(user)
    }

    /// `POST users/logout/`. The local token is dropped whatever the outcome.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self
            .client
            .post(LOGOUT_ENDPOINT, RequestOptions::default().handles_unauthorized())
            .await
            .map(|_| ());
        if let Some(tokens) = &self.tokens {
            tokens.clear();
        }
        result
    }

    /// `GET users/me/`.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let resp = self
            .client
            .get(CURRENT_USER_ENDPOINT, RequestOptions::default().handles_unauthorized())
            .await?;
        resp.json()
    }

    /// `POST users/change_password/`.
    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        let opts = RequestOptions::default().body(encode(change)?);
        self.client.post(CHANGE_PASSWORD_ENDPOINT, opts).await.map(|_| ())
    }
}
