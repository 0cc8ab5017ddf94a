//! Shared DTOs for the REST boundary.
//!
//! DESIGN
//! ======
//! Only the shapes the session coordinator depends on are typed here. Domain
//! collections stay as `serde_json::Value` since their schemas belong to the
//! pages that render them.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Generic fallback shown when a login failure carries no server message.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Check your username and password.";

/// HTTP verbs used by the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Profile of the signed-in user as returned by `users/me/` and `users/login/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Server-side primary key.
    pub id: i64,
    /// Login name.
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    /// Remaining profile attributes (permission flags, timestamps, avatar).
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl User {
    /// Name to show in the chrome: full name when known, else the login name.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() { self.username.clone() } else { full.to_owned() }
    }

    /// Read a boolean permission flag such as `can_manage_users`.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.is_superuser
            || self
                .attributes
                .get(name)
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false)
    }
}

/// Username/password pair posted to `users/login/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body of `users/change_password/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

/// Body of bulk-delete endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BulkDelete<'a> {
    pub ids: &'a [i64],
}

/// Pull a human-readable message out of an error payload.
///
/// Looks at `error` first (login endpoint), then DRF's `detail`. Blank
/// strings count as missing.
#[must_use]
pub fn error_message(body: &serde_json::Value) -> Option<&str> {
    ["error", "detail"]
        .iter()
        .filter_map(|key| body.get(key).and_then(serde_json::Value::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
}

/// Bearer token carried alongside the profile in a login response, if any.
#[must_use]
pub fn login_token(body: &serde_json::Value) -> Option<&str> {
    body.get("token")
        .and_then(serde_json::Value::as_str)
        .filter(|token| !token.is_empty())
}
