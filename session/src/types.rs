//! Wire DTOs for the `/auth/*` endpoints.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// The signed-in user as returned by `GET /auth/me/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Numeric user id.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Django staff flag.
    #[serde(default)]
    pub is_staff: bool,
    /// Django superuser flag.
    #[serde(default)]
    pub is_superuser: bool,
}

impl AuthUser {
    /// Staff or superuser.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}

/// Credentials issued by the token and register endpoints.
///
/// Cookie-mode deployments may omit `access` entirely; it then decodes as an
/// empty string and is never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    #[serde(default)]
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Body of `POST /auth/register/`.
#[derive(Debug, Deserialize)]
pub(crate) struct RegisterResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

/// Body of `POST /auth/token/refresh/`.
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    #[serde(default)]
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub password_confirm: &'a str,
}
