//! Session configuration and endpoint layout.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_CSRF_COOKIE: &str = "csrftoken";
pub const DEFAULT_CSRF_HEADER: &str = "X-CSRFToken";

/// How credentials travel between client and backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    /// Tokens are persisted client-side and sent as `Authorization: Bearer`.
    #[default]
    Bearer,
    /// The backend keeps tokens in httpOnly cookies; the client only sends a CSRF header.
    Cookie,
}

impl SessionMode {
    /// Parse `bearer` or `cookie`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for any other value.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bearer" => Ok(Self::Bearer),
            "cookie" => Ok(Self::Cookie),
            other => Err(ConfigError::Parse(format!(
                "unsupported session mode '{other}' (expected 'bearer' or 'cookie')"
            ))),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bearer => "bearer",
            Self::Cookie => "cookie",
        }
    }
}

/// The `/auth/*` endpoints the core talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEndpoint {
    Token,
    Register,
    Refresh,
    Logout,
    Me,
    Csrf,
}

impl AuthEndpoint {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Token => "/auth/token/",
            Self::Register => "/auth/register/",
            Self::Refresh => "/auth/token/refresh/",
            Self::Logout => "/auth/logout/",
            Self::Me => "/auth/me/",
            Self::Csrf => "/auth/csrf/",
        }
    }

    /// Endpoints that never carry a bearer token and never trigger a refresh.
    #[must_use]
    pub fn is_credential_exchange(self) -> bool {
        matches!(self, Self::Token | Self::Register | Self::Refresh | Self::Logout)
    }
}

const ALL_ENDPOINTS: [AuthEndpoint; 6] = [
    AuthEndpoint::Token,
    AuthEndpoint::Register,
    AuthEndpoint::Refresh,
    AuthEndpoint::Logout,
    AuthEndpoint::Me,
    AuthEndpoint::Csrf,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// API base without a trailing slash, e.g. `/api` or `https://host/api`.
    pub api_base: String,
    pub mode: SessionMode,
    /// Cookie holding the CSRF token (cookie mode).
    pub csrf_cookie: String,
    /// Header carrying the CSRF token on state-changing requests (cookie mode).
    pub csrf_header: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE, SessionMode::Bearer)
    }
}

impl SessionConfig {
    #[must_use]
    pub fn new(api_base: &str, mode: SessionMode) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_owned(),
            mode,
            csrf_cookie: DEFAULT_CSRF_COOKIE.to_owned(),
            csrf_header: DEFAULT_CSRF_HEADER.to_owned(),
        }
    }

    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `PITWALL_API_BASE`: default [`DEFAULT_API_BASE`]
    /// - `PITWALL_SESSION_MODE`: `bearer` (default) or `cookie`
    /// - `PITWALL_CSRF_COOKIE`: default `csrftoken`
    /// - `PITWALL_CSRF_HEADER`: default `X-CSRFToken`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for an unknown session mode.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base = std::env::var("PITWALL_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_owned());
        let mode = match std::env::var("PITWALL_SESSION_MODE") {
            Ok(raw) => SessionMode::parse(&raw)?,
            Err(_) => SessionMode::default(),
        };
        let mut config = Self::new(&api_base, mode);
        if let Ok(cookie) = std::env::var("PITWALL_CSRF_COOKIE") {
            config.csrf_cookie = cookie;
        }
        if let Ok(header) = std::env::var("PITWALL_CSRF_HEADER") {
            config.csrf_header = header;
        }
        Ok(config)
    }

    /// Absolute URL for an API path such as `/drivers/`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.api_base)
        } else {
            format!("{}/{path}", self.api_base)
        }
    }

    #[must_use]
    pub fn endpoint(&self, endpoint: AuthEndpoint) -> String {
        self.url(endpoint.path())
    }

    /// Which auth endpoint, if any, `url` targets. Query strings are ignored.
    #[must_use]
    pub fn classify(&self, url: &str) -> Option<AuthEndpoint> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        ALL_ENDPOINTS.into_iter().find(|endpoint| self.endpoint(*endpoint) == path)
    }

    #[must_use]
    pub fn is_credential_exchange(&self, url: &str) -> bool {
        self.classify(url).is_some_and(AuthEndpoint::is_credential_exchange)
    }
}
