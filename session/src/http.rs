//! Request/response model and the transport seam.
//!
//! ARCHITECTURE
//! ============
//! The core never talks to a concrete HTTP stack. It builds [`HttpRequest`]s,
//! hands them to a [`Transport`], and interprets the [`HttpResponse`]. The
//! browser client implements the trait on `gloo-net`, the CLI on `reqwest`,
//! and tests on a scripted mock.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AuthError, TransportError};

pub const AUTHORIZATION: &str = "Authorization";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Methods that need a CSRF header under cookie sessions.
    #[must_use]
    pub fn is_state_changing(self) -> bool {
        !matches!(self, Self::Get)
    }
}

/// An outgoing request.
///
/// `retried` marks a replay issued after a refresh; the interceptor never
/// replays a request that already carries it.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    retried: bool,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), headers: Vec::new(), body: None, retried: false }
    }

    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set `name` to `value`, replacing any existing header of that name.
    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.headers.push((name.to_owned(), value.into()));
        self
    }

    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Path portion of the URL, without query string or fragment.
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.split(['?', '#']).next().unwrap_or_default()
    }

    #[must_use]
    pub fn is_retry(&self) -> bool {
        self.retried
    }

    #[must_use]
    pub fn into_retry(mut self) -> Self {
        self.retried = true;
        self
    }
}

/// A received response. Any status is a response; only transport failures are errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into [`AuthError::Status`].
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Status`] when the status is outside `200..300`.
    pub fn error_for_status(self) -> Result<Self, AuthError> {
        if self.is_success() { Ok(self) } else { Err(AuthError::Status { status: self.status, body: self.body }) }
    }

    /// Decode the body as JSON. An empty body decodes as `null`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Decode`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AuthError> {
        let body = if self.body.trim().is_empty() { "null" } else { self.body.as_str() };
        serde_json::from_str(body).map_err(|e| AuthError::Decode(e.to_string()))
    }
}

/// Sends requests to the backend.
#[async_trait::async_trait(?Send)]
pub trait Transport {
    /// Send one request and return whatever status came back.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] only when no response was received.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Value of a cookie visible to this transport, used for CSRF headers.
    fn cookie(&self, name: &str) -> Option<String> {
        let _ = name;
        None
    }
}

#[async_trait::async_trait(?Send)]
impl<T: Transport + ?Sized> Transport for std::rc::Rc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request).await
    }

    fn cookie(&self, name: &str) -> Option<String> {
        (**self).cookie(name)
    }
}

/// Find `name` in a `Cookie`-style header (`a=1; b=2`).
#[must_use]
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_owned())
    })
}
