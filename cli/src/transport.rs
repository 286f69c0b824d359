//! `reqwest` transport for the CLI.
//!
//! The cookie jar is shared with the client so cookie-mode sessions work the
//! same way they do in a browser. Between invocations the jar's cookies for
//! the API origin are saved in the credential file and restored on startup.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};
use session::http::cookie_value;
use session::{HttpRequest, HttpResponse, Method, Transport, TransportError};

use crate::CliError;

pub struct ReqwestTransport {
    client: reqwest::Client,
    jar: Arc<Jar>,
    origin: Url,
}

impl ReqwestTransport {
    /// Build a client for `api_base` with the given request/connect timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidBaseUrl`] when `api_base` is not an absolute
    /// URL, or [`CliError::Http`] when the client cannot be built.
    pub fn new(api_base: &str, timeout: Duration, connect_timeout: Duration) -> Result<Self, CliError> {
        let origin = Url::parse(api_base).map_err(|_| CliError::InvalidBaseUrl(api_base.to_owned()))?;
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { client, jar, origin })
    }

    /// Cookies the jar would send to the API origin, as a `Cookie` header.
    pub fn cookie_header(&self) -> Option<String> {
        let header = self.jar.cookies(&self.origin)?;
        header.to_str().ok().map(str::to_owned)
    }

    /// Seed the jar from a header previously returned by [`Self::cookie_header`].
    pub fn restore_cookies(&self, header: &str) {
        for pair in header.split(';').map(str::trim).filter(|pair| pair.contains('=')) {
            self.jar.add_cookie_str(&format!("{pair}; Path=/"), &self.origin);
        }
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_builder() {
        TransportError::InvalidRequest(error.to_string())
    } else {
        TransportError::Unreachable(error.to_string())
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.request(to_reqwest(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify)?;
        tracing::debug!(method = request.method.as_str(), path = request.path(), status, retry = request.is_retry(), "api response");
        Ok(HttpResponse::new(status, body))
    }

    fn cookie(&self, name: &str) -> Option<String> {
        cookie_value(&self.cookie_header()?, name)
    }
}
