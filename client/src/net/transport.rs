//! Browser transport for the session core.
//!
//! Client-side (`csr`): real HTTP calls via `gloo-net`, with `document.cookie`
//! exposed for the CSRF header.
//! Native builds: every send fails as unreachable so the crate still compiles
//! and tests without a browser.
//!
//! ERROR HANDLING
//! ==============
//! Only failures to get a response at all become `TransportError`; any HTTP
//! status, including 401, is returned as a response for the interceptor to
//! judge.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use session::{HttpRequest, HttpResponse, Transport, TransportError};

#[cfg(not(feature = "csr"))]
const NO_BROWSER: &str = "no browser environment";

/// `fetch`-backed transport. Cookies ride along with same-origin requests.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

#[async_trait::async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        #[cfg(feature = "csr")]
        {
            use gloo_net::http::Request;
            use session::Method;

            let mut builder = match request.method {
                Method::Get => Request::get(&request.url),
                Method::Post => Request::post(&request.url),
                Method::Put => Request::put(&request.url),
                Method::Patch => Request::patch(&request.url),
                Method::Delete => Request::delete(&request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            let outgoing = match &request.body {
                Some(body) => builder.json(body),
                None => builder.build(),
            }
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

            let response = outgoing.send().await.map_err(|e| TransportError::Unreachable(e.to_string()))?;
            let status = response.status();
            let body = response.text().await.map_err(|e| TransportError::Unreachable(e.to_string()))?;
            log::debug!("{} {} -> {status}", request.method.as_str(), request.path());
            Ok(HttpResponse::new(status, body))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = request;
            Err(TransportError::Unreachable(NO_BROWSER.to_owned()))
        }
    }

    fn cookie(&self, name: &str) -> Option<String> {
        session::http::cookie_value(&document_cookie()?, name)
    }
}

/// The page's `document.cookie` string.
fn document_cookie() -> Option<String> {
    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::JsCast;

        let document = web_sys::window()?.document()?;
        document.dyn_into::<web_sys::HtmlDocument>().ok()?.cookie().ok()
    }
    #[cfg(not(feature = "csr"))]
    {
        None
    }
}
