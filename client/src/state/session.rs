//! The tab's single auth session.
//!
//! CONCURRENCY
//! ===========
//! `AuthSession` is `Rc`-based, and Leptos context values must be
//! `Send + Sync`, so the instance lives in a thread-local instead. WASM runs
//! the whole app on one thread, so every component sees the same session.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use session::{ApiClient, AuthSession, SessionConfig, SessionMode};

use crate::net::transport::BrowserTransport;
use crate::util::storage::BrowserStorage;

/// Same-origin API prefix; the dev server proxies it to the backend.
pub const API_BASE: &str = "/api";

pub type ClientSession = AuthSession<BrowserTransport>;

thread_local! {
    static SESSION: ClientSession = AuthSession::new(BrowserTransport, client_config(), BrowserStorage);
}

/// Session mode baked in at build time through `PITWALL_SESSION_MODE`.
fn mode_from(raw: Option<&str>) -> SessionMode {
    match raw.map(SessionMode::parse) {
        None => SessionMode::default(),
        Some(Ok(mode)) => mode,
        Some(Err(_err)) => {
            #[cfg(feature = "csr")]
            log::warn!("ignoring PITWALL_SESSION_MODE: {_err}");
            SessionMode::default()
        }
    }
}

pub fn client_config() -> SessionConfig {
    SessionConfig::new(API_BASE, mode_from(option_env!("PITWALL_SESSION_MODE")))
}

pub fn client_session() -> ClientSession {
    SESSION.with(Clone::clone)
}

pub fn api() -> ApiClient<BrowserTransport> {
    ApiClient::new(client_session())
}
