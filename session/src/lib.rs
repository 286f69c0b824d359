//! Authentication and session core for the Pitwall motorsport client.
//!
//! This crate owns everything about "who is signed in": credential storage,
//! the login/register/refresh/logout exchanges with the REST backend, the
//! request interceptor that replays a request once after a silent refresh,
//! and the route guards pages consult before rendering. It is transport
//! agnostic; the browser client plugs in `gloo-net` + `sessionStorage` and the
//! CLI plugs in `reqwest` + a credential file.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Endpoint layout, session mode, CSRF names |
//! | [`error`] | [`error::AuthError`] taxonomy and user-facing messages |
//! | [`http`] | Request/response model and the [`http::Transport`] seam |
//! | [`storage`] | Key/value persistence backends |
//! | [`store`] | Credential + cached profile store on top of a backend |
//! | [`token`] | JWT expiry inspection |
//! | [`types`] | Wire DTOs for the `/auth/*` endpoints |
//! | [`service`] | [`service::AuthSession`], the session orchestrator |
//! | [`interceptor`] | [`interceptor::ApiClient`], refresh-on-401 with one replay |
//! | [`guard`] | Route access decisions |
//!
//! All session types are single-threaded (`Rc`/`RefCell`); futures they
//! return are `!Send` and are meant to be driven by a browser event loop or a
//! current-thread runtime.

pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod interceptor;
pub mod service;
pub mod storage;
pub mod store;
pub mod token;
pub mod types;

#[cfg(test)]
#[path = "test_support.rs"]
mod test_support;

pub use config::{SessionConfig, SessionMode};
pub use error::{AuthError, ConfigError, TransportError};
pub use guard::GuardOutcome;
pub use http::{HttpRequest, HttpResponse, Method, Transport};
pub use interceptor::ApiClient;
pub use service::AuthSession;
pub use storage::{MemoryStorage, NullStorage, Storage};
pub use types::{AuthUser, TokenPair};
