//! Shared fixtures for session tests: JWT builders and a scripted transport.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};

use crate::config::{SessionConfig, SessionMode};
use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Method, Transport};
use crate::service::AuthSession;
use crate::storage::MemoryStorage;
use crate::token;
use crate::types::AuthUser;

pub const API: &str = "http://api.test/api";

pub fn url(path: &str) -> String {
    format!("{API}{path}")
}

pub fn jwt_with_payload(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}

/// A JWT expiring `expires_in` seconds from now. `nonce` keeps tokens distinct.
pub fn build_jwt_with(expires_in: i64, nonce: &str) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let now = token::now_secs() as i64;
    jwt_with_payload(&json!({ "exp": now + expires_in, "sub": "test-user", "jti": nonce }))
}

pub fn build_jwt(expires_in: i64) -> String {
    build_jwt_with(expires_in, "default")
}

pub fn sample_user(is_staff: bool) -> AuthUser {
    AuthUser { id: 1, username: "admin".to_owned(), is_staff, is_superuser: false }
}

// =============================================================================
// MockTransport
// =============================================================================

enum Reply {
    Respond(HttpResponse),
    Unreachable,
}

/// Transport answering from per-route reply queues and recording every request.
///
/// Each send yields once before answering so concurrent callers interleave the
/// way they would over a real network. Unscripted routes answer 404.
#[derive(Default)]
pub struct MockTransport {
    routes: RefCell<HashMap<(Method, String), VecDeque<Reply>>>,
    requests: RefCell<Vec<HttpRequest>>,
    cookies: RefCell<HashMap<String, String>>,
}

impl MockTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn reply(&self, method: Method, path: &str, status: u16, body: Value) {
        let body = if body.is_null() { String::new() } else { body.to_string() };
        self.routes
            .borrow_mut()
            .entry((method, url(path)))
            .or_default()
            .push_back(Reply::Respond(HttpResponse::new(status, body)));
    }

    pub fn unreachable(&self, method: Method, path: &str) {
        self.routes.borrow_mut().entry((method, url(path))).or_default().push_back(Reply::Unreachable);
    }

    pub fn set_cookie(&self, name: &str, value: &str) {
        self.cookies.borrow_mut().insert(name.to_owned(), value.to_owned());
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
        let target = url(path);
        self.requests.borrow().iter().filter(|r| r.url == target).cloned().collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests_to(path).len()
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = (request.method, request.url.clone());
        self.requests.borrow_mut().push(request);
        tokio::task::yield_now().await;

        let reply = self.routes.borrow_mut().get_mut(&key).and_then(VecDeque::pop_front);
        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Unreachable) => Err(TransportError::Unreachable("connection refused".to_owned())),
            None => Ok(HttpResponse::new(404, r#"{"detail":"Not found."}"#)),
        }
    }

    fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.borrow().get(name).cloned()
    }
}

pub type TestSession = AuthSession<Rc<MockTransport>>;

pub fn session_with(mode: SessionMode) -> (TestSession, Rc<MockTransport>, MemoryStorage) {
    let transport = MockTransport::new();
    let storage = MemoryStorage::new();
    let session = AuthSession::new(Rc::clone(&transport), SessionConfig::new(API, mode), storage.clone());
    (session, transport, storage)
}

pub fn bearer_session() -> (TestSession, Rc<MockTransport>, MemoryStorage) {
    session_with(SessionMode::Bearer)
}

pub fn cookie_session() -> (TestSession, Rc<MockTransport>, MemoryStorage) {
    session_with(SessionMode::Cookie)
}
