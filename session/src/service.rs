//! Auth session orchestration: login, register, refresh, logout, current user.
//!
//! ARCHITECTURE
//! ============
//! `AuthSession` is a cheap `Rc` handle around one owned state object: the
//! transport, the config, the credential store, and the in-flight refresh and
//! CSRF operations. Consumers (interceptor, guards, pages, CLI commands) get a
//! handle passed in; nothing lives in module-level statics.
//!
//! CONCURRENCY
//! ===========
//! A refresh is a `Shared` future parked in `refresh_in_flight`. Callers that
//! arrive while it is set await a clone of it, so one network call serves
//! everyone. The future clears its own slot as its final step, on success and
//! failure alike, so the next caller after settlement starts a fresh attempt.
//!
//! Exchanges remember the store epoch they started under. If `clear` ran in
//! the meantime (a logout, a failed refresh) their result is dropped instead
//! of being written back over the cleared session.
//!
//! ERROR HANDLING
//! ==============
//! A failed refresh clears the whole session before the error is returned, so
//! local state is never left half signed in. Logout always clears, whatever
//! the backend said.

#[cfg(test)]
#[path = "service_test.rs"]
mod service_test;

use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{self, LocalBoxFuture, Shared};
use serde_json::json;

use crate::config::{AuthEndpoint, SessionConfig, SessionMode};
use crate::error::AuthError;
use crate::http::{AUTHORIZATION, HttpRequest, HttpResponse, Transport};
use crate::interceptor;
use crate::storage::Storage;
use crate::store::SessionStore;
use crate::types::{AuthUser, LoginRequest, RefreshResponse, RegisterRequest, RegisterResponse, TokenPair};

/// A token refresh every concurrent caller awaits together.
pub type PendingRefresh = Shared<LocalBoxFuture<'static, Result<String, AuthError>>>;
pub type PendingCsrf = Shared<LocalBoxFuture<'static, ()>>;

struct Inner<T> {
    transport: T,
    config: SessionConfig,
    store: RefCell<SessionStore>,
    refresh_in_flight: RefCell<Option<PendingRefresh>>,
    csrf_in_flight: RefCell<Option<PendingCsrf>>,
}

/// Handle to the process-wide session state.
pub struct AuthSession<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for AuthSession<T> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<T: Transport + 'static> AuthSession<T> {
    pub fn new(transport: T, config: SessionConfig, storage: impl Storage + 'static) -> Self {
        Self {
            inner: Rc::new(Inner {
                transport,
                config,
                store: RefCell::new(SessionStore::new(storage)),
                refresh_in_flight: RefCell::new(None),
                csrf_in_flight: RefCell::new(None),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    fn is_cookie_mode(&self) -> bool {
        self.inner.config.mode == SessionMode::Cookie
    }

    // =========================================================================
    // READ ACCESSORS
    // =========================================================================

    /// Usable access token. Always `None` in cookie mode.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.inner.store.borrow_mut().access_token()
    }

    /// Usable refresh token. Always `None` in cookie mode.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.inner.store.borrow_mut().refresh_token()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<AuthUser> {
        self.inner.store.borrow_mut().user()
    }

    /// Whether the session holds usable credentials. Never touches the network.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        match self.inner.config.mode {
            SessionMode::Bearer => self.access_token().is_some() || self.refresh_token().is_some(),
            SessionMode::Cookie => self.current_user().is_some(),
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|user| user.is_admin())
    }

    /// Whether a `/auth/me/` lookup could succeed. Cookie sessions are opaque
    /// to the client, so they always might.
    fn may_hold_credentials(&self) -> bool {
        match self.inner.config.mode {
            SessionMode::Bearer => self.access_token().is_some() || self.refresh_token().is_some(),
            SessionMode::Cookie => true,
        }
    }

    /// Drop tokens and the cached profile.
    pub fn clear(&self) {
        self.inner.store.borrow_mut().clear();
    }

    // =========================================================================
    // REQUEST DECORATION
    // =========================================================================

    /// Attach credentials for an outgoing request.
    ///
    /// Bearer mode adds `Authorization` when `attach_bearer` is set and a usable
    /// access token exists. Cookie mode adds the CSRF header on state-changing
    /// methods when the CSRF cookie is visible.
    pub(crate) fn decorate(&self, request: HttpRequest, attach_bearer: bool) -> HttpRequest {
        match self.inner.config.mode {
            SessionMode::Bearer if attach_bearer => match self.access_token() {
                Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
                None => request,
            },
            SessionMode::Bearer => request,
            SessionMode::Cookie => self.with_csrf(request),
        }
    }

    /// Attach a credential just obtained from a refresh to a replayed request.
    pub(crate) fn decorate_replay(&self, request: HttpRequest, access: &str) -> HttpRequest {
        match self.inner.config.mode {
            SessionMode::Bearer if !access.is_empty() => request.header(AUTHORIZATION, format!("Bearer {access}")),
            SessionMode::Bearer => request,
            SessionMode::Cookie => self.with_csrf(request),
        }
    }

    fn with_csrf(&self, request: HttpRequest) -> HttpRequest {
        if !request.method.is_state_changing() {
            return request;
        }
        match self.inner.transport.cookie(&self.inner.config.csrf_cookie) {
            Some(token) => {
                let header = self.inner.config.csrf_header.clone();
                request.header(&header, token)
            }
            None => request,
        }
    }

    async fn send_exchange(&self, endpoint: AuthEndpoint, body: serde_json::Value) -> Result<HttpResponse, AuthError> {
        let request = HttpRequest::post(self.inner.config.endpoint(endpoint)).json(body);
        let request = self.decorate(request, false);
        Ok(self.inner.transport.send(request).await?)
    }

    // =========================================================================
    // LOGIN / REGISTER
    // =========================================================================

    /// Exchange a username/password for credentials.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] on 401, [`AuthError::Network`] when the
    /// backend is unreachable, [`AuthError::Status`] for other failures.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        self.ensure_csrf_token().await;

        let body = serde_json::to_value(LoginRequest { username, password })
            .map_err(|e| AuthError::Decode(e.to_string()))?;
        let response = self.send_exchange(AuthEndpoint::Token, body).await?;
        if response.status == 401 {
            log::info!("login rejected for {username}");
            return Err(AuthError::InvalidCredentials);
        }
        let tokens: TokenPair = response.error_for_status()?.json()?;

        {
            let mut store = self.inner.store.borrow_mut();
            if !self.is_cookie_mode() {
                store.set_access_token(Some(&tokens.access));
                store.set_refresh_token(tokens.refresh.as_deref());
            }
            store.set_user(None);
        }
        log::info!("login succeeded for {username}");
        Ok(tokens)
    }

    /// Create an account and sign in with the returned credentials.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] on 400, [`AuthError::Network`] when the backend
    /// is unreachable, [`AuthError::Status`] for other failures.
    pub async fn register(&self, username: &str, password: &str, password_confirm: &str) -> Result<TokenPair, AuthError> {
        self.ensure_csrf_token().await;

        let body = serde_json::to_value(RegisterRequest { username, password, password_confirm })
            .map_err(|e| AuthError::Decode(e.to_string()))?;
        let response = self.send_exchange(AuthEndpoint::Register, body).await?;
        if response.status == 400 {
            let err = AuthError::from_validation_body(&response.body);
            log::info!("registration rejected for {username}: {err}");
            return Err(err);
        }
        let registered: RegisterResponse = response.error_for_status()?.json()?;

        {
            let mut store = self.inner.store.borrow_mut();
            if !self.is_cookie_mode() {
                store.set_access_token(Some(&registered.tokens.access));
                store.set_refresh_token(registered.tokens.refresh.as_deref());
            }
            store.set_user(registered.user);
        }
        log::info!("registered {username}");
        Ok(registered.tokens)
    }

    // =========================================================================
    // REFRESH
    // =========================================================================

    /// Exchange the refresh credential for a new access token.
    ///
    /// The in-flight slot is checked when this is called, not when the
    /// returned future is first polled, so every caller that arrives before the
    /// exchange settles holds the same shared future.
    ///
    /// # Errors
    ///
    /// [`AuthError::MissingRefresh`] immediately (no network) in bearer mode
    /// without a usable refresh token, or when the session was cleared while
    /// the exchange was in flight; otherwise the refresh call's failure, after
    /// the session has been cleared.
    pub fn refresh_access_token(&self) -> PendingRefresh {
        let mut slot = self.inner.refresh_in_flight.borrow_mut();
        if let Some(pending) = slot.as_ref() {
            log::debug!("joining in-flight token refresh");
            return pending.clone();
        }

        let refresh = match self.inner.config.mode {
            SessionMode::Bearer => match self.refresh_token() {
                Some(token) => Some(token),
                None => return future::ready(Err(AuthError::MissingRefresh)).boxed_local().shared(),
            },
            SessionMode::Cookie => None,
        };
        let epoch = self.inner.store.borrow().epoch();
        let session = self.clone();
        let pending = async move {
            let result = session.exchange_refresh(refresh, epoch).await;
            session.inner.refresh_in_flight.borrow_mut().take();
            result
        }
        .boxed_local()
        .shared();
        *slot = Some(pending.clone());
        pending
    }

    /// Run one refresh exchange started under store `epoch`.
    async fn exchange_refresh(&self, refresh: Option<String>, epoch: u64) -> Result<String, AuthError> {
        let body = match refresh {
            Some(token) => json!({ "refresh": token }),
            None => json!({}),
        };

        let outcome = async {
            let response = self.send_exchange(AuthEndpoint::Refresh, body).await?;
            response.error_for_status()?.json::<RefreshResponse>()
        }
        .await;

        if self.inner.store.borrow().epoch() != epoch {
            log::info!("session cleared during token refresh; discarding the result");
            return Err(AuthError::MissingRefresh);
        }

        match outcome {
            Ok(tokens) => {
                if !self.is_cookie_mode() {
                    let mut store = self.inner.store.borrow_mut();
                    store.set_access_token(Some(&tokens.access));
                    if let Some(rotated) = tokens.refresh.as_deref() {
                        store.set_refresh_token(Some(rotated));
                    }
                }
                log::debug!("access token refreshed");
                Ok(tokens.access)
            }
            Err(err) => {
                log::warn!("token refresh failed, clearing session: {err}");
                self.clear();
                Err(err)
            }
        }
    }

    // =========================================================================
    // CSRF
    // =========================================================================

    /// Prime the CSRF cookie. Cookie mode only; failures are ignored.
    ///
    /// Shares one in-flight request the same way [`Self::refresh_access_token`]
    /// does.
    pub fn ensure_csrf_token(&self) -> PendingCsrf {
        if !self.is_cookie_mode() {
            return future::ready(()).boxed_local().shared();
        }
        let mut slot = self.inner.csrf_in_flight.borrow_mut();
        if let Some(pending) = slot.as_ref() {
            return pending.clone();
        }

        let session = self.clone();
        let pending = async move {
            let url = session.inner.config.endpoint(AuthEndpoint::Csrf);
            match session.inner.transport.send(HttpRequest::get(url)).await {
                Ok(resp) if resp.is_success() => {}
                Ok(resp) => log::debug!("csrf priming returned status {}", resp.status),
                Err(err) => log::debug!("csrf priming failed: {err}"),
            }
            session.inner.csrf_in_flight.borrow_mut().take();
        }
        .boxed_local()
        .shared();
        *slot = Some(pending.clone());
        pending
    }

    // =========================================================================
    // LOGOUT / CURRENT USER
    // =========================================================================

    /// Tell the backend the session is over, then clear local state regardless.
    pub async fn logout(&self) {
        self.ensure_csrf_token().await;

        let body = match self.refresh_token() {
            Some(token) if !self.is_cookie_mode() => json!({ "refresh": token }),
            _ => json!({}),
        };
        match self.send_exchange(AuthEndpoint::Logout, body).await {
            Ok(resp) if resp.is_success() => log::info!("logged out"),
            Ok(resp) => log::warn!("logout returned status {}; clearing local session anyway", resp.status),
            Err(err) => log::warn!("logout request failed; clearing local session anyway: {err}"),
        }
        self.clear();
    }

    /// Cached profile, or a fresh `/auth/me/` lookup when credentials may exist.
    ///
    /// A failed lookup clears the session and yields `None`. A lookup that
    /// outlives a logout yields `None` and caches nothing.
    pub async fn ensure_current_user(&self) -> Option<AuthUser> {
        if let Some(user) = self.current_user() {
            return Some(user);
        }
        if !self.may_hold_credentials() {
            return None;
        }

        let epoch = self.inner.store.borrow().epoch();
        let request = HttpRequest::get(self.inner.config.endpoint(AuthEndpoint::Me));
        let fetched = match interceptor::dispatch(self, request).await {
            Ok(response) => response.json::<AuthUser>(),
            Err(err) => Err(err),
        };
        if self.inner.store.borrow().epoch() != epoch {
            log::debug!("session cleared during current user lookup");
            return None;
        }
        match fetched {
            Ok(user) => {
                self.inner.store.borrow_mut().set_user(Some(user.clone()));
                Some(user)
            }
            Err(err) => {
                log::debug!("current user lookup failed, clearing session: {err}");
                self.clear();
                None
            }
        }
    }
}
