//! Credential-attaching HTTP client with one silent refresh per request.
//!
//! DESIGN
//! ======
//! Per request: `INITIAL -> SENT -> SUCCESS`, or on a first 401
//! `REFRESHING -> RETRIED -> SUCCESS|FAILURE`. A request that is already a
//! replay, or that targets a credential-exchange endpoint, goes straight to
//! FAILURE on 401. The replay is a clone of the original request tagged with
//! [`HttpRequest::into_retry`], so the "exactly once" rule travels with the
//! request itself.

#[cfg(test)]
#[path = "interceptor_test.rs"]
mod interceptor_test;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::AuthError;
use crate::http::{HttpRequest, HttpResponse, Method, Transport};
use crate::service::AuthSession;

/// API client that routes every request through the session's credentials.
pub struct ApiClient<T> {
    session: AuthSession<T>,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self { session: self.session.clone() }
    }
}

impl<T: Transport + 'static> ApiClient<T> {
    #[must_use]
    pub fn new(session: AuthSession<T>) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn session(&self) -> &AuthSession<T> {
        &self.session
    }

    /// Send `request`, refreshing and replaying once on a 401.
    ///
    /// # Errors
    ///
    /// [`AuthError::Status`] for a non-2xx final response,
    /// [`AuthError::Network`] when the backend is unreachable, or the refresh
    /// failure when the silent refresh could not recover a 401.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AuthError> {
        dispatch(&self.session, request).await
    }

    /// `GET` an API path and decode the JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`]; also [`AuthError::Decode`] on schema mismatch.
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, AuthError> {
        let url = self.session.config().url(path);
        self.send(HttpRequest::get(url)).await?.json()
    }

    /// Send a JSON body to an API path with `method` and decode the JSON reply.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`]; also [`AuthError::Decode`] on schema mismatch.
    pub async fn send_json<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<R, AuthError> {
        let body = serde_json::to_value(body).map_err(|e| AuthError::Decode(e.to_string()))?;
        let url = self.session.config().url(path);
        self.send(HttpRequest::new(method, url).json(body)).await?.json()
    }
}

pub(crate) async fn dispatch<T: Transport + 'static>(
    session: &AuthSession<T>,
    request: HttpRequest,
) -> Result<HttpResponse, AuthError> {
    let exchange = session.config().is_credential_exchange(&request.url);
    let outgoing = session.decorate(request.clone(), !exchange);
    let response = session.transport().send(outgoing).await?;

    if response.status != 401 || exchange || request.is_retry() {
        return response.error_for_status();
    }

    log::debug!("{} {} returned 401; refreshing", request.method.as_str(), request.path());
    let access = match session.refresh_access_token().await {
        Ok(access) => access,
        Err(AuthError::MissingRefresh) => {
            session.clear();
            return response.error_for_status();
        }
        Err(err) => {
            session.clear();
            return Err(err);
        }
    };

    let replay = session.decorate_replay(request.into_retry(), &access);
    session.transport().send(replay).await?.error_for_status()
}
