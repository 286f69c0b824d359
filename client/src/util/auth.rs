//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical guard behavior: resolve the
//! route's access rule against the session, publish the result to the auth
//! context, and navigate when the rule says redirect.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_location;
use session::guard::{self, GuardOutcome};
use session::{AuthError, AuthSession, Transport};

use crate::state::auth::AuthState;

/// Access rule attached to a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteAccess {
    Authenticated,
    Guest,
    Admin,
}

/// Resolve `access` for a navigation to `requested` (path plus query).
pub async fn evaluate<T: Transport + 'static>(
    access: RouteAccess,
    session: &AuthSession<T>,
    requested: &str,
) -> GuardOutcome {
    match access {
        RouteAccess::Authenticated => guard::require_authenticated(session, requested).await,
        RouteAccess::Guest => guard::require_guest(session),
        RouteAccess::Admin => guard::require_admin(session, requested).await,
    }
}

/// Join a router pathname and search string into the `next` target.
pub fn requested_path(pathname: &str, search: &str) -> String {
    let search = search.trim_start_matches('?');
    if search.is_empty() { pathname.to_owned() } else { format!("{pathname}?{search}") }
}

/// Auth context to publish after a page request failed with `err`.
///
/// A 401 that got past the interceptor means the refresh failed and the
/// session was cleared underneath the UI.
pub fn state_after_failure<T: Transport + 'static>(session: &AuthSession<T>, err: &AuthError) -> Option<AuthState> {
    err.is_unauthorized().then(|| AuthState::snapshot(session))
}

/// Run the guard for the current route once on mount.
///
/// Guarded routes also watch the auth context afterwards and send the user to
/// login when a signed-in session drops out.
pub fn install_route_guard<F>(access: RouteAccess, auth: RwSignal<AuthState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let location = use_location();
    let requested = requested_path(&location.pathname.get_untracked(), &location.search.get_untracked());
    auth.update(|state| state.loading = true);

    #[cfg(feature = "csr")]
    if access != RouteAccess::Guest {
        let navigate = navigate.clone();
        let requested = requested.clone();
        Effect::new(move |was_signed_in: Option<bool>| {
            let state = auth.get();
            if was_signed_in == Some(true) && !state.authenticated && !state.loading {
                log::debug!("session ended on {requested}; returning to login");
                navigate(&guard::login_redirect(&requested), NavigateOptions::default());
            }
            state.authenticated
        });
    }

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        let session = crate::state::session::client_session();
        let outcome = evaluate(access, &session, &requested).await;
        auth.set(AuthState::snapshot(&session));
        if let GuardOutcome::Redirect(target) = outcome {
            log::debug!("guard {access:?} redirecting {requested} -> {target}");
            navigate(&target, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    #[cfg(not(feature = "csr"))]
    {
        let _ = (access, requested, navigate);
        auth.update(|state| state.loading = false);
    }
}
