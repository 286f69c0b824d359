//! Route access decisions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every guarded route asks one of these before rendering. Guards never fail:
//! they resolve to [`GuardOutcome::Allow`] or a redirect target the router
//! navigates to.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::http::Transport;
use crate::service::AuthSession;

pub const LOGIN_ROUTE: &str = "/login";
pub const HOME_ROUTE: &str = "/";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(String),
}

impl GuardOutcome {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// `/login?next=<requested>` with `requested` URL-encoded.
#[must_use]
pub fn login_redirect(requested: &str) -> String {
    format!("{LOGIN_ROUTE}?next={}", urlencoding::encode(requested))
}

/// Where to go after a successful login given the raw `next` query value.
///
/// Only same-site absolute paths are honoured; anything else lands on `/`.
#[must_use]
pub fn post_login_target(next: Option<&str>) -> String {
    let Some(raw) = next else {
        return HOME_ROUTE.to_owned();
    };
    let decoded = urlencoding::decode(raw).map_or_else(|_| raw.to_owned(), std::borrow::Cow::into_owned);
    if decoded.starts_with('/') && !decoded.starts_with("//") && !decoded.starts_with("/\\") {
        decoded
    } else {
        HOME_ROUTE.to_owned()
    }
}

/// Allow signed-in users; send everyone else to login with `next` preserved.
///
/// Falls back to resolving the current user so cookie sessions without a
/// cached profile still get through after one round trip.
pub async fn require_authenticated<T: Transport + 'static>(session: &AuthSession<T>, requested: &str) -> GuardOutcome {
    if session.is_authenticated() {
        return GuardOutcome::Allow;
    }
    match session.ensure_current_user().await {
        Some(_) => GuardOutcome::Allow,
        None => GuardOutcome::Redirect(login_redirect(requested)),
    }
}

/// Keep signed-in users away from login/register.
#[must_use]
pub fn require_guest<T: Transport + 'static>(session: &AuthSession<T>) -> GuardOutcome {
    if session.is_authenticated() {
        GuardOutcome::Redirect(HOME_ROUTE.to_owned())
    } else {
        GuardOutcome::Allow
    }
}

/// Allow staff and superusers only.
pub async fn require_admin<T: Transport + 'static>(session: &AuthSession<T>, requested: &str) -> GuardOutcome {
    match session.ensure_current_user().await {
        None => GuardOutcome::Redirect(login_redirect(requested)),
        Some(user) if user.is_admin() => GuardOutcome::Allow,
        Some(_) => GuardOutcome::Redirect(HOME_ROUTE.to_owned()),
    }
}
