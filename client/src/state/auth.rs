//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login redirects
//! and identity-dependent rendering. Provided as `RwSignal<AuthState>` context
//! and refreshed from the session after every auth-changing action.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use session::{AuthSession, AuthUser, Transport};

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    pub authenticated: bool,
    /// A guard or auth action is resolving.
    pub loading: bool,
}

impl AuthState {
    /// Read the session's current state. Never touches the network.
    pub fn snapshot<T: Transport + 'static>(session: &AuthSession<T>) -> Self {
        Self { user: session.current_user(), authenticated: session.is_authenticated(), loading: false }
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(AuthUser::is_admin)
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.username.as_str())
    }
}
