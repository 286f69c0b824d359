use futures::executor::block_on;
use session::{MemoryStorage, SessionConfig, SessionMode, Storage};

use super::*;
use crate::net::transport::BrowserTransport;

fn session_over(storage: &MemoryStorage) -> AuthSession<BrowserTransport> {
    AuthSession::new(BrowserTransport, SessionConfig::new("/api", SessionMode::Bearer), storage.clone())
}

// =============================================================
// requested_path
// =============================================================

#[test]
fn requested_path_without_query() {
    assert_eq!(requested_path("/drivers", ""), "/drivers");
}

#[test]
fn requested_path_keeps_query_once() {
    assert_eq!(requested_path("/races", "season=2024"), "/races?season=2024");
    assert_eq!(requested_path("/races", "?season=2024"), "/races?season=2024");
}

// =============================================================
// evaluate
// =============================================================

#[test]
fn authenticated_route_redirects_signed_out_user() {
    let session = session_over(&MemoryStorage::new());
    let outcome = block_on(evaluate(RouteAccess::Authenticated, &session, "/drivers"));
    assert_eq!(outcome, GuardOutcome::Redirect("/login?next=%2Fdrivers".to_owned()));
}

#[test]
fn guest_route_allows_signed_out_user() {
    let session = session_over(&MemoryStorage::new());
    assert!(block_on(evaluate(RouteAccess::Guest, &session, "/login")).is_allowed());
}

#[test]
fn admin_route_uses_cached_profile() {
    let storage = MemoryStorage::new();
    storage.write("current_user_json", Some(r#"{"id": 1, "username": "admin", "is_staff": true}"#));
    let session = session_over(&storage);

    assert!(block_on(evaluate(RouteAccess::Admin, &session, "/admin")).is_allowed());
}

#[test]
fn admin_route_sends_regular_user_home() {
    let storage = MemoryStorage::new();
    storage.write("current_user_json", Some(r#"{"id": 2, "username": "fan"}"#));
    let session = session_over(&storage);

    assert_eq!(block_on(evaluate(RouteAccess::Admin, &session, "/admin")), GuardOutcome::Redirect("/".to_owned()));
}

// =============================================================
// state_after_failure
// =============================================================

fn status(code: u16) -> AuthError {
    AuthError::Status { status: code, body: String::new() }
}

#[test]
fn unauthorized_failure_publishes_cleared_session() {
    let storage = MemoryStorage::new();
    storage.write("current_user_json", Some(r#"{"id": 3, "username": "fan"}"#));
    let session = session_over(&storage);
    assert!(AuthState::snapshot(&session).user.is_some());

    session.clear();
    let state = state_after_failure(&session, &status(401)).expect("republished");

    assert_eq!(state, AuthState::default());
}

#[test]
fn other_failures_leave_auth_context_alone() {
    let session = session_over(&MemoryStorage::new());
    assert_eq!(state_after_failure(&session, &status(500)), None);
    assert_eq!(state_after_failure(&session, &AuthError::Network("down".to_owned())), None);
}
