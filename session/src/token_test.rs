use super::*;
use crate::test_support::{build_jwt, jwt_with_payload};

// =============================================================================
// expiry
// =============================================================================

#[test]
fn expiry_reads_numeric_exp_claim() {
    let token = jwt_with_payload(&serde_json::json!({ "exp": 1_700_000_000, "sub": "admin" }));
    assert_eq!(expiry(&token), Some(1_700_000_000.0));
}

#[test]
fn expiry_accepts_padded_payload_segment() {
    let token = jwt_with_payload(&serde_json::json!({ "exp": 42 }));
    let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
    parts[1].push_str("==");
    assert_eq!(expiry(&parts.join(".")), Some(42.0));
}

#[test]
fn expiry_rejects_wrong_segment_count() {
    assert_eq!(expiry("opaque-session-token"), None);
    assert_eq!(expiry("a.b"), None);
    assert_eq!(expiry("a.b.c.d"), None);
}

#[test]
fn expiry_rejects_undecodable_payload() {
    assert_eq!(expiry("header.!!!not-base64!!!.sig"), None);
}

#[test]
fn expiry_rejects_non_json_payload() {
    let payload = URL_SAFE_NO_PAD.encode(b"not json");
    assert_eq!(expiry(&format!("h.{payload}.s")), None);
}

#[test]
fn expiry_rejects_missing_or_string_exp() {
    let missing = jwt_with_payload(&serde_json::json!({ "sub": "admin" }));
    let stringly = jwt_with_payload(&serde_json::json!({ "exp": "1700000000" }));
    assert_eq!(expiry(&missing), None);
    assert_eq!(expiry(&stringly), None);
}

// =============================================================================
// is_expired_at
// =============================================================================

#[test]
fn token_in_the_past_is_expired() {
    let token = jwt_with_payload(&serde_json::json!({ "exp": 1_000 }));
    assert!(is_expired_at(&token, 2_000.0));
}

#[test]
fn token_inside_skew_window_is_expired() {
    let token = jwt_with_payload(&serde_json::json!({ "exp": 1_004 }));
    assert!(is_expired_at(&token, 1_000.0));
    let edge = jwt_with_payload(&serde_json::json!({ "exp": 1_005 }));
    assert!(is_expired_at(&edge, 1_000.0));
}

#[test]
fn token_beyond_skew_window_is_usable() {
    let token = jwt_with_payload(&serde_json::json!({ "exp": 1_006 }));
    assert!(!is_expired_at(&token, 1_000.0));
}

#[test]
fn malformed_token_counts_as_expired() {
    assert!(is_expired_at("access-1", 0.0));
}

#[test]
fn is_expired_uses_wall_clock() {
    assert!(!is_expired(&build_jwt(3600)));
    assert!(is_expired(&build_jwt(-60)));
    assert!(is_expired(&build_jwt(3)));
}
