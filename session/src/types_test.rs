use super::*;

#[test]
fn auth_user_role_flags_default_to_false() {
    let user: AuthUser = serde_json::from_str(r#"{"id": 7, "username": "marshal"}"#).unwrap();
    assert!(!user.is_staff);
    assert!(!user.is_superuser);
    assert!(!user.is_admin());
}

#[test]
fn auth_user_is_admin_for_staff_or_superuser() {
    let staff = AuthUser { id: 1, username: "a".into(), is_staff: true, is_superuser: false };
    let superuser = AuthUser { id: 2, username: "b".into(), is_staff: false, is_superuser: true };
    assert!(staff.is_admin());
    assert!(superuser.is_admin());
}

#[test]
fn token_pair_without_refresh() {
    let pair: TokenPair = serde_json::from_str(r#"{"access": "A"}"#).unwrap();
    assert_eq!(pair.access, "A");
    assert_eq!(pair.refresh, None);
}

#[test]
fn register_response_flattens_tokens_and_user() {
    let body = r#"{"access": "A", "refresh": "R", "user": {"id": 3, "username": "new", "is_staff": false, "is_superuser": false}}"#;
    let resp: RegisterResponse = serde_json::from_str(body).unwrap();
    assert_eq!(resp.tokens.access, "A");
    assert_eq!(resp.tokens.refresh.as_deref(), Some("R"));
    assert_eq!(resp.user.map(|u| u.username), Some("new".to_owned()));
}

#[test]
fn register_request_uses_snake_case_confirm_field() {
    let body = serde_json::to_value(RegisterRequest { username: "u", password: "p", password_confirm: "p" }).unwrap();
    assert_eq!(body, serde_json::json!({ "username": "u", "password": "p", "password_confirm": "p" }));
}
