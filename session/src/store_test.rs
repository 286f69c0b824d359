use super::*;
use crate::storage::MemoryStorage;
use crate::test_support::{build_jwt, sample_user};

fn store_over(storage: &MemoryStorage) -> SessionStore {
    SessionStore::new(storage.clone())
}

// =============================================================================
// hydration
// =============================================================================

#[test]
fn hydrates_tokens_and_profile_on_first_read() {
    let storage = MemoryStorage::new();
    let access = build_jwt(3600);
    let refresh = build_jwt(7200);
    storage.write(ACCESS_TOKEN_KEY, Some(&access));
    storage.write(REFRESH_TOKEN_KEY, Some(&refresh));
    storage.write(CURRENT_USER_KEY, Some(r#"{"id": 1, "username": "admin", "is_staff": true, "is_superuser": false}"#));

    let mut store = store_over(&storage);
    assert_eq!(store.access_token(), Some(access));
    assert_eq!(store.refresh_token(), Some(refresh));
    assert_eq!(store.user(), Some(sample_user(true)));
}

#[test]
fn empty_persisted_token_is_absent() {
    let storage = MemoryStorage::new();
    storage.write(ACCESS_TOKEN_KEY, Some(""));
    assert_eq!(store_over(&storage).access_token(), None);
}

// =============================================================================
// expiry purge
// =============================================================================

#[test]
fn expired_access_token_is_purged_from_storage() {
    let storage = MemoryStorage::new();
    let mut store = store_over(&storage);
    store.set_access_token(Some(&build_jwt(-60)));
    assert!(storage.read(ACCESS_TOKEN_KEY).is_some());

    assert_eq!(store.access_token(), None);
    assert_eq!(storage.read(ACCESS_TOKEN_KEY), None);
}

#[test]
fn token_inside_skew_window_is_purged() {
    let storage = MemoryStorage::new();
    storage.write(ACCESS_TOKEN_KEY, Some(&build_jwt(4)));
    let mut store = store_over(&storage);
    assert_eq!(store.access_token(), None);
    assert_eq!(storage.read(ACCESS_TOKEN_KEY), None);
}

#[test]
fn expired_refresh_token_is_purged_but_access_survives() {
    let storage = MemoryStorage::new();
    let access = build_jwt(600);
    storage.write(ACCESS_TOKEN_KEY, Some(&access));
    storage.write(REFRESH_TOKEN_KEY, Some(&build_jwt(-1)));

    let mut store = store_over(&storage);
    assert_eq!(store.refresh_token(), None);
    assert_eq!(storage.read(REFRESH_TOKEN_KEY), None);
    assert_eq!(store.access_token(), Some(access));
}

#[test]
fn opaque_token_counts_as_expired() {
    let storage = MemoryStorage::new();
    storage.write(ACCESS_TOKEN_KEY, Some("access-1"));
    assert_eq!(store_over(&storage).access_token(), None);
    assert!(storage.is_empty());
}

// =============================================================================
// load_cached_profile
// =============================================================================

#[test]
fn cached_profile_rejects_malformed_json() {
    let storage = MemoryStorage::new();
    storage.write(CURRENT_USER_KEY, Some("{not json"));
    assert_eq!(load_cached_profile(&storage), None);
}

#[test]
fn cached_profile_rejects_missing_or_mistyped_fields() {
    let storage = MemoryStorage::new();
    storage.write(CURRENT_USER_KEY, Some(r#"{"username": "admin"}"#));
    assert_eq!(load_cached_profile(&storage), None);

    storage.write(CURRENT_USER_KEY, Some(r#"{"id": "1", "username": "admin"}"#));
    assert_eq!(load_cached_profile(&storage), None);

    storage.write(CURRENT_USER_KEY, Some(r#"{"id": 1, "username": 5}"#));
    assert_eq!(load_cached_profile(&storage), None);

    storage.write(CURRENT_USER_KEY, Some("null"));
    assert_eq!(load_cached_profile(&storage), None);
}

#[test]
fn cached_profile_accepts_minimal_shape() {
    let storage = MemoryStorage::new();
    storage.write(CURRENT_USER_KEY, Some(r#"{"id": 1, "username": "admin"}"#));
    assert_eq!(load_cached_profile(&storage), Some(sample_user(false)));
}

// =============================================================================
// writes / clear
// =============================================================================

#[test]
fn set_user_persists_json() {
    let storage = MemoryStorage::new();
    let mut store = store_over(&storage);
    store.set_user(Some(sample_user(false)));
    assert_eq!(load_cached_profile(&storage), Some(sample_user(false)));

    store.set_user(None);
    assert_eq!(storage.read(CURRENT_USER_KEY), None);
}

#[test]
fn clear_removes_everything_from_memory_and_storage() {
    let storage = MemoryStorage::new();
    let mut store = store_over(&storage);
    store.set_access_token(Some(&build_jwt(3600)));
    store.set_refresh_token(Some(&build_jwt(7200)));
    store.set_user(Some(sample_user(true)));
    assert_eq!(storage.len(), 3);

    store.clear();
    assert!(storage.is_empty());
    assert_eq!(store.access_token(), None);
    assert_eq!(store.refresh_token(), None);
    assert_eq!(store.user(), None);
}

#[test]
fn clear_advances_epoch() {
    let mut store = store_over(&MemoryStorage::new());
    let before = store.epoch();
    store.set_access_token(Some(&build_jwt(3600)));
    assert_eq!(store.epoch(), before);

    store.clear();
    store.clear();
    assert_eq!(store.epoch(), before + 2);
}

#[test]
fn null_storage_degrades_to_memory_only() {
    let mut store = SessionStore::new(crate::storage::NullStorage);
    let access = build_jwt(3600);
    store.set_access_token(Some(&access));
    assert_eq!(store.access_token(), Some(access));
}
