//! Credential and cached-profile store.
//!
//! DESIGN
//! ======
//! The store mirrors three persisted keys in memory. It hydrates lazily on the
//! first access so constructing a session never touches storage, and every
//! token read re-checks expiry, purging stale tokens from both memory and the
//! backend before returning.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use crate::storage::Storage;
use crate::token;
use crate::types::AuthUser;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const CURRENT_USER_KEY: &str = "current_user_json";

/// In-memory view of persisted session state.
pub struct SessionStore {
    storage: Box<dyn Storage>,
    access: Option<String>,
    refresh: Option<String>,
    user: Option<AuthUser>,
    hydrated: bool,
    /// Bumped by every `clear`; exchanges started under an older epoch must
    /// not write their result back.
    epoch: u64,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self { storage: Box::new(storage), access: None, refresh: None, user: None, hydrated: false, epoch: 0 }
    }

    fn hydrate(&mut self) {
        if self.hydrated {
            return;
        }
        self.hydrated = true;
        self.access = non_empty(self.storage.read(ACCESS_TOKEN_KEY));
        self.refresh = non_empty(self.storage.read(REFRESH_TOKEN_KEY));
        self.user = load_cached_profile(self.storage.as_ref());
    }

    /// Usable access token, purging it first if expired.
    pub fn access_token(&mut self) -> Option<String> {
        self.hydrate();
        purge_if_expired(&mut self.access, self.storage.as_ref(), ACCESS_TOKEN_KEY)
    }

    /// Usable refresh token, purging it first if expired.
    pub fn refresh_token(&mut self) -> Option<String> {
        self.hydrate();
        purge_if_expired(&mut self.refresh, self.storage.as_ref(), REFRESH_TOKEN_KEY)
    }

    pub fn user(&mut self) -> Option<AuthUser> {
        self.hydrate();
        self.user.clone()
    }

    pub fn set_access_token(&mut self, token: Option<&str>) {
        self.hydrate();
        self.access = non_empty(token.map(str::to_owned));
        self.storage.write(ACCESS_TOKEN_KEY, self.access.as_deref());
    }

    pub fn set_refresh_token(&mut self, token: Option<&str>) {
        self.hydrate();
        self.refresh = non_empty(token.map(str::to_owned));
        self.storage.write(REFRESH_TOKEN_KEY, self.refresh.as_deref());
    }

    pub fn set_user(&mut self, user: Option<AuthUser>) {
        self.hydrate();
        let serialized = user.as_ref().and_then(|u| serde_json::to_string(u).ok());
        self.storage.write(CURRENT_USER_KEY, serialized.as_deref());
        self.user = user;
    }

    /// Drop every credential and the cached profile, in memory and on disk.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn clear(&mut self) {
        self.epoch += 1;
        self.hydrated = true;
        self.access = None;
        self.refresh = None;
        self.user = None;
        self.storage.write(ACCESS_TOKEN_KEY, None);
        self.storage.write(REFRESH_TOKEN_KEY, None);
        self.storage.write(CURRENT_USER_KEY, None);
    }
}

/// Deserialize the persisted profile, rejecting anything without a numeric
/// `id` and a string `username`.
pub fn load_cached_profile(storage: &dyn Storage) -> Option<AuthUser> {
    let raw = storage.read(CURRENT_USER_KEY)?;
    match serde_json::from_str::<AuthUser>(&raw) {
        Ok(user) => Some(user),
        Err(err) => {
            log::debug!("discarding cached profile: {err}");
            None
        }
    }
}

fn purge_if_expired(slot: &mut Option<String>, storage: &dyn Storage, key: &str) -> Option<String> {
    let token = slot.as_deref()?;
    if token::is_expired(token) {
        log::debug!("purging expired {key}");
        *slot = None;
        storage.write(key, None);
        return None;
    }
    slot.clone()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
