//! `sessionStorage` backend for the session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! Credentials live for the lifetime of the tab. When no `window` exists (or
//! storage is disabled) reads return `None` and writes are dropped, so the
//! session degrades to in-memory only.

use session::Storage;

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "csr")]
fn session_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.session_storage().ok().flatten())
}

impl Storage for BrowserStorage {
    fn read(&self, key: &str) -> Option<String> {
        #[cfg(feature = "csr")]
        {
            session_storage()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            None
        }
    }

    fn write(&self, key: &str, value: Option<&str>) {
        #[cfg(feature = "csr")]
        {
            let Some(storage) = session_storage() else {
                return;
            };
            let _ = match value {
                Some(value) => storage.set_item(key, value),
                None => storage.remove_item(key),
            };
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (key, value);
        }
    }
}
