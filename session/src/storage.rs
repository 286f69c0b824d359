//! Key/value persistence backends for session state.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser client persists into tab-scoped `sessionStorage`, the CLI into
//! a JSON file, tests into memory. Backends never fail loudly: a missing
//! storage context behaves like an always-empty store.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// String key/value persistence.
pub trait Storage {
    /// Read the value stored under `key`.
    fn read(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, or remove the key when `value` is `None`.
    fn write(&self, key: &str, value: Option<&str>);
}

impl<S: Storage + ?Sized> Storage for Rc<S> {
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: Option<&str>) {
        (**self).write(key, value);
    }
}

/// Storage used when no persistence context exists. Reads are empty, writes vanish.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStorage;

impl Storage for NullStorage {
    fn read(&self, _key: &str) -> Option<String> {
        None
    }

    fn write(&self, _key: &str, _value: Option<&str>) {}
}

/// In-memory storage. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: Option<&str>) {
        let mut entries = self.entries.borrow_mut();
        match value {
            Some(value) => {
                entries.insert(key.to_owned(), value.to_owned());
            }
            None => {
                entries.remove(key);
            }
        }
    }
}
