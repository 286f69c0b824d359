//! Credential file for the CLI.
//!
//! Stores the session keys as a flat JSON object in `~/.pitwall/session.json`
//! (or `--store`) with restricted permissions (0600). Every write goes to a
//! sibling temp file that is then renamed over the store, so readers see the
//! old file or the new one and never a partial write.

#[cfg(test)]
#[path = "file_store_test.rs"]
mod file_store_test;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use session::Storage;

use crate::CliError;

const STORE_DIR: &str = ".pitwall";
const STORE_FILE: &str = "session.json";

/// `$HOME/.pitwall/session.json`, or a file in the working directory when
/// `HOME` is unset.
pub fn default_store_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(STORE_DIR).join(STORE_FILE),
        None => PathBuf::from(STORE_DIR).join(STORE_FILE),
    }
}

/// [`Storage`] backed by a JSON file.
pub struct FileStorage {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Load `path`, starting empty when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Store`] when the file exists but cannot be read or
    /// is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CliError> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|source| CliError::Store {
                path: path.display().to_string(),
                message: source.to_string(),
            })?;
            serde_json::from_str(&contents).map_err(|source| CliError::Store {
                path: path.display().to_string(),
                message: source.to_string(),
            })?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries: RefCell::new(entries) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn save(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(&*self.entries.borrow())?;
        let temp = self.temp_path();

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&temp)?;
        // `mode` only applies on create; a leftover temp file keeps its own.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp, &self.path)
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: Option<&str>) {
        let changed = {
            let mut entries = self.entries.borrow_mut();
            match value {
                Some(value) => entries.insert(key.to_owned(), value.to_owned()).as_deref() != Some(value),
                None => entries.remove(key).is_some(),
            }
        };
        if !changed {
            return;
        }
        if let Err(error) = self.save() {
            tracing::warn!(path = %self.path.display(), %error, "failed to persist session store");
        }
    }
}
