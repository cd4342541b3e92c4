//! Bearer-token session shared between the request layer and the UI.
//!
//! A [`Session`] is a thin wrapper over a [`TokenStore`] keyed by
//! [`AUTH_TOKEN_KEY`]. Storage failures on read are logged and treated as
//! "signed out" so a broken store never blocks browsing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;

/// Key under which the bearer token is stored.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session store I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("session store at {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Key/value persistence for session data.
pub trait TokenStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SessionError`] when the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// # Errors
    ///
    /// Returns [`SessionError`] when the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// # Errors
    ///
    /// Returns [`SessionError`] when the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// Process-local store. Used by tests and one-shot tools.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl TokenStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let values = self
            .values
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.values
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.values
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// A JSON object on disk, e.g. `{"auth_token": "..."}`.
///
/// A missing file reads as empty. The parent directory is created on the
/// first write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn read_map(&self) -> Result<HashMap<String, String>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| SessionError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn write_map(&self, map: &HashMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let body = serde_json::to_string_pretty(map).map_err(|source| SessionError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })?;
        std::fs::write(&self.path, body).map_err(|e| self.io_error(e))
    }

    /// Reads the map, starting over when the file is corrupt.
    fn read_map_for_update(&self) -> Result<HashMap<String, String>, SessionError> {
        match self.read_map() {
            Err(SessionError::Corrupt { path, source }) => {
                tracing::warn!(%path, error = %source, "discarding corrupt session file");
                Ok(HashMap::new())
            }
            other => other,
        }
    }
}

impl TokenStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut map = self.read_map_for_update()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut map = self.read_map_for_update()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// The signed-in state of the current user.
///
/// Shared by `Arc` between the API client and whatever drives the UI.
pub struct Session {
    store: Box<dyn TokenStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Session {
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }

    /// The stored bearer token, or `None` when signed out or unreadable.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        match self.store.get(AUTH_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "could not read session token; treating as signed out");
                None
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`SessionError`] when the token cannot be persisted.
    pub fn set_token(&self, token: &str) -> Result<(), SessionError> {
        self.store.set(AUTH_TOKEN_KEY, token)
    }

    /// Removes the token. Failures are logged; the caller is signed out
    /// regardless of whether the store could be updated.
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(AUTH_TOKEN_KEY) {
            tracing::warn!(error = %e, "could not remove session token");
        }
    }

    /// Presence check only; expiry is enforced by the backend.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}
