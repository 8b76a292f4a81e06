// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Durable storage for the session.
//!
//! One namespaced entry holds `{ user, token, isAuthenticated }` as JSON.
//! [`FileSessionPersistence`] keeps it in `{dir}/{namespace}.json`;
//! [`MemorySessionPersistence`] keeps it in memory for tests and embedding.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::state::PersistedSession;

/// Default namespace of the persisted entry.
pub const DEFAULT_NAMESPACE: &str = "user-storage";

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session storage holds invalid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("session storage lock poisoned")]
    Poisoned,
}

/// Load/save/clear adapter for the persisted session.
pub trait SessionPersistence: Send + Sync {
    /// Read the stored entry, `None` when nothing is stored.
    fn load(&self) -> Result<Option<PersistedSession>, PersistenceError>;

    /// Replace the stored entry.
    fn save(&self, session: &PersistedSession) -> Result<(), PersistenceError>;

    /// Remove the stored entry. Removing a missing entry succeeds.
    fn clear(&self) -> Result<(), PersistenceError>;
}

/// Session stored as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionPersistence {
    path: PathBuf,
}

impl FileSessionPersistence {
    /// Store the entry as `{dir}/{namespace}.json`.
    pub fn new(dir: impl AsRef<Path>, namespace: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{namespace}.json")),
        }
    }

    /// Store the entry under the default namespace.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir, DEFAULT_NAMESPACE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionPersistence for FileSessionPersistence {
    fn load(&self) -> Result<Option<PersistedSession>, PersistenceError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &PersistedSession) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Replace atomically through a sibling temp file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec(session)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Session stored in memory as its JSON text.
#[derive(Debug, Default)]
pub struct MemorySessionPersistence {
    entry: Mutex<Option<String>>,
}

impl MemorySessionPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an already stored entry.
    pub fn with_entry(session: &PersistedSession) -> Result<Self, PersistenceError> {
        Ok(Self {
            entry: Mutex::new(Some(serde_json::to_string(session)?)),
        })
    }

    /// Raw JSON of the stored entry.
    pub fn raw(&self) -> Option<String> {
        self.entry.lock().ok().and_then(|entry| entry.clone())
    }
}

impl SessionPersistence for MemorySessionPersistence {
    fn load(&self) -> Result<Option<PersistedSession>, PersistenceError> {
        let entry = self.entry.lock().map_err(|_| PersistenceError::Poisoned)?;
        match entry.as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, session: &PersistedSession) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(session)?;
        *self.entry.lock().map_err(|_| PersistenceError::Poisoned)? = Some(json);
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        *self.entry.lock().map_err(|_| PersistenceError::Poisoned)? = None;
        Ok(())
    }
}

impl<P: SessionPersistence + ?Sized> SessionPersistence for std::sync::Arc<P> {
    fn load(&self) -> Result<Option<PersistedSession>, PersistenceError> {
        (**self).load()
    }

    fn save(&self, session: &PersistedSession) -> Result<(), PersistenceError> {
        (**self).save(session)
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        (**self).clear()
    }
}
