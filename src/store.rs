// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable session storage.
//!
//! One JSON record on disk holding the current token/profile pair, plus an
//! in-memory copy shared by every component that needs the credential. The
//! record is always written whole: a temp file is renamed into place so a
//! later load sees either the previous session or the new one, never a mix.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::error::{AppError, Result};
use crate::models::{Session, UserProfile};

/// Shared handle to the persisted session. Cheap to clone; all clones observe
/// the same in-memory state.
#[derive(Clone)]
pub struct SessionStore {
    path: PathBuf,
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    /// Open the store, loading any previously persisted session.
    ///
    /// A missing, unreadable, or corrupt record yields an anonymous store;
    /// this never fails.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session = load_record(&path);
        if let Some(session) = &session {
            tracing::debug!(user = %session.user.name, "Restored persisted session");
        }
        Self {
            path,
            current: Arc::new(RwLock::new(session)),
        }
    }

    /// Snapshot of the current session, if any.
    pub fn current(&self) -> Option<Session> {
        self.current.read().expect("session lock poisoned").clone()
    }

    /// The current credential alone.
    pub fn token(&self) -> Option<String> {
        self.current
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|s| s.token.clone())
    }

    /// Replace the session wholesale: persist first, then update in memory.
    ///
    /// If persistence fails the in-memory session is left untouched, so disk
    /// and memory never disagree about who is signed in.
    pub fn replace(&self, session: Session) -> Result<()> {
        save_record(&self.path, &session)?;
        *self.current.write().expect("session lock poisoned") = Some(session);
        Ok(())
    }

    /// Swap in a freshly fetched profile, keeping the existing token.
    ///
    /// The whole record is rewritten. A store with no session ignores the
    /// update; a concurrent sign-out wins over a late profile response.
    pub fn update_user(&self, user: UserProfile) -> Result<()> {
        let token = match self.token() {
            Some(token) => token,
            None => {
                tracing::debug!("Ignoring profile update with no active session");
                return Ok(());
            }
        };
        self.replace(Session { token, user })
    }

    /// Remove the persisted record and forget the in-memory session.
    ///
    /// Idempotent and infallible: a storage fault is logged but the in-memory
    /// session is cleared regardless.
    pub fn clear(&self) {
        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %err, path = %self.path.display(), "Failed to remove session record");
            }
        }
        *self.current.write().expect("session lock poisoned") = None;
    }
}

/// Read the persisted record. Corrupt records are treated as absent.
fn load_record(path: &Path) -> Option<Session> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %err, path = %path.display(), "Failed to read session record");
            }
            return None;
        }
    };

    match serde_json::from_str(&contents) {
        Ok(session) => Some(session),
        Err(err) => {
            tracing::warn!(error = %err, path = %path.display(), "Discarding corrupt session record");
            None
        }
    }
}

/// Write the record atomically: temp file in the same directory, then rename.
fn save_record(path: &Path, session: &Session) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::Store(format!("creating {}: {}", parent.display(), e)))?;
    }

    let contents = serde_json::to_string_pretty(session)
        .map_err(|e| AppError::Store(format!("encoding session: {}", e)))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents)
        .map_err(|e| AppError::Store(format!("writing {}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, path)
        .map_err(|e| AppError::Store(format!("replacing {}: {}", path.display(), e)))?;

    Ok(())
}
