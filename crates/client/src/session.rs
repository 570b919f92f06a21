//! Persisted session state.
//!
//! The browser build kept exactly two local-storage keys: the bare session
//! token and the serialized user record. [`SessionStore`] reproduces that
//! contract with two files in a directory: `session_id` (plain text) and
//! `user.json`. There is no renewal, expiry, or integrity check - the
//! token is opaque and trusted as-is until logout clears it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use cornershop_core::SessionId;

use crate::types::User;

/// Filename for the bare session token.
const SESSION_ID_FILE: &str = "session_id";

/// Filename for the serialized user record.
const USER_FILE: &str = "user.json";

/// Errors from reading or writing the session store.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// An authenticated session: the token plus the user it belongs to.
///
/// Acquired on login, handed explicitly to every authenticated call, and
/// dropped on logout. Nothing else holds session state.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub user: User,
}

/// File-backed store for the two session keys.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// the first `save`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the session keys.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the persisted session, if both keys are present and readable.
    ///
    /// Corrupt or partial state reads as "not logged in"; the next login
    /// overwrites it.
    #[must_use]
    pub fn load(&self) -> Option<Session> {
        let token = std::fs::read_to_string(self.dir.join(SESSION_ID_FILE)).ok()?;
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        let user_json = std::fs::read_to_string(self.dir.join(USER_FILE)).ok()?;
        match serde_json::from_str::<User>(&user_json) {
            Ok(user) => Some(Session {
                id: SessionId::from(token),
                user,
            }),
            Err(e) => {
                tracing::warn!("stored user record is corrupt, ignoring: {e}");
                None
            }
        }
    }

    /// Persist both session keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or either key
    /// cannot be written.
    pub fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(SESSION_ID_FILE), session.id.as_str())?;
        let user_json = serde_json::to_string(&session.user)?;
        std::fs::write(self.dir.join(USER_FILE), user_json)?;
        Ok(())
    }

    /// Remove both session keys. Missing keys are not an error, so clearing
    /// is safe to call unconditionally on logout.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O failures other than absence.
    pub fn clear(&self) -> Result<(), SessionStoreError> {
        for file in [SESSION_ID_FILE, USER_FILE] {
            match std::fs::remove_file(self.dir.join(file)) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
