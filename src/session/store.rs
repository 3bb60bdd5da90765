//! Durable session persistence.
//!
//! The on-disk format is a small JSON object holding five string keys
//! (`authToken`, `userRole`, `userEmail`, `userName`, `userId`), written
//! together and cleared together. A record missing any key, or one whose
//! role does not parse, loads as absent: a partial session is not a valid
//! state and must never be surfaced.

use crate::{
    Error,
    session::{Role, Session},
};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::debug;

/// Synchronous, idempotent session persistence. The auth service is the
/// only writer; guards and observers only ever read.
pub trait SessionStore: Send {
    fn save(&self, session: &Session) -> Result<(), Error>;
    fn load(&self) -> Result<Option<Session>, Error>;
    /// Clearing an already-empty store is a no-op, not an error.
    fn clear(&self) -> Result<(), Error>;
}

/// Persisted record, kept key-compatible with the original client storage.
#[derive(Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "authToken")]
    auth_token: String,
    #[serde(rename = "userRole")]
    user_role: String,
    #[serde(rename = "userEmail")]
    user_email: String,
    #[serde(rename = "userName")]
    user_name: String,
    #[serde(rename = "userId")]
    user_id: String,
}

impl StoredSession {
    fn from_session(session: &Session) -> Self {
        Self {
            auth_token: session.token.clone(),
            user_role: session.role.to_string(),
            user_email: session.email.clone(),
            user_name: session.name.clone(),
            user_id: session.user_id.clone(),
        }
    }

    fn into_session(self) -> Option<Session> {
        let role: Role = self.user_role.parse().ok()?;
        Some(Session {
            token: self.auth_token,
            role,
            email: self.user_email,
            name: self.user_name,
            user_id: self.user_id,
        })
    }
}

/// File-backed store surviving process restarts.
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
}

impl SessionStore for FileStore {
    fn save(&self, session: &Session) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|err| Error::Store(format!("create {}: {err}", parent.display())))?;
            }
        }
        let record = StoredSession::from_session(session);
        let payload = serde_json::to_string_pretty(&record)?;
        fs::write(&self.path, payload)
            .map_err(|err| Error::Store(format!("write {}: {err}", self.path.display())))?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn load(&self) -> Result<Option<Session>, Error> {
        let payload = match fs::read_to_string(&self.path) {
            Ok(payload) => payload,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(Error::Store(format!(
                    "read {}: {err}",
                    self.path.display()
                )));
            }
        };
        // Unparseable or incomplete records count as absent, not as errors.
        let Ok(record) = serde_json::from_str::<StoredSession>(&payload) else {
            debug!(path = %self.path.display(), "discarding unparseable session record");
            return Ok(None);
        };
        Ok(record.into_session())
    }

    fn clear(&self) -> Result<(), Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Error::Store(format!(
                "remove {}: {err}",
                self.path.display()
            ))),
        }
    }
}

/// In-process store for tests and throwaway demo sessions.
#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn save(&self, session: &Session) -> Result<(), Error> {
        let record = StoredSession::from_session(session);
        let payload = serde_json::to_string(&record)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| Error::Store("memory store poisoned".to_string()))?;
        slot.insert("session".to_string(), payload);
        Ok(())
    }

    fn load(&self) -> Result<Option<Session>, Error> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| Error::Store("memory store poisoned".to_string()))?;
        let Some(payload) = slot.get("session") else {
            return Ok(None);
        };
        let Ok(record) = serde_json::from_str::<StoredSession>(payload) else {
            return Ok(None);
        };
        Ok(record.into_session())
    }

    fn clear(&self) -> Result<(), Error> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| Error::Store("memory store poisoned".to_string()))?;
        slot.remove("session");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FileStore, MemoryStore, SessionStore};
    use crate::session::{Role, Session};
    use anyhow::Result;

    fn sample_session() -> Session {
        Session {
            token: "idp_token".to_string(),
            role: Role::VerifiedTeacher,
            email: "grace@example.edu".to_string(),
            name: "Grace".to_string(),
            user_id: "uid-42".to_string(),
        }
    }

    #[test]
    fn file_store_round_trips_session() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FileStore::new(dir.path().join("session.json"));
        let session = sample_session();

        store.save(&session)?;
        assert_eq!(store.load()?, Some(session));
        Ok(())
    }

    #[test]
    fn file_store_persists_original_key_names() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        let store = FileStore::new(&path);
        store.save(&sample_session())?;

        let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        for key in ["authToken", "userRole", "userEmail", "userName", "userId"] {
            assert!(raw.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(raw["userRole"], "verified_teacher");
        Ok(())
    }

    #[test]
    fn file_store_missing_file_loads_absent() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load()?, None);
        Ok(())
    }

    #[test]
    fn file_store_partial_record_loads_absent() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"authToken":"idp_x","userRole":"student"}"#)?;
        let store = FileStore::new(&path);
        assert_eq!(store.load()?, None);
        Ok(())
    }

    #[test]
    fn file_store_unknown_role_loads_absent() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            r#"{"authToken":"t","userRole":"dean","userEmail":"e","userName":"n","userId":"i"}"#,
        )?;
        let store = FileStore::new(&path);
        assert_eq!(store.load()?, None);
        Ok(())
    }

    #[test]
    fn clear_on_empty_store_is_a_noop() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FileStore::new(dir.path().join("session.json"));
        store.clear()?;
        store.clear()?;

        let memory = MemoryStore::new();
        memory.clear()?;
        memory.clear()?;
        Ok(())
    }

    #[test]
    fn save_overwrites_previous_session() -> Result<()> {
        let store = MemoryStore::new();
        let mut session = sample_session();
        store.save(&session)?;

        session.email = "second@example.edu".to_string();
        session.role = Role::Student;
        store.save(&session)?;

        assert_eq!(store.load()?, Some(session));
        Ok(())
    }
}
