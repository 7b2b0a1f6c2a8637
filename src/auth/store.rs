use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tracing::debug;

/// Storage key for the bearer token
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Storage key for the serialized user record
pub const AUTH_USER_KEY: &str = "authUser";

/// Session file name in the config directory
const SESSION_FILE: &str = "session.json";

/// Application name used for the default session file path
const APP_NAME: &str = "tastegrow";

/// Key-value store for the session credential.
///
/// Holds the bearer token and the serialized user record under fixed keys,
/// cleared together on teardown. Clone is cheap - clones share the same
/// underlying entries, so the request wrapper and the host observe one
/// session.
#[derive(Clone)]
pub struct SessionStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Create a store with no backing file. Used by hosts that manage
    /// persistence themselves, and in tests.
    pub fn in_memory() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            path: None,
        }
    }

    /// Open a file-backed store, loading any existing session.
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .context("Failed to read session file")?;
            serde_json::from_str(&contents)
                .context("Failed to parse session file")?
        } else {
            HashMap::new()
        };

        Ok(Self {
            entries: Arc::new(Mutex::new(entries)),
            path: Some(path),
        })
    }

    /// Open the store at the default location
    /// (`<config_dir>/tastegrow/session.json`).
    pub fn open_default() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Self::open(config_dir.join(APP_NAME).join(SESSION_FILE))
    }

    /// Get the bearer token, if a session exists
    pub fn token(&self) -> Option<String> {
        self.get(AUTH_TOKEN_KEY)
    }

    /// Get the serialized user record, if a session exists
    pub fn user(&self) -> Option<String> {
        self.get(AUTH_USER_KEY)
    }

    /// Whether a bearer token is currently stored
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Store a new session: token and user record together.
    pub fn set_session(&self, token: &str, user: &serde_json::Value) -> Result<()> {
        let mut entries = self.lock();
        entries.insert(AUTH_TOKEN_KEY.to_string(), token.to_string());
        entries.insert(AUTH_USER_KEY.to_string(), user.to_string());
        self.persist(&entries)
    }

    /// Clear the session: both entries removed together.
    ///
    /// Removing absent keys is a no-op, so concurrent clears racing on the
    /// same store are harmless.
    pub fn clear(&self) -> Result<()> {
        let mut entries = self.lock();
        entries.remove(AUTH_TOKEN_KEY);
        entries.remove(AUTH_USER_KEY);
        debug!("session storage cleared");
        self.persist(&entries)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned lock means a panic mid-insert/remove; the map itself is
        // still a valid string map, so continue with it.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };

        if entries.is_empty() {
            if path.exists() {
                std::fs::remove_file(path).context("Failed to remove session file")?;
            }
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(path, contents).context("Failed to write session file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_get_session() {
        let store = SessionStore::in_memory();
        assert!(!store.is_authenticated());

        store
            .set_session("abc", &json!({"id": 1, "email": "admin@tastegrow.org"}))
            .unwrap();

        assert_eq!(store.token().as_deref(), Some("abc"));
        assert!(store.user().unwrap().contains("admin@tastegrow.org"));
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_clear_removes_both_entries() {
        let store = SessionStore::in_memory();
        store.set_session("abc", &json!({"id": 1})).unwrap();

        store.clear().unwrap();

        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = SessionStore::in_memory();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_clones_share_entries() {
        let store = SessionStore::in_memory();
        let view = store.clone();

        store.set_session("abc", &json!({"id": 1})).unwrap();
        assert_eq!(view.token().as_deref(), Some("abc"));

        view.clear().unwrap();
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_file_backed_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::open(path.clone()).unwrap();
        store.set_session("abc", &json!({"id": 7})).unwrap();
        assert!(path.exists());

        let reopened = SessionStore::open(path.clone()).unwrap();
        assert_eq!(reopened.token().as_deref(), Some("abc"));

        reopened.clear().unwrap();
        assert!(!path.exists());

        // Clearing again with no file present must not fail
        reopened.clear().unwrap();
    }
}
