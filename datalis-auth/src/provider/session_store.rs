use crate::common::Session;
use crate::error::AuthError;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

const SESSION_FILE: &str = "session.json";
const STAGING_FILE: &str = "session.json.tmp";

/// Keeps the signed-in session on disk so a restart doesn't sign the user out.
///
/// The file holds a refresh token, so it is created owner-only and replaced
/// by rename: readers see either the old session or the new one, never a
/// half-written file or one with default permissions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Store under `<cache_dir>/datalis`.
    pub fn new() -> Result<Self, AuthError> {
        let cache_dir = dirs::cache_dir().ok_or_else(|| {
            AuthError::Configuration("No cache directory for the session file".to_string())
        })?;
        Self::in_dir(&cache_dir.join("datalis"))
    }

    pub fn in_dir(dir: &Path) -> Result<Self, AuthError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    pub fn save(&self, session: &Session) -> Result<(), AuthError> {
        let json = serde_json::to_vec_pretty(session)?;
        let staging = self.dir.join(STAGING_FILE);

        // A leftover from an interrupted save may carry other permissions.
        remove_if_present(&staging)?;

        let mut file = create_private(&staging)?;
        file.write_all(&json)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&staging, self.path())?;
        Ok(())
    }

    pub fn load(&self) -> Result<Option<Session>, AuthError> {
        let bytes = match fs::read(self.path()) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| AuthError::SessionStorage(format!("Stored session is unreadable: {}", e)))
    }

    pub fn delete(&self) -> Result<(), AuthError> {
        remove_if_present(&self.path())?;
        Ok(())
    }
}

#[cfg(unix)]
fn create_private(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::User;
    use chrono::{Duration, Utc};

    fn session(access_token: &str) -> Session {
        Session {
            access_token: access_token.to_string(),
            refresh_token: "refresh".to_string(),
            token_type: "bearer".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
            user: User {
                id: "user-1".to_string(),
                email: Some("ana@example.com".to_string()),
                email_confirmed_at: None,
                user_metadata: Default::default(),
            },
        }
    }

    #[test]
    fn save_then_load_restores_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path()).unwrap();
        assert!(store.load().unwrap().is_none());

        let saved = session("access");
        store.save(&saved).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token, saved.access_token);
        assert_eq!(loaded.user.id, "user-1");
        assert_eq!(loaded.expires_at.timestamp(), saved.expires_at.timestamp());

        store.delete().unwrap();
        assert!(store.load().unwrap().is_none());
        // Deleting twice is fine.
        store.delete().unwrap();
    }

    #[test]
    fn save_replaces_previous_session_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(&dir.path().join("nested")).unwrap();

        store.save(&session("first")).unwrap();
        store.save(&session("second")).unwrap();

        assert_eq!(store.load().unwrap().unwrap().access_token, "second");
        let names: Vec<_> = fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![SESSION_FILE]);
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.load(), Err(AuthError::SessionStorage(_))));
    }

    #[cfg(unix)]
    #[test]
    fn saved_session_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path()).unwrap();

        // A stale staging file left world-readable by an interrupted save.
        let staging = dir.path().join(STAGING_FILE);
        fs::write(&staging, "stale").unwrap();
        fs::set_permissions(&staging, fs::Permissions::from_mode(0o644)).unwrap();

        store.save(&session("access")).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!staging.exists());
    }
}
