//! Atomic persistence of the session file.
//!
//! The session file is the cookie analog: it keeps the signed-in identity
//! across process restarts. Writes go through a temp file, fsync, and
//! rename so a crash never leaves a corrupt file behind.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::auth::error::AuthError;
use crate::auth::types::Session;

/// Current schema version of the session file.
pub const SESSION_SCHEMA_VERSION: u32 = 1;

/// On-disk shape of the session file.
#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    schema_version: u32,
    session: Session,
}

/// Load the persisted session, if any.
///
/// A missing file means "signed out" and is not an error. A present but
/// unreadable or wrong-schema file is reported as [`AuthError::Persist`];
/// callers typically discard it and continue signed out.
pub fn load_session(path: &Path) -> Result<Option<Session>, AuthError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path).map_err(|e| {
        AuthError::Persist(format!("failed to read session file '{}': {e}", path.display()))
    })?;
    let file: SessionFile = toml::from_str(&contents).map_err(|e| {
        AuthError::Persist(format!(
            "failed to parse session file '{}': {e}",
            path.display()
        ))
    })?;
    if file.schema_version != SESSION_SCHEMA_VERSION {
        return Err(AuthError::Persist(format!(
            "unsupported session schema version {}",
            file.schema_version
        )));
    }
    Ok(Some(file.session))
}

/// Write the session file atomically (temp file → fsync → rename).
pub fn store_session(path: &Path, session: &Session) -> Result<(), AuthError> {
    let file = SessionFile {
        schema_version: SESSION_SCHEMA_VERSION,
        session: session.clone(),
    };
    let toml_text = toml::to_string_pretty(&file)
        .map_err(|e| AuthError::Persist(format!("failed to serialize session: {e}")))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            AuthError::Persist(format!(
                "failed to create session directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let tmp_path = path.with_extension("toml.tmp");
    let mut tmp = std::fs::File::create(&tmp_path).map_err(|e| {
        AuthError::Persist(format!(
            "failed to create temp file '{}': {e}",
            tmp_path.display()
        ))
    })?;
    tmp.write_all(toml_text.as_bytes())
        .map_err(|e| AuthError::Persist(format!("failed to write temp file: {e}")))?;
    tmp.sync_all()
        .map_err(|e| AuthError::Persist(format!("failed to sync temp file: {e}")))?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        AuthError::Persist(format!(
            "failed to rename '{}' to '{}': {e}",
            tmp_path.display(),
            path.display()
        ))
    })
}

/// Remove the session file. Missing files are fine.
pub fn clear_session(path: &Path) -> Result<(), AuthError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AuthError::Persist(format!(
            "failed to remove session file '{}': {e}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::SessionUser;

    fn sample_session() -> Session {
        Session {
            user: SessionUser {
                id: "user-1".into(),
                email: "a@example.com".into(),
            },
            access_token: "jwt".into(),
            refresh_token: "refresh".into(),
        }
    }

    fn make_test_dir() -> tempfile::TempDir {
        match tempfile::tempdir() {
            Ok(d) => d,
            Err(_) => unreachable!("tempdir creation should not fail"),
        }
    }

    #[test]
    fn missing_file_is_signed_out() {
        let dir = make_test_dir();
        let loaded = load_session(&dir.path().join("session.toml"));
        assert!(matches!(loaded, Ok(None)));
    }

    #[test]
    fn store_and_load_round_trip() {
        let dir = make_test_dir();
        let path = dir.path().join("nested").join("session.toml");
        let session = sample_session();
        assert!(store_session(&path, &session).is_ok());
        let loaded = load_session(&path);
        assert!(matches!(loaded, Ok(Some(ref s)) if *s == session));
    }

    #[test]
    fn corrupt_file_reported_as_persist_error() {
        let dir = make_test_dir();
        let path = dir.path().join("session.toml");
        assert!(std::fs::write(&path, "not = [valid").is_ok());
        let loaded = load_session(&path);
        assert!(matches!(loaded, Err(AuthError::Persist(_))));
    }

    #[test]
    fn wrong_schema_version_rejected() {
        let dir = make_test_dir();
        let path = dir.path().join("session.toml");
        let text = concat!(
            "schema_version = 99\n\n",
            "[session]\n",
            "access_token = \"jwt\"\n",
            "refresh_token = \"refresh\"\n\n",
            "[session.user]\n",
            "id = \"user-1\"\n",
            "email = \"a@example.com\"\n",
        );
        assert!(std::fs::write(&path, text).is_ok());
        let loaded = load_session(&path);
        assert!(matches!(loaded, Err(AuthError::Persist(_))));
    }

    #[test]
    fn clear_removes_file_and_tolerates_missing() {
        let dir = make_test_dir();
        let path = dir.path().join("session.toml");
        assert!(store_session(&path, &sample_session()).is_ok());
        assert!(clear_session(&path).is_ok());
        assert!(!path.exists());
        // second clear is a no-op
        assert!(clear_session(&path).is_ok());
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = make_test_dir();
        let path = dir.path().join("session.toml");
        assert!(store_session(&path, &sample_session()).is_ok());
        assert!(!dir.path().join("session.toml.tmp").exists());
    }
}
