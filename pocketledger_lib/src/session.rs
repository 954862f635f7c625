//! Session token storage and the read-only view derived from it.
//!
//! The token is opaque to this crate: it is decoded only to show who is signed
//! in, never to decide what the user may do. [`SessionStore::logout`] is the
//! single invalidation entry point.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::FinanceError;

/// Display-only details decoded from the session token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPreferences {
    pub username: Option<String>,
    pub email: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct Claims {
    username: Option<String>,
    name: Option<String>,
    email: Option<String>,
    exp: Option<i64>,
}

/// Holds the current session token, optionally persisted to a file.
pub struct SessionStore {
    path: Option<PathBuf>,
    token: RwLock<Option<String>>,
}

impl SessionStore {
    /// Loads the session persisted at `path`, if any.
    pub fn from_file(path: &Path) -> Result<Self, FinanceError> {
        let token = match fs::read_to_string(path) {
            Ok(raw) => Some(raw.trim().to_string()).filter(|t| !t.is_empty()),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: Some(path.to_path_buf()),
            token: RwLock::new(token),
        })
    }

    /// A store that is never written to disk.
    pub fn in_memory(token: Option<String>) -> Self {
        Self {
            path: None,
            token: RwLock::new(token),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Stores a freshly issued token.
    pub fn login(&self, token: &str) -> Result<(), FinanceError> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            write_private(path, token)?;
        }
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    /// Drops the session. Calling it with no session is a no-op.
    pub fn logout(&self) -> Result<(), FinanceError> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        if let Some(path) = &self.path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        tracing::debug!("Session cleared");
        Ok(())
    }

    /// Decodes the token payload for display. Opaque tokens yield defaults.
    pub fn preferences(&self) -> Option<SessionPreferences> {
        self.token().map(|token| decode_preferences(&token))
    }
}

/// Writes the token readable by the owner only.
fn write_private(path: &Path, token: &str) -> Result<(), FinanceError> {
    #[cfg(unix)]
    {
        use std::fs::OpenOptions;
        use std::io::Write;
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        // `mode` only applies on creation; an older file may be wider.
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(token.as_bytes())?;
    }

    #[cfg(not(unix))]
    {
        fs::write(path, token)?;
    }

    Ok(())
}

fn decode_preferences(token: &str) -> SessionPreferences {
    let Some(payload) = token.split('.').nth(1) else {
        return SessionPreferences::default();
    };
    let claims = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()
        .and_then(|bytes| serde_json::from_slice::<Claims>(&bytes).ok());
    match claims {
        Some(claims) => SessionPreferences {
            username: claims.username.or(claims.name),
            email: claims.email,
            expires_at: claims.exp.and_then(|exp| DateTime::from_timestamp(exp, 0)),
        },
        None => SessionPreferences::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(payload: serde_json::Value) -> String {
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap());
        format!("eyJhbGciOiJIUzI1NiJ9.{}.signature", body)
    }

    #[test]
    fn decodes_display_claims() {
        let store = SessionStore::in_memory(Some(jwt(serde_json::json!({
            "username": "ana",
            "email": "ana@example.com",
            "exp": 1_700_000_000
        }))));
        let prefs = store.preferences().unwrap();
        assert_eq!(prefs.username.as_deref(), Some("ana"));
        assert_eq!(prefs.email.as_deref(), Some("ana@example.com"));
        assert_eq!(prefs.expires_at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn falls_back_to_name_claim() {
        let store = SessionStore::in_memory(Some(jwt(serde_json::json!({ "name": "Ana" }))));
        assert_eq!(store.preferences().unwrap().username.as_deref(), Some("Ana"));
    }

    #[test]
    fn opaque_token_yields_empty_preferences() {
        let store = SessionStore::in_memory(Some("not-a-jwt".to_string()));
        assert_eq!(store.preferences(), Some(SessionPreferences::default()));
    }

    #[test]
    fn no_session_has_no_preferences() {
        assert_eq!(SessionStore::in_memory(None).preferences(), None);
    }

    #[test]
    fn login_and_logout_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session");

        let store = SessionStore::from_file(&path).unwrap();
        assert!(!store.is_authenticated());

        store.login("tok-1").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "tok-1");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        let reloaded = SessionStore::from_file(&path).unwrap();
        assert_eq!(reloaded.token().as_deref(), Some("tok-1"));

        reloaded.logout().unwrap();
        assert!(!path.exists());
        assert!(!reloaded.is_authenticated());
    }

    #[cfg(unix)]
    #[test]
    fn login_tightens_existing_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        SessionStore::from_file(&path).unwrap().login("tok-2").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(fs::read_to_string(&path).unwrap(), "tok-2");
    }

    #[test]
    fn logout_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::from_file(&dir.path().join("session")).unwrap();
        store.logout().unwrap();
        store.logout().unwrap();
    }
}
