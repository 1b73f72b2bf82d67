//! Authenticated session state.
//!
//! The session (tokens plus the signed-in user) lives in a [`SessionHandle`]
//! created once at startup from [`SessionStore::load`] and passed explicitly
//! to whatever needs it. Changes made through the handle are written through
//! to the store so the session survives restarts.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretBox};
use serde::{Deserialize, Serialize};

use crate::config::config_dir;
use crate::error::Result;
use crate::types::User;

/// Tokens and user for the signed-in account
pub struct Session {
    access_token: SecretBox<String>,
    refresh_token: SecretBox<String>,
    pub user: User,
}

impl Session {
    pub fn new(access_token: String, refresh_token: String, user: User) -> Self {
        Self {
            access_token: SecretBox::new(Box::new(access_token)),
            refresh_token: SecretBox::new(Box::new(refresh_token)),
            user,
        }
    }

    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    pub fn refresh_token(&self) -> &str {
        self.refresh_token.expose_secret()
    }

    fn to_stored(&self) -> StoredSession {
        StoredSession {
            access_token: self.access_token().to_string(),
            refresh_token: self.refresh_token().to_string(),
            user: self.user.clone(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// On-disk shape of a session
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    access_token: String,
    refresh_token: String,
    user: User,
}

/// Persists the session between runs
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the standard config directory
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(config_dir()?))
    }

    pub fn session_path(&self) -> PathBuf {
        self.dir.join("session.json")
    }

    fn pending_route_path(&self) -> PathBuf {
        self.dir.join("pending_route")
    }

    /// Read the saved session. A missing file is no session; an unreadable
    /// one is discarded with a warning.
    pub fn load(&self) -> Result<Option<Session>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        match serde_json::from_str::<StoredSession>(&content) {
            Ok(stored) => {
                tracing::debug!(user = %stored.user.email, "session loaded");
                Ok(Some(Session::new(
                    stored.access_token,
                    stored.refresh_token,
                    stored.user,
                )))
            }
            Err(e) => {
                tracing::warn!("ignoring unreadable session file {}: {e}", path.display());
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.session_path();
        let content = serde_json::to_string_pretty(&session.to_stored())?;
        let mut file = open_private(&path)?;
        restrict_permissions(&path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("session cleared");
        }
        Ok(())
    }

    /// Remember a route that was requested without a session
    pub fn remember_route(&self, route: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.pending_route_path(), route)?;
        Ok(())
    }

    /// Take the remembered route, if any
    pub fn take_route(&self) -> Result<Option<String>> {
        let path = self.pending_route_path();
        if !path.exists() {
            return Ok(None);
        }
        let route = fs::read_to_string(&path)?.trim().to_string();
        fs::remove_file(&path)?;
        Ok((!route.is_empty()).then_some(route))
    }
}

/// Open `path` for writing; a new file is created owner-only
#[cfg(unix)]
fn open_private(path: &Path) -> Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    Ok(fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> Result<fs::File> {
    Ok(fs::File::create(path)?)
}

// A file left over from an older run keeps its mode on open
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

struct SessionInner {
    store: Option<SessionStore>,
    session: RwLock<Option<Session>>,
}

/// Shared application session state
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<SessionInner>,
}

impl SessionHandle {
    /// Initialize from the store
    pub fn load(store: SessionStore) -> Result<Self> {
        let session = store.load()?;
        Ok(Self {
            inner: Arc::new(SessionInner {
                store: Some(store),
                session: RwLock::new(session),
            }),
        })
    }

    /// A handle that is never persisted
    pub fn in_memory(session: Option<Session>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                store: None,
                session: RwLock::new(session),
            }),
        }
    }

    pub fn store(&self) -> Option<&SessionStore> {
        self.inner.store.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.session.read().is_some()
    }

    /// Role for access checks: `None` without a session, `Some("")` for a
    /// signed-in user the backend gave no role.
    pub fn role(&self) -> Option<String> {
        self.inner
            .session
            .read()
            .as_ref()
            .map(|s| s.user.role.clone().unwrap_or_default())
    }

    /// The signed-in user, if any
    pub fn current(&self) -> Option<User> {
        self.inner.session.read().as_ref().map(|s| s.user.clone())
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner
            .session
            .read()
            .as_ref()
            .map(|s| s.access_token().to_string())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.inner
            .session
            .read()
            .as_ref()
            .map(|s| s.refresh_token().to_string())
    }

    /// Replace the session (after login)
    pub fn set(&self, session: Session) -> Result<()> {
        if let Some(store) = &self.inner.store {
            store.save(&session)?;
        }
        *self.inner.session.write() = Some(session);
        Ok(())
    }

    /// Swap in refreshed tokens, keeping the refresh token when the server
    /// did not rotate it. Does nothing without a session.
    pub fn update_tokens(&self, access_token: String, refresh_token: Option<String>) -> Result<()> {
        let mut guard = self.inner.session.write();
        let Some(current) = guard.as_ref() else {
            return Ok(());
        };
        let refresh = refresh_token.unwrap_or_else(|| current.refresh_token().to_string());
        let updated = Session::new(access_token, refresh, current.user.clone());
        if let Some(store) = &self.inner.store {
            store.save(&updated)?;
        }
        *guard = Some(updated);
        Ok(())
    }

    /// Drop the session in memory and on disk
    pub fn clear(&self) -> Result<()> {
        *self.inner.session.write() = None;
        if let Some(store) = &self.inner.store {
            store.clear()?;
        }
        Ok(())
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("authenticated", &self.is_authenticated())
            .field("store", &self.inner.store)
            .finish()
    }
}
