// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session state: the token pair, the signed-in user, and role/permission
//! sets, persisted across restarts as a single JSON document.
//!
//! The store is the only writer of persisted state. Everything else reads
//! through accessors.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The signed-in user as returned by the login and profile endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(deserialize_with = "de::id_string")]
    pub id: String,
    #[serde(alias = "userName")]
    pub username: String,
    pub full_name: String,
    pub email: String,
    /// Some endpoints send a single role, others an array. Always an array
    /// here; nothing downstream branches on the wire shape.
    #[serde(alias = "role", deserialize_with = "de::string_or_seq")]
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

/// Everything the client holds about the authenticated session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserProfile>,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// Owner of the in-memory session and its persisted copy.
pub struct SessionStore {
    session: RwLock<Session>,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Open a store backed by `dir/session.json`, seeding the in-memory
    /// session from disk. A missing or malformed file is an empty session,
    /// never an error.
    pub fn open(dir: &Path) -> Self {
        let path = dir.join("session.json");
        let session = load(&path);
        Self { session: RwLock::new(session), path: Some(path) }
    }

    /// In-memory only store (tests, one-shot commands).
    pub fn ephemeral() -> Self {
        Self { session: RwLock::new(Session::default()), path: None }
    }

    /// Snapshot of the current session. No I/O.
    pub fn current(&self) -> Session {
        self.session.read().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.session.read().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.session.read().refresh_token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    /// Replace the session and persist all fields together. Partial writes
    /// are not a thing: the whole document goes out in one atomic rename.
    pub fn save(&self, session: Session) {
        *self.session.write() = session.clone();
        if let Some(ref path) = self.path {
            if let Err(e) = persist(path, &session) {
                warn!(err = %e, "failed to persist session");
            }
        }
    }

    /// Rotate the token pair after a successful refresh. A missing new
    /// refresh token keeps the old one.
    pub fn update_tokens(&self, access_token: String, refresh_token: Option<String>) {
        let mut session = self.current();
        session.access_token = Some(access_token);
        if refresh_token.is_some() {
            session.refresh_token = refresh_token;
        }
        self.save(session);
    }

    /// Drop the in-memory session and remove the persisted file. Idempotent.
    pub fn clear(&self) {
        *self.session.write() = Session::default();
        if let Some(ref path) = self.path {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(err = %e, "failed to remove session file");
                }
            }
        }
    }
}

/// Read a persisted session; absent fields default, malformed JSON is absent.
fn load(path: &Path) -> Session {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
        Err(_) => Session::default(),
    }
}

/// Save the session atomically (write tmp + rename).
///
/// Uses a unique temp filename (PID + counter) to avoid corruption when
/// concurrent saves race on the same `.tmp` file.
fn persist(path: &Path, session: &Session) -> anyhow::Result<()> {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    if let Some(dir) = path.parent() {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let json = serde_json::to_string_pretty(session)?;
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(
        "{}.{}.{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy(),
        std::process::id(),
        seq,
    );
    let tmp_path = path.with_file_name(tmp_name);
    std::fs::write(&tmp_path, json)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Resolve the state directory for session data.
///
/// Checks `REGISTRAR_STATE_DIR`, then `$XDG_STATE_HOME/registrar`,
/// then `$HOME/.local/state/registrar`.
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("REGISTRAR_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("registrar");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local/state/registrar");
    }
    PathBuf::from(".registrar")
}

mod de {
    use serde::{Deserialize, Deserializer};

    /// Accept `"Teacher"`, `["Teacher", "Staff"]`, or nothing at all.
    pub fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            One(String),
            Many(Vec<String>),
        }
        match Option::<Shape>::deserialize(deserializer)? {
            Some(Shape::One(role)) => Ok(vec![role]),
            Some(Shape::Many(roles)) => Ok(roles),
            None => Ok(Vec::new()),
        }
    }

    /// Accept a string or numeric id.
    pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Text(String),
            Number(i64),
        }
        match Option::<Shape>::deserialize(deserializer)? {
            Some(Shape::Text(id)) => Ok(id),
            Some(Shape::Number(id)) => Ok(id.to_string()),
            None => Ok(String::new()),
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
