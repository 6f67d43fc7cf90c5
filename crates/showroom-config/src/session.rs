// ── Session cache ──
//
// The signed-in user record plus its session cookie, persisted per
// profile in `session.json` so a new process can resume without a
// fresh login.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use showroom_core::User;

use crate::{ConfigError, data_dir};

/// One profile's persisted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedSession {
    /// Backend the cookie was issued by.
    pub server: String,
    pub user: User,
    /// `Cookie` header value.
    pub cookie: String,
}

/// File-backed store of [`CachedSession`]s keyed by profile name.
#[derive(Debug, Clone)]
pub struct SessionCache {
    path: PathBuf,
}

impl SessionCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `session.json` in the platform data directory.
    pub fn default_location() -> Self {
        Self::new(data_dir().join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The profile's session, if one was saved for `server`.
    pub fn load(&self, profile: &str, server: &str) -> Result<Option<CachedSession>, ConfigError> {
        let mut all = self.read_all()?;
        Ok(all.remove(profile).filter(|s| s.server == server))
    }

    pub fn save(&self, profile: &str, session: CachedSession) -> Result<(), ConfigError> {
        let mut all = self.read_all()?;
        all.insert(profile.to_owned(), session);
        self.write_all(&all)
    }

    pub fn clear(&self, profile: &str) -> Result<(), ConfigError> {
        let mut all = self.read_all()?;
        if all.remove(profile).is_some() {
            self.write_all(&all)?;
        }
        Ok(())
    }

    fn read_all(&self) -> Result<BTreeMap<String, CachedSession>, ConfigError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, all: &BTreeMap<String, CachedSession>) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(all)?)?;
        restrict_permissions(&self.path)?;
        debug!(path = %self.path.display(), sessions = all.len(), "session cache written");
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
