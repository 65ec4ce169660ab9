//! Per-profile user identity, persisted as a small JSON file.
//!
//! The identity is created once on first load and immutable afterwards;
//! every session started against the same data dir re-hydrates the same
//! user. An explicit store keeps the session controller free of hidden
//! coupling to a global key-value namespace.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::info;

use fileshare_shared::constants::APP_NAME;
use fileshare_shared::User;

use crate::error::{ClientError, Result};

const PROFILE_FILE: &str = "profile.json";

/// File-backed identity store.
#[derive(Debug, Clone)]
pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    /// Store rooted at an explicit data directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(PROFILE_FILE),
        }
    }

    /// Store rooted at the platform data directory.
    pub fn open_default() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", APP_NAME).ok_or(ClientError::NoDataDir)?;
        std::fs::create_dir_all(dirs.data_dir())?;
        Ok(Self::in_dir(dirs.data_dir()))
    }

    /// Load the persisted profile, or `None` on first run.
    pub fn load(&self) -> Result<Option<User>> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, user: &User) -> Result<()> {
        std::fs::write(&self.path, serde_json::to_string_pretty(user)?)?;
        Ok(())
    }

    /// Re-hydrate the profile, generating and persisting one on first run.
    pub fn load_or_create(&self) -> Result<User> {
        if let Some(user) = self.load()? {
            return Ok(user);
        }
        let user = User::random();
        self.save(&user)?;
        info!(user_id = %user.id, name = %user.name, "Created new profile");
        Ok(user)
    }
}
