//! Credential profile store
//!
//! Profiles live in a single JSON object mapping profile name to auth token.
//! Every operation re-reads the document; nothing is cached between calls.

use crate::error::{ConfigError, Result};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Profile name to auth token
pub type Profiles = BTreeMap<String, String>;

/// A named credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub token: String,
}

impl Profile {
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: token.into(),
        }
    }
}

/// Reads and writes the profile document
///
/// The store holds only the document path. Concurrent invocations are not
/// coordinated: the last write wins. A document that exists but does not
/// parse is reported as [`ConfigError::Decode`] and is never overwritten by
/// `save` or `delete`.
///
/// ```ignore
/// let store = ProfileStore::open_default()?;
/// store.save(&Profile::new("work", token))?;
/// assert_eq!(store.get_token("work")?, token);
/// ```
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Store backed by `profiles.json` in the user's config directory
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(crate::profiles_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all profiles. A missing document is an empty mapping.
    pub fn load(&self) -> Result<Profiles> {
        if !self.path.exists() {
            tracing::debug!("Profile document not found, returning empty set");
            return Ok(Profiles::new());
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|e| ConfigError::io(&self.path, e))?;
        let profiles: Profiles =
            serde_json::from_str(&content).map_err(|source| ConfigError::Decode {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!("Loaded {} profile(s)", profiles.len());
        Ok(profiles)
    }

    /// Get the auth token stored under `name`
    pub fn get_token(&self, name: &str) -> Result<String> {
        self.load()?
            .remove(name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }

    /// Insert or replace a profile
    pub fn save(&self, profile: &Profile) -> Result<()> {
        if profile.name.is_empty() {
            return Err(ConfigError::InvalidProfile(
                "profile name cannot be empty".to_string(),
            ));
        }
        if profile.token.is_empty() {
            return Err(ConfigError::InvalidProfile(
                "token cannot be empty".to_string(),
            ));
        }

        let mut profiles = self.load()?;
        profiles.insert(profile.name.clone(), profile.token.clone());
        self.write(&profiles)?;

        tracing::info!("Saved profile {}", profile.name);
        Ok(())
    }

    /// Remove a profile. The document is left untouched when `name` is absent.
    pub fn delete(&self, name: &str) -> Result<()> {
        let mut profiles = self.load()?;
        if profiles.remove(name).is_none() {
            return Err(ConfigError::ProfileNotFound(name.to_string()));
        }
        self.write(&profiles)?;

        tracing::info!("Deleted profile {}", name);
        Ok(())
    }

    /// All profiles, for display
    pub fn list(&self) -> Result<Profiles> {
        self.load()
    }

    /// Replace the document via a temp file in the same directory, so an
    /// interrupted write never leaves a truncated document behind.
    fn write(&self, profiles: &Profiles) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::io(&dir, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| ConfigError::io(&dir, e))?;
        serde_json::to_writer_pretty(&mut tmp, profiles)?;
        tmp.flush().map_err(|e| ConfigError::io(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| ConfigError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| ConfigError::io(&self.path, e.error))?;

        tracing::debug!(
            "Wrote {} profile(s) to {}",
            profiles.len(),
            self.path.display()
        );
        Ok(())
    }
}
