//! maze-cli configuration
//!
//! Resolves the per-user configuration directory and owns the credential
//! profile document stored inside it.

pub mod error;
pub mod profile;

pub use error::*;
pub use profile::{Profile, ProfileStore, Profiles};

use std::path::PathBuf;

/// Environment variable that replaces `~/.maze` as the configuration directory
pub const CONFIG_DIR_ENV: &str = "MAZE_CONFIG_DIR";

const CONFIG_DIR_NAME: &str = ".maze";
const PROFILES_FILE: &str = "profiles.json";

/// Get the maze configuration directory, creating it if needed.
///
/// `MAZE_CONFIG_DIR` takes precedence over `~/.maze`.
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .ok_or(ConfigError::HomeDirNotFound)?
            .join(CONFIG_DIR_NAME),
    };

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::io(&config_dir, e))?;
        tracing::debug!("Created config directory: {}", config_dir.display());
    }

    Ok(config_dir)
}

/// Path of the profile document inside the configuration directory
pub fn profiles_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(PROFILES_FILE))
}
