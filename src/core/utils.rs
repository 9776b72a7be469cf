use dirs::home_dir;
use tempfile::NamedTempFile;
use std::{
    env, fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::Result;

const DEFAULT_DIR_NAME: &str = ".recurring_core";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";

pub const HOME_ENV: &str = "RECURRING_CORE_HOME";

/// Resolves application directories, honouring `RECURRING_CORE_HOME`.
pub struct PathResolver;

impl PathResolver {
    /// Returns the application data directory, defaulting to `~/.recurring_core`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn config_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Writes `data` to a fresh temp file beside `path` and renames it into place.
///
/// Every call gets its own temp file, so concurrent writers never share one.
pub fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
