use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::{
        scheduler::DEFAULT_MAX_CATCH_UP,
        utils::{ensure_dir, write_atomic, PathResolver},
    },
    errors::{RecurrenceError, Result},
    ledger::DEFAULT_PENDING_WINDOW_DAYS,
};

const DEFAULT_STORE_FILE: &str = "recurring.json";
pub const MAX_PENDING_WINDOW_DAYS: i64 = 3660;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_max_catch_up")]
    pub max_catch_up: u32,
    #[serde(default = "default_pending_window_days")]
    pub pending_window_days: i64,
    #[serde(default = "default_store_file")]
    pub store_file: String,
}

fn default_max_catch_up() -> u32 {
    DEFAULT_MAX_CATCH_UP
}

fn default_pending_window_days() -> i64 {
    DEFAULT_PENDING_WINDOW_DAYS
}

fn default_store_file() -> String {
    DEFAULT_STORE_FILE.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_catch_up: default_max_catch_up(),
            pending_window_days: default_pending_window_days(),
            store_file: default_store_file(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.max_catch_up == 0 {
            return Err(RecurrenceError::Validation(
                "max_catch_up must be at least 1".into(),
            ));
        }
        if !(0..=MAX_PENDING_WINDOW_DAYS).contains(&self.pending_window_days) {
            return Err(RecurrenceError::Validation(format!(
                "pending_window_days must be between 0 and {}",
                MAX_PENDING_WINDOW_DAYS
            )));
        }
        if self.store_file.trim().is_empty() {
            return Err(RecurrenceError::Validation(
                "store_file must not be empty".into(),
            ));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: Config = serde_json::from_str(&data)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    /// Resolves the store file against the base directory unless it is absolute.
    pub fn store_path(&self, config: &Config) -> PathBuf {
        let candidate = Path::new(&config.store_file);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.base.join(candidate)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }
}
