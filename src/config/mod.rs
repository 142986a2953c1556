//! User configuration for `pyticket`.
//!
//! Configuration is a JSON object stored at `$PYTICKET_HOME/config.json`
//! (`~/.pyticket/config.json` by default). Only keys in [`ALLOWED_KEYS`]
//! may appear in it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{CliError, Result};

pub const HOME_ENV_VAR: &str = "PYTICKET_HOME";
pub const CONFIG_FILE: &str = "config.json";
pub const ALLOWED_KEYS: &[&str] = &["editor"];
pub const DEFAULT_EDITOR: &str = "nano";

/// Resolve the user's home directory from `HOME`, then `USERPROFILE`.
#[must_use]
pub fn resolve_user_home_dir() -> Option<PathBuf> {
    ["HOME", "USERPROFILE"].into_iter().find_map(|var| {
        std::env::var(var)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
}

/// Resolve the pyticket home: `PYTICKET_HOME`, else `~/.pyticket`.
#[must_use]
pub fn resolve_pyticket_home_dir() -> Option<PathBuf> {
    if let Ok(value) = std::env::var(HOME_ENV_VAR) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    resolve_user_home_dir().map(|home| home.join(".pyticket"))
}

/// Like [`resolve_pyticket_home_dir`], failing when no home can be found.
///
/// # Errors
///
/// Returns `HomeNotFound` if neither `PYTICKET_HOME` nor a home directory is set.
pub fn pyticket_home_dir() -> Result<PathBuf> {
    resolve_pyticket_home_dir().ok_or(CliError::HomeNotFound)
}

#[must_use]
pub fn config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_FILE)
}

fn check_key(key: &str) -> Result<()> {
    if ALLOWED_KEYS.contains(&key) {
        Ok(())
    } else {
        Err(CliError::InvalidConfigKey {
            key: key.to_string(),
        })
    }
}

/// User configuration values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Configuration {
    values: BTreeMap<String, String>,
}

impl Configuration {
    /// Build a configuration, rejecting keys outside the allow-list.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfigKey` for the first unknown key.
    pub fn from_values(values: BTreeMap<String, String>) -> Result<Self> {
        for key in values.keys() {
            check_key(key)?;
        }
        Ok(Self { values })
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set an allowed key.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfigKey` if `key` is not allowed.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        check_key(key)?;
        self.values.insert(key.to_string(), value.into());
        Ok(())
    }

    #[must_use]
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Load `config.json` from `home`. A missing file is an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` if the file is not a JSON object of strings,
    /// `InvalidConfigKey` if it holds an unknown key, or `Io`.
    pub fn load(home: &Path) -> Result<Self> {
        let path = config_path(home);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)?;
        let values: BTreeMap<String, String> =
            serde_json::from_str(&raw).map_err(|e| CliError::ConfigParse {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        Self::from_values(values)
    }

    /// Save as `config.json` in `home`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `Io` or `Json` on write failure.
    pub fn save(&self, home: &Path) -> Result<()> {
        fs::create_dir_all(home)?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(config_path(home), json)?;
        tracing::debug!("Saved configuration to {}", config_path(home).display());
        Ok(())
    }

    /// Editor command, falling back to `$VISUAL`, `$EDITOR`, then `nano`.
    #[must_use]
    pub fn editor(&self) -> String {
        self.editor_with_env(|var| std::env::var(var).ok())
    }

    fn editor_with_env(&self, env: impl Fn(&str) -> Option<String>) -> String {
        self.get("editor")
            .map(str::to_string)
            .or_else(|| env("VISUAL"))
            .or_else(|| env("EDITOR"))
            .filter(|editor| !editor.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
    }
}

/// Write the default configuration if `home` doesn't exist yet.
///
/// Returns true when the configuration was created.
///
/// # Errors
///
/// Returns `Io` if the directory or file cannot be written.
pub fn seed_home(home: &Path) -> Result<bool> {
    if home.is_dir() {
        return Ok(false);
    }
    let mut config = Configuration::default();
    config.set_value("editor", DEFAULT_EDITOR)?;
    config.save(home)?;
    Ok(true)
}
