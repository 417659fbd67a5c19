//! TOML file preference store

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::application::ports::PreferenceStore;
use crate::domain::config::{PrefKey, PreferenceValue, Preferences};
use crate::domain::error::PreferenceError;

/// Flat TOML preference file under the XDG config directory
pub struct TomlPreferenceStore {
    path: PathBuf,
}

impl TomlPreferenceStore {
    /// Create a store at `$XDG_CONFIG_HOME/volux/preferences.toml`
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("volux");

        Self {
            path: config_dir.join("preferences.toml"),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.path.clone()
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write every key at its default. Fails if the file already exists.
    pub fn init(&self) -> Result<(), PreferenceError> {
        if self.exists() {
            return Err(PreferenceError::AlreadyExists(
                self.path.to_string_lossy().to_string(),
            ));
        }
        self.save(&Preferences::defaults())
    }

    /// Replace the whole file
    pub fn save(&self, prefs: &Preferences) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| PreferenceError::WriteError(e.to_string()))?;
        }

        let content = Self::to_toml(prefs)?;
        fs::write(&self.path, content).map_err(|e| PreferenceError::WriteError(e.to_string()))
    }

    fn parse_toml(content: &str) -> Result<Preferences, PreferenceError> {
        toml::from_str(content).map_err(|e| PreferenceError::ParseError(e.to_string()))
    }

    fn to_toml(prefs: &Preferences) -> Result<String, PreferenceError> {
        toml::to_string_pretty(prefs).map_err(|e| PreferenceError::WriteError(e.to_string()))
    }
}

impl Default for TomlPreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn load(&self) -> Result<Preferences, PreferenceError> {
        if !self.exists() {
            return Ok(Preferences::empty());
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| PreferenceError::ReadError(e.to_string()))?;

        Self::parse_toml(&content)
    }

    fn put(&mut self, key: PrefKey, value: PreferenceValue) -> Result<(), PreferenceError> {
        let mut prefs = self.load()?;
        prefs.set(key, value)?;
        self.save(&prefs)?;
        debug!(%key, path = %self.path.display(), "Preference saved");
        Ok(())
    }

    fn remove(&mut self, key: PrefKey) -> Result<(), PreferenceError> {
        if !self.exists() {
            return Ok(());
        }
        let mut prefs = self.load()?;
        prefs.clear(key);
        self.save(&prefs)
    }
}
