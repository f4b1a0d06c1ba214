//! The `Config` struct, its YAML persistence, and change diffing.
//!
//! Covers:
//! - `load_from` / `load_or_create` / `save_to` (YAML file I/O with atomic write)
//! - XDG-compliant path helpers (`config_path`, `config_dir`)
//! - `validate` for semantic checks that serde cannot express
//! - `diff` producing [`SettingChange`] notifications

use crate::error::ConfigError;
use crate::types::{LogLevel, SettingChange};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Upper bound for the watcher debounce delay.
const MAX_WATCH_DEBOUNCE_MS: u64 = 10_000;

/// Runtime options of the window keeper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Capture window state when an output disconnects so it can be restored
    /// when the monitor comes back. Turning this off forgets all pending saves.
    #[serde(default = "crate::defaults::remember_state")]
    pub remember_state: bool,

    /// Minimize windows stranded on an output whose monitor is unloaded.
    #[serde(default = "crate::defaults::minimize")]
    pub minimize: bool,

    /// Debug log verbosity.
    #[serde(default = "crate::defaults::log_level")]
    pub log_level: LogLevel,

    /// Debounce delay for config hot reload (milliseconds).
    #[serde(default = "crate::defaults::watch_debounce_ms")]
    pub watch_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remember_state: crate::defaults::remember_state(),
            minimize: crate::defaults::minimize(),
            log_level: crate::defaults::log_level(),
            watch_debounce_ms: crate::defaults::watch_debounce_ms(),
        }
    }
}

impl Config {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `remember_state`
    pub fn with_remember_state(mut self, enabled: bool) -> Self {
        self.remember_state = enabled;
        self
    }

    /// Set `minimize`
    pub fn with_minimize(mut self, enabled: bool) -> Self {
        self.minimize = enabled;
        self
    }

    /// Load configuration from `path`, writing the defaults there first if
    /// the file does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load_from(path);
        }
        log::info!("Config file not found, creating default at {:?}", path);
        let config = Self::default();
        if let Err(e) = config.save_to(path) {
            log::error!("Failed to save default config: {}", e);
            return Err(e);
        }
        log::info!("Default config created successfully");
        Ok(config)
    }

    /// Load configuration from a specific file.
    ///
    /// An empty file yields the default configuration. Unknown keys are ignored.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate configuration from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml_ng::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(self)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Check values serde cannot constrain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watch_debounce_ms == 0 || self.watch_debounce_ms > MAX_WATCH_DEBOUNCE_MS {
            return Err(ConfigError::Validation(format!(
                "watch_debounce_ms must be between 1 and {MAX_WATCH_DEBOUNCE_MS}, got {}",
                self.watch_debounce_ms
            )));
        }
        Ok(())
    }

    /// Changes that turn `old` into `new`, one per option that differs.
    ///
    /// Only the options the tracker reacts to are reported.
    pub fn diff(old: &Config, new: &Config) -> Vec<SettingChange> {
        let mut changes = Vec::new();
        if old.remember_state != new.remember_state {
            changes.push(SettingChange::RememberState(new.remember_state));
        }
        if old.minimize != new.minimize {
            changes.push(SettingChange::Minimize(new.minimize));
        }
        changes
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("output-keeper")
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            // Use XDG convention on all platforms: ~/.config/output-keeper/config.yaml
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("output-keeper")
            } else {
                PathBuf::from(".")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.remember_state);
        assert!(config.minimize);
        assert_eq!(config.log_level, LogLevel::Off);
        assert_eq!(config.watch_debounce_ms, 100);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = Config::from_yaml("minimize: false\n").unwrap();
        assert!(config.remember_state);
        assert!(!config.minimize);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = Config::from_yaml("remember_state: false\nlegacy_option: 3\n").unwrap();
        assert!(!config.remember_state);
    }

    #[test]
    fn test_validation_rejects_zero_debounce() {
        let err = Config::from_yaml("watch_debounce_ms: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_diff_reports_only_changed_options() {
        let old = Config::default();
        assert!(Config::diff(&old, &old.clone()).is_empty());

        let new = old.clone().with_remember_state(false);
        assert_eq!(
            Config::diff(&old, &new),
            vec![SettingChange::RememberState(false)]
        );

        let new = old.clone().with_remember_state(false).with_minimize(false);
        assert_eq!(
            Config::diff(&old, &new),
            vec![
                SettingChange::RememberState(false),
                SettingChange::Minimize(false)
            ]
        );
    }

    #[test]
    fn test_load_or_create_writes_defaults_once() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("output-keeper").join("config.yaml");

        let created = Config::load_or_create(&path).unwrap();
        assert_eq!(created, Config::default());
        assert!(path.exists());

        std::fs::write(&path, "minimize: false\n").unwrap();
        let loaded = Config::load_or_create(&path).unwrap();
        assert!(!loaded.minimize);
    }

    #[test]
    fn test_log_level_change_is_not_a_setting_change() {
        let old = Config::default();
        let mut new = old.clone();
        new.log_level = LogLevel::Debug;
        assert!(Config::diff(&old, &new).is_empty());
    }
}
