//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treestore/treestore.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `TREESTORE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::util::path::expand_env_vars;

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub database_path: Option<PathBuf>,
    pub busy_timeout_ms: Option<u64>,
}

/// Unified configuration for treestore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// SQLite database file (default: <data_dir>/treestore/trees.db)
    pub database_path: PathBuf,
    /// How long a connection waits on a locked database
    pub busy_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            busy_timeout_ms: 5000,
        }
    }
}

fn default_database_path() -> PathBuf {
    ProjectDirs::from("", "", "treestore")
        .map(|dirs| dirs.data_dir().join("trees.db"))
        .unwrap_or_else(|| PathBuf::from("~/.treestore/trees.db"))
}

/// Get the XDG config directory for treestore.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treestore").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treestore.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    pub fn busy_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.busy_timeout_ms)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.database_path.to_string_lossy().as_ref());
        self.database_path = PathBuf::from(expanded);
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            database_path: overlay
                .database_path
                .clone()
                .unwrap_or_else(|| self.database_path.clone()),
            busy_timeout_ms: overlay.busy_timeout_ms.unwrap_or(self.busy_timeout_ms),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let global_path = global_config_path();
        let current = Self::merge_files(global_path.as_deref(), config_file)?;
        let mut current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        Ok(current)
    }

    /// Defaults overlaid with the given files only, without environment
    /// overrides. A missing global file is skipped; the explicit file must exist.
    pub fn load_files(
        global_path: Option<&Path>,
        config_file: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::merge_files(global_path, config_file)?;
        current.expand_paths();
        Ok(current)
    }

    fn merge_files(
        global_path: Option<&Path>,
        config_file: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_path.filter(|path| path.exists()) {
            current = current.merge_with(&load_raw_settings(global_path)?);
        }

        if let Some(path) = config_file {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        Ok(current)
    }

    /// Apply TREESTORE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("TREESTORE"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("database_path") {
            settings.database_path = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("busy_timeout_ms") {
            settings.busy_timeout_ms = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("TREESTORE_BUSY_TIMEOUT_MS: {e}"),
            })?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treestore configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treestore/treestore.toml
#   Explicit: --config <file>
#   Env:    TREESTORE_* environment variables

# SQLite database holding all trees (~ and $VAR are expanded)
# database_path = "~/.local/share/treestore/trees.db"

# Milliseconds to wait on a locked database
# busy_timeout_ms = 5000
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
