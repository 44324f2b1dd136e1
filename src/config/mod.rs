//! Configuration module
//!
//! Lookup order for the config file:
//! 1. `.resonance/config.toml` walking up from the current directory
//! 2. `~/.resonance/config.toml`
//! 3. built-in defaults
//!
//! Environment variables override file values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_DIR: &str = ".resonance";
pub const CONFIG_FILE: &str = "config.toml";
pub const STORE_FILE: &str = "memory.jsonl";

pub const ENV_MEMORY_PATH: &str = "RESONANCE_MEMORY_PATH";
pub const ENV_LOCALE: &str = "RESONANCE_LOCALE";
pub const ENV_DEBUG: &str = "RESONANCE_DEBUG";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub bootstrap: BootstrapConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// File this config was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Store location; relative paths resolve against the config's directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
        }
    }
}

fn default_locale() -> String {
    crate::core::locale::BASE_LOCALE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub debug: bool,
}

impl Config {
    /// Load config from default locations
    pub fn load() -> Result<Self> {
        if let Some(local) = Self::find_local_config() {
            return Self::load_from(&local);
        }

        if let Some(global) = Self::global_config_path() {
            if global.exists() {
                return Self::load_from(&global);
            }
        }

        Ok(Self::default())
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Save config to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Find local .resonance/config.toml walking up directories
    pub fn find_local_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Get global config path (~/.resonance/config.toml)
    pub fn global_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Default home for the store: ~/.resonance, else ./.resonance
    pub fn data_root() -> PathBuf {
        home_dir()
            .map(|h| h.join(CONFIG_DIR))
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR))
    }

    /// Store path with priority:
    /// 1. RESONANCE_MEMORY_PATH env var
    /// 2. `[storage] path` from the config file
    /// 3. ~/.resonance/memory.jsonl
    pub fn store_path(&self) -> PathBuf {
        resolve_store_path(
            std::env::var(ENV_MEMORY_PATH).ok(),
            self.storage.path.as_deref(),
            self.source.as_deref().and_then(Path::parent),
            &Self::data_root(),
        )
    }

    /// Bootstrap locale, env first
    pub fn locale(&self) -> String {
        std::env::var(ENV_LOCALE)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.bootstrap.locale.clone())
    }

    /// Debug logging toggle, env first
    pub fn debug_enabled(&self) -> bool {
        match std::env::var(ENV_DEBUG) {
            Ok(v) => parse_flag(&v),
            Err(_) => self.logging.debug,
        }
    }
}

/// Pick the store location. Relative env paths resolve against the data
/// root, relative file paths against the directory holding the config.
pub fn resolve_store_path(
    env_path: Option<String>,
    config_path: Option<&Path>,
    config_dir: Option<&Path>,
    data_root: &Path,
) -> PathBuf {
    if let Some(env_path) = env_path.filter(|p| !p.trim().is_empty()) {
        let path = PathBuf::from(env_path);
        return if path.is_absolute() {
            path
        } else {
            data_root.join(path)
        };
    }

    if let Some(path) = config_path {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        return config_dir.unwrap_or(data_root).join(path);
    }

    data_root.join(STORE_FILE)
}

pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

pub(crate) fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bootstrap.locale, "en");
        assert!(!config.logging.debug);
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[bootstrap]\nlocale = \"de\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.bootstrap.locale, "de");
        assert!(!config.logging.debug);
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let mut config = Config::default();
        config.logging.debug = true;
        config.storage.path = Some(PathBuf::from("graph.jsonl"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.logging.debug);
        assert_eq!(loaded.storage.path, Some(PathBuf::from("graph.jsonl")));
    }

    #[test]
    fn test_store_path_priority() {
        let root = Path::new("/data/root");
        let cfg_dir = Path::new("/project/.resonance");

        assert_eq!(
            resolve_store_path(None, None, None, root),
            root.join(STORE_FILE)
        );
        assert_eq!(
            resolve_store_path(None, Some(Path::new("g.jsonl")), Some(cfg_dir), root),
            cfg_dir.join("g.jsonl")
        );
        assert_eq!(
            resolve_store_path(Some("/abs/m.jsonl".into()), Some(Path::new("g.jsonl")), Some(cfg_dir), root),
            PathBuf::from("/abs/m.jsonl")
        );
        assert_eq!(
            resolve_store_path(Some("rel.jsonl".into()), None, None, root),
            root.join("rel.jsonl")
        );
        assert_eq!(
            resolve_store_path(Some("  ".into()), None, None, root),
            root.join(STORE_FILE)
        );
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" yes "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("nope"));
    }
}
