use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "hump";
const CONFIG_FILE: &str = "config.json";

/// Application configuration stored in the user's config directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Highlight matched spans in terminal output
    #[serde(default = "default_color")]
    pub color: bool,

    /// Maximum number of matches to display (0 = unlimited)
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Files larger than this are skipped when scanning a codebase
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Shortest identifier kept when scanning a codebase
    #[serde(default = "default_min_identifier_len")]
    pub min_identifier_len: usize,

    /// Directory names never descended into when scanning
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
}

fn default_color() -> bool {
    true
}

fn default_max_results() -> usize {
    200
}

fn default_max_file_size() -> u64 {
    1024 * 1024
}

fn default_min_identifier_len() -> usize {
    2
}

fn default_exclude_dirs() -> Vec<String> {
    [".git", "node_modules", "target", "__pycache__", ".venv", "venv", "build", "dist"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            max_results: default_max_results(),
            max_file_size: default_max_file_size(),
            min_identifier_len: default_min_identifier_len(),
            exclude_dirs: default_exclude_dirs(),
        }
    }
}

impl AppConfig {
    /// Load config from the config directory, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Save config to the config directory, returning where it was written
    pub fn save(&self) -> Result<PathBuf> {
        let path = get_config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Display cap as an `Option`; `None` means unlimited
    pub fn result_limit(&self) -> Option<usize> {
        (self.max_results > 0).then_some(self.max_results)
    }

    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|dir| dir == name)
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_NAME).join(CONFIG_FILE))
}
