//! Application configuration.
//!
//! Read from a YAML file, then overridden by `SPENDWISE_*` environment
//! variables. The file is optional; every field has a default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = "config.yaml";

pub const ENV_CONFIG: &str = "SPENDWISE_CONFIG";
pub const ENV_DATA_DIR: &str = "SPENDWISE_DATA_DIR";
pub const ENV_BIND: &str = "SPENDWISE_BIND";
pub const ENV_ADVISOR_URL: &str = "SPENDWISE_ADVISOR_URL";
pub const ENV_CORS_ORIGIN: &str = "SPENDWISE_CORS_ORIGIN";

pub const DEFAULT_CATEGORIES: [&str; 11] = [
    "Food & Drinks",
    "Transportation",
    "Housing & Utilities",
    "Shopping",
    "Entertainment",
    "Healthcare",
    "Education",
    "Travel",
    "Personal Care",
    "Gifts & Donations",
    "Other",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the per-user CSV collections
    pub data_dir: PathBuf,
    pub bind_address: String,
    pub cors_origin: String,
    /// Base URL of the Genkit flow server; advisor endpoints answer 503 without it
    pub advisor_url: Option<String>,
    /// Used when `RUST_LOG` is not set
    pub log_filter: String,
    pub default_categories: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            bind_address: "127.0.0.1:3000".to_string(),
            cors_origin: "http://localhost:8080".to_string(),
            advisor_url: None,
            log_filter: "info".to_string(),
            default_categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// ~/Documents/SpendWise, or ./SpendWise when no home directory is known
fn default_data_dir() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(|home| PathBuf::from(home).join("Documents").join("SpendWise"))
        .unwrap_or_else(|_| PathBuf::from("SpendWise"))
}

impl AppConfig {
    /// Load from the process environment.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `env` to look up variables.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let config_path = match env(ENV_CONFIG) {
            Some(path) => Some(PathBuf::from(path)),
            None => {
                let data_dir = env(ENV_DATA_DIR)
                    .map(PathBuf::from)
                    .unwrap_or_else(default_data_dir);
                let candidate = data_dir.join(CONFIG_FILE_NAME);
                candidate.exists().then_some(candidate)
            }
        };

        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => {
                debug!("No configuration file found, using defaults");
                Self::default()
            }
        };

        if let Some(dir) = env(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(bind) = env(ENV_BIND) {
            config.bind_address = bind;
        }
        if let Some(url) = env(ENV_ADVISOR_URL) {
            config.advisor_url = Some(url);
        }
        if let Some(origin) = env(ENV_CORS_ORIGIN) {
            config.cors_origin = origin;
        }

        config.advisor_url = config
            .advisor_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid configuration file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
