//! Configuration file handling for the CLI.
//!
//! Optional settings live in `$XDG_CONFIG_HOME/user-directory/config.toml`
//! following the XDG Base Directory Specification:
//!
//! ```toml
//! [api]
//! url = "https://jsonplaceholder.typicode.com"
//! timeout_secs = 10
//! max_retries = 3
//!
//! [list]
//! page_size = 6
//! ```
//!
//! Precedence, lowest first: built-in defaults, this file, `USER_DIRECTORY_*`
//! environment variables, command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use directory_business::{DirectoryConfig, RawConfig};
use serde::{Deserialize, Serialize};

/// CLI configuration stored on disk
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub list: ListConfig,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConfig {
    pub page_size: Option<usize>,
}

impl Config {
    /// Returns `$XDG_CONFIG_HOME/user-directory/config.toml` on Linux,
    /// appropriate paths on other platforms.
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "lqxc", "user-directory")
            .context("Failed to determine config directory")?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Load the configuration file. A missing file is an empty configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn into_raw(self) -> RawConfig {
        RawConfig {
            api_url: self.api.url,
            page_size: self.list.page_size,
            request_timeout_secs: self.api.timeout_secs,
            max_retries: self.api.max_retries,
        }
    }
}

/// Layer file, environment and flags into the runtime configuration.
pub fn resolve(file: Config, env: RawConfig, flags: RawConfig) -> Result<DirectoryConfig> {
    let raw = file.into_raw().merge(env).merge(flags);
    DirectoryConfig::from_raw(raw).context("Invalid configuration")
}
