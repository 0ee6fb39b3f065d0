//! Runtime configuration.
//!
//! Defaults point at the public JSONPlaceholder API. Every value can be
//! overridden through `USER_DIRECTORY_*` environment variables:
//!
//! | variable                              | field             |
//! |---------------------------------------|-------------------|
//! | `USER_DIRECTORY_API_URL`              | `api_base_url`    |
//! | `USER_DIRECTORY_PAGE_SIZE`            | `page_size`       |
//! | `USER_DIRECTORY_REQUEST_TIMEOUT_SECS` | `request_timeout` |
//! | `USER_DIRECTORY_MAX_RETRIES`          | `retry.max_retries` |

use std::time::Duration;

use directory_states::CachePolicy;
use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::RetryPolicy;

pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Cards per page; matches the number of placeholder cards shown while loading.
pub const DEFAULT_PAGE_SIZE: usize = 6;

const ENV_PREFIX: &str = "USER_DIRECTORY_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration from environment: {0}")]
    Env(String),
    #[error("{0} must be a positive integer")]
    NotPositive(&'static str),
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Unvalidated overrides, with the `USER_DIRECTORY_` prefix stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawConfig {
    pub api_url: Option<String>,
    pub page_size: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

impl RawConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Overrides found among `vars`; unrelated variables are ignored.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Result<Self, ConfigError> {
        let scoped: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(name, value)| {
                name.strip_prefix(ENV_PREFIX)
                    .map(|field| (field.to_owned(), value))
            })
            .collect();
        serde_env::from_iter(scoped).map_err(|e| ConfigError::Env(e.to_string()))
    }

    /// Layer `over` on top of `self`; values set in `over` win.
    #[must_use]
    pub fn merge(self, over: Self) -> Self {
        Self {
            api_url: over.api_url.or(self.api_url),
            page_size: over.page_size.or(self.page_size),
            request_timeout_secs: over.request_timeout_secs.or(self.request_timeout_secs),
            max_retries: over.max_retries.or(self.max_retries),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    pub api_base_url: String,
    pub page_size: usize,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub cache: CachePolicy,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            cache: CachePolicy::default(),
        }
    }
}

impl DirectoryConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults overlaid with `USER_DIRECTORY_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Same as `from_env` over an explicit set of variables.
    pub fn from_vars(
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, ConfigError> {
        Self::from_raw(RawConfig::from_vars(vars)?)
    }

    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = raw.api_url {
            let url = url.trim();
            if url.is_empty() {
                return Err(ConfigError::Empty("USER_DIRECTORY_API_URL"));
            }
            config.api_base_url = url.to_owned();
        }
        if let Some(page_size) = raw.page_size {
            if page_size == 0 {
                return Err(ConfigError::NotPositive("USER_DIRECTORY_PAGE_SIZE"));
            }
            config.page_size = page_size;
        }
        if let Some(secs) = raw.request_timeout_secs {
            if secs == 0 {
                return Err(ConfigError::NotPositive(
                    "USER_DIRECTORY_REQUEST_TIMEOUT_SECS",
                ));
            }
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(max_retries) = raw.max_retries {
            config.retry.max_retries = max_retries;
        }

        info!(
            "DirectoryConfig: api={} page_size={} retries={}",
            config.api_base_url, config.page_size, config.retry.max_retries
        );
        Ok(config)
    }
}
