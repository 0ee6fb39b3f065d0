//! Fetcher construction shared by all commands.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use directory_business::http::Client;
use directory_business::{DirectoryConfig, HttpUserApi, UserFetcher};
use tracing::debug;

/// Build the HTTP-backed fetcher for `config`.
pub fn build_fetcher(config: &DirectoryConfig) -> Result<UserFetcher> {
    let client =
        Client::new(config.request_timeout).context("Failed to initialize HTTP client")?;
    let api = Arc::new(HttpUserApi::new(client, config.api_base_url.clone()));
    debug!(api = api.base_url(), "fetcher ready");
    Ok(UserFetcher::from_config(api, config))
}
