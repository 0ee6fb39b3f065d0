//! Directory API client.
//!
//! `UserApi` is the seam between the fetcher and the network: the fetcher only
//! sees this trait, so tests can swap in a scripted implementation.

use std::fmt::Debug;

use async_trait::async_trait;
use log::{debug, error};

use crate::http::Client;
use crate::{DirectoryError, DirectoryResult, UserId, UserRecord};

#[async_trait]
pub trait UserApi: Send + Sync + Debug {
    /// GET `/users`
    async fn list_users(&self) -> DirectoryResult<Vec<UserRecord>>;

    /// GET `/users/{id}`
    async fn get_user(&self, id: UserId) -> DirectoryResult<UserRecord>;
}

/// `UserApi` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpUserApi {
    client: Client,
    base_url: String,
}

impl HttpUserApi {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> DirectoryResult<T> {
        let request = self.client.get(url);
        debug!("GET {}", request.url());
        let response = request
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.message))?;

        if !response.is_success() {
            error!("GET {url} returned status {}", response.status);
            return Err(DirectoryError::Status {
                status: response.status,
            });
        }

        response.json().map_err(|e| {
            let content_type = response.header("Content-Type").unwrap_or("unknown");
            error!("GET {url} returned an unreadable {content_type} body: {e}");
            DirectoryError::Decode(format!("{e} (content-type: {content_type})"))
        })
    }
}

#[async_trait]
impl UserApi for HttpUserApi {
    async fn list_users(&self) -> DirectoryResult<Vec<UserRecord>> {
        let url = format!("{}/users", self.base_url);
        self.get_json(&url).await
    }

    async fn get_user(&self, id: UserId) -> DirectoryResult<UserRecord> {
        let url = format!("{}/users/{id}", self.base_url);
        self.get_json(&url).await
    }
}
