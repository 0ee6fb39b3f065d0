//! User fetcher: the list and detail queries behind the directory.
//!
//! Both queries go through a `QueryCache`, so a second caller inside the
//! freshness window is served from memory and concurrent callers share one
//! request. Retries run inside the cached load, which means followers share the
//! retries too instead of starting their own.
//!
//! Keys:
//! - `users`: the full collection
//! - `user/{id}`: one user

use std::sync::Arc;

use directory_states::{CachePolicy, QueryCache, QueryKey, QueryStatus};
use log::info;

use crate::{
    DirectoryConfig, DirectoryError, DirectoryResult, RetryPolicy, UserApi, UserId, UserRecord,
    retry_with_backoff,
};

/// Pending / success / failure tag of one query.
pub type FetchResult<T> = QueryStatus<T, DirectoryError>;

pub fn users_key() -> QueryKey {
    QueryKey::new("users")
}

pub fn user_key(id: UserId) -> QueryKey {
    QueryKey::new("user").with(id)
}

#[derive(Debug, Clone)]
pub struct UserFetcher {
    api: Arc<dyn UserApi>,
    retry: RetryPolicy,
    users: QueryCache<Vec<UserRecord>, DirectoryError>,
    user: QueryCache<UserRecord, DirectoryError>,
}

impl UserFetcher {
    pub fn new(api: Arc<dyn UserApi>, retry: RetryPolicy, cache: CachePolicy) -> Self {
        Self::with_caches(api, retry, QueryCache::new(cache), QueryCache::new(cache))
    }

    /// Build on caches owned elsewhere, e.g. shared between several views.
    pub fn with_caches(
        api: Arc<dyn UserApi>,
        retry: RetryPolicy,
        users: QueryCache<Vec<UserRecord>, DirectoryError>,
        user: QueryCache<UserRecord, DirectoryError>,
    ) -> Self {
        Self {
            api,
            retry,
            users,
            user,
        }
    }

    pub fn from_config(api: Arc<dyn UserApi>, config: &DirectoryConfig) -> Self {
        Self::new(api, config.retry, config.cache)
    }

    /// The full collection; fresh cached value, joined request, or a new load.
    pub async fn fetch_all(&self) -> DirectoryResult<Vec<UserRecord>> {
        let (api, retry) = (Arc::clone(&self.api), self.retry);
        self.users
            .fetch(users_key(), move |_cancel| load_users(api, retry))
            .await
    }

    /// Reload the collection even if the cached one is fresh.
    pub async fn refetch_all(&self) -> DirectoryResult<Vec<UserRecord>> {
        let (api, retry) = (Arc::clone(&self.api), self.retry);
        self.users
            .refetch(users_key(), move |_cancel| load_users(api, retry))
            .await
    }

    pub async fn fetch_one(&self, id: UserId) -> DirectoryResult<UserRecord> {
        let (api, retry) = (Arc::clone(&self.api), self.retry);
        self.user
            .fetch(user_key(id), move |_cancel| load_user(api, retry, id))
            .await
    }

    /// `fetch_one` for an id taken from a path segment. A malformed id is
    /// reported without touching the network.
    pub async fn fetch_one_from_path(&self, raw_id: &str) -> DirectoryResult<UserRecord> {
        let id: UserId = raw_id.parse()?;
        self.fetch_one(id).await
    }

    pub fn status_all(&self) -> FetchResult<Vec<UserRecord>> {
        self.users.status(&users_key())
    }

    pub fn status_one(&self, id: UserId) -> FetchResult<UserRecord> {
        self.user.status(&user_key(id))
    }

    /// Last loaded collection, fresh or not.
    pub fn cached_users(&self) -> Option<Vec<UserRecord>> {
        self.users.get(&users_key())
    }

    /// Abandon the in-flight list request, e.g. when its view goes away.
    pub fn cancel_all(&self) -> bool {
        self.users.cancel(&users_key())
    }

    pub fn cancel_one(&self, id: UserId) -> bool {
        self.user.cancel(&user_key(id))
    }

    /// Cancel whichever query `key` names. Returns false if nothing was in flight.
    pub fn cancel(&self, key: &QueryKey) -> bool {
        match key.root().as_str() {
            "users" => self.users.cancel(key),
            "user" => self.user.cancel(key),
            _ => false,
        }
    }

    /// Drop cached entries past their retention window.
    pub fn evict_unused(&self) -> usize {
        self.users.evict_unused() + self.user.evict_unused()
    }
}

async fn load_users(api: Arc<dyn UserApi>, retry: RetryPolicy) -> DirectoryResult<Vec<UserRecord>> {
    let users = retry_with_backoff(
        &retry,
        "Failed to fetch users",
        DirectoryError::is_network,
        || api.list_users(),
    )
    .await?;
    info!("UserFetcher: fetched {} users", users.len());
    Ok(users)
}

async fn load_user(
    api: Arc<dyn UserApi>,
    retry: RetryPolicy,
    id: UserId,
) -> DirectoryResult<UserRecord> {
    let user = retry_with_backoff(
        &retry,
        "Failed to fetch user details",
        DirectoryError::is_transient,
        || api.get_user(id),
    )
    .await?;
    info!("UserFetcher: fetched user {id}");
    Ok(user)
}
