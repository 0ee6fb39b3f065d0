//! Task identity and cooperative cancellation for in-flight queries.
//!
//! Every physical request the cache starts gets a `TaskId`: the query key plus a
//! generation counter taken from the cache. A completion is only applied when its
//! `TaskId` is still the one registered for the key; anything else is stale.
//!
//! # Usage
//!
//! ```ignore
//! use directory_states::{QueryKey, TaskHandle, TaskId};
//! use tokio_util::sync::CancellationToken;
//!
//! let handle = TaskHandle::new(TaskId::new(QueryKey::new("users"), 1), CancellationToken::new());
//!
//! // Navigating away:
//! handle.cancel();
//! ```

use tokio_util::sync::CancellationToken;

use crate::QueryKey;

/// Unique identifier for a spawned query task.
///
/// Two tasks for the same key differ by generation; the higher generation is the
/// more recently started one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId {
    key: QueryKey,
    generation: u64,
}

impl TaskId {
    pub fn new(key: QueryKey, generation: u64) -> Self {
        Self { key, generation }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Handle to an in-flight query with cooperative cancellation.
///
/// Cancelling does not abort anything by force: the loader observes the token
/// (the cache races it with `tokio::select!`) and its result is dropped.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    /// A clone of the token, for handing to the loader.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}
