//! Keyed query cache with staleness, eviction and request coalescing.
//!
//! ## Rules
//! - A successful value is *fresh* for `CachePolicy::stale_time`; `fetch` inside that
//!   window returns it without calling the loader.
//! - At most one loader runs per key. Callers arriving while it runs become
//!   followers and receive a clone of its result through a `flume` channel.
//! - Every loader run is registered with a `TaskId` (key + generation). A result is
//!   applied only if its `TaskId` is still the registered one; `cancel` unregisters
//!   it, so late completions are dropped.
//! - Entries nobody touched for `CachePolicy::gc_time` are dropped by `evict_unused`
//!   (also run opportunistically on every `fetch`).
//!
//! The lock is a plain `std::sync::Mutex` and is never held across an `.await`.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use flume::{Receiver, Sender};
use log::{debug, info, warn};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{Cancelled, QueryKey, QueryStatus, TaskHandle, TaskId};

/// Freshness and retention windows for cached values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// How long a successful value is served without reloading.
    pub stale_time: Duration,
    /// How long an unused entry is retained before it may be evicted.
    pub gc_time: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(5 * 60),
            gc_time: Duration::from_secs(30 * 60),
        }
    }
}

struct InFlight<V, E> {
    handle: TaskHandle,
    waiters: Vec<Sender<Result<V, E>>>,
}

struct Entry<V, E> {
    data: Option<(V, Instant)>,
    error: Option<E>,
    invalidated: bool,
    in_flight: Option<InFlight<V, E>>,
    last_used: Instant,
}

impl<V: Clone, E> Entry<V, E> {
    fn new(now: Instant) -> Self {
        Self {
            data: None,
            error: None,
            invalidated: false,
            in_flight: None,
            last_used: now,
        }
    }

    fn fresh_value(&self, now: Instant, stale_time: Duration) -> Option<V> {
        if self.invalidated || self.error.is_some() {
            return None;
        }
        self.data
            .as_ref()
            .filter(|(_, fetched_at)| now.saturating_duration_since(*fetched_at) < stale_time)
            .map(|(value, _)| value.clone())
    }

    fn is_current(&self, id: &TaskId) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.handle.id() == id)
    }
}

struct Inner<V, E> {
    entries: HashMap<QueryKey, Entry<V, E>>,
    generation: u64,
}

enum Role<V, E> {
    Fresh(V),
    Leader(TaskHandle),
    Follower(Receiver<Result<V, E>>),
}

/// Shared, cloneable cache. Clones observe the same entries.
pub struct QueryCache<V, E> {
    inner: Arc<Mutex<Inner<V, E>>>,
    policy: CachePolicy,
}

impl<V, E> Clone for QueryCache<V, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            policy: self.policy,
        }
    }
}

impl<V, E> Debug for QueryCache<V, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("policy", &self.policy)
            .field("entries", &self.lock().entries.len())
            .finish()
    }
}

impl<V, E> Default for QueryCache<V, E> {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

impl<V, E> QueryCache<V, E> {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                generation: 0,
            })),
            policy,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    fn lock(&self) -> MutexGuard<'_, Inner<V, E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a loader is currently running for `key`.
    pub fn is_in_flight(&self, key: &QueryKey) -> bool {
        self.lock()
            .entries
            .get(key)
            .is_some_and(|entry| entry.in_flight.is_some())
    }

    /// Cancel the in-flight request for `key`, if any.
    ///
    /// The leader resolves to `Cancelled`, followers are released with `Cancelled`,
    /// and whatever the loader eventually produces is discarded.
    pub fn cancel(&self, key: &QueryKey) -> bool {
        let in_flight = self
            .lock()
            .entries
            .get_mut(key)
            .and_then(|entry| entry.in_flight.take());

        match in_flight {
            Some(in_flight) => {
                info!(
                    "QueryCache: cancelled {} (generation {}, {} waiter(s))",
                    key,
                    in_flight.handle.id().generation(),
                    in_flight.waiters.len()
                );
                in_flight.handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Mark the value for `key` stale so the next `fetch` reloads it.
    /// The value stays readable through `get` until then.
    pub fn invalidate(&self, key: &QueryKey) {
        if let Some(entry) = self.lock().entries.get_mut(key) {
            debug!("QueryCache: invalidated {key}");
            entry.invalidated = true;
        }
    }

    /// Drop entries unused for longer than `gc_time`. Returns how many were dropped.
    pub fn evict_unused(&self) -> usize {
        let gc_time = self.policy.gc_time;
        Self::collect_garbage(&mut self.lock(), Instant::now(), gc_time)
    }

    fn collect_garbage(inner: &mut Inner<V, E>, now: Instant, gc_time: Duration) -> usize {
        let before = inner.entries.len();
        inner.entries.retain(|key, entry| {
            let keep = entry.in_flight.is_some()
                || now.saturating_duration_since(entry.last_used) < gc_time;
            if !keep {
                debug!("QueryCache: evicting unused {key}");
            }
            keep
        });
        before - inner.entries.len()
    }
}

impl<V, E> QueryCache<V, E>
where
    V: Clone,
    E: Clone + From<Cancelled>,
{
    /// Last loaded value for `key`, fresh or not.
    pub fn get(&self, key: &QueryKey) -> Option<V> {
        let mut inner = self.lock();
        let entry = inner.entries.get_mut(key)?;
        entry.last_used = Instant::now();
        entry.data.as_ref().map(|(value, _)| value.clone())
    }

    /// Status tag for `key`. Unknown keys and keys with a request in flight are
    /// `Pending`; otherwise the outcome of the last completed attempt.
    pub fn status(&self, key: &QueryKey) -> QueryStatus<V, E> {
        let inner = self.lock();
        let Some(entry) = inner.entries.get(key) else {
            return QueryStatus::Pending;
        };
        if entry.in_flight.is_some() {
            return QueryStatus::Pending;
        }
        if let Some(err) = &entry.error {
            return QueryStatus::Failure(err.clone());
        }
        match &entry.data {
            Some((value, _)) => QueryStatus::Success(value.clone()),
            None => QueryStatus::Pending,
        }
    }

    /// Return the fresh value for `key`, or join/start a load.
    pub async fn fetch<F, Fut>(&self, key: QueryKey, load: F) -> Result<V, E>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        self.run(key, false, load).await
    }

    /// Like `fetch` but ignores freshness. Still joins a load already in flight.
    pub async fn refetch<F, Fut>(&self, key: QueryKey, load: F) -> Result<V, E>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        self.run(key, true, load).await
    }

    async fn run<F, Fut>(&self, key: QueryKey, force: bool, load: F) -> Result<V, E>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        match self.join(&key, force) {
            Role::Fresh(value) => {
                debug!("QueryCache: {key} served from cache");
                Ok(value)
            }
            Role::Follower(rx) => {
                debug!("QueryCache: {key} joined in-flight request");
                match rx.recv_async().await {
                    Ok(result) => result,
                    Err(_) => Err(Cancelled::new(key).into()),
                }
            }
            Role::Leader(handle) => self.lead(handle, load).await,
        }
    }

    fn join(&self, key: &QueryKey, force: bool) -> Role<V, E> {
        let now = Instant::now();
        let policy = self.policy;
        let mut guard = self.lock();
        Self::collect_garbage(&mut guard, now, policy.gc_time);

        let Inner {
            entries,
            generation,
        } = &mut *guard;
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(now));
        entry.last_used = now;

        if !force && let Some(value) = entry.fresh_value(now, policy.stale_time) {
            return Role::Fresh(value);
        }

        if let Some(in_flight) = entry.in_flight.as_mut() {
            let (tx, rx) = flume::bounded(1);
            in_flight.waiters.push(tx);
            return Role::Follower(rx);
        }

        *generation += 1;
        let handle = TaskHandle::new(
            TaskId::new(key.clone(), *generation),
            CancellationToken::new(),
        );
        entry.in_flight = Some(InFlight {
            handle: handle.clone(),
            waiters: Vec::new(),
        });
        Role::Leader(handle)
    }

    async fn lead<F, Fut>(&self, handle: TaskHandle, load: F) -> Result<V, E>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let id = handle.id().clone();
        let token = handle.cancellation_token();
        debug!(
            "QueryCache: loading {} (generation {})",
            id.key(),
            id.generation()
        );

        let mut guard = LeaderGuard {
            cache: self,
            id: &id,
            armed: true,
        };
        let result: Result<V, E> = tokio::select! {
            biased;
            () = token.cancelled() => Err(Cancelled::new(id.key().clone()).into()),
            result = load(token.clone()) => result,
        };
        guard.armed = false;

        self.complete(&id, result)
    }

    fn complete(&self, id: &TaskId, result: Result<V, E>) -> Result<V, E> {
        let now = Instant::now();
        let mut inner = self.lock();
        let Some(entry) = inner.entries.get_mut(id.key()) else {
            return Err(Cancelled::new(id.key().clone()).into());
        };
        if !entry.is_current(id) {
            warn!(
                "QueryCache: discarding stale result for {} (generation {})",
                id.key(),
                id.generation()
            );
            return Err(Cancelled::new(id.key().clone()).into());
        }

        let waiters = entry
            .in_flight
            .take()
            .map(|in_flight| in_flight.waiters)
            .unwrap_or_default();
        entry.last_used = now;
        match &result {
            Ok(value) => {
                entry.data = Some((value.clone(), now));
                entry.error = None;
                entry.invalidated = false;
            }
            Err(err) => {
                entry.error = Some(err.clone());
            }
        }
        drop(inner);

        for waiter in waiters {
            // A follower that stopped listening is fine to skip.
            waiter.send(result.clone()).ok();
        }
        result
    }
}

/// Unregisters the in-flight entry when the leading future is dropped before it
/// completes, which releases followers with `Cancelled`.
struct LeaderGuard<'a, V, E> {
    cache: &'a QueryCache<V, E>,
    id: &'a TaskId,
    armed: bool,
}

impl<V, E> Drop for LeaderGuard<'_, V, E> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.cache.lock();
        if let Some(entry) = inner.entries.get_mut(self.id.key())
            && entry
                .in_flight
                .as_ref()
                .is_some_and(|in_flight| in_flight.handle.id() == self.id)
            && let Some(in_flight) = entry.in_flight.take()
        {
            debug!("QueryCache: leader for {} dropped", self.id.key());
            in_flight.handle.cancel();
        }
    }
}
