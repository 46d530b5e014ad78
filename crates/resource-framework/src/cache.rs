//! # Query Cache
//!
//! A process-wide store of read results, shared by every facade. It is an
//! explicit service: the application creates one [`QueryCache`] at startup
//! and hands clones of it to each facade. [`QueryCache::clear`] is the reset
//! hook for tests.
//!
//! ## Slots
//!
//! Each [`CacheKey`] maps to one slot:
//!
//! * **Pending** – a fetch is in flight. It is stored as a shared future, so
//!   concurrent readers of the same key await the *same* request. The slot
//!   counts its waiters; when the last one drops its read, the slot is
//!   removed and the fetch is cancelled.
//! * **Ready** – the last successful value.
//! * **Failed** – the last fetch failed. Kept for status reporting only; the
//!   next read fetches again.
//!
//! Invalidation removes slots by key prefix. A fetch that was in flight when
//! its slot got invalidated still resolves for its callers, but its result is
//! not written back (each pending slot carries a generation number).

use crate::error::ResourceError;
use crate::query::{QueryState, QueryStatus};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Structured cache address: `[resource, ...qualifiers]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(Vec<String>);

impl CacheKey {
    pub fn new(root: impl Into<String>) -> Self {
        Self(vec![root.into()])
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Appends one qualifier.
    pub fn with(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn root(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn starts_with(&self, prefix: &CacheKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

type CachedValue = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<CachedValue, ResourceError>>>;

enum Slot {
    Pending {
        generation: u64,
        waiters: usize,
        fetch: SharedFetch,
    },
    Ready(CachedValue),
    Failed(ResourceError),
}

/// Counters for observing cache behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads answered from a ready slot.
    pub hits: u64,
    /// Reads that started a new fetch.
    pub fetches: u64,
    /// Reads that joined a fetch already in flight.
    pub joins: u64,
    /// Calls to [`QueryCache::invalidate`].
    pub invalidations: u64,
}

#[derive(Default)]
struct Inner {
    slots: HashMap<CacheKey, Slot>,
    next_generation: u64,
    stats: CacheStats,
}

/// Shared read cache with in-flight de-duplication.
#[derive(Clone, Default)]
pub struct QueryCache {
    inner: Arc<Mutex<Inner>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, or runs `fetch` to produce it.
    ///
    /// If a fetch for `key` is already in flight, this awaits that one
    /// instead of calling `fetch`. Dropping the returned future abandons
    /// interest: the shared fetch keeps running for other callers, and is
    /// cancelled (its slot back to idle) once no caller is left.
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        key: &CacheKey,
        fetch: F,
    ) -> Result<Arc<T>, ResourceError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ResourceError>> + Send + 'static,
    {
        let (generation, shared) = {
            let mut inner = self.inner.lock();
            let ready = match inner.slots.get(key) {
                Some(Slot::Ready(value)) => value.clone().downcast::<T>().ok(),
                _ => None,
            };
            if let Some(value) = ready {
                inner.stats.hits += 1;
                debug!(%key, "Cache hit");
                return Ok(value);
            }

            let joined = match inner.slots.get_mut(key) {
                Some(Slot::Pending {
                    generation,
                    waiters,
                    fetch,
                }) => {
                    *waiters += 1;
                    Some((*generation, fetch.clone()))
                }
                _ => None,
            };
            match joined {
                Some(pending) => {
                    inner.stats.joins += 1;
                    debug!(%key, "Joining in-flight fetch");
                    pending
                }
                None => {
                    inner.next_generation += 1;
                    let generation = inner.next_generation;
                    let fut = fetch();
                    let shared = async move { fut.await.map(|v| Arc::new(v) as CachedValue) }
                        .boxed()
                        .shared();
                    inner.slots.insert(
                        key.clone(),
                        Slot::Pending {
                            generation,
                            waiters: 1,
                            fetch: shared.clone(),
                        },
                    );
                    inner.stats.fetches += 1;
                    debug!(%key, generation, "Fetch started");
                    (generation, shared)
                }
            }
        };

        let mut waiter = Waiter {
            cache: self,
            key,
            generation,
            finished: false,
        };
        let result = shared.await;
        waiter.finished = true;
        self.settle(key, generation, &result);
        result.and_then(|value| {
            value.downcast::<T>().map_err(|_| ResourceError::Validation {
                operation: "cache",
                message: format!("cached value for {key} has a different type"),
            })
        })
    }

    /// Writes a finished fetch back, unless its slot was invalidated or
    /// replaced meanwhile.
    fn settle(&self, key: &CacheKey, generation: u64, result: &Result<CachedValue, ResourceError>) {
        let mut inner = self.inner.lock();
        let current = matches!(
            inner.slots.get(key),
            Some(Slot::Pending { generation: g, .. }) if *g == generation
        );
        if !current {
            return;
        }
        let slot = match result {
            Ok(value) => Slot::Ready(value.clone()),
            Err(error) => Slot::Failed(error.clone()),
        };
        inner.slots.insert(key.clone(), slot);
    }

    /// Gives up one waiter's interest in a pending slot. Removes the slot when
    /// nobody is left waiting on it.
    fn release(&self, key: &CacheKey, generation: u64) {
        let mut inner = self.inner.lock();
        let abandoned = match inner.slots.get_mut(key) {
            Some(Slot::Pending {
                generation: g,
                waiters,
                ..
            }) if *g == generation => {
                *waiters -= 1;
                *waiters == 0
            }
            _ => false,
        };
        if abandoned {
            inner.slots.remove(key);
            debug!(%key, generation, "Fetch abandoned by every reader");
        }
    }

    /// Drops every slot whose key starts with `prefix`. Returns how many.
    pub fn invalidate(&self, prefix: &CacheKey) -> usize {
        let mut inner = self.inner.lock();
        let before = inner.slots.len();
        inner.slots.retain(|key, _| !key.starts_with(prefix));
        let removed = before - inner.slots.len();
        inner.stats.invalidations += 1;
        debug!(key = %prefix, removed, "Invalidated");
        removed
    }

    pub fn status(&self, key: &CacheKey) -> QueryStatus {
        match self.inner.lock().slots.get(key) {
            None => QueryStatus::Idle,
            Some(Slot::Pending { .. }) => QueryStatus::Pending,
            Some(Slot::Ready(_)) => QueryStatus::Success,
            Some(Slot::Failed(_)) => QueryStatus::Error,
        }
    }

    /// Current state of `key` without triggering a fetch.
    ///
    /// `Pending` only while at least one read of `key` is still awaiting the
    /// fetch; a fetch every reader walked away from reads as idle.
    pub fn snapshot<T: Send + Sync + 'static>(&self, key: &CacheKey) -> QueryState<T> {
        match self.inner.lock().slots.get(key) {
            None => QueryState::idle(),
            Some(Slot::Pending { .. }) => QueryState::pending(),
            Some(Slot::Ready(value)) => match value.clone().downcast::<T>() {
                Ok(data) => QueryState::success(data),
                Err(_) => QueryState::idle(),
            },
            Some(Slot::Failed(error)) => QueryState::failed(error.clone()),
        }
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.inner.lock().slots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats
    }

    /// Drops all slots and resets the counters.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.slots.clear();
        inner.stats = CacheStats::default();
        debug!("Cache cleared");
    }
}

/// One reader's stake in a pending slot, released if the read is dropped
/// before the fetch resolves.
struct Waiter<'a> {
    cache: &'a QueryCache,
    key: &'a CacheKey,
    generation: u64,
    finished: bool,
}

impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.cache.release(self.key, self.generation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn key(segments: &[&str]) -> CacheKey {
        CacheKey::from_segments(segments.iter().copied())
    }

    #[test]
    fn test_key_prefix() {
        let list = key(&["tenants", "list"]);
        let page = list.clone().with("page=2");
        assert!(page.starts_with(&list));
        assert!(!list.starts_with(&page));
        assert!(!key(&["teams", "list"]).starts_with(&list));
        assert_eq!(page.to_string(), "[tenants, list, page=2]");
        assert_eq!(page.root(), Some("tenants"));
    }

    #[tokio::test]
    async fn test_second_read_is_a_hit() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let k = key(&["fonts", "detail", "f1"]);

        for _ in 0..2 {
            let calls = calls.clone();
            let value = cache
                .get_or_fetch(&k, move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ResourceError>("Inter".to_string())
                })
                .await
                .unwrap();
            assert_eq!(*value, "Inter");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.status(&k), QueryStatus::Success);
    }

    #[tokio::test]
    async fn test_concurrent_reads_share_one_fetch() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let k = key(&["teams", "list"]);

        let fetch = |calls: Arc<AtomicUsize>| {
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok::<_, ResourceError>(vec![1u32, 2, 3])
            }
        };

        let (a, b) = tokio::join!(
            cache.get_or_fetch(&k, fetch(calls.clone())),
            cache.get_or_fetch(&k, fetch(calls.clone())),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert_eq!(cache.stats().joins, 1);
    }

    #[tokio::test]
    async fn test_failure_is_reported_then_refetched() {
        let cache = QueryCache::new();
        let k = key(&["groups", "detail", "g1"]);

        let err = cache
            .get_or_fetch(&k, || async {
                Err::<u8, _>(ResourceError::from_transport(
                    "get",
                    TransportError::Network("down".into()),
                ))
            })
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert_eq!(cache.status(&k), QueryStatus::Error);
        assert!(cache.snapshot::<u8>(&k).is_error());

        let value = cache.get_or_fetch(&k, || async { Ok(7u8) }).await.unwrap();
        assert_eq!(*value, 7);
    }

    #[tokio::test]
    async fn test_invalidate_by_prefix() {
        let cache = QueryCache::new();
        for k in [
            key(&["tenants", "list", "page=1"]),
            key(&["tenants", "list", "page=2"]),
            key(&["tenants", "detail", "t1"]),
            key(&["teams", "list", "page=1"]),
        ] {
            cache.get_or_fetch(&k, || async { Ok(()) }).await.unwrap();
        }

        let removed = cache.invalidate(&key(&["tenants", "list"]));
        assert_eq!(removed, 2);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().invalidations, 1);
        assert!(cache.contains(&key(&["teams", "list", "page=1"])));
    }

    #[tokio::test]
    async fn test_invalidated_fetch_is_not_written_back() {
        let cache = QueryCache::new();
        let k = key(&["events", "list"]);

        let read = cache.get_or_fetch(&k, || async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, ResourceError>("stale")
        });
        let invalidate = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            cache.invalidate(&k);
        };
        let (value, _) = tokio::join!(read, invalidate);

        assert_eq!(*value.unwrap(), "stale");
        assert_eq!(cache.status(&k), QueryStatus::Idle);
    }

    #[tokio::test]
    async fn test_abandoned_read_leaves_fetch_for_others() {
        let cache = QueryCache::new();
        let k = key(&["trials", "detail", "x"]);
        let slow = || async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            Ok::<_, ResourceError>(1u8)
        };

        let abandoned =
            tokio::time::timeout(Duration::from_millis(5), cache.get_or_fetch(&k, slow));
        let kept = cache.get_or_fetch(&k, || async { Ok::<_, ResourceError>(2u8) });
        let (abandoned, kept) = tokio::join!(abandoned, kept);

        assert!(abandoned.is_err());
        assert_eq!(*kept.unwrap(), 1);
        assert_eq!(cache.status(&k), QueryStatus::Success);
    }

    #[tokio::test]
    async fn test_read_abandoned_by_everyone_goes_idle() {
        let cache = QueryCache::new();
        let k = key(&["trials", "detail", "y"]);
        let started = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicUsize::new(0));

        let fetch = {
            let started = started.clone();
            let finished = finished.clone();
            move || async move {
                started.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(30)).await;
                finished.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ResourceError>(1u8)
            }
        };
        let abandoned =
            tokio::time::timeout(Duration::from_millis(5), cache.get_or_fetch(&k, fetch)).await;
        assert!(abandoned.is_err());
        assert_eq!(cache.status(&k), QueryStatus::Idle);
        assert_eq!(cache.snapshot::<u8>(&k).status, QueryStatus::Idle);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(finished.load(Ordering::SeqCst), 0);

        let value = cache
            .get_or_fetch(&k, || async { Ok::<_, ResourceError>(2u8) })
            .await
            .unwrap();
        assert_eq!(*value, 2);
        assert_eq!(cache.stats().fetches, 2);
    }

    #[tokio::test]
    async fn test_clear_resets_everything() {
        let cache = QueryCache::new();
        let k = key(&["admins", "list"]);
        cache.get_or_fetch(&k, || async { Ok(1u8) }).await.unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
