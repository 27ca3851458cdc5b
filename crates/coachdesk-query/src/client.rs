//! The query registry.
//!
//! Owns every cache entry. Reads go through [`QueryClient::query`], writes
//! through [`QueryClient::mutate`]. The entry map sits behind a plain mutex
//! that is never held across an `.await`; concurrent reads of one key share
//! a single in-flight fetch.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use coachdesk_client::Envelope;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::time::Instant;
use tracing::debug;

use crate::invalidation::{InvalidationTable, MutationSpec};
use crate::key::QueryKey;
use crate::notify::{Notifier, TracingNotifier};
use crate::options::{QueryOptions, QueryResult};

type Erased = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Envelope<Erased>>>;

#[derive(Default)]
struct Entry {
    value: Option<Erased>,
    fetched_at: Option<Instant>,
    stale_time: Duration,
    /// Bumped by every invalidation. A fetch that started under an older
    /// epoch stores its value but leaves it stale.
    epoch: u64,
    fresh_epoch: Option<u64>,
    in_flight: Option<(u64, SharedFetch)>,
}

impl Entry {
    fn is_fresh(&self, now: Instant) -> bool {
        match (self.fetched_at, self.fresh_epoch) {
            (Some(at), Some(epoch)) => {
                epoch == self.epoch && now.saturating_duration_since(at) < self.stale_time
            }
            _ => false,
        }
    }
}

#[derive(Default)]
struct Registry {
    entries: HashMap<QueryKey, Entry>,
    next_fetch: u64,
}

type SharedRegistry = Arc<Mutex<Registry>>;

fn lock(registry: &SharedRegistry) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Cache of query results keyed by [`QueryKey`].
///
/// Cloning is cheap; clones share the cache, the invalidation table and the
/// notifier.
#[derive(Clone)]
pub struct QueryClient {
    registry: SharedRegistry,
    invalidations: Arc<InvalidationTable>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("entries", &lock(&self.registry).entries.len())
            .field("notifier", &self.notifier)
            .finish()
    }
}

impl QueryClient {
    pub fn new(invalidations: InvalidationTable, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            registry: Arc::default(),
            invalidations: Arc::new(invalidations),
            notifier,
        }
    }

    /// Registry with the given table and a [`TracingNotifier`].
    pub fn with_table(invalidations: InvalidationTable) -> Self {
        Self::new(invalidations, Arc::new(TracingNotifier))
    }

    pub fn invalidations(&self) -> &InvalidationTable {
        &self.invalidations
    }

    /// Read through the cache.
    ///
    /// Serves the cached value while it is fresh, joins a fetch already in
    /// flight for the same key, and otherwise calls `fetcher` once. A failed
    /// envelope yields an `Error` result that still carries the previous
    /// value. Failures are not cached and never notified.
    pub async fn query<T, F, Fut>(
        &self,
        key: QueryKey,
        options: QueryOptions,
        fetcher: F,
    ) -> QueryResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Envelope<T>> + Send + 'static,
    {
        if !options.enabled {
            return QueryResult::disabled();
        }

        let joined = {
            let mut registry = lock(&self.registry);
            let entry = registry.entries.entry(key.clone()).or_default();
            entry.stale_time = options.stale_time;

            if entry.is_fresh(Instant::now()) {
                if let Some(value) = entry.value.as_ref().and_then(downcast::<T>) {
                    debug!(key = %key, "query served from cache");
                    return QueryResult::cached(value);
                }
            }
            entry.in_flight.as_ref().map(|(_, shared)| shared.clone())
        };

        let fetch = match joined {
            Some(shared) => {
                debug!(key = %key, "joining in-flight fetch");
                shared
            }
            None => {
                // Called unlocked: a fetcher may use this client.
                let fut = fetcher();
                let mut registry = lock(&self.registry);
                let fetch_id = registry.next_fetch;
                registry.next_fetch += 1;
                let entry = registry.entries.entry(key.clone()).or_default();
                entry.stale_time = options.stale_time;
                match entry.in_flight.as_ref().map(|(_, shared)| shared.clone()) {
                    Some(shared) => {
                        debug!(key = %key, "joining fetch started concurrently");
                        shared
                    }
                    None => {
                        debug!(key = %key, "fetching");
                        let shared = self.start_fetch(key.clone(), fetch_id, entry.epoch, fut);
                        entry.in_flight = Some((fetch_id, shared.clone()));
                        shared
                    }
                }
            }
        };

        let envelope = fetch.await;
        if envelope.success {
            match envelope.data.as_ref().and_then(downcast::<T>) {
                Some(value) => QueryResult::fetched(value),
                None => QueryResult::failed(
                    format!("query {} returned an unexpected type", key),
                    self.peek(&key),
                ),
            }
        } else {
            QueryResult::failed(envelope.message, self.peek(&key))
        }
    }

    /// Wrap `fut` so its result lands in the cache exactly once, however
    /// many callers await it.
    fn start_fetch<T, Fut>(
        &self,
        key: QueryKey,
        fetch_id: u64,
        epoch: u64,
        fut: Fut,
    ) -> SharedFetch
    where
        T: Send + Sync + 'static,
        Fut: Future<Output = Envelope<T>> + Send + 'static,
    {
        let registry = Arc::clone(&self.registry);
        async move {
            let envelope = fut.await.map(|data| Arc::new(data) as Erased);
            settle(&registry, &key, fetch_id, epoch, &envelope);
            envelope
        }
        .boxed()
        .shared()
    }

    /// Last successful value for `key`, fresh or not.
    pub fn peek<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        lock(&self.registry)
            .entries
            .get(key)
            .and_then(|e| e.value.as_ref())
            .and_then(downcast::<T>)
    }

    /// True when a value for `key` is cached and still fresh.
    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        lock(&self.registry)
            .entries
            .get(key)
            .is_some_and(|e| e.is_fresh(Instant::now()))
    }

    /// Run a write and apply its side effects.
    ///
    /// The fetcher always runs. On success every key the invalidation table
    /// lists for `spec.resource` is invalidated and the optional success
    /// message is raised; on failure the envelope's message is raised as an
    /// error.
    pub async fn mutate<T, F, Fut>(&self, spec: &MutationSpec, fetcher: F) -> Envelope<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Envelope<T>>,
    {
        let envelope = fetcher().await;

        if envelope.success {
            for prefix in self.invalidations.resolve(spec.resource, spec.target.as_ref()) {
                self.invalidate(&prefix);
            }
            if let Some(message) = &spec.success_message {
                self.notifier.success(message);
            }
        } else {
            debug!(resource = spec.resource, message = %envelope.message, "mutation failed");
            self.notifier.error(&envelope.message);
        }
        envelope
    }

    /// Mark every entry under `prefix` stale. Values stay visible through
    /// [`peek`](Self::peek) until the refetch lands.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut registry = lock(&self.registry);
        let mut count = 0;
        for (key, entry) in registry.entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.epoch += 1;
                entry.in_flight = None;
                count += 1;
            }
        }
        debug!(prefix = %prefix, count, "invalidated");
        count
    }

    /// Drop every entry under `prefix`.
    pub fn remove(&self, prefix: &QueryKey) -> usize {
        let mut registry = lock(&self.registry);
        let before = registry.entries.len();
        registry.entries.retain(|key, _| !key.starts_with(prefix));
        before - registry.entries.len()
    }

    pub fn clear(&self) {
        lock(&self.registry).entries.clear();
    }

    pub fn len(&self) -> usize {
        lock(&self.registry).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Record a finished fetch. Last resolved wins; a fetch that started before
/// an invalidation leaves its value stale.
fn settle(
    registry: &SharedRegistry,
    key: &QueryKey,
    fetch_id: u64,
    epoch: u64,
    envelope: &Envelope<Erased>,
) {
    let mut registry = lock(registry);
    let Some(entry) = registry.entries.get_mut(key) else {
        return;
    };

    if matches!(entry.in_flight, Some((id, _)) if id == fetch_id) {
        entry.in_flight = None;
    }

    if let Some(value) = envelope.data.as_ref().filter(|_| envelope.success) {
        entry.value = Some(Arc::clone(value));
        entry.fetched_at = Some(Instant::now());
        entry.fresh_epoch = Some(epoch);
    }
}

fn downcast<T: Clone + 'static>(value: &Erased) -> Option<T> {
    value.downcast_ref::<T>().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::QueryStatus;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(
        calls: &Arc<AtomicUsize>,
        value: u32,
    ) -> impl FnOnce() -> BoxFuture<'static, Envelope<u32>> {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Envelope::ok(value, "OK") }.boxed()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_entry_served_from_cache() {
        let client = QueryClient::with_table(InvalidationTable::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new(["users", "list"]);
        let options = QueryOptions::stale_for(Duration::from_secs(30));

        let first = client.query(key.clone(), options, counting(&calls, 1)).await;
        let second = client.query(key.clone(), options, counting(&calls, 2)).await;

        assert_eq!(first.data, Some(1));
        assert!(!first.from_cache);
        assert_eq!(second.data, Some(1));
        assert!(second.from_cache);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(31)).await;
        let third = client.query(key, options, counting(&calls, 3)).await;
        assert_eq!(third.data, Some(3));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetcher_may_use_the_client() {
        let client = QueryClient::with_table(InvalidationTable::new());
        let key = QueryKey::new(["policies", "list"]);
        client
            .query(key.clone(), QueryOptions::default(), || async {
                Envelope::ok(1u32, "OK")
            })
            .await;
        client.invalidate(&key);

        let inner = client.clone();
        let inner_key = key.clone();
        let result = client
            .query(key.clone(), QueryOptions::default(), move || {
                let previous = inner.peek::<u32>(&inner_key);
                assert!(!inner.is_fresh(&inner_key));
                inner.invalidate(&QueryKey::new(["plans"]));
                async move { Envelope::ok(previous.unwrap_or(0) + 1, "OK") }
            })
            .await;

        assert_eq!(result.data, Some(2));
        assert!(client.is_fresh(&key));
    }

    #[tokio::test]
    async fn test_disabled_query_never_fetches() {
        let client = QueryClient::with_table(InvalidationTable::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let result = client
            .query(
                QueryKey::new(["users", "detail"]),
                QueryOptions::default().enabled(false),
                counting(&calls, 1),
            )
            .await;

        assert_eq!(result.status, QueryStatus::Disabled);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(client.is_empty());
    }

    #[tokio::test]
    async fn test_error_keeps_previous_value() {
        let client = QueryClient::with_table(InvalidationTable::new());
        let key = QueryKey::new(["plans", "list"]);
        let options = QueryOptions::stale_for(Duration::ZERO);

        client
            .query(key.clone(), options, || async { Envelope::ok(7u32, "OK") })
            .await;
        let failed = client
            .query(key.clone(), options, || async {
                Envelope::<u32>::failure("Request failed with status code 500")
            })
            .await;

        assert_eq!(failed.status, QueryStatus::Error);
        assert_eq!(failed.error.as_deref(), Some("Request failed with status code 500"));
        assert_eq!(failed.data, Some(7));
        assert_eq!(client.peek::<u32>(&key), Some(7));
    }

    #[tokio::test]
    async fn test_invalidate_and_remove_by_prefix() {
        let client = QueryClient::with_table(InvalidationTable::new());
        let options = QueryOptions::stale_for(Duration::from_secs(60));
        for key in [
            QueryKey::new(["users", "list"]),
            QueryKey::new(["users", "detail", "u-1"]),
            QueryKey::new(["plans", "list"]),
        ] {
            client
                .query(key, options, || async { Envelope::ok(1u32, "OK") })
                .await;
        }

        assert_eq!(client.invalidate(&QueryKey::new(["users"])), 2);
        assert!(!client.is_fresh(&QueryKey::new(["users", "list"])));
        assert!(client.is_fresh(&QueryKey::new(["plans", "list"])));
        assert_eq!(client.peek::<u32>(&QueryKey::new(["users", "list"])), Some(1));

        assert_eq!(client.remove(&QueryKey::new(["users", "detail"])), 1);
        assert_eq!(client.len(), 2);

        client.clear();
        assert!(client.is_empty());
    }
}
