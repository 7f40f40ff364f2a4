//! Keyed memoization with a staleness window and in-flight deduplication.
//!
//! At most one fetch per key runs at a time: callers that arrive while a
//! fetch is pending await the same shared future. A fetch that every caller
//! has abandoned is dropped, so the underlying scan stops at its next await
//! point. Failed fetches are not cached.
//!
//! Each fetch carries a generation number. Completing a fetch stores its
//! value only if that generation is still the one registered for the key,
//! so a fetch orphaned by [`QueryCache::invalidate`] can never overwrite a
//! newer one.

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

type SharedFetch<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

struct Ready<V> {
    value: V,
    fetched_at: Instant,
}

struct Pending<V, E> {
    fetch: SharedFetch<V, E>,
    generation: u64,
    waiters: usize,
}

struct Slot<V, E> {
    ready: Option<Ready<V>>,
    pending: Option<Pending<V, E>>,
    last_access: Instant,
}

impl<V, E> Slot<V, E> {
    fn new(now: Instant) -> Self {
        Self {
            ready: None,
            pending: None,
            last_access: now,
        }
    }
}

/// Point-in-time state of one key, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Missing,
    Fresh,
    Stale,
    Fetching,
}

pub struct QueryCache<K, V, E> {
    name: &'static str,
    stale_after: Duration,
    evict_after: Duration,
    slots: Mutex<HashMap<K, Slot<V, E>>>,
    next_generation: AtomicU64,
}

impl<K, V, E> QueryCache<K, V, E>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str, stale_after: Duration, evict_after: Duration) -> Self {
        Self {
            name,
            stale_after,
            evict_after,
            slots: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Cached value if fresh, otherwise the result of the pending or a new fetch.
    ///
    /// `fetch` is only called when this caller starts a new fetch.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let now = Instant::now();
        let (shared, generation) = {
            let mut slots = self.slots.lock();
            self.evict_idle(&mut slots, now);

            let slot = slots.entry(key.clone()).or_insert_with(|| Slot::new(now));
            slot.last_access = now;

            if let Some(ready) = &slot.ready {
                if now.duration_since(ready.fetched_at) < self.stale_after {
                    trace!(cache = self.name, key = ?key, "cache hit");
                    return Ok(ready.value.clone());
                }
            }

            match &mut slot.pending {
                Some(pending) => {
                    pending.waiters += 1;
                    trace!(cache = self.name, key = ?key, "joining in-flight fetch");
                    (pending.fetch.clone(), pending.generation)
                }
                None => {
                    let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
                    let shared = fetch().boxed().shared();
                    slot.pending = Some(Pending {
                        fetch: shared.clone(),
                        generation,
                        waiters: 1,
                    });
                    debug!(cache = self.name, key = ?key, generation, "starting fetch");
                    (shared, generation)
                }
            }
        };

        let mut waiter = Waiter {
            cache: self,
            key: &key,
            generation,
            finished: false,
        };
        let result = shared.await;
        waiter.finish(&result);
        result
    }

    /// Any held value for `key`, fresh or stale. Never fetches.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.slots
            .lock()
            .get(key)
            .and_then(|slot| slot.ready.as_ref())
            .map(|ready| ready.value.clone())
    }

    pub fn state(&self, key: &K) -> CacheState {
        let slots = self.slots.lock();
        let Some(slot) = slots.get(key) else {
            return CacheState::Missing;
        };
        if slot.pending.is_some() {
            return CacheState::Fetching;
        }
        match &slot.ready {
            Some(ready) if ready.fetched_at.elapsed() < self.stale_after => CacheState::Fresh,
            Some(_) => CacheState::Stale,
            None => CacheState::Missing,
        }
    }

    /// Drop the value and detach any pending fetch for `key`.
    ///
    /// Callers already awaiting the detached fetch still get its result, but
    /// it is not stored.
    pub fn invalidate(&self, key: &K) {
        if self.slots.lock().remove(key).is_some() {
            debug!(cache = self.name, key = ?key, "invalidated");
        }
    }

    pub fn clear(&self) {
        self.slots.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn evict_idle(&self, slots: &mut HashMap<K, Slot<V, E>>, now: Instant) {
        let evict_after = self.evict_after;
        let before = slots.len();
        slots.retain(|_, slot| {
            slot.pending.is_some() || now.duration_since(slot.last_access) < evict_after
        });
        let evicted = before - slots.len();
        if evicted > 0 {
            trace!(cache = self.name, evicted, "evicted idle entries");
        }
    }

    fn complete(&self, key: &K, generation: u64, result: &Result<V, E>) {
        let mut slots = self.slots.lock();
        let Some(slot) = slots.get_mut(key) else {
            return;
        };
        if slot.pending.as_ref().map(|p| p.generation) != Some(generation) {
            return;
        }
        slot.pending = None;
        match result {
            Ok(value) => {
                slot.ready = Some(Ready {
                    value: value.clone(),
                    fetched_at: Instant::now(),
                });
            }
            Err(_) => {
                debug!(cache = self.name, key = ?key, generation, "fetch failed, not cached");
                if slot.ready.is_none() {
                    slots.remove(key);
                }
            }
        }
    }

    fn abandon(&self, key: &K, generation: u64) {
        let mut slots = self.slots.lock();
        let Some(slot) = slots.get_mut(key) else {
            return;
        };
        let Some(pending) = slot.pending.as_mut() else {
            return;
        };
        if pending.generation != generation {
            return;
        }
        pending.waiters = pending.waiters.saturating_sub(1);
        if pending.waiters == 0 {
            slot.pending = None;
            debug!(cache = self.name, key = ?key, generation, "fetch abandoned by all callers");
            if slot.ready.is_none() {
                slots.remove(key);
            }
        }
    }
}

/// Tracks one caller's interest in a pending fetch.
struct Waiter<'a, K, V, E>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    cache: &'a QueryCache<K, V, E>,
    key: &'a K,
    generation: u64,
    finished: bool,
}

impl<K, V, E> Waiter<'_, K, V, E>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn finish(&mut self, result: &Result<V, E>) {
        self.finished = true;
        self.cache.complete(self.key, self.generation, result);
    }
}

impl<K, V, E> Drop for Waiter<'_, K, V, E>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        if !self.finished {
            self.cache.abandon(self.key, self.generation);
        }
    }
}
