use crate::{
    Clock, EngineSettings, Result as EngineResult, RetryConfig, Surface, SurfaceObserver,
    TimeEntrySnapshot, TimerEvent, TimerEventBus, TimerStore, with_retry,
};

use tt_core::TimeEntry;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::debug;
use tokio::sync::{RwLock, broadcast::Receiver};
use uuid::Uuid;

struct CachedTimers {
    entries: Vec<TimeEntry>,
    fetched_at: DateTime<Utc>,
}

/// Cached rows plus a per-user generation bumped by every invalidation. A
/// fill only lands if the generation it started under is still current.
#[derive(Default)]
struct TimerCache {
    users: HashMap<Uuid, CachedTimers>,
    generations: HashMap<Uuid, u64>,
}

impl TimerCache {
    fn fresh(&self, user_id: Uuid, now: DateTime<Utc>, ttl: Duration) -> Option<&[TimeEntry]> {
        self.users
            .get(&user_id)
            .filter(|cached| now - cached.fetched_at < ttl)
            .map(|cached| cached.entries.as_slice())
    }

    fn generation(&self, user_id: Uuid) -> u64 {
        self.generations.get(&user_id).copied().unwrap_or(0)
    }
}

struct CoordinatorInner {
    store: TimerStore,
    bus: TimerEventBus,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    overtime_seconds: i64,
    retry: RetryConfig,
    cache: RwLock<TimerCache>,
}

/// Shared view of each user's open timers for every surface that shows them.
///
/// Rows are cached per user for a short TTL. Snapshots are derived from the
/// cached rows and the current clock, so elapsed time keeps ticking between
/// refreshes. Mutations go through [`TimerCoordinator::notify`], which drops
/// the user's cache entry and publishes the event to subscribed surfaces.
/// A read that started before an invalidation never lands in the cache.
#[derive(Clone)]
pub struct TimerCoordinator {
    inner: Arc<CoordinatorInner>,
}

impl TimerCoordinator {
    pub fn new(store: TimerStore, clock: Arc<dyn Clock>, settings: &EngineSettings) -> Self {
        let ttl = Duration::from_std(settings.cache_ttl).unwrap_or_else(|_| Duration::seconds(1));

        Self {
            inner: Arc::new(CoordinatorInner {
                store,
                bus: TimerEventBus::new(settings.channel_capacity),
                clock,
                ttl,
                overtime_seconds: settings.overtime_seconds,
                retry: RetryConfig::default(),
                cache: RwLock::new(TimerCache::default()),
            }),
        }
    }

    pub fn bus(&self) -> &TimerEventBus {
        &self.inner.bus
    }

    /// Snapshots of the user's open timers, served from cache while fresh.
    pub async fn active_timers(&self, user_id: Uuid) -> EngineResult<Vec<TimeEntrySnapshot>> {
        let now = self.inner.clock.now();

        let generation = {
            let cache = self.inner.cache.read().await;
            if let Some(entries) = cache.fresh(user_id, now, self.inner.ttl) {
                return Ok(self.snapshots(entries, now));
            }
            cache.generation(user_id)
        };

        let entries = self.load(user_id).await?;
        let snapshots = self.snapshots(&entries, now);
        self.fill(user_id, generation, entries, now).await;

        Ok(snapshots)
    }

    /// Current invalidation generation for the user.
    pub async fn generation(&self, user_id: Uuid) -> u64 {
        self.inner.cache.read().await.generation(user_id)
    }

    /// Cache rows read under `generation`. Returns false, leaving the cache
    /// alone, when the user was invalidated after that read began.
    pub async fn fill(
        &self,
        user_id: Uuid,
        generation: u64,
        entries: Vec<TimeEntry>,
        fetched_at: DateTime<Utc>,
    ) -> bool {
        let mut cache = self.inner.cache.write().await;
        if cache.generation(user_id) != generation {
            debug!(
                "Dropped stale timer read for user {} (generation {})",
                user_id, generation
            );
            return false;
        }
        cache.users.insert(
            user_id,
            CachedTimers {
                entries,
                fetched_at,
            },
        );
        true
    }

    /// Cached snapshots while fresh, otherwise a storage read that is not
    /// cached. Used by observers, which never write the cache.
    pub async fn peek_timers(&self, user_id: Uuid) -> EngineResult<Vec<TimeEntrySnapshot>> {
        let now = self.inner.clock.now();

        {
            let cache = self.inner.cache.read().await;
            if let Some(entries) = cache.fresh(user_id, now, self.inner.ttl) {
                return Ok(self.snapshots(entries, now));
            }
        }

        self.fresh_timers(user_id).await
    }

    /// Snapshots read straight from storage. Leaves the cache untouched.
    pub async fn fresh_timers(&self, user_id: Uuid) -> EngineResult<Vec<TimeEntrySnapshot>> {
        let entries = self.load(user_id).await?;
        Ok(self.snapshots(&entries, self.inner.clock.now()))
    }

    pub async fn invalidate(&self, user_id: Uuid) {
        let mut cache = self.inner.cache.write().await;
        *cache.generations.entry(user_id).or_insert(0) += 1;
        if cache.users.remove(&user_id).is_some() {
            debug!("Invalidated cached timers for user {}", user_id);
        }
    }

    pub async fn is_cached(&self, user_id: Uuid) -> bool {
        self.inner.cache.read().await.users.contains_key(&user_id)
    }

    /// Invalidate the user's cache entry, then publish the event.
    pub async fn notify(&self, event: TimerEvent) -> usize {
        self.invalidate(event.user_id).await;
        self.inner.bus.publish(event).await
    }

    pub async fn subscribe(&self, user_id: Uuid, surface: Surface) -> SurfaceObserver {
        let receiver = self.inner.bus.subscribe(user_id).await;
        SurfaceObserver::new(surface, user_id, receiver, self.clone())
    }

    pub(crate) async fn unsubscribe(&self, user_id: Uuid, receiver: Receiver<TimerEvent>) {
        self.inner.bus.unsubscribe(user_id, receiver).await;
    }

    pub fn snapshot(&self, entry: &TimeEntry, now: DateTime<Utc>) -> TimeEntrySnapshot {
        TimeEntrySnapshot::capture(entry, now, self.inner.overtime_seconds)
    }

    fn snapshots(&self, entries: &[TimeEntry], now: DateTime<Utc>) -> Vec<TimeEntrySnapshot> {
        entries.iter().map(|e| self.snapshot(e, now)).collect()
    }

    async fn load(&self, user_id: Uuid) -> EngineResult<Vec<TimeEntry>> {
        let store = &self.inner.store;
        with_retry(&self.inner.retry, "find_open_timers", move || {
            store.find_open_timers(user_id)
        })
        .await
    }
}
