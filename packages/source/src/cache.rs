//! Keyed time-to-live cache for fetched records.
//!
//! Fetching is the only expensive step in the pipeline, so repeated reports
//! within the TTL reuse the last load for the same city and source. Scoring
//! is never cached; it is recomputed from the cached records every time.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use air_health_air_models::RawPollutantRecord;

use crate::city_def::CityDefinition;
use crate::{RecordSource, SourceError};

/// Default time-to-live for cached loads.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// A map whose entries expire `ttl` after insertion.
///
/// Callers pass `now` explicitly so expiry is deterministic under test.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, (Instant, V)>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Returns the configured time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the value for `key` if it was inserted less than `ttl` before
    /// `now`.
    #[must_use]
    pub fn get(&self, key: &K, now: Instant) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|(inserted, _)| now.saturating_duration_since(*inserted) < self.ttl)
            .map(|(_, value)| value)
    }

    /// Inserts or replaces the value for `key`, stamped at `now`.
    pub fn insert(&mut self, key: K, value: V, now: Instant) {
        self.entries.insert(key, (now, value));
    }

    /// Drops entries that have expired as of `now`, returning how many were
    /// removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, (inserted, _)| now.saturating_duration_since(*inserted) < ttl);
        before - self.entries.len()
    }

    /// Number of entries, including expired ones not yet purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cache key: which city, loaded through which source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source_id: String,
    pub city_id: String,
}

/// A [`RecordSource`] wrapper that memoizes loads per city for a TTL.
pub struct CachedSource<S> {
    inner: S,
    cache: Mutex<TtlCache<CacheKey, Vec<RawPollutantRecord>>>,
}

impl<S: RecordSource> CachedSource<S> {
    /// Wraps `inner` with a cache of the given TTL.
    #[must_use]
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Mutex::new(TtlCache::new(ttl)),
        }
    }

    /// Returns the wrapped source.
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Loads `city`, serving from the cache if the entry is younger than
    /// the TTL as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] from the wrapped source on a cache miss.
    /// Failed loads are not cached.
    pub fn load_at(
        &self,
        city: &CityDefinition,
        now: Instant,
    ) -> Result<Vec<RawPollutantRecord>, SourceError> {
        let key = CacheKey {
            source_id: self.inner.id().to_string(),
            city_id: city.id.clone(),
        };

        if let Some(records) = self.lock().get(&key, now) {
            log::debug!("[{}] Cache hit ({} records)", city.id, records.len());
            return Ok(records.clone());
        }

        log::debug!("[{}] Cache miss, loading from {}", city.id, self.inner.id());
        let records = self.inner.load(city)?;

        let mut cache = self.lock();
        let purged = cache.purge_expired(now);
        if purged > 0 {
            log::debug!("Purged {purged} expired load(s), {} remaining", cache.len());
        }
        log::debug!(
            "[{}] Caching {} record(s) for {:?}",
            city.id,
            records.len(),
            cache.ttl()
        );
        cache.insert(key, records.clone(), now);

        Ok(records)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TtlCache<CacheKey, Vec<RawPollutantRecord>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: RecordSource> RecordSource for CachedSource<S> {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn load(&self, city: &CityDefinition) -> Result<Vec<RawPollutantRecord>, SourceError> {
        self.load_at(city, Instant::now())
    }
}
