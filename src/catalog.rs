//! Catalog service - cache-aside coordination for movie records.
//!
//! This is the core of the crate: the component that keeps a key-value
//! cache and an authoritative document store mutually consistent around
//! reads, updates, and deletes. Everything else (backends, stores,
//! serialization) exists to serve the four operations here.
//!
//! # Consistency protocol
//!
//! - Reads are read-through: cache first, store on miss, then a
//!   best-effort cache write so the next read hits.
//! - Mutations are store-first: the store is updated, then the cache is
//!   refreshed (update) or evicted (delete). Never the reverse, so a crash
//!   between the two steps leaves the cache at worst stale, never holding
//!   a value the store never held. Staleness self-heals on the next
//!   read-through or at TTL expiry.
//! - Cache failures are soft everywhere: a request that can be answered
//!   from the store is answered from the store, and the failed cache
//!   operation is logged and counted, not propagated.
//! - A record that does not exist is `Error::NotFound`, a typed business
//!   outcome. Absence is never written to the cache as a negative entry.

use crate::backend::CacheBackend;
use crate::error::{Error, Result};
use crate::keys::legacy_movie_key;
use crate::movie::Movie;
use crate::observability::{CacheMetrics, NoOpMetrics};
use crate::serialization::{deserialize_from_cache, serialize_for_cache};
use crate::store::{MovieStore, StoreSession};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Time-to-live for every cache entry: one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Cap on listing results.
pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Cache-aside coordinator over a movie store and a cache backend.
///
/// The service holds no shared mutable state of its own; all methods take
/// `&self`, so request handlers share one instance behind `Arc`. Per-call
/// state lives in store sessions, acquired from the store's pool for the
/// duration of one operation and released on drop on every exit path.
///
/// # Example
///
/// ```
/// use marquee::{CatalogService, InMemoryBackend, MemoryStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> marquee::Result<()> {
/// let store = MemoryStore::new();
/// store.insert("tt0133093", "The Matrix");
///
/// let catalog = CatalogService::new(store, InMemoryBackend::new());
///
/// // First read misses the cache and populates it from the store
/// let movie = catalog.get_movie("tt0133093").await?;
/// assert_eq!(movie.title, "The Matrix");
///
/// // Second read is served from the cache
/// let again = catalog.get_movie("tt0133093").await?;
/// assert_eq!(again, movie);
/// # Ok(())
/// # }
/// ```
pub struct CatalogService<S: MovieStore, C: CacheBackend> {
    store: S,
    cache: C,
    metrics: Box<dyn CacheMetrics>,
    ttl: Duration,
    list_limit: usize,
}

impl<S: MovieStore, C: CacheBackend> CatalogService<S, C> {
    /// Create a new catalog service with default TTL (1 hour) and listing
    /// cap (10).
    pub fn new(store: S, cache: C) -> Self {
        CatalogService {
            store,
            cache,
            metrics: Box::new(NoOpMetrics),
            ttl: DEFAULT_TTL,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Override the cache entry TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Override the listing result cap.
    pub fn with_list_limit(mut self, limit: usize) -> Self {
        self.list_limit = limit;
        self
    }

    /// Get cache backend reference (for advanced use).
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Get store handle reference (for advanced use).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// List up to the configured cap of movies, Title projection only.
    ///
    /// The cache key is the caller-supplied listing token, verbatim. On a
    /// hit the store is never contacted. On a miss the listing is fetched
    /// from the store and written back with the configured TTL,
    /// best-effort. An empty listing is cached like any other result so an
    /// empty store is not re-queried for the same token.
    ///
    /// # Errors
    /// Propagates store failures on the miss path. Cache failures are
    /// logged and swallowed.
    pub async fn list_movies(&self, token: &str) -> Result<Vec<Movie>> {
        debug!("» List movies (token: {})", token);

        if let Some(listing) = self.cache_lookup::<Vec<Movie>>(token).await {
            return Ok(listing);
        }

        let mut session = self.store.session().await?;
        let listing = session.list_projected(self.list_limit).await?;
        // Session back to the pool before the cache round trip
        drop(session);

        self.cache_store(token, &listing).await;

        Ok(listing)
    }

    /// Fetch one movie by key, Title projection only.
    ///
    /// Read-through keyed by the record key, verbatim. A record the store
    /// does not hold is `Error::NotFound`; the absence is not cached, so a
    /// record created later under the same key is visible immediately.
    ///
    /// # Errors
    /// - `Error::NotFound` - no record under that key
    /// - store failures on the miss path propagate
    pub async fn get_movie(&self, key: &str) -> Result<Movie> {
        debug!("» Get movie {}", key);

        if let Some(movie) = self.cache_lookup::<Movie>(key).await {
            return Ok(movie);
        }

        let mut session = self.store.session().await?;
        let found = session.find_one_projected(key).await?;
        drop(session);

        match found {
            Some(movie) => {
                self.cache_store(key, &movie).await;
                Ok(movie)
            }
            None => {
                debug!("✗ No movie under key {}", key);
                Err(Error::NotFound)
            }
        }
    }

    /// Set a movie's title and return the record as the store now holds it.
    ///
    /// The store is updated first. When the key matches nothing the result
    /// is `Error::NotFound` and the cache is left untouched. When it
    /// matches, the record is read back on the same session (the cache
    /// gets what the store holds, not an echo of the input), then the
    /// cache entry is evicted and rewritten with a fresh TTL, both
    /// best-effort.
    ///
    /// Listing entries that contain this movie are not invalidated; they
    /// serve the old title until their TTL expires.
    ///
    /// # Errors
    /// - `Error::NotFound` - no record matched, or a concurrent delete
    ///   removed it between update and read-back
    /// - store failures propagate; cache failures are logged and swallowed
    pub async fn update_title(&self, key: &str, new_title: &str) -> Result<Movie> {
        debug!("» Update movie {} (title: {})", key, new_title);

        // One session covers the update and the read-back
        let mut session = self.store.session().await?;

        let matched = session.update_title(key, new_title).await?;
        if matched == 0 {
            debug!("✗ Update matched nothing for {}", key);
            return Err(Error::NotFound);
        }

        let updated = match session.find_one_projected(key).await? {
            Some(movie) => movie,
            None => {
                // A concurrent delete won the race between update and
                // read-back; its cleanup owns the cache entry.
                warn!("⚠ Movie {} vanished between update and read-back", key);
                return Err(Error::NotFound);
            }
        };
        drop(session);

        // Delete-then-set: a concurrent reader sees the old entry, an
        // absent entry, or the fresh one, never a torn state.
        self.cache_evict(key).await;
        self.cache_store(key, &updated).await;

        info!("✓ Movie {} updated", key);
        Ok(updated)
    }

    /// Delete a movie by key.
    ///
    /// The store delete runs first. When nothing was deleted the result is
    /// `Error::NotFound` and the cache is left untouched. When a record
    /// was deleted, the cache entry under the key is evicted, and so is
    /// the legacy `movie:{key}` entry a predecessor service may have
    /// written. Both evictions are best-effort; a lingering entry dies at
    /// TTL expiry.
    ///
    /// Not idempotent at the store level: deleting an already-deleted key
    /// reports `Error::NotFound`.
    ///
    /// # Errors
    /// - `Error::NotFound` - no record under that key
    /// - store failures propagate; cache failures are logged and swallowed
    pub async fn delete_movie(&self, key: &str) -> Result<()> {
        debug!("» Delete movie {}", key);

        let mut session = self.store.session().await?;
        let deleted = session.delete_one(key).await?;
        drop(session);

        if deleted == 0 {
            debug!("✗ Delete matched nothing for {}", key);
            return Err(Error::NotFound);
        }

        self.cache_evict(key).await;
        // Sweep the namespace a predecessor service wrote under
        self.cache_evict(&legacy_movie_key(key)).await;

        info!("✓ Movie {} deleted", key);
        Ok(())
    }

    /// Cache read that can only produce a value or a miss.
    ///
    /// Backend failures and undecodable entries (corrupt bytes, foreign
    /// magic, stale schema version) are logged, counted through metrics,
    /// and folded into the miss outcome. The read-through that follows a
    /// miss overwrites a bad entry with a good one.
    async fn cache_lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let timer = Instant::now();

        let bytes = match self.cache.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                self.metrics.record_miss(key, timer.elapsed());
                debug!("✗ Cache miss for {}", key);
                return None;
            }
            Err(e) => {
                self.metrics.record_error(key, &e.to_string());
                warn!("⚠ Cache read failed for {}, serving from store: {}", key, e);
                return None;
            }
        };

        match deserialize_from_cache::<T>(&bytes) {
            Ok(value) => {
                self.metrics.record_hit(key, timer.elapsed());
                debug!("✓ Cache hit for {}", key);
                Some(value)
            }
            Err(e) => {
                self.metrics.record_error(key, &e.to_string());
                self.metrics.record_miss(key, timer.elapsed());
                warn!("⚠ Discarding undecodable cache entry for {}: {}", key, e);
                None
            }
        }
    }

    /// Best-effort cache write with the configured TTL.
    ///
    /// Serialization and backend failures are logged and counted, never
    /// returned; the caller already holds the value it came for.
    async fn cache_store<T: Serialize>(&self, key: &str, value: &T) {
        let timer = Instant::now();

        let bytes = match serialize_for_cache(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.metrics.record_error(key, &e.to_string());
                warn!("⚠ Skipping cache write for {}: {}", key, e);
                return;
            }
        };

        match self.cache.set(key, bytes, self.ttl).await {
            Ok(()) => self.metrics.record_set(key, timer.elapsed()),
            Err(e) => {
                self.metrics.record_error(key, &e.to_string());
                warn!("⚠ Cache write failed for {}: {}", key, e);
            }
        }
    }

    /// Best-effort cache eviction.
    async fn cache_evict(&self, key: &str) {
        let timer = Instant::now();

        match self.cache.delete(key).await {
            Ok(()) => self.metrics.record_delete(key, timer.elapsed()),
            Err(e) => {
                self.metrics.record_error(key, &e.to_string());
                warn!("⚠ Cache eviction failed for {}: {}", key, e);
            }
        }
    }
}
