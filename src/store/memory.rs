//! In-memory movie store with a bounded session pool.
//!
//! Backs tests and examples without a database. The document set is a
//! DashMap keyed by record id; sessions draw permits from a tokio
//! semaphore so the pool discipline of a real store (bounded concurrency,
//! release on drop) is observable even in memory.

use super::{MovieStore, StoreSession};
use crate::error::{Error, Result};
use crate::movie::Movie;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Default number of concurrent sessions, matching the default size of the
/// Redis connection pool on the cache side.
const DEFAULT_SESSION_LIMIT: usize = 16;

/// Thread-safe in-memory movie store.
///
/// Clones share both the document set and the session pool, so a store
/// handle can be handed to every request task the way a database client
/// would be.
///
/// # Example
///
/// ```
/// use marquee::store::{MemoryStore, MovieStore, StoreSession};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> marquee::Result<()> {
/// let store = MemoryStore::new();
/// store.insert("tt0133093", "The Matrix");
///
/// let mut session = store.session().await?;
/// let movie = session.find_one_projected("tt0133093").await?;
/// assert_eq!(movie.map(|m| m.title), Some("The Matrix".to_string()));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MemoryStore {
    documents: Arc<DashMap<String, String>>,
    sessions: Arc<Semaphore>,
}

impl MemoryStore {
    /// Create an empty store with the default session limit.
    pub fn new() -> Self {
        Self::with_session_limit(DEFAULT_SESSION_LIMIT)
    }

    /// Create an empty store with a specific session limit.
    ///
    /// Tests use small limits to observe pool exhaustion and release.
    pub fn with_session_limit(limit: usize) -> Self {
        MemoryStore {
            documents: Arc::new(DashMap::new()),
            sessions: Arc::new(Semaphore::new(limit)),
        }
    }

    /// Insert or replace a document.
    pub fn insert(&self, key: impl Into<String>, title: impl Into<String>) {
        self.documents.insert(key.into(), title.into());
    }

    /// Number of documents in the store.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True if the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of session slots currently free.
    pub fn available_sessions(&self) -> usize {
        self.sessions.available_permits()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MovieStore for MemoryStore {
    type Session = MemorySession;

    async fn session(&self) -> Result<Self::Session> {
        let permit = self
            .sessions
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| Error::StoreUnavailable(format!("Session pool closed: {}", e)))?;

        debug!("» MemoryStore session acquired");
        Ok(MemorySession {
            documents: Arc::clone(&self.documents),
            _permit: permit,
        })
    }
}

/// A session against [`MemoryStore`].
///
/// Holds one pool permit; the permit returns to the pool when the session
/// drops, whatever path dropped it.
pub struct MemorySession {
    documents: Arc<DashMap<String, String>>,
    _permit: OwnedSemaphorePermit,
}

impl StoreSession for MemorySession {
    async fn list_projected(&mut self, limit: usize) -> Result<Vec<Movie>> {
        let mut movies: Vec<Movie> = self
            .documents
            .iter()
            .map(|entry| Movie::new(entry.key().clone(), entry.value().clone()))
            .collect();

        // DashMap iteration order is arbitrary; sort by id so the store's
        // natural order is stable for an unchanged document set.
        movies.sort_by(|a, b| a.id.cmp(&b.id));
        movies.truncate(limit);
        Ok(movies)
    }

    async fn find_one_projected(&mut self, key: &str) -> Result<Option<Movie>> {
        Ok(self
            .documents
            .get(key)
            .map(|entry| Movie::new(key, entry.value().clone())))
    }

    async fn update_title(&mut self, key: &str, title: &str) -> Result<u64> {
        match self.documents.get_mut(key) {
            Some(mut entry) => {
                *entry = title.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_one(&mut self, key: &str) -> Result<u64> {
        Ok(self.documents.remove(key).map(|_| 1).unwrap_or(0))
    }
}
