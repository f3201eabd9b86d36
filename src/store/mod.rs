//! Durable store access for the catalog.
//!
//! The `MovieStore` trait decouples the catalog service from any specific
//! document database. Implementations plug in MongoDB, SQL, or the
//! in-memory store provided here for tests; the catalog only ever sees
//! sessions and the four operations below.
//!
//! # Session model
//!
//! Stores do not expose operations directly. A catalog call asks the store
//! for a [`StoreSession`], runs its one or two operations on it, and drops
//! it. Dropping a session returns its slot to the store's pool; that holds
//! on every exit path, including early returns through `?` and futures
//! cancelled mid-call. No code path can leak a session by forgetting to
//! close it, and no two requests can trample a shared connection handle.
//!
//! A session is also the consistency scope: an update and its follow-up
//! read-back run on the same session, so the read-back observes at least
//! the session's own write.
//!
//! # Implementing MovieStore
//!
//! Implement both traits for any storage backend:
//! - Document stores: MongoDB, DynamoDB, Firestore
//! - SQL databases: SQLx, tokio-postgres
//! - In-memory: `MemoryStore` in this module, for tests and examples
//!
//! # Error Handling
//!
//! When implementing the traits for real databases, return:
//! - `Error::StoreUnavailable` for connectivity, auth, and pool failures
//! - `Error::StoreTimeout` for operations that exceed their deadline
//!
//! "Record not found" is never a session error: `find_one_projected`
//! returns `Ok(None)` and the count-returning operations return `Ok(0)`.
//! The catalog service turns those into its own `NotFound`.

use crate::error::Result;
use crate::movie::Movie;

pub mod memory;

pub use memory::MemoryStore;

/// Trait for durable store handles.
///
/// A store handle is cheap to clone and shared across request tasks; all
/// per-request state lives in the sessions it hands out.
#[allow(async_fn_in_trait)]
pub trait MovieStore: Send + Sync + Clone {
    /// The session type this store hands out.
    type Session: StoreSession;

    /// Acquire a session scoped to one catalog call.
    ///
    /// Waits for a free slot when the pool is exhausted.
    ///
    /// # Errors
    /// Returns `Error::StoreUnavailable` if the store cannot produce a
    /// session (pool closed, connection refused, auth failure).
    async fn session(&self) -> Result<Self::Session>;
}

/// Operations available on an acquired store session.
///
/// All operations work on the Title projection; the store may hold richer
/// documents but never ships them across this boundary.
#[allow(async_fn_in_trait)]
pub trait StoreSession: Send {
    /// Fetch up to `limit` records, Title projection only.
    ///
    /// Order is the store's natural order; callers treat it as unspecified
    /// but stable for an unchanged store.
    ///
    /// # Errors
    /// Returns `Err` if the store operation fails.
    async fn list_projected(&mut self, limit: usize) -> Result<Vec<Movie>>;

    /// Fetch one record by key, Title projection only.
    ///
    /// # Returns
    /// - `Ok(Some(movie))` - record found
    /// - `Ok(None)` - no record under that key (not an error)
    ///
    /// # Errors
    /// Returns `Err` if the store operation fails.
    async fn find_one_projected(&mut self, key: &str) -> Result<Option<Movie>>;

    /// Set the title of the record under `key`.
    ///
    /// # Returns
    /// The matched count: 1 if a record existed under the key, 0 if not.
    /// A no-op title (same value) still counts as matched.
    ///
    /// # Errors
    /// Returns `Err` if the store operation fails.
    async fn update_title(&mut self, key: &str, title: &str) -> Result<u64>;

    /// Delete the record under `key`.
    ///
    /// # Returns
    /// The deleted count: 1 if a record was removed, 0 if none existed.
    ///
    /// # Errors
    /// Returns `Err` if the store operation fails.
    async fn delete_one(&mut self, key: &str) -> Result<u64>;
}
