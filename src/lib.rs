//! # marquee
//!
//! A cache-aside movie catalog: an authoritative document store fronted by
//! a TTL'd key-value cache, with the consistency protocol between the two
//! as the core of the crate.
//!
//! ## Features
//!
//! - **Read-through reads:** cache first, store on miss, best-effort
//!   write-back so the next read hits
//! - **Store-first mutations:** update and delete hit the store, then
//!   refresh or evict the cache; a crash between the two leaves the cache
//!   stale at worst, never wrong-ahead of the store
//! - **Soft cache failures:** a down or corrupt cache degrades every
//!   operation to store-only instead of failing it
//! - **Typed outcomes:** `Error::NotFound` is a business result, separate
//!   from store and cache infrastructure failures
//! - **Pooled store sessions:** one scoped session per operation, released
//!   on drop on every exit path
//! - **Backend Agnostic:** in-memory cache and store included; Redis cache
//!   behind the `redis` feature; bring your own document store
//!
//! ## Quick Start
//!
//! ```
//! use marquee::{CatalogService, InMemoryBackend, MemoryStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> marquee::Result<()> {
//! let store = MemoryStore::new();
//! store.insert("tt0133093", "The Matrix");
//!
//! let catalog = CatalogService::new(store, InMemoryBackend::new());
//!
//! // Read-through: miss, store fetch, cache write-back
//! let movie = catalog.get_movie("tt0133093").await?;
//! assert_eq!(movie.title, "The Matrix");
//!
//! // Store-first update, then cache refresh with a new TTL
//! let updated = catalog.update_title("tt0133093", "The Matrix Reloaded").await?;
//! assert_eq!(updated.title, "The Matrix Reloaded");
//!
//! // Listings are cached under the caller's token, verbatim
//! let listing = catalog.list_movies("popular").await?;
//! assert_eq!(listing.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! Handlers share one service behind `Arc`; all methods take `&self`.

#[macro_use]
extern crate log;

pub mod backend;
pub mod catalog;
pub mod error;
pub mod keys;
pub mod movie;
pub mod observability;
pub mod serialization;
pub mod store;

// Re-exports for convenience
pub use backend::{CacheBackend, InMemoryBackend};
pub use catalog::{CatalogService, DEFAULT_LIST_LIMIT, DEFAULT_TTL};
pub use error::{Error, Result};
pub use movie::Movie;
pub use observability::{CacheMetrics, NoOpMetrics};
pub use store::{MemoryStore, MovieStore, StoreSession};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
