//! Postcard-based cache serialization with versioned envelopes.
//!
//! This module provides the canonical encoding for everything marquee puts
//! in a cache: single records and bounded listings alike. Payloads are
//! Postcard for speed and size, wrapped in a versioned envelope so that
//! corrupt bytes, foreign writers, and schema drift are detected before a
//! payload ever reaches the catalog service.
//!
//! # Format
//!
//! Every cache entry follows this layout:
//! ```text
//! ┌─────────────────┬─────────────────┬──────────────────────────┐
//! │  MAGIC (4 bytes)│VERSION (varint) │POSTCARD PAYLOAD (N bytes)│
//! └─────────────────┴─────────────────┴──────────────────────────┘
//!   "MRQE"              u32                postcard::to_allocvec(T)
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic:** the same value always produces identical bytes
//! - **Validated:** magic and version checked on every deserialization
//! - **Versioned:** schema changes force eviction, never silent migration
//!
//! Validation failures map onto the error taxonomy the catalog service
//! folds into its treated-as-miss policy; see [`deserialize_from_cache`].
//!
//! # Example
//!
//! ```rust
//! use marquee::serialization::{serialize_for_cache, deserialize_from_cache};
//! use marquee::Movie;
//!
//! # fn main() -> marquee::Result<()> {
//! let movie = Movie::new("tt0133093", "The Matrix");
//!
//! let bytes = serialize_for_cache(&movie)?;
//! assert_eq!(&bytes[0..4], b"MRQE");
//!
//! let decoded: Movie = deserialize_from_cache(&bytes)?;
//! assert_eq!(movie, decoded);
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Magic header for marquee cache entries: b"MRQE"
///
/// This 4-byte signature identifies entries written by this crate. The
/// cache keyspace is shared with older writers (see `crate::keys`), so any
/// entry without this magic is rejected during deserialization.
pub const CACHE_MAGIC: [u8; 4] = *b"MRQE";

/// Current schema version.
///
/// **CRITICAL:** Increment this constant when making breaking changes to cached types:
/// - Adding/removing fields on `Movie`
/// - Changing field types
/// - Reordering fields
///
/// When deployed with a new version, old cache entries are rejected with
/// `Error::VersionMismatch` and recomputed from the durable store.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Versioned envelope for cache entries.
///
/// Every cache entry is wrapped in this envelope to enable:
/// - **Corruption detection:** invalid magic → reject entry
/// - **Schema evolution:** version mismatch → evict and recompute
/// - **Observability:** decode failures surface through cache metrics
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CacheEnvelope<T> {
    /// Magic header: must be b"MRQE"
    pub magic: [u8; 4],
    /// Schema version: must match CURRENT_SCHEMA_VERSION
    pub version: u32,
    /// The actual cached data
    pub payload: T,
}

impl<T> CacheEnvelope<T> {
    /// Create a new envelope with current magic and version.
    pub fn new(payload: T) -> Self {
        Self {
            magic: CACHE_MAGIC,
            version: CURRENT_SCHEMA_VERSION,
            payload,
        }
    }
}

/// Serialize a value with envelope for cache storage.
///
/// This is the canonical way to produce cache bytes in marquee. Both
/// bundled backends store exactly what this function returns.
///
/// # Errors
///
/// Returns `Error::SerializationError` if Postcard serialization fails.
/// The catalog service treats that as "serve from store, skip the cache
/// write" rather than failing the request.
pub fn serialize_for_cache<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let envelope = CacheEnvelope::new(value);
    postcard::to_allocvec(&envelope).map_err(|e| {
        log::error!("Cache serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Deserialize a value from cache storage with validation.
///
/// Performs strict validation before handing bytes to the caller:
/// 1. Envelope must decode as Postcard
/// 2. Magic header must be b"MRQE"
/// 3. Version must match CURRENT_SCHEMA_VERSION
///
/// # Errors
///
/// - `Error::DeserializationError`: corrupted Postcard payload
/// - `Error::InvalidCacheEntry`: foreign or corrupted magic header
/// - `Error::VersionMismatch`: entry written by a different schema version
///
/// All three mean the same thing to the catalog service: treat the entry
/// as a miss and let the next read-through overwrite it.
pub fn deserialize_from_cache<'de, T: Deserialize<'de>>(bytes: &'de [u8]) -> Result<T> {
    let envelope: CacheEnvelope<T> = postcard::from_bytes(bytes).map_err(|e| {
        log::error!("Cache deserialization failed: {}", e);
        Error::DeserializationError(e.to_string())
    })?;

    if envelope.magic != CACHE_MAGIC {
        log::warn!(
            "Invalid cache entry: expected magic {:?}, got {:?}",
            CACHE_MAGIC,
            envelope.magic
        );
        return Err(Error::InvalidCacheEntry(format!(
            "Invalid magic: expected {:?}, got {:?}",
            CACHE_MAGIC, envelope.magic
        )));
    }

    if envelope.version != CURRENT_SCHEMA_VERSION {
        log::warn!(
            "Cache version mismatch: expected {}, got {}",
            CURRENT_SCHEMA_VERSION,
            envelope.version
        );
        return Err(Error::VersionMismatch {
            expected: CURRENT_SCHEMA_VERSION,
            found: envelope.version,
        });
    }

    Ok(envelope.payload)
}
