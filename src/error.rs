//! Error types for the catalog service.

use std::fmt;

/// Result type for catalog and cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the catalog service.
///
/// All operations return `Result<T>` where `Result` is defined as `std::result::Result<T, Error>`.
/// The taxonomy separates the one business outcome (`NotFound`) from
/// infrastructure failures, so callers can map outcomes without string
/// matching: `is_not_found()` means "the record does not exist", anything
/// else means "something broke".
#[derive(Debug, Clone)]
pub enum Error {
    /// The requested record does not exist in the durable store.
    ///
    /// This is a business condition, not a failure. Raised when:
    /// - A get targets a key with no document
    /// - An update matches zero documents
    /// - A delete removes zero documents
    ///
    /// Routing layers should map this to a 404-class response. It is never
    /// cached as a negative entry.
    NotFound,

    /// The durable store could not be reached or refused the session.
    ///
    /// Common causes:
    /// - Store connection lost or pool exhausted
    /// - Authentication failure
    /// - Store server error
    ///
    /// **Recovery:** retry after connection recovery. The cache is never
    /// consulted as a substitute for a failed store on the miss path.
    StoreUnavailable(String),

    /// A store operation exceeded its deadline.
    ///
    /// Common causes:
    /// - Network latency
    /// - Slow query on the store side
    /// - Store overload
    StoreTimeout(String),

    /// The cache backend is unavailable or returned an error.
    ///
    /// Common causes:
    /// - Redis connection lost
    /// - Network timeout
    /// - Backend storage full
    ///
    /// The coordinator treats this as soft on every path: reads fall
    /// through to the store, writes and evictions are logged and skipped.
    /// Callers only see this variant when talking to a backend directly.
    CacheUnavailable(String),

    /// Serialization failed when converting a record to cache bytes.
    ///
    /// This occurs when the serde/postcard encoding fails. A record that
    /// cannot be encoded is served from the store and simply not cached.
    SerializationError(String),

    /// Deserialization failed when converting cache bytes to a record.
    ///
    /// This indicates corrupted or malformed data in the cache.
    /// Common causes:
    /// - Cache was corrupted during transport or storage
    /// - Invalid Postcard encoding
    /// - Incomplete data read from backend
    ///
    /// **Recovery:** the coordinator treats the entry as a miss and
    /// overwrites it from the store on the next read-through.
    DeserializationError(String),

    /// Invalid cache entry: corrupted envelope or bad magic.
    ///
    /// Returned when:
    /// - Magic header is not `b"MRQE"`
    /// - Envelope deserialization fails
    /// - A foreign writer shares the cache keyspace
    ///
    /// **Recovery:** treated as a miss, same as `DeserializationError`.
    InvalidCacheEntry(String),

    /// Schema version mismatch between code and cached data.
    ///
    /// Raised when:
    /// - `CURRENT_SCHEMA_VERSION` changed
    /// - Struct fields were added/removed/reordered
    ///
    /// **Recovery:** treated as a miss; the entry is overwritten on the
    /// next read-through. Expected during rolling deployments.
    VersionMismatch {
        /// Expected schema version (from compiled code)
        expected: u32,
        /// Found schema version (from cached entry)
        found: u32,
    },

    /// Configuration error during adapter construction.
    ///
    /// Common causes:
    /// - Invalid connection string
    /// - Missing required configuration
    ///
    /// **Recovery:** fix configuration and restart.
    ConfigError(String),

    /// Generic error with custom message.
    ///
    /// Used for errors that don't fit into other variants.
    Other(String),
}

impl Error {
    /// True when the error is the business `NotFound` outcome rather than
    /// an infrastructure failure. Routing layers branch on this to pick
    /// 404 over 500.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }

    /// True when the error came from the cache side and the coordinator
    /// would have degraded to the store instead of failing the request.
    pub fn is_cache_soft(&self) -> bool {
        matches!(
            self,
            Error::CacheUnavailable(_)
                | Error::SerializationError(_)
                | Error::DeserializationError(_)
                | Error::InvalidCacheEntry(_)
                | Error::VersionMismatch { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "Record not found"),
            Error::StoreUnavailable(msg) => write!(f, "Store unavailable: {}", msg),
            Error::StoreTimeout(msg) => write!(f, "Store timeout: {}", msg),
            Error::CacheUnavailable(msg) => write!(f, "Cache unavailable: {}", msg),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::InvalidCacheEntry(msg) => {
                write!(f, "Invalid cache entry: {}", msg)
            }
            Error::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Cache version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for Error {
    fn from(e: redis::RedisError) -> Self {
        Error::CacheUnavailable(format!("Redis error: {}", e))
    }
}
