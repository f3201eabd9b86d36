//! Cache key conventions for the catalog.
//!
//! Record keys and listing tokens are used verbatim as cache keys. That is
//! deliberate: the cache keyspace predates this crate, and a previous
//! deployment already populated it with entries keyed by raw record ids and
//! raw action tokens. Prefixing now would orphan every live entry.
//!
//! A consequence worth knowing: a listing key is whatever token the caller
//! sends, with no derivation from the query it caches. Two clients sending
//! different tokens for the same logical listing each pay their own store
//! miss, and a client reusing a token for a different query gets the old
//! token's entry until it expires. Callers own their token discipline.
//!
//! One prefixed namespace survives from an even older deployment:
//! `movie:{key}` entries written by a predecessor service. Nothing writes
//! that namespace anymore, but deletes still clear it so a removed record
//! cannot be resurrected from a stale legacy entry.

/// Prefix of the legacy per-record namespace.
pub const LEGACY_MOVIE_PREFIX: &str = "movie";

/// Build the legacy cache key for a record, `movie:{key}`.
///
/// Used only by the delete path to sweep entries a predecessor service may
/// have left behind.
pub fn legacy_movie_key(key: &str) -> String {
    format!("{}:{}", LEGACY_MOVIE_PREFIX, key)
}
