//! The movie record as the catalog caches and serves it.

use serde::{Deserialize, Serialize};

/// Title projection of a catalog document.
///
/// The durable store may hold richer documents (ratings, cast, plot); the
/// catalog service only ever reads and caches this projection. `id` is
/// assigned by the store at creation and never changes afterwards, which is
/// what makes it safe as a verbatim cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Store-assigned identifier, opaque to the catalog.
    pub id: String,
    /// Current title. The only field updates may change.
    pub title: String,
}

impl Movie {
    /// Build a projection from its two fields.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}
