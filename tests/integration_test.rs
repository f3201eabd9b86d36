//! Integration tests for marquee
//!
//! These tests run the full catalog stack end to end: `CatalogService` over
//! a `MemoryStore` and an `InMemoryBackend`, exercising the read-through,
//! write, and eviction flows together.

use marquee::backend::{CacheBackend, InMemoryBackend};
use marquee::store::MemoryStore;
use marquee::{CatalogService, Error, Movie};
use std::sync::Arc;
use std::time::Duration;

fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .try_init();
}

fn service_with(
    movies: &[(&str, &str)],
) -> CatalogService<MemoryStore, InMemoryBackend> {
    let store = MemoryStore::new();
    for (id, title) in movies {
        store.insert(*id, *title);
    }
    CatalogService::new(store, InMemoryBackend::new())
}

/// Test 1: Update Propagates Through the Cache
///
/// The canonical flow:
/// - Read a movie (populates the cache)
/// - Update its title
/// - Read it again and observe the new title, not the cached old one
#[tokio::test]
async fn test_update_visible_after_cached_read() {
    init_logging();
    let service = service_with(&[("tt0133093", "The Matrix")]);

    let first = service
        .get_movie("tt0133093")
        .await
        .expect("first read should succeed");
    assert_eq!(first.title, "The Matrix");

    // The entry is now cached; prove it by checking the backend directly.
    assert!(
        service
            .cache()
            .get("tt0133093")
            .await
            .unwrap()
            .is_some(),
        "Read-through should have populated the cache"
    );

    let updated = service
        .update_title("tt0133093", "The Matrix Reloaded")
        .await
        .expect("update should succeed");
    assert_eq!(updated.title, "The Matrix Reloaded");

    // The next read must not serve the stale pre-update title.
    let second = service
        .get_movie("tt0133093")
        .await
        .expect("post-update read should succeed");
    assert_eq!(
        second.title, "The Matrix Reloaded",
        "Cached pre-update title must not survive the update"
    );
}

/// Test 2: Delete Then Get
///
/// After a delete, the movie is gone from both store and cache:
/// - Read (cache populated), delete, read again → NotFound
/// - Backend no longer holds the key
#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    init_logging();
    let service = service_with(&[("tt0068646", "The Godfather")]);

    service
        .get_movie("tt0068646")
        .await
        .expect("seed read should succeed");
    assert!(service.cache().get("tt0068646").await.unwrap().is_some());

    service
        .delete_movie("tt0068646")
        .await
        .expect("delete should succeed");

    assert!(
        service.cache().get("tt0068646").await.unwrap().is_none(),
        "Delete should evict the cached entry"
    );
    assert!(matches!(
        service.get_movie("tt0068646").await,
        Err(Error::NotFound)
    ));
}

/// Test 3: Double Delete
///
/// The second delete of the same key reports NotFound rather than
/// silently succeeding.
#[tokio::test]
async fn test_double_delete_reports_not_found() {
    init_logging();
    let service = service_with(&[("tt0110912", "Pulp Fiction")]);

    service
        .delete_movie("tt0110912")
        .await
        .expect("first delete should succeed");
    assert!(matches!(
        service.delete_movie("tt0110912").await,
        Err(Error::NotFound)
    ));
}

/// Test 4: Missing Movie Leaves No Cache Entry
///
/// A read for an absent key returns NotFound and must not plant a
/// negative entry: once the movie appears in the store, the same read
/// succeeds immediately.
#[tokio::test]
async fn test_miss_is_not_cached_negatively() {
    init_logging();
    let store = MemoryStore::new();
    let service = CatalogService::new(store.clone(), InMemoryBackend::new());

    assert!(matches!(
        service.get_movie("tt0137523").await,
        Err(Error::NotFound)
    ));
    assert!(
        service.cache().get("tt0137523").await.unwrap().is_none(),
        "NotFound must not leave a cache entry behind"
    );

    store.insert("tt0137523", "Fight Club");
    let found = service
        .get_movie("tt0137523")
        .await
        .expect("read after insert should succeed");
    assert_eq!(found.title, "Fight Club");
}

/// Test 5: Empty Listings Are Cached
///
/// An empty catalog is a valid result. The empty listing is cached under
/// its token, and movies inserted afterwards stay invisible to that token
/// until the entry expires.
#[tokio::test]
async fn test_empty_listing_cached_under_token() {
    init_logging();
    let store = MemoryStore::new();
    let service = CatalogService::new(store.clone(), InMemoryBackend::new());

    let listing = service
        .list_movies("catalog:all")
        .await
        .expect("empty listing should succeed");
    assert!(listing.is_empty());
    assert!(
        service.cache().get("catalog:all").await.unwrap().is_some(),
        "Empty listing should still be cached"
    );

    // New inserts do not appear under the cached token.
    store.insert("tt1375666", "Inception");
    let cached = service
        .list_movies("catalog:all")
        .await
        .expect("cached listing should succeed");
    assert!(
        cached.is_empty(),
        "Cached empty listing should be served until it expires"
    );
}

/// Test 6: Listing Staleness Is Bounded by TTL
///
/// A cached listing outlives a store change only until its TTL lapses;
/// the next read repopulates from the store.
#[tokio::test]
async fn test_listing_refreshes_after_ttl() {
    init_logging();
    let store = MemoryStore::new();
    store.insert("tt0133093", "The Matrix");
    let service = CatalogService::new(store.clone(), InMemoryBackend::new())
        .with_ttl(Duration::from_millis(100));

    let first = service.list_movies("catalog:all").await.unwrap();
    assert_eq!(first.len(), 1);

    store.insert("tt0234215", "The Matrix Reloaded");

    // Still inside the TTL window: the stale listing is served.
    let stale = service.list_movies("catalog:all").await.unwrap();
    assert_eq!(stale.len(), 1, "Listing should be served from cache");

    tokio::time::sleep(Duration::from_millis(150)).await;

    let fresh = service.list_movies("catalog:all").await.unwrap();
    assert_eq!(
        fresh.len(),
        2,
        "Expired listing should be rebuilt from the store"
    );
}

/// Test 7: Read Your Writes
///
/// An update's returned movie matches what a subsequent read reports,
/// with no interleaved staleness for the single writer.
#[tokio::test]
async fn test_read_your_writes() {
    init_logging();
    let service = service_with(&[("tt0076759", "Star Wars")]);

    let updated = service
        .update_title("tt0076759", "Star Wars: A New Hope")
        .await
        .expect("update should succeed");
    let read = service
        .get_movie("tt0076759")
        .await
        .expect("read should succeed");

    assert_eq!(updated, read);
    assert_eq!(read.title, "Star Wars: A New Hope");
}

/// Test 8: Update of a Missing Movie
///
/// Updating an absent key reports NotFound and writes nothing into the
/// cache.
#[tokio::test]
async fn test_update_missing_movie() {
    init_logging();
    let service = service_with(&[]);

    assert!(matches!(
        service.update_title("tt9999999", "Ghost Title").await,
        Err(Error::NotFound)
    ));
    assert!(
        service.cache().get("tt9999999").await.unwrap().is_none(),
        "Failed update must not create a cache entry"
    );
}

/// Test 9: Listing Respects the Configured Limit
///
/// A catalog larger than the page size is truncated to the configured
/// number of entries.
#[tokio::test]
async fn test_listing_honors_limit() {
    init_logging();
    let store = MemoryStore::new();
    for i in 0..25 {
        store.insert(format!("tt{:07}", i), format!("Movie {}", i));
    }
    let service =
        CatalogService::new(store, InMemoryBackend::new()).with_list_limit(10);

    let listing = service.list_movies("catalog:page1").await.unwrap();
    assert_eq!(listing.len(), 10, "Listing should cap at the page size");
}

/// Test 10: Concurrent Readers
///
/// Verifies thread safety of the full stack:
/// - Share one service behind an Arc
/// - Spawn 10 tasks, each reading several movies
/// - All reads succeed and agree with the store
#[tokio::test]
async fn test_concurrent_readers() {
    init_logging();
    let store = MemoryStore::new();
    for i in 0..10 {
        store.insert(format!("tt{:07}", i), format!("Movie {}", i));
    }
    let service = Arc::new(CatalogService::new(store, InMemoryBackend::new()));

    let mut handles = vec![];
    for i in 0..10 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            for j in 0..5 {
                let key = format!("tt{:07}", (i + j) % 10);
                let movie = service
                    .get_movie(&key)
                    .await
                    .expect("concurrent read should succeed");
                assert_eq!(movie.id, key);
                assert!(movie.title.starts_with("Movie "));
            }
        }));
    }

    for handle in handles {
        handle.await.expect("Task should not panic");
    }

    // Every key ended up cached exactly once.
    for i in 0..10 {
        let key = format!("tt{:07}", i);
        assert!(
            service.cache().get(&key).await.unwrap().is_some(),
            "Movie {} should be cached after concurrent reads",
            i
        );
    }
}

/// Test 11: Concurrent Updates to Distinct Movies
///
/// Writers touching different keys never interfere; each movie lands on
/// its own final title.
#[tokio::test]
async fn test_concurrent_updates_distinct_keys() {
    init_logging();
    let store = MemoryStore::new();
    for i in 0..8 {
        store.insert(format!("tt{:07}", i), "Working Title");
    }
    let service = Arc::new(CatalogService::new(store, InMemoryBackend::new()));

    let mut handles = vec![];
    for i in 0..8 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            let key = format!("tt{:07}", i);
            service
                .update_title(&key, &format!("Final Cut {}", i))
                .await
                .expect("concurrent update should succeed")
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let updated = handle.await.expect("Task should not panic");
        assert_eq!(updated.title, format!("Final Cut {}", i));
    }

    for i in 0..8 {
        let key = format!("tt{:07}", i);
        let movie = service.get_movie(&key).await.unwrap();
        assert_eq!(movie.title, format!("Final Cut {}", i));
    }
}

/// Test 12: Unique Keys Do Not Collide
///
/// Movies cached under distinct keys stay distinct; a fresh key never
/// observes another movie's payload.
#[tokio::test]
async fn test_distinct_keys_stay_distinct() {
    init_logging();
    let a = uuid::Uuid::now_v7().to_string();
    let b = uuid::Uuid::now_v7().to_string();
    let service = service_with(&[(a.as_str(), "First"), (b.as_str(), "Second")]);

    let movie_a = service.get_movie(&a).await.unwrap();
    let movie_b = service.get_movie(&b).await.unwrap();
    assert_eq!(movie_a, Movie::new(a.clone(), "First"));
    assert_eq!(movie_b, Movie::new(b.clone(), "Second"));

    // Both served from cache on the second pass, still distinct.
    assert_eq!(service.get_movie(&a).await.unwrap().title, "First");
    assert_eq!(service.get_movie(&b).await.unwrap().title, "Second");
}
