mod common;

use std::sync::Arc;

use chrono::Duration;
use common::{FakeTwitter, at, tweet};
use smm::{
    cache::{TimelineCache, load_timeline},
    store::{KeyValueStore, MemoryStore, TWITTER_TIMELINE_CACHE_KEY},
};

fn setup() -> (FakeTwitter, Arc<dyn KeyValueStore>, TimelineCache) {
    let twitter = FakeTwitter {
        timeline: vec![tweet("1", "first"), tweet("2", "second")],
        ..FakeTwitter::default()
    };
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let cache = TimelineCache::new(Arc::clone(&store));
    (twitter, store, cache)
}

fn calls(twitter: &FakeTwitter) -> u32 {
    *twitter.timeline_calls.lock().unwrap()
}

#[tokio::test]
async fn test_fresh_cache_skips_network() {
    let (twitter, _store, cache) = setup();
    let t0 = at(2026, 10, 16, 9, 0);

    let first = load_timeline(&twitter, &cache, 1, 20, false, t0).await.unwrap();
    let second = load_timeline(&twitter, &cache, 1, 20, false, t0 + Duration::minutes(14))
        .await
        .unwrap();

    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(second.tweets, first.tweets);
    assert_eq!(second.fetched_at, t0);
    assert_eq!(calls(&twitter), 1);
}

#[tokio::test]
async fn test_cache_expires_after_fifteen_minutes() {
    let (twitter, _store, cache) = setup();
    let t0 = at(2026, 10, 16, 9, 0);

    load_timeline(&twitter, &cache, 1, 20, false, t0).await.unwrap();
    let later = load_timeline(&twitter, &cache, 1, 20, false, t0 + Duration::minutes(15))
        .await
        .unwrap();

    assert!(!later.from_cache);
    assert_eq!(later.fetched_at, t0 + Duration::minutes(15));
    assert_eq!(calls(&twitter), 2);
}

#[tokio::test]
async fn test_refresh_bypasses_fresh_cache() {
    let (twitter, _store, cache) = setup();
    let t0 = at(2026, 10, 16, 9, 0);

    load_timeline(&twitter, &cache, 1, 20, false, t0).await.unwrap();
    let refreshed = load_timeline(&twitter, &cache, 1, 20, true, t0 + Duration::minutes(1))
        .await
        .unwrap();

    assert!(!refreshed.from_cache);
    assert_eq!(calls(&twitter), 2);
}

#[tokio::test]
async fn test_other_account_misses_cache() {
    let (twitter, _store, cache) = setup();
    let t0 = at(2026, 10, 16, 9, 0);

    load_timeline(&twitter, &cache, 1, 20, false, t0).await.unwrap();
    let other = load_timeline(&twitter, &cache, 2, 20, false, t0 + Duration::minutes(1))
        .await
        .unwrap();

    assert!(!other.from_cache);
    assert_eq!(calls(&twitter), 2);
    assert!(cache.read(1, t0 + Duration::minutes(2)).is_none());
    assert!(cache.read(2, t0 + Duration::minutes(2)).is_some());
}

#[test]
fn test_entry_without_account_id_is_shared() {
    let (_twitter, store, cache) = setup();
    let t0 = at(2026, 10, 16, 9, 0);
    store
        .set(
            TWITTER_TIMELINE_CACHE_KEY,
            &format!(
                r#"{{"data":[{{"id":"1","text":"old"}}],"timestamp":{}}}"#,
                t0.timestamp_millis()
            ),
        )
        .unwrap();

    let (tweets, written_at) = cache.read(42, t0 + Duration::minutes(5)).unwrap();

    assert_eq!(tweets[0].text, "old");
    assert_eq!(written_at, t0);
}

#[test]
fn test_corrupt_entry_is_a_miss() {
    let (_twitter, store, cache) = setup();
    store.set(TWITTER_TIMELINE_CACHE_KEY, "garbage").unwrap();

    assert!(cache.read(1, at(2026, 10, 16, 9, 0)).is_none());
}

#[test]
fn test_clear_removes_entry() {
    let (_twitter, store, cache) = setup();
    let t0 = at(2026, 10, 16, 9, 0);
    cache.write(1, &[tweet("1", "x")], t0).unwrap();

    cache.clear().unwrap();

    assert_eq!(store.get(TWITTER_TIMELINE_CACHE_KEY).unwrap(), None);
}
