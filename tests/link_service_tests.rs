//! LinkService tests
//!
//! Cache-aside resolution, failure isolation of stats/cache/notifier, and
//! bounded code regeneration.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::Utc;

use common::*;
use shortstat::errors::ShortstatError;
use shortstat::notify::creation_message;
use shortstat::services::{BackgroundTasks, LinkService, LinkServiceSettings, StatsService};
use shortstat::storage::{Link, LinkStore, MemoryStorage, Platform};

const URL: &str = "https://example.com/page";

fn recording() -> (Arc<RecordingCache>, Harness) {
    let cache = Arc::new(RecordingCache::new());
    let h = harness_with_cache(cache.clone());
    (cache, h)
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_create_returns_fixed_length_alphanumeric_code() {
    let (_, h) = recording();

    let link = h.service.create_link(URL).await.unwrap();
    let after = Utc::now();

    assert_eq!(link.code.len(), 8);
    assert!(link.code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(link.original_url, URL);
    assert!(link.created_at <= after);
}

#[tokio::test]
async fn test_resolve_just_created_code() {
    let (_, h) = recording();

    let link = h.service.create_link(URL).await.unwrap();
    assert_eq!(h.service.resolve(&link.code).await.unwrap(), URL);
}

#[tokio::test]
async fn test_delete_then_resolve_is_not_found() {
    let (cache, h) = recording();

    let link = h.service.create_link(URL).await.unwrap();
    h.service.delete_link(&link.code).await.unwrap();

    let err = h.service.resolve(&link.code).await.unwrap_err();
    assert!(matches!(err, ShortstatError::NotFound(_)));
    assert!(cache.peek(&link.code).await.is_none());
}

#[tokio::test]
async fn test_short_url_rejected_without_store_call() {
    let (cache, h) = recording();

    let err = h.service.create_link("short").await.unwrap_err();
    assert!(matches!(err, ShortstatError::Validation(_)));
    assert_eq!(h.links.total_calls(), 0);
    assert_eq!(cache.sets.load(Ordering::SeqCst), 0);
    assert!(h.notifier.messages().is_empty());
}

#[tokio::test]
async fn test_invalid_urls_rejected() {
    let (_, h) = recording();

    for url in [
        "",
        "ftp://example.com/file.txt",
        "javascript:alert(1)//////",
        "https://exa mple.com/page",
    ] {
        let err = h.service.create_link(url).await.unwrap_err();
        assert!(
            matches!(err, ShortstatError::Validation(_)),
            "{url:?} should be rejected"
        );
    }
    assert_eq!(h.links.total_calls(), 0);
}

// =============================================================================
// Cache-aside
// =============================================================================

#[tokio::test]
async fn test_cache_hit_skips_store() {
    let (cache, h) = recording();
    cache.seed("cached01", "https://cached.example.com/x").await;

    let url = h.service.resolve("cached01").await.unwrap();
    assert_eq!(url, "https://cached.example.com/x");
    assert_eq!(h.links.gets.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cache_miss_reads_store_and_backfills() {
    let (cache, h) = recording();
    let link = Link::new("backfil1", URL);
    LinkStore::create(h.links.as_ref(), &link).await.unwrap();

    assert_eq!(h.service.resolve("backfil1").await.unwrap(), URL);
    assert_eq!(h.links.gets.load(Ordering::SeqCst), 1);
    assert_eq!(cache.peek("backfil1").await.as_deref(), Some(URL));

    // 第二次命中缓存
    h.service.resolve("backfil1").await.unwrap();
    assert_eq!(h.links.gets.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failing_cache_falls_back_to_store() {
    let cache = Arc::new(FailingCache::default());
    let h = harness_with_cache(cache.clone());

    let link = h.service.create_link(URL).await.unwrap();
    assert_eq!(h.service.resolve(&link.code).await.unwrap(), URL);
    assert_eq!(h.links.gets.load(Ordering::SeqCst), 1);
    h.service.delete_link(&link.code).await.unwrap();

    // populate, get, backfill, evict
    assert_eq!(cache.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_create_populates_cache() {
    let (cache, h) = recording();
    let link = h.service.create_link(URL).await.unwrap();
    assert_eq!(cache.peek(&link.code).await.as_deref(), Some(URL));
}

// =============================================================================
// Stats isolation
// =============================================================================

#[tokio::test]
async fn test_unavailable_stats_store_never_fails_link_operations() {
    for detached in [true, false] {
        let stats_store = Arc::new(FailingStatsStore::default());
        let h = harness_with(
            stats_store.clone(),
            Arc::new(RecordingCache::new()),
            Arc::new(RecordingNotifier::default()),
            LinkServiceSettings {
                detached_stats: detached,
                ..settings()
            },
        );

        let link = h.service.create_link(URL).await.unwrap();
        assert_eq!(h.service.resolve(&link.code).await.unwrap(), URL);
        h.service.delete_link(&link.code).await.unwrap();
        h.tasks.drain().await;

        // creation record, resolve record, cleanup
        assert_eq!(stats_store.calls.load(Ordering::SeqCst), 3);
    }
}

#[tokio::test]
async fn test_resolve_records_platform_event() {
    let (_, h) = recording();
    let link = h.service.create_link(URL).await.unwrap();

    h.service
        .resolve_with_platform(&link.code, Platform::Twitter)
        .await
        .unwrap();
    h.tasks.drain().await;

    let events = h.stats.list_for_link(&link.code).await.unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().any(|e| e.platform == Platform::Twitter));
    assert!(events.iter().any(|e| e.platform == Platform::Unknown));
}

#[tokio::test]
async fn test_inline_stats_visible_immediately() {
    let h = harness_with(
        Arc::new(MemoryStorage::new()),
        Arc::new(RecordingCache::new()),
        Arc::new(RecordingNotifier::default()),
        LinkServiceSettings {
            detached_stats: false,
            ..settings()
        },
    );
    let link = h.service.create_link(URL).await.unwrap();
    h.service.resolve(&link.code).await.unwrap();

    assert_eq!(h.stats.list_for_link(&link.code).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_resolve_unknown_code_records_nothing() {
    let (_, h) = recording();

    let err = h.service.resolve("nope0000").await.unwrap_err();
    assert!(matches!(err, ShortstatError::NotFound(_)));
    h.tasks.drain().await;
    assert!(h.stats.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_removes_link_stats_only() {
    let (_, h) = recording();
    let keep = h.service.create_link(URL).await.unwrap();
    let gone = h.service.create_link(URL).await.unwrap();
    h.service.resolve(&gone.code).await.unwrap();
    h.tasks.drain().await;

    h.service.delete_link(&gone.code).await.unwrap();

    assert!(h.stats.list_for_link(&gone.code).await.unwrap().is_empty());
    assert_eq!(h.stats.list_for_link(&keep.code).await.unwrap().len(), 1);
}

// =============================================================================
// Store failures
// =============================================================================

#[tokio::test]
async fn test_duplicate_key_regenerates_code() {
    let (_, h) = recording();
    h.links.force_duplicates(2);

    let link = h.service.create_link(URL).await.unwrap();
    assert_eq!(h.links.creates.load(Ordering::SeqCst), 3);
    assert_eq!(h.service.resolve(&link.code).await.unwrap(), URL);
}

#[tokio::test]
async fn test_duplicate_key_regeneration_is_bounded() {
    let (cache, h) = recording();
    h.links.force_duplicates(10);

    let err = h.service.create_link(URL).await.unwrap_err();
    assert!(matches!(err, ShortstatError::DuplicateKey(_)));
    assert_eq!(h.links.creates.load(Ordering::SeqCst), 3);
    assert_eq!(cache.sets.load(Ordering::SeqCst), 0);
    h.tasks.drain().await;
    assert!(h.notifier.messages().is_empty());
}

#[tokio::test]
async fn test_store_outage_aborts_without_retry() {
    let (cache, h) = recording();
    h.links.set_unavailable(true);

    let err = h.service.create_link(URL).await.unwrap_err();
    assert!(matches!(err, ShortstatError::DatabaseConnection(_)));
    assert_eq!(h.links.creates.load(Ordering::SeqCst), 1);
    assert_eq!(cache.sets.load(Ordering::SeqCst), 0);

    let err = h.service.resolve("anything").await.unwrap_err();
    assert!(err.is_dependency());
}

#[tokio::test]
async fn test_store_deadline_becomes_timeout() {
    let stats = Arc::new(StatsService::new(
        Arc::new(MemoryStorage::new()),
        Duration::from_millis(50),
    ));
    let service = LinkService::new(
        Arc::new(HangingLinkStore),
        Arc::new(RecordingCache::new()),
        stats,
        Arc::new(RecordingNotifier::default()),
        BackgroundTasks::new(4, Duration::from_secs(1)),
        LinkServiceSettings {
            store_timeout: Duration::from_millis(50),
            ..LinkServiceSettings::default()
        },
    );

    let err = service.create_link(URL).await.unwrap_err();
    assert!(matches!(err, ShortstatError::Timeout(_)));
    let err = service.resolve("abcdefgh").await.unwrap_err();
    assert!(matches!(err, ShortstatError::Timeout(_)));
}

#[tokio::test]
async fn test_delete_unknown_code_is_not_found() {
    let (cache, h) = recording();

    let err = h.service.delete_link("missing0").await.unwrap_err();
    assert!(matches!(err, ShortstatError::NotFound(_)));
    assert_eq!(cache.removes.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Pre-built links, listing, notification
// =============================================================================

#[tokio::test]
async fn test_create_prebuilt_link_does_not_regenerate() {
    let (cache, h) = recording();
    let link = Link::new("custom01", URL);

    h.service.create(&link).await.unwrap();
    assert_eq!(cache.peek("custom01").await.as_deref(), Some(URL));

    let err = h.service.create(&link).await.unwrap_err();
    assert!(matches!(err, ShortstatError::DuplicateKey(_)));
    assert_eq!(h.links.creates.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_get_all_is_bounded_and_newest_first() {
    let h = harness_with(
        Arc::new(MemoryStorage::new()),
        Arc::new(RecordingCache::new()),
        Arc::new(RecordingNotifier::default()),
        LinkServiceSettings {
            list_limit: 2,
            ..settings()
        },
    );
    for _ in 0..3 {
        h.service.create_link(URL).await.unwrap();
    }

    let links = h.service.get_all().await.unwrap();
    assert_eq!(links.len(), 2);
    assert!(links[0].created_at >= links[1].created_at);
}

#[tokio::test]
async fn test_overview_tolerates_stats_failure() {
    let h = harness_with(
        Arc::new(FailingStatsStore::default()),
        Arc::new(RecordingCache::new()),
        Arc::new(RecordingNotifier::default()),
        settings(),
    );
    h.service.create_link(URL).await.unwrap();

    let overview = h.service.get_all_with_stats().await.unwrap();
    assert_eq!(overview.len(), 1);
    assert!(overview[0].stats.is_empty());
}

#[tokio::test]
async fn test_creation_is_announced() {
    let (_, h) = recording();
    let link = h.service.create_link(URL).await.unwrap();
    h.tasks.drain().await;

    assert_eq!(h.notifier.messages(), vec![creation_message(&link.code)]);
}

#[tokio::test]
async fn test_failing_notifier_does_not_fail_create() {
    let notifier = Arc::new(RecordingNotifier::failing());
    let h = harness_with(
        Arc::new(MemoryStorage::new()),
        Arc::new(RecordingCache::new()),
        notifier.clone(),
        settings(),
    );

    let link = h.service.create_link(URL).await.unwrap();
    h.tasks.drain().await;
    assert_eq!(notifier.messages().len(), 1);
    assert_eq!(h.service.resolve(&link.code).await.unwrap(), URL);
}

#[tokio::test]
async fn test_retried_create_yields_new_code() {
    let (_, h) = recording();
    let first = h.service.create_link(URL).await.unwrap();
    let second = h.service.create_link(URL).await.unwrap();
    assert_ne!(first.code, second.code);
}

// =============================================================================
// Stalled cache, cancelled requests
// =============================================================================

#[tokio::test]
async fn test_stalled_cache_degrades_to_store() {
    let cache = Arc::new(StallingCache::default());
    let h = harness_with_cache(cache.clone());
    let link = Link::new("abcd1234", URL);
    LinkStore::create(h.links.as_ref(), &link).await.unwrap();

    let url = tokio::time::timeout(Duration::from_secs(5), h.service.resolve("abcd1234"))
        .await
        .expect("resolve must not wait on a stalled cache")
        .unwrap();
    assert_eq!(url, URL);
    assert_eq!(h.links.gets.load(Ordering::SeqCst), 1);

    let created = tokio::time::timeout(Duration::from_secs(5), h.service.create_link(URL))
        .await
        .expect("create must not wait on a stalled cache")
        .unwrap();
    tokio::time::timeout(
        Duration::from_secs(5),
        h.service.delete_link(&created.code),
    )
    .await
    .expect("delete must not wait on a stalled cache")
    .unwrap();

    // get + backfill, populate, evict
    assert_eq!(cache.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_detached_stats_survive_dropped_request() {
    let h = harness_with(
        Arc::new(SlowStatsStore::new(Duration::from_millis(300))),
        Arc::new(RecordingCache::new()),
        Arc::new(RecordingNotifier::default()),
        settings(),
    );
    let link = Link::new("detach01", URL);
    LinkStore::create(h.links.as_ref(), &link).await.unwrap();

    // The request resolves, then is dropped by the timeout while the stats
    // write is still sleeping.
    let request = async {
        let url = h.service.resolve("detach01").await;
        std::future::pending::<()>().await;
        url
    };
    assert!(
        tokio::time::timeout(Duration::from_millis(50), request)
            .await
            .is_err()
    );
    assert!(h.stats.list_for_link("detach01").await.unwrap().is_empty());

    h.tasks.drain().await;
    let events = h.stats.list_for_link("detach01").await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].platform, Platform::Unknown);
}

#[tokio::test]
async fn test_lookup_records_no_event() {
    let (_, h) = recording();
    let link = h.service.create_link(URL).await.unwrap();

    assert_eq!(h.service.lookup(&link.code).await.unwrap(), URL);
    h.tasks.drain().await;

    // only the creation event
    assert_eq!(h.stats.list_for_link(&link.code).await.unwrap().len(), 1);
}
