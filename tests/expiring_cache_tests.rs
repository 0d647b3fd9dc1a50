//! Integration Tests for the time-bounded caches
//!
//! Covers eager, deferred and interval expiration. Async tests run on a
//! paused clock so TTL windows are exact.

mod common;

use std::time::Duration;

use ephemeral_cache::{
    Cache, CacheConfig, CacheError, DeferredCache, EphemeralCache, SweepState, TemporaryCache,
    TypeLabel,
};

// == Construction ==

#[test]
fn test_ephemeral_rejects_invalid_arguments() {
    let cases = [
        (0, Duration::from_millis(100)),
        (1, Duration::ZERO),
        (1, Duration::from_micros(900)),
        (1, Duration::from_micros(10_900)),
    ];

    for (capacity, ttl) in cases {
        let result = EphemeralCache::<String, u32>::new(capacity, ttl);
        assert!(
            matches!(
                result,
                Err(CacheError::InvalidCapacity(_)) | Err(CacheError::InvalidTtl(_))
            ),
            "capacity {capacity} / ttl {ttl:?} should be rejected"
        );
    }
}

#[test]
fn test_config_rejects_fractional_ttl() {
    let ttl = Duration::from_micros(10_900);
    assert_eq!(
        CacheConfig::new(1, ttl).err(),
        Some(CacheError::InvalidTtl(ttl))
    );

    // Deserialized configs carry whole milliseconds and agree with the constructors
    let config: CacheConfig = serde_json::from_str(r#"{"capacity": 1, "ttl_ms": 0}"#).unwrap();
    assert_eq!(config.validate(), Err(CacheError::InvalidTtl(Duration::ZERO)));
    assert_eq!(
        EphemeralCache::<String, u32>::from_config(&config).err(),
        Some(CacheError::InvalidTtl(Duration::ZERO))
    );
}

#[test]
fn test_background_variants_need_runtime() {
    let ttl = Duration::from_millis(10);
    assert_eq!(
        DeferredCache::<u8, u8>::new(1, ttl).err(),
        Some(CacheError::RuntimeUnavailable)
    );
    assert_eq!(
        TemporaryCache::<u8, u8>::new(1, ttl).err(),
        Some(CacheError::RuntimeUnavailable)
    );
}

// == Eager Expiration ==

#[tokio::test(start_paused = true)]
async fn test_ephemeral_expires_after_ttl() {
    common::init_tracing();
    let ttl = Duration::from_millis(20);
    let mut cache = EphemeralCache::with_label(10, ttl, TypeLabel::new("string", "number")).unwrap();

    assert_eq!(cache.read(&"0".to_string()), None);
    cache.write("0".to_string(), 1);
    assert_eq!(cache.read(&"0".to_string()), Some(1));

    tokio::time::sleep(ttl + Duration::from_millis(1)).await;

    assert_eq!(cache.read(&"0".to_string()), None);
    assert_eq!(cache.size(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_ephemeral_not_returned_after_double_ttl() {
    let ttl = Duration::from_millis(20);
    let mut cache = EphemeralCache::new(10, ttl).unwrap();

    cache.write(1, 1);
    tokio::time::sleep(ttl * 2).await;

    assert_eq!(cache.read(&1), None);
}

#[tokio::test(start_paused = true)]
async fn test_ephemeral_eviction_still_applies() {
    let mut cache = EphemeralCache::new(2, Duration::from_secs(60)).unwrap();
    cache.write("a", 1);
    cache.write("b", 2);
    cache.read(&"a");

    cache.write("c", 3);

    assert_eq!(cache.keys(), vec!["a", "c"]);
}

#[tokio::test(start_paused = true)]
async fn test_ephemeral_from_config_and_serialize() {
    let config = CacheConfig::new(10, Duration::from_millis(20)).unwrap();
    let mut cache = EphemeralCache::<String, u32>::from_config(&config).unwrap();

    for i in 1..=3 {
        cache.write(i.to_string(), i);
    }

    assert_eq!(cache.ttl(), Duration::from_millis(20));
    assert_eq!(
        serde_json::to_string(&cache).unwrap(),
        r#"[["1",1],["2",2],["3",3]]"#
    );
}

// == Deferred Purge ==

#[tokio::test(start_paused = true)]
async fn test_deferred_purge_bounds_size() {
    common::init_tracing();
    let ttl = Duration::from_millis(40);
    let mut cache = DeferredCache::new(10, ttl).unwrap();

    for cycle in 0..5 {
        cache.write("a", cycle);
        tokio::time::sleep(ttl + ttl / 4).await;
        cache.write("b", cycle);

        // One scheduling tick for the purge to run
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(cache.size(), 1, "cycle {cycle}: expired entries accumulated");
        assert_eq!(cache.read(&"b"), Some(cycle));
        assert_eq!(cache.read(&"a"), None);
    }
}

#[tokio::test(start_paused = true)]
async fn test_deferred_write_then_read_sees_value() {
    let ttl = Duration::from_millis(10);
    let mut cache = DeferredCache::new(4, ttl).unwrap();
    cache.write("old", 0);

    tokio::time::sleep(ttl * 3).await;

    // This write schedules a purge; the fresh key must still be readable
    cache.write("new", 1);
    assert_eq!(cache.read(&"new"), Some(1));

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(cache.keys(), vec!["new"]);
}

#[tokio::test(start_paused = true)]
async fn test_deferred_invalidate() {
    let mut cache = DeferredCache::new(4, Duration::from_secs(1)).unwrap();
    cache.write(1, "a");
    cache.write(2, "b");

    cache.invalidate();

    assert_eq!(cache.size(), 0);
    assert_eq!(cache.read(&1), None);
}

// == Interval Sweep ==

#[tokio::test(start_paused = true)]
async fn test_temporary_sweeps_on_interval() {
    common::init_tracing();
    let ttl = Duration::from_millis(50);
    let mut cache = TemporaryCache::new(10, ttl).unwrap();
    cache.write("a", 1);

    tokio::time::sleep(ttl / 2).await;
    assert_eq!(cache.size(), 1);

    tokio::time::sleep(ttl * 2).await;
    assert_eq!(cache.size(), 0, "Sweep should run without any reads");
}

#[tokio::test(start_paused = true)]
async fn test_temporary_stop_and_restart() {
    let ttl = Duration::from_millis(50);
    let mut cache = TemporaryCache::new(10, ttl).unwrap();
    assert_eq!(cache.sweep_state(), SweepState::Running);

    cache.stop_interval();
    cache.stop_interval();
    assert_eq!(cache.sweep_state(), SweepState::Stopped);

    cache.write("a", 1);
    tokio::time::sleep(ttl * 3).await;
    assert_eq!(cache.size(), 1, "No sweep while stopped");

    cache.start_interval();
    assert_eq!(cache.sweep_state(), SweepState::Running);
    tokio::time::sleep(ttl + Duration::from_millis(1)).await;
    assert_eq!(cache.size(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_temporary_read_checks_expiry_between_ticks() {
    let ttl = Duration::from_millis(50);
    let mut cache = TemporaryCache::new(10, ttl).unwrap();

    // Written just after construction, so it expires between two ticks
    tokio::time::sleep(Duration::from_millis(10)).await;
    cache.write("a", 1);
    tokio::time::sleep(Duration::from_millis(55)).await;

    assert_eq!(cache.read(&"a"), None);
}

#[tokio::test(start_paused = true)]
async fn test_temporary_display() {
    let mut cache = TemporaryCache::with_label(
        100,
        Duration::from_millis(100),
        TypeLabel::new("any", "Anything"),
    )
    .unwrap();
    cache.write(1, 1);

    assert_eq!(
        cache.to_string(),
        "TemporaryCache<any, Anything> { size: 1, capacity: 100, durationMs: 100 }"
    );
}
