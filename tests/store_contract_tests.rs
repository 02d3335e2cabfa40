//! Store Contract Tests
//!
//! Exercises the public store API the way a caching layer would: through
//! callbacks, futures and direct values.

use std::time::Duration;

use expiring_store::{CacheError, CallOptions, KeyTtl, Result, Shared, Store, StoreConfig};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// Runs a callback-style call on the current runtime and returns what it delivered.
async fn delivered<T: Send + 'static>(
    call: impl FnOnce(Box<dyn FnOnce(Result<T>) + Send>),
) -> Result<T> {
    let (tx, rx) = oneshot::channel::<Result<T>>();
    call(Box::new(move |result: Result<T>| {
        let _ = tx.send(result);
    }));
    tokio::time::timeout(Duration::from_secs(5), rx)
        .await
        .expect("callback should be delivered")
        .expect("callback should not be dropped")
}

// == Callback Style ==

#[tokio::test]
async fn test_set_without_ttl_acknowledges_true() {
    let store: Store<Value> = Store::default();

    let ok = delivered(|cb| store.set_then("foo", json!("bar"), (), cb).unwrap()).await;

    assert_eq!(ok, Ok(true));
}

#[tokio::test]
async fn test_set_with_ttl_acknowledges_true() {
    let store: Store<Value> = Store::default();

    let ok = delivered(|cb| store.set_then("foo", json!("bar"), 30u64, cb).unwrap()).await;

    assert_eq!(ok, Ok(true));
    assert!(matches!(store.ttl("foo"), KeyTtl::ExpiresAt(_)));
}

#[tokio::test]
async fn test_get_with_and_without_options() {
    let store: Store<Value> = Store::default();
    store.set("foo", json!("bar"), ()).unwrap().await;

    let plain = delivered(|cb| store.get_then("foo", (), cb)).await;
    let with_options = delivered(|cb| store.get_then("foo", CallOptions::default(), cb)).await;

    assert_eq!(plain, Ok(Some(json!("bar"))));
    assert_eq!(with_options, plain);
}

#[tokio::test]
async fn test_callback_is_not_run_on_caller_stack() {
    let store: Store<Value> = Store::default();
    let ran = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));

    let flag = ran.clone();
    store.keys_then(move |_| flag.store(true, std::sync::atomic::Ordering::SeqCst));

    // current_thread runtime: the callback cannot run until this task yields
    assert!(!ran.load(std::sync::atomic::Ordering::SeqCst));
    tokio::task::yield_now().await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(ran.load(std::sync::atomic::Ordering::SeqCst));
}

#[tokio::test]
async fn test_del_then_get_is_absent() {
    let store: Store<Value> = Store::default();
    store.set("foo", json!("bar"), ()).unwrap().await;

    let result = delivered(|cb| store.del_then("foo", (), cb)).await;
    assert_eq!(result, Ok(()));

    assert_eq!(store.get("foo", ()).await, None);
}

#[tokio::test]
async fn test_del_without_callback_still_deletes() {
    let store: Store<Value> = Store::new(StoreConfig::new().no_promises());
    store.set("foo", json!("bar"), ()).unwrap();

    store.del("foo", ());

    assert_eq!(store.ttl("foo"), KeyTtl::Missing);
}

#[tokio::test]
async fn test_reset_then_keys_is_empty() {
    let store: Store<Value> = Store::default();
    store.set("foo", json!("bar"), ()).unwrap().await;

    let result = delivered(|cb| store.reset_then(cb)).await;
    assert_eq!(result, Ok(()));

    let keys = delivered(|cb| store.keys_then(cb)).await.unwrap();
    assert!(keys.is_empty());
    let value = delivered(|cb| store.get_then("foo", (), cb)).await.unwrap();
    assert_eq!(value, None);
}

#[tokio::test]
async fn test_keys_after_single_set_on_fresh_store() {
    let store: Store<Value> = Store::default();
    store.reset().await;
    store.set("foo", json!("bar"), ()).unwrap().await;

    let keys = delivered(|cb| store.keys_then(cb)).await.unwrap();

    assert_eq!(keys, vec!["foo".to_string()]);
}

// == Future Style ==

#[tokio::test]
async fn test_mset_then_mget_yields_values_in_order() {
    let store: Store<i64> = Store::default();

    let stored = store.mset([("a", 1), ("b", 2)], ()).unwrap().await;
    assert_eq!(stored, vec![1, 2]);

    let values = store.mget(["a", "b"], ()).await;
    assert_eq!(values, vec![Some(1), Some(2)]);
}

#[tokio::test]
async fn test_callback_and_future_agree_for_mset() {
    let store: Store<i64> = Store::default();

    let by_future = store.mset([("a", 1), ("b", 2)], ()).unwrap().await;
    let by_callback = delivered(|cb| store.mset_then([("a", 1), ("b", 2)], (), cb).unwrap())
        .await
        .unwrap();

    assert_eq!(by_future, by_callback);
}

#[tokio::test]
async fn test_future_mode_never_fails_but_call_can() {
    let store: Store<i64> = Store::new(StoreConfig::new().max_keys(1));
    store.set("a", 1, ()).unwrap().await;

    let err = store.set("b", 2, ()).unwrap_err();

    assert_eq!(err, CacheError::CacheFull("b".to_string()));
    assert_eq!(store.get("b", ()).await, None);
}

// == TTL Precedence ==

#[tokio::test]
async fn test_explicit_zero_ttl_overrides_default() {
    let store: Store<Value> = Store::new(StoreConfig::new().default_ttl(1));

    store.set("zero", json!(1), CallOptions::with_ttl(0)).unwrap().await;
    store.set("default", json!(2), ()).unwrap().await;

    assert_eq!(store.ttl("zero"), KeyTtl::NoExpiry);
    assert!(matches!(store.ttl("default"), KeyTtl::ExpiresAt(_)));

    tokio::time::sleep(Duration::from_millis(1100)).await;

    assert_eq!(store.get("zero", ()).await, Some(json!(1)));
    assert_eq!(store.get("default", ()).await, None);
}

#[tokio::test]
async fn test_ttl_missing_differs_from_no_expiry() {
    let store: Store<Value> = Store::default();
    store.set("forever", json!(true), ()).unwrap().await;

    assert_eq!(store.ttl("nonexistent"), KeyTtl::Missing);
    assert_eq!(store.ttl("forever"), KeyTtl::NoExpiry);
}

// == Clone Before Set ==

#[tokio::test]
async fn test_mutating_after_set_does_not_leak_into_store() {
    let store: Store<Shared<Vec<String>>> = Store::default();
    let list = Shared::new(vec!["a".to_string()]);

    store.set("list", list.clone(), ()).unwrap().await;
    list.update(|v| v.push("b".to_string()));

    let read = store.get("list", ()).await.unwrap();
    assert_eq!(read.snapshot(), vec!["a".to_string()]);
}

#[tokio::test]
async fn test_mutation_is_visible_without_clone_before_set() {
    let store: Store<Shared<Vec<String>>> =
        Store::new(StoreConfig::new().clone_before_set(false));
    let list = Shared::new(vec!["a".to_string()]);

    store.set("list", list.clone(), ()).unwrap().await;
    list.update(|v| v.push("b".to_string()));

    let read = store.get("list", ()).await.unwrap();
    assert_eq!(read.snapshot(), vec!["a".to_string(), "b".to_string()]);
}

// == Sweeper ==

#[tokio::test]
async fn test_sweeper_drops_expired_entries() {
    let store: Store<Value> = Store::new(StoreConfig::new().check_period(1));
    store.set("short", json!(1), 1u64).unwrap().await;
    let sweeper = store.start_sweeper().expect("check period is non-zero");

    tokio::time::sleep(Duration::from_millis(2500)).await;

    let stats = store.stats();
    assert_eq!(stats.total_entries, 0);
    assert_eq!(stats.expirations, 1);
    sweeper.abort();
}
