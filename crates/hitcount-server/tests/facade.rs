#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;

use hitcount_server::store::{
    BackendState, Counted, CounterFacade, CounterStore, FacadeConfig, Source, StoreConnector,
};

mod common;
use common::{CountingConnector, HangingStore, MemStore};

fn cfg() -> FacadeConfig {
    FacadeConfig {
        op_timeout: Duration::from_millis(100),
        ..FacadeConfig::default()
    }
}

fn with_store(store: Arc<dyn CounterStore>) -> (CounterFacade, Arc<CountingConnector>) {
    let connector = CountingConnector::ok(store);
    let facade = CounterFacade::new(cfg(), Some(connector.clone() as Arc<dyn StoreConnector>));
    (facade, connector)
}

#[tokio::test]
async fn cold_fallback_counts_up() {
    let f = CounterFacade::in_memory(cfg());
    assert_eq!(f.backend_state(), BackendState::Unconfigured);

    assert_eq!(f.increment("home").await, Counted::fallback(1));
    assert_eq!(f.increment("home").await, Counted::fallback(2));
    assert_eq!(f.increment("home").await, Counted::fallback(3));
    assert_eq!(f.read("home").await, Counted::fallback(3));
}

#[tokio::test]
async fn unseen_ids_read_zero() {
    let f = CounterFacade::in_memory(cfg());
    assert_eq!(f.read("never").await, Counted::fallback(0));
    assert_eq!(f.read("home").await, Counted::fallback(0));
}

#[tokio::test]
async fn seed_applies_to_default_id_only() {
    let f = CounterFacade::in_memory(FacadeConfig {
        initial_count: 10,
        ..cfg()
    });
    assert_eq!(f.increment("home").await.value, 11);
    assert_eq!(f.increment("other").await.value, 1);
    assert_eq!(f.fallback_ids(), 1);
}

#[tokio::test]
async fn resolve_id_defaults() {
    let f = CounterFacade::in_memory(cfg());
    assert_eq!(f.resolve_id(None), "home");
    assert_eq!(f.resolve_id(Some("")), "home");
    assert_eq!(f.resolve_id(Some("Docs")), "Docs");
}

#[tokio::test]
async fn durable_success_uses_prefixed_keys() {
    let store = MemStore::new();
    let (f, _) = with_store(store.clone());

    assert_eq!(f.increment("a").await, Counted::durable(1));
    assert_eq!(f.increment("a").await, Counted::durable(2));
    assert_eq!(f.read("a").await, Counted::durable(2));
    assert_eq!(store.raw("hits:a").await.as_deref(), Some("2"));
    assert_eq!(f.backend_state(), BackendState::Live);
    // durable answers never touch the in-process map
    assert_eq!(f.fallback_ids(), 0);
}

#[tokio::test]
async fn durable_absent_and_zero_are_answers() {
    let store = MemStore::new();
    store.put("hits:zero", "0").await;
    let (f, _) = with_store(store);

    assert_eq!(f.read("missing").await, Counted::durable(0));
    assert_eq!(f.read("zero").await, Counted::durable(0));
}

#[tokio::test]
async fn malformed_stored_value_reads_as_absent() {
    let store = MemStore::new();
    store.put("hits:junk", "not-a-number").await;
    store.put_bytes("hits:binary", &[0xff, 0xfe, b'1']).await;
    let (f, _) = with_store(store);

    assert_eq!(f.read("junk").await, Counted::durable(0));
    assert_eq!(f.read("binary").await, Counted::durable(0));
    assert_eq!(f.fallback_ids(), 0);
}

#[tokio::test]
async fn backend_error_degrades_to_fallback() {
    let store = MemStore::new();
    store.set_failing(true);
    let (f, _) = with_store(store);

    assert_eq!(f.increment("x").await, Counted::fallback(1));
    assert_eq!(f.increment("x").await, Counted::fallback(2));
    assert_eq!(f.read("x").await, Counted::fallback(2));
}

#[tokio::test]
async fn backend_timeout_degrades_to_fallback() {
    let (f, _) = with_store(Arc::new(HangingStore));

    let start = Instant::now();
    assert_eq!(f.increment("slow").await, Counted::fallback(1));
    assert_eq!(f.read("slow").await, Counted::fallback(1));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn backends_are_never_merged() {
    let store = MemStore::new();
    let (f, connector) = with_store(store.clone());

    assert_eq!(f.increment("p").await, Counted::durable(1));
    assert_eq!(f.increment("p").await, Counted::durable(2));

    store.set_failing(true);
    // fallback map starts from its own zero, not from the durable value
    assert_eq!(f.increment("p").await, Counted::fallback(1));
    assert_eq!(f.read("p").await, Counted::fallback(1));

    // live connection: every call retries the backend
    store.set_failing(false);
    assert_eq!(f.increment("p").await, Counted::durable(3));
    assert_eq!(connector.attempts(), 1);
}

#[tokio::test]
async fn failed_init_is_cached() {
    let connector = CountingConnector::failing();
    let f = CounterFacade::new(cfg(), Some(connector.clone() as Arc<dyn StoreConnector>));
    assert_eq!(f.backend_state(), BackendState::Pending);

    assert!(!f.warm_up().await);
    for _ in 0..5 {
        assert_eq!(f.increment("id").await.source, Source::Fallback);
        assert_eq!(f.read("id").await.source, Source::Fallback);
    }

    assert_eq!(connector.attempts(), 1);
    assert_eq!(f.backend_state(), BackendState::Unavailable);
    assert_eq!(f.read("id").await.value, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_callers_init_once() {
    let connector = CountingConnector::failing();
    let f = Arc::new(CounterFacade::new(
        cfg(),
        Some(connector.clone() as Arc<dyn StoreConnector>),
    ));

    let tasks = (0..64).map(|_| {
        let f = Arc::clone(&f);
        tokio::spawn(async move { f.increment("burst").await })
    });
    let results: Vec<Counted> = join_all(tasks).await.into_iter().map(|r| r.unwrap()).collect();

    assert_eq!(connector.attempts(), 1);
    assert!(results.iter().all(|c| c.source == Source::Fallback));

    let mut values: Vec<u64> = results.iter().map(|c| c.value).collect();
    values.sort_unstable();
    assert_eq!(values, (1..=64).collect::<Vec<u64>>());
    assert_eq!(f.read("burst").await, Counted::fallback(64));
}

#[tokio::test]
async fn cancelled_init_still_counts_as_the_attempt() {
    let connector = CountingConnector::failing();
    let f = Arc::new(CounterFacade::new(
        cfg(),
        Some(connector.clone() as Arc<dyn StoreConnector>),
    ));

    // the first caller gives up 5ms into a 20ms connect
    let task = {
        let f = Arc::clone(&f);
        tokio::spawn(async move { f.increment("x").await })
    };
    tokio::time::sleep(Duration::from_millis(5)).await;
    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());
    assert_eq!(connector.attempts(), 1);

    for expected in 1..=3 {
        assert_eq!(f.increment("x").await, Counted::fallback(expected));
    }
    assert_eq!(connector.attempts(), 1);
    assert_eq!(f.backend_state(), BackendState::Unavailable);
}

#[tokio::test]
async fn cancelled_warm_up_leaves_live_backend_unused() {
    let store = MemStore::new();
    let (f, connector) = with_store(store);
    let f = Arc::new(f);

    let task = {
        let f = Arc::clone(&f);
        tokio::spawn(async move { f.warm_up().await })
    };
    tokio::time::sleep(Duration::from_millis(5)).await;
    task.abort();
    let _ = task.await;

    // no second connect, even though the backend would have come up
    assert!(!f.warm_up().await);
    assert_eq!(f.read("y").await, Counted::fallback(0));
    assert_eq!(connector.attempts(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_durable_increments_are_not_lost() {
    let store = MemStore::new();
    let (f, connector) = with_store(store);
    let f = Arc::new(f);

    let tasks = (0..50).map(|i| {
        let f = Arc::clone(&f);
        let id = if i % 2 == 0 { "even" } else { "odd" };
        tokio::spawn(async move { f.increment(id).await })
    });
    for r in join_all(tasks).await {
        assert_eq!(r.unwrap().source, Source::Durable);
    }

    assert_eq!(connector.attempts(), 1);
    assert_eq!(f.read("even").await, Counted::durable(25));
    assert_eq!(f.read("odd").await, Counted::durable(25));
}

#[tokio::test]
async fn default_id_fallback_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("count");

    let f = CounterFacade::in_memory(FacadeConfig {
        persist_file: Some(path.clone()),
        ..cfg()
    });
    f.increment("home").await;
    f.increment("home").await;
    f.increment("elsewhere").await;
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "2");

    // a fresh façade picks the persisted value back up
    let f = CounterFacade::in_memory(FacadeConfig {
        persist_file: Some(path),
        ..cfg()
    });
    assert_eq!(f.read("home").await, Counted::fallback(2));
    assert_eq!(f.read("elsewhere").await, Counted::fallback(0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_default_id_hits_persist_the_final_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("count");

    let f = Arc::new(CounterFacade::in_memory(FacadeConfig {
        persist_file: Some(path.clone()),
        ..cfg()
    }));
    let tasks = (0..40).map(|_| {
        let f = Arc::clone(&f);
        tokio::spawn(async move { f.increment("home").await })
    });
    for r in join_all(tasks).await {
        assert_eq!(r.unwrap().source, Source::Fallback);
    }

    assert_eq!(f.read("home").await, Counted::fallback(40));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "40");
}
