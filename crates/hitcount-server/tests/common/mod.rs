//! Fake durable stores shared by façade and router tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use hitcount_core::error::{HitError, Result};
use hitcount_server::store::{CounterStore, StoreConnector};

/// In-memory stand-in for the durable backend with a failure switch.
#[derive(Default)]
pub struct MemStore {
    data: Mutex<HashMap<String, Vec<u8>>>,
    failing: AtomicBool,
}

impl MemStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn put(&self, key: &str, value: &str) {
        self.put_bytes(key, value.as_bytes()).await;
    }

    pub async fn put_bytes(&self, key: &str, value: &[u8]) {
        self.data.lock().await.insert(key.to_string(), value.to_vec());
    }

    pub async fn raw(&self, key: &str) -> Option<String> {
        let data = self.data.lock().await;
        data.get(key).map(|v| String::from_utf8_lossy(v).into_owned())
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HitError::Backend("connection reset".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CounterStore for MemStore {
    fn name(&self) -> &'static str {
        "mem"
    }

    async fn incr(&self, key: &str) -> Result<u64> {
        self.check()?;
        let mut data = self.data.lock().await;
        let current = match data.get(key) {
            Some(raw) => std::str::from_utf8(raw)
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .ok_or_else(|| HitError::Backend("value is not an integer".into()))?,
            None => 0,
        };
        let next = current + 1;
        data.insert(key.to_string(), next.to_string().into_bytes());
        Ok(next)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.check()?;
        Ok(self.data.lock().await.get(key).cloned())
    }
}

/// Never answers within any sane timeout.
pub struct HangingStore;

#[async_trait]
impl CounterStore for HangingStore {
    fn name(&self) -> &'static str {
        "hanging"
    }

    async fn incr(&self, _key: &str) -> Result<u64> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(1_000)
    }

    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Some(b"1000".to_vec()))
    }
}

/// Connector that counts attempts and either hands out `store` or fails.
pub struct CountingConnector {
    store: Option<Arc<dyn CounterStore>>,
    delay: Duration,
    attempts: AtomicUsize,
}

impl CountingConnector {
    pub fn ok(store: Arc<dyn CounterStore>) -> Arc<Self> {
        Arc::new(Self {
            store: Some(store),
            delay: Duration::from_millis(20),
            attempts: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            store: None,
            delay: Duration::from_millis(20),
            attempts: AtomicUsize::new(0),
        })
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreConnector for CountingConnector {
    async fn connect(&self) -> Result<Arc<dyn CounterStore>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.store
            .clone()
            .ok_or_else(|| HitError::Backend("connection refused".into()))
    }
}
