//! Counter storage: durable backend seam plus the façade that picks a
//! backend per call.
//!
//! - `CounterStore`: atomic increment/read against an external service.
//! - `StoreConnector`: one-shot construction of a `CounterStore`.
//! - `CounterFacade`: durable first, in-process fallback on any failure.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use hitcount_core::error::Result;

pub mod facade;
pub mod redis_store;

pub use facade::{BackendState, CounterFacade, FacadeConfig};
pub use redis_store::RedisConnector;

/// External durable counter store. Implementations must be safe for
/// concurrent use by all in-flight requests.
#[async_trait]
pub trait CounterStore: Send + Sync {
    fn name(&self) -> &'static str;

    /// Atomically add one to `key` (missing keys start at zero) and return
    /// the new value.
    async fn incr(&self, key: &str) -> Result<u64>;

    /// Raw stored bytes for `key`, `None` when absent. Decoding is the
    /// caller's job; undecodable bytes are not a store failure.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

/// Builds the shared `CounterStore`. Called at most once per façade.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn CounterStore>>;
}

/// Which backend answered a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Durable,
    Fallback,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Durable => "durable",
            Source::Fallback => "fallback",
        }
    }
}

/// A counter value together with the backend that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counted {
    pub value: u64,
    pub source: Source,
}

impl Counted {
    pub fn durable(value: u64) -> Self {
        Self { value, source: Source::Durable }
    }

    pub fn fallback(value: u64) -> Self {
        Self { value, source: Source::Fallback }
    }
}
