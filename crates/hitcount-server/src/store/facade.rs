//! Counter façade: one `increment` / `read` contract over two backends.
//!
//! Per call: try the durable store (bounded by `op_timeout`), fall back to
//! the in-process counters on any failure or when no store is configured.
//! The answer always comes entirely from one backend; the two are never
//! merged or reconciled.
//!
//! Backend initialization runs at most once per façade, under a tokio
//! `OnceCell`. A failed attempt is cached as `None`; later calls go straight
//! to the fallback instead of paying connect latency again. An attempt whose
//! caller was cancelled mid-connect also counts: the next initializer sees
//! `init_attempted` and caches `None` without connecting.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tokio::time::timeout;

use hitcount_core::counter::{FallbackCounter, LegacyCounter};
use hitcount_core::error::{HitError, Result};

use super::{Counted, CounterStore, StoreConnector};

#[derive(Debug, Clone)]
pub struct FacadeConfig {
    /// Prepended to identifiers to form durable keys.
    pub key_prefix: String,
    /// Identifier used when callers supply none.
    pub default_id: String,
    /// Upper bound for each durable call.
    pub op_timeout: Duration,
    /// Seed for the default identifier's fallback counter.
    pub initial_count: u64,
    /// Optional flat file backing the default identifier's fallback counter.
    pub persist_file: Option<PathBuf>,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            key_prefix: "hits:".into(),
            default_id: "home".into(),
            op_timeout: Duration::from_millis(1500),
            initial_count: 0,
            persist_file: None,
        }
    }
}

/// Observable state of the durable backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendState {
    /// No connector configured; fallback only.
    Unconfigured,
    /// Configured, initialization not attempted yet.
    Pending,
    Live,
    /// Initialization failed; stays this way for the process lifetime.
    Unavailable,
}

impl BackendState {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendState::Unconfigured => "unconfigured",
            BackendState::Pending => "pending",
            BackendState::Live => "live",
            BackendState::Unavailable => "unavailable",
        }
    }
}

pub struct CounterFacade {
    key_prefix: String,
    default_id: String,
    op_timeout: Duration,
    connector: Option<Arc<dyn StoreConnector>>,
    backend: OnceCell<Option<Arc<dyn CounterStore>>>,
    init_attempted: AtomicBool,
    fallback: FallbackCounter,
    legacy: LegacyCounter,
}

impl CounterFacade {
    pub fn new(cfg: FacadeConfig, connector: Option<Arc<dyn StoreConnector>>) -> Self {
        let legacy = match cfg.persist_file {
            Some(path) => LegacyCounter::with_persist_file(cfg.initial_count, path),
            None => LegacyCounter::new(cfg.initial_count),
        };

        Self {
            key_prefix: cfg.key_prefix,
            default_id: cfg.default_id,
            op_timeout: cfg.op_timeout,
            connector,
            backend: OnceCell::new(),
            init_attempted: AtomicBool::new(false),
            fallback: FallbackCounter::new(),
            legacy,
        }
    }

    /// Fallback-only façade.
    pub fn in_memory(cfg: FacadeConfig) -> Self {
        Self::new(cfg, None)
    }

    /// Missing or empty identifiers map to the configured default.
    pub fn resolve_id<'a>(&'a self, id: Option<&'a str>) -> &'a str {
        match id {
            Some(id) if !id.is_empty() => id,
            _ => &self.default_id,
        }
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    /// Run the one-time backend initialization now. Returns whether a live
    /// backend is available.
    pub async fn warm_up(&self) -> bool {
        self.backend().await.is_some()
    }

    pub fn backend_state(&self) -> BackendState {
        if self.connector.is_none() {
            return BackendState::Unconfigured;
        }
        match self.backend.get() {
            None => BackendState::Pending,
            Some(Some(_)) => BackendState::Live,
            Some(None) => BackendState::Unavailable,
        }
    }

    /// Number of identifiers tracked by the per-id fallback map.
    pub fn fallback_ids(&self) -> usize {
        self.fallback.len()
    }

    /// Add one to `id` and return the post-increment value.
    /// Never fails: durable errors degrade to the fallback path.
    pub async fn increment(&self, id: &str) -> Counted {
        if let Some(store) = self.backend().await {
            match self.durable_increment(store.as_ref(), id).await {
                Ok(value) => return Counted::durable(value),
                Err(e) => tracing::warn!(
                    error = %e,
                    backend = store.name(),
                    id,
                    "durable increment failed, using fallback"
                ),
            }
        }
        Counted::fallback(self.fallback_increment(id).await)
    }

    /// Current value of `id`. An absent durable key reads as zero and is a
    /// durable answer, not a failure.
    pub async fn read(&self, id: &str) -> Counted {
        if let Some(store) = self.backend().await {
            match self.durable_read(store.as_ref(), id).await {
                Ok(value) => return Counted::durable(value),
                Err(e) => tracing::warn!(
                    error = %e,
                    backend = store.name(),
                    id,
                    "durable read failed, using fallback"
                ),
            }
        }
        Counted::fallback(self.fallback_read(id))
    }

    async fn backend(&self) -> Option<Arc<dyn CounterStore>> {
        let connector = self.connector.as_ref()?;
        self.backend
            .get_or_init(|| async {
                // set before the first await so a dropped attempt still counts
                if self.init_attempted.swap(true, Ordering::AcqRel) {
                    tracing::warn!(
                        "durable backend init was interrupted; fallback only for this process"
                    );
                    return None;
                }
                match connector.connect().await {
                    Ok(store) => Some(store),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            "durable backend unavailable; fallback only for this process"
                        );
                        None
                    }
                }
            })
            .await
            .clone()
    }

    fn key(&self, id: &str) -> String {
        format!("{}{}", self.key_prefix, id)
    }

    async fn durable_increment(&self, store: &dyn CounterStore, id: &str) -> Result<u64> {
        let key = self.key(id);
        timeout(self.op_timeout, store.incr(&key))
            .await
            .map_err(|_| HitError::Backend(format!("INCR {key} timed out")))?
    }

    async fn durable_read(&self, store: &dyn CounterStore, id: &str) -> Result<u64> {
        let key = self.key(id);
        let raw = timeout(self.op_timeout, store.get(&key))
            .await
            .map_err(|_| HitError::Backend(format!("GET {key} timed out")))??;

        let Some(raw) = raw else {
            return Ok(0);
        };
        match std::str::from_utf8(&raw).ok().and_then(|s| s.trim().parse::<u64>().ok()) {
            Some(v) => Ok(v),
            None => {
                tracing::debug!(
                    %key,
                    value = %String::from_utf8_lossy(&raw),
                    "non-numeric stored value, treating as absent"
                );
                Ok(0)
            }
        }
    }

    async fn fallback_increment(&self, id: &str) -> u64 {
        if id != self.default_id {
            return self.fallback.increment(id);
        }

        let v = self.legacy.increment();
        if let Some(persister) = self.legacy.persister() {
            // file I/O stays off the async workers; awaited so the write
            // finishes within this request
            if let Err(e) = tokio::task::spawn_blocking(move || persister.save(v)).await {
                tracing::warn!(error = %e, "persist task failed");
            }
        }
        v
    }

    fn fallback_read(&self, id: &str) -> u64 {
        if id == self.default_id {
            self.legacy.get()
        } else {
            self.fallback.read(id)
        }
    }
}
