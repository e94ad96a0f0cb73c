//! Shared application state for the hitcount server.
//!
//! Owns the effective config, the counter façade, and the metrics registry.
//! Everything the handlers touch hangs off this one explicitly constructed
//! value; there is no process-global counter state.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use hitcount_core::error::Result;

use crate::config::HitcountConfig;
use crate::obs::metrics::ServerMetrics;
use crate::store::{BackendState, CounterFacade, FacadeConfig, RedisConnector, StoreConnector};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: HitcountConfig,
    counters: CounterFacade,
    metrics: ServerMetrics,
}

impl AppState {
    /// Build application state, with a Redis connector when
    /// `store.redis_url` is configured. No connection is opened here.
    pub fn new(cfg: HitcountConfig) -> Result<Self> {
        let connector = cfg.store.redis_url.as_ref().map(|url| {
            Arc::new(RedisConnector::new(
                url.clone(),
                Duration::from_millis(cfg.store.connect_timeout_ms),
            )) as Arc<dyn StoreConnector>
        });
        Self::with_connector(cfg, connector)
    }

    /// Build application state around an arbitrary store connector.
    pub fn with_connector(
        cfg: HitcountConfig,
        connector: Option<Arc<dyn StoreConnector>>,
    ) -> Result<Self> {
        cfg.validate()?;

        let counters = CounterFacade::new(facade_config(&cfg), connector);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                counters,
                metrics: ServerMetrics::default(),
            }),
        })
    }

    pub fn cfg(&self) -> &HitcountConfig {
        &self.inner.cfg
    }

    pub fn counters(&self) -> &CounterFacade {
        &self.inner.counters
    }

    pub fn metrics(&self) -> &ServerMetrics {
        &self.inner.metrics
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }

    /// Gauges computed at scrape time.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        let state = self.counters().backend_state();
        vec![
            ("hitcount_fallback_ids", self.counters().fallback_ids() as u64),
            ("hitcount_backend_live", u64::from(state == BackendState::Live)),
        ]
    }
}

fn facade_config(cfg: &HitcountConfig) -> FacadeConfig {
    FacadeConfig {
        key_prefix: cfg.store.key_prefix.clone(),
        default_id: cfg.counter.default_id.clone(),
        op_timeout: Duration::from_millis(cfg.store.op_timeout_ms),
        initial_count: cfg.counter.initial_count,
        persist_file: cfg.counter.persist_file.as_ref().map(PathBuf::from),
    }
}
