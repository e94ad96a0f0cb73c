//! Redis-backed `CounterStore`.
//!
//! One multiplexed async connection is opened at init and cloned per call;
//! clones share the same pipelined socket.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tokio::time::timeout;

use hitcount_core::error::{HitError, Result};

use super::{CounterStore, StoreConnector};

pub struct RedisConnector {
    url: String,
    connect_timeout: Duration,
}

impl RedisConnector {
    pub fn new(url: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            url: url.into(),
            connect_timeout,
        }
    }
}

#[async_trait]
impl StoreConnector for RedisConnector {
    /// Parse the URL, connect, and `PING`, all bounded by the connect timeout.
    async fn connect(&self) -> Result<Arc<dyn CounterStore>> {
        let client = redis::Client::open(self.url.as_str())
            .map_err(|e| HitError::Backend(format!("parse redis url failed: {e}")))?;
        let addr = client.get_connection_info().addr.to_string();

        let handshake = async {
            let mut conn = client.get_multiplexed_async_connection().await?;
            let _: String = redis::cmd("PING").query_async(&mut conn).await?;
            Ok::<_, redis::RedisError>(conn)
        };

        let conn = timeout(self.connect_timeout, handshake)
            .await
            .map_err(|_| HitError::Backend(format!("redis connect timed out (addr={addr})")))?
            .map_err(|e| HitError::Backend(format!("redis ping failed (addr={addr}): {e}")))?;

        tracing::info!(%addr, "redis enabled");
        Ok(Arc::new(RedisStore { conn }))
    }
}

struct RedisStore {
    conn: MultiplexedConnection,
}

#[async_trait]
impl CounterStore for RedisStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn incr(&self, key: &str) -> Result<u64> {
        let mut conn = self.conn.clone();
        let v: i64 = conn
            .incr(key, 1)
            .await
            .map_err(|e| HitError::Backend(format!("INCR {key}: {e}")))?;
        u64::try_from(v).map_err(|_| HitError::Backend(format!("INCR {key}: negative value {v}")))
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        conn.get(key)
            .await
            .map_err(|e| HitError::Backend(format!("GET {key}: {e}")))
    }
}
