use std::net::SocketAddr;

use serde::Deserialize;
use hitcount_core::error::{HitError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HitcountConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub auth: AuthSection,

    #[serde(default)]
    pub cors: CorsSection,

    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub counter: CounterSection,
}

impl Default for HitcountConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            server: ServerSection::default(),
            auth: AuthSection::default(),
            cors: CorsSection::default(),
            store: StoreSection::default(),
            counter: CounterSection::default(),
        }
    }
}

impl HitcountConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(HitError::Config(format!(
                "unsupported config version {} (expected 1)",
                self.version
            )));
        }

        self.server.validate()?;
        self.cors.validate()?;
        self.store.validate()?;
        self.counter.validate()?;

        Ok(())
    }
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(100..=60000).contains(&self.shutdown_grace_ms) {
            return Err(HitError::Config(
                "server.shutdown_grace_ms must be between 100 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            HitError::Config(format!("server.listen must be a valid SocketAddr ({}): {e}", self.listen))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_shutdown_grace_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthSection {
    /// When set, `/hit` requires `X-Auth-Token` or `?token=` to match.
    #[serde(default)]
    pub secret_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsSection {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
}

impl Default for CorsSection {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            max_age_secs: default_max_age_secs(),
        }
    }
}

impl CorsSection {
    pub fn validate(&self) -> Result<()> {
        if self.allowed_origins.is_empty() {
            return Err(HitError::Config("cors.allowed_origins must not be empty".into()));
        }
        if self.allowed_origins.iter().any(|o| o.trim().is_empty()) {
            return Err(HitError::Config("cors.allowed_origins must not contain blanks".into()));
        }
        Ok(())
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".into()]
}
fn default_max_age_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    /// `redis://` or `rediss://` URL of the durable backend. Unset means
    /// fallback-only operation.
    #[serde(default)]
    pub redis_url: Option<String>,

    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_op_timeout_ms")]
    pub op_timeout_ms: u64,

    /// Abort startup when the backend is configured but unreachable.
    #[serde(default)]
    pub require_backend: bool,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            redis_url: None,
            key_prefix: default_key_prefix(),
            connect_timeout_ms: default_connect_timeout_ms(),
            op_timeout_ms: default_op_timeout_ms(),
            require_backend: false,
        }
    }
}

impl StoreSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=10000).contains(&self.connect_timeout_ms) {
            return Err(HitError::Config(
                "store.connect_timeout_ms must be between 100 and 10000".into(),
            ));
        }
        if !(100..=10000).contains(&self.op_timeout_ms) {
            return Err(HitError::Config(
                "store.op_timeout_ms must be between 100 and 10000".into(),
            ));
        }
        if let Some(url) = &self.redis_url {
            if !(url.starts_with("redis://") || url.starts_with("rediss://")) {
                return Err(HitError::Config(
                    "store.redis_url must start with redis:// or rediss://".into(),
                ));
            }
        }
        if self.require_backend && self.redis_url.is_none() {
            return Err(HitError::Config(
                "store.require_backend is set but store.redis_url is missing".into(),
            ));
        }
        Ok(())
    }
}

fn default_key_prefix() -> String {
    "hits:".into()
}
fn default_connect_timeout_ms() -> u64 {
    2000
}
fn default_op_timeout_ms() -> u64 {
    1500
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CounterSection {
    /// Identifier used when a request carries none.
    #[serde(default = "default_id")]
    pub default_id: String,

    /// Starting value of the default identifier's fallback counter.
    #[serde(default)]
    pub initial_count: u64,

    /// Flat file persisting the default identifier's fallback counter.
    #[serde(default)]
    pub persist_file: Option<String>,
}

impl Default for CounterSection {
    fn default() -> Self {
        Self {
            default_id: default_id(),
            initial_count: 0,
            persist_file: None,
        }
    }
}

impl CounterSection {
    pub fn validate(&self) -> Result<()> {
        if self.default_id.is_empty() {
            return Err(HitError::Config("counter.default_id must not be empty".into()));
        }
        if matches!(&self.persist_file, Some(p) if p.trim().is_empty()) {
            return Err(HitError::Config("counter.persist_file must not be blank".into()));
        }
        Ok(())
    }
}

fn default_id() -> String {
    "home".into()
}
