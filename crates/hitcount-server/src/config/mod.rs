//! Server config loader (strict parsing + env overrides).
//!
//! Resolution order: `HITCOUNT_CONFIG` path, else `hitcount.yaml` when it
//! exists, else built-in defaults. Environment overrides are applied on top
//! and the result is validated once more.

pub mod env;
pub mod schema;

use std::fs;
use std::path::Path;

use hitcount_core::error::{HitError, Result};

pub use schema::{
    AuthSection, CorsSection, CounterSection, HitcountConfig, ServerSection, StoreSection,
};

pub const CONFIG_PATH_ENV: &str = "HITCOUNT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "hitcount.yaml";

pub fn load_from_file(path: &str) -> Result<HitcountConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| HitError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<HitcountConfig> {
    let cfg: HitcountConfig =
        serde_yaml::from_str(s).map_err(|e| HitError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load the effective configuration for this process.
pub fn load() -> Result<HitcountConfig> {
    let mut cfg = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => load_from_file(&path)?,
        _ if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from_file(DEFAULT_CONFIG_PATH)?,
        _ => HitcountConfig::default(),
    };

    env::apply_overrides(&mut cfg, |key| std::env::var(key).ok());
    cfg.validate()?;
    Ok(cfg)
}
