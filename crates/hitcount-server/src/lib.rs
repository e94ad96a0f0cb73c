//! hitcount server library entry.
//!
//! This crate wires configuration, the counter façade (durable store with
//! in-process fallback), badge rendering, and the HTTP surface into one
//! service. It is consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod http;
pub mod obs;
pub mod ops;
pub mod router;
pub mod store;
