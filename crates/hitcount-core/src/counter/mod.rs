//! In-process counters used when the durable backend is unset or failing.
//!
//! - `FallbackCounter`: per-identifier map, lazily created entries, atomic values.
//! - `LegacyCounter`: single unkeyed counter with optional flat-file persistence.
//!
//! Neither is a system of record. Values live for the process lifetime
//! (plus whatever the legacy file manages to keep).

mod fallback;
mod legacy;

pub use fallback::FallbackCounter;
pub use legacy::{load_count, save_count, LegacyCounter, Persister};
