//! hitcount core: runtime-free counter primitives, badge rendering, and errors.
//!
//! This crate holds the pieces of the hit counter that carry real invariants:
//! the in-process fallback counters and the badge renderer. It carries no
//! async runtime or transport dependencies so the server, tests, and any
//! other embedding can share it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! All fallible paths surface as `HitError`/`Result`; the counter paths
//! themselves never fail, they degrade.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod badge;
pub mod counter;
pub mod error;

/// Shared result type.
pub use error::{HitError, Result};
