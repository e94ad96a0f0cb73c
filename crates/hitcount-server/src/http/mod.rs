//! HTTP surface: handlers, auth, and middleware.
//!
//! Handlers stay thin: resolve the identifier, call the counter façade,
//! render. All counter-side failure handling lives in `store::facade`.

pub mod auth;
pub mod badge;
pub mod counter;
pub mod error;
pub mod middleware;

pub use error::ApiError;
