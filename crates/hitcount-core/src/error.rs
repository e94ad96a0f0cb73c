//! Shared error type across hitcount crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid configuration.
    BadRequest,
    /// Missing or wrong auth token.
    Unauthorized,
    /// HTTP method not supported by the route.
    MethodNotAllowed,
    /// Unknown route.
    NotFound,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Unauthorized => "UNAUTHORIZED",
            ClientCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, HitError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum HitError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("not found")]
    NotFound,
    #[error("backend: {0}")]
    Backend(String),
    #[error("persist: {0}")]
    Persist(String),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl HitError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            HitError::Config(_) => ClientCode::BadRequest,
            HitError::Unauthorized => ClientCode::Unauthorized,
            HitError::MethodNotAllowed => ClientCode::MethodNotAllowed,
            HitError::NotFound => ClientCode::NotFound,
            HitError::Backend(_) | HitError::Persist(_) | HitError::Internal(_) => {
                ClientCode::Internal
            }
        }
    }
}
