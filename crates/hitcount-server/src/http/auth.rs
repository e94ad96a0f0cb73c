//! Shared-secret check for mutating routes.

use axum::http::HeaderMap;

pub const AUTH_HEADER: &str = "x-auth-token";

/// `true` when no secret is configured, or when the `X-Auth-Token` header or
/// the `token` query parameter matches it.
pub fn authorize(secret: Option<&str>, headers: &HeaderMap, query_token: Option<&str>) -> bool {
    let Some(secret) = secret.filter(|s| !s.is_empty()) else {
        return true;
    };

    let header_token = headers.get(AUTH_HEADER).and_then(|v| v.to_str().ok());
    [header_token, query_token]
        .into_iter()
        .flatten()
        .any(|candidate| constant_time_eq(candidate.as_bytes(), secret.as_bytes()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
