//! Cross-cutting HTTP layers: CORS, security headers, access log.

use axum::extract::{MatchedPath, Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::time::Instant;

use crate::app_state::AppState;
use crate::obs::metrics::micros;

const CORS_METHODS: &str = "GET, POST, OPTIONS";

/// `nosniff` / `DENY` on everything; `no-store` unless the handler chose
/// its own caching policy.
pub async fn security_headers(req: Request, next: Next) -> Response {
    let mut resp = next.run(req).await;
    let headers = resp.headers_mut();
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    if !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }
    resp
}

/// Origin allow-list CORS. Preflights are answered here and never reach
/// the handlers.
pub async fn cors(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let allowed = origin
        .as_deref()
        .and_then(|o| allowed_origin(&app.cfg().cors.allowed_origins, o));

    let preflight = req.method() == Method::OPTIONS
        && req.headers().contains_key(header::ACCESS_CONTROL_REQUEST_METHOD);
    let request_headers = req
        .headers()
        .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
        .cloned();

    let mut resp = if preflight {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    let Some(allowed) = allowed else {
        return resp;
    };
    let Ok(allowed_value) = HeaderValue::from_str(allowed) else {
        return resp;
    };

    let headers = resp.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allowed_value);
    if allowed != "*" {
        headers.append(header::VARY, HeaderValue::from_static("Origin"));
    }
    if preflight {
        headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(CORS_METHODS));
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            request_headers.unwrap_or_else(|| HeaderValue::from_static("*")),
        );
        headers.insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from(app.cfg().cors.max_age_secs),
        );
    }
    resp
}

/// `*` allows everyone; otherwise the origin must match an entry exactly.
pub fn allowed_origin<'a>(allowed: &[String], origin: &'a str) -> Option<&'a str> {
    if allowed.iter().any(|o| o == "*") {
        return Some("*");
    }
    allowed.iter().any(|o| o == origin).then_some(origin)
}

/// One log line and one metrics sample per request.
pub async fn access_log(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let resp = next.run(req).await;

    let elapsed = start.elapsed();
    let status = resp.status();
    tracing::info!(
        %method,
        %path,
        status = status.as_u16(),
        elapsed_us = micros(elapsed),
        "request"
    );

    let metrics = app.metrics();
    metrics
        .http_requests
        .inc(&[("route", route.as_str()), ("status", status.as_str())]);
    metrics.http_duration.observe(&[("route", route.as_str())], elapsed);

    resp
}

#[cfg(test)]
mod tests {
    use super::allowed_origin;

    #[test]
    fn wildcard_and_exact() {
        let any = vec!["*".to_string()];
        assert_eq!(allowed_origin(&any, "https://a.dev"), Some("*"));

        let list = vec!["https://a.dev".to_string(), "https://b.dev".to_string()];
        assert_eq!(allowed_origin(&list, "https://b.dev"), Some("https://b.dev"));
        assert_eq!(allowed_origin(&list, "https://evil.dev"), None);
    }
}
