//! Axum router wiring.
//!
//! Layer order, outermost first: access log, CORS, security headers.

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{any, get, MethodRouter};
use axum::Router;

use crate::app_state::AppState;
use crate::http::{badge, counter, error, middleware, ApiError};
use crate::ops;

fn get_only(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.fallback(|| async { ApiError::method_not_allowed("GET") })
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/hit",
            get(counter::hit)
                .post(counter::hit)
                .fallback(|| async { ApiError::method_not_allowed("GET, POST") }),
        )
        .route("/count", get_only(get(counter::count)))
        .route("/count.txt", get_only(get(counter::count_txt)))
        .route("/badge", get_only(get(badge::badge)))
        .route("/badge.json", get_only(get(badge::badge_json)))
        .route("/healthz", any(ops::healthz))
        .route("/readyz", get_only(get(ops::readyz)))
        .route("/metrics", get_only(get(ops::metrics)))
        .fallback(error::not_found)
        .layer(from_fn(middleware::security_headers))
        .layer(from_fn_with_state(state.clone(), middleware::cors))
        .layer(from_fn_with_state(state.clone(), middleware::access_log))
        .with_state(state)
}
