//! `/hit`, `/count`, `/count.txt`.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use hitcount_core::error::HitError;

use crate::app_state::AppState;
use crate::http::{auth, ApiError};
use crate::store::{Counted, Source};

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

#[derive(Debug, Default, Deserialize)]
pub struct HitQuery {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CountQuery {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HitsBody {
    pub id: String,
    pub hits: u64,
    pub source: Source,
}

/// Increment and return the new value. Guarded by the shared secret.
pub async fn hit(
    State(app): State<AppState>,
    headers: HeaderMap,
    Query(q): Query<HitQuery>,
) -> Result<Json<HitsBody>, ApiError> {
    let secret = app.cfg().auth.secret_token.as_deref();
    if !auth::authorize(secret, &headers, q.token.as_deref()) {
        return Err(HitError::Unauthorized.into());
    }

    let id = app.counters().resolve_id(q.id.as_deref()).to_string();
    let counted = app.counters().increment(&id).await;
    record(&app, "increment", counted);

    Ok(Json(HitsBody {
        id,
        hits: counted.value,
        source: counted.source,
    }))
}

/// Current value as JSON, or plain text with `format=txt|text`.
pub async fn count(State(app): State<AppState>, Query(q): Query<CountQuery>) -> Response {
    let id = app.counters().resolve_id(q.id.as_deref()).to_string();
    let counted = read(&app, &id).await;

    if matches!(q.format.as_deref(), Some("txt" | "text")) {
        return ([(header::CONTENT_TYPE, TEXT_PLAIN)], counted.value.to_string()).into_response();
    }

    Json(HitsBody {
        id,
        hits: counted.value,
        source: counted.source,
    })
    .into_response()
}

/// Bare number for hand-rolled badges.
pub async fn count_txt(State(app): State<AppState>, Query(q): Query<CountQuery>) -> Response {
    let id = app.counters().resolve_id(q.id.as_deref()).to_string();
    let counted = read(&app, &id).await;

    (
        [
            (header::CONTENT_TYPE, TEXT_PLAIN),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        counted.value.to_string(),
    )
        .into_response()
}

pub(crate) async fn read(app: &AppState, id: &str) -> Counted {
    let counted = app.counters().read(id).await;
    record(app, "read", counted);
    counted
}

fn record(app: &AppState, op: &str, counted: Counted) {
    app.metrics()
        .counter_ops
        .inc(&[("op", op), ("source", counted.source.as_str())]);
}
