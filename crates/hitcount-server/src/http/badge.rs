//! `/badge` (SVG) and `/badge.json` (shields.io endpoint schema).
//!
//! Both only read the counter; repeated badge fetches never change state.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use hitcount_core::badge::{render_schema, render_svg, BadgeColors, BadgeSpec, BadgeStyle};

use crate::app_state::AppState;
use crate::http::counter::read;

pub const SVG: &str = "image/svg+xml;charset=utf-8";
pub const JSON_UTF8: &str = "application/json; charset=utf-8";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeQuery {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub bg: String,
    #[serde(default)]
    pub label_color: String,
    #[serde(default)]
    pub value_color: String,
    #[serde(default)]
    pub font: String,
}

pub async fn badge(State(app): State<AppState>, Query(q): Query<BadgeQuery>) -> Response {
    let id = app.counters().resolve_id(q.id.as_deref()).to_string();
    let counted = read(&app, &id).await;

    let spec = BadgeSpec::new(q.label, counted.value)
        .style(BadgeStyle::from_param(&q.style))
        .colors(BadgeColors {
            color: q.color,
            bg: q.bg,
            label_color: q.label_color,
            value_color: q.value_color,
        })
        .font(q.font);

    (
        [(header::CONTENT_TYPE, SVG), (header::CACHE_CONTROL, "no-cache")],
        render_svg(&spec),
    )
        .into_response()
}

pub async fn badge_json(State(app): State<AppState>, Query(q): Query<BadgeQuery>) -> Response {
    let id = app.counters().resolve_id(q.id.as_deref()).to_string();
    let counted = read(&app, &id).await;

    let schema = render_schema(&q.label, counted.value, &q.color);
    let mut resp = Json(schema).into_response();
    let headers = resp.headers_mut();
    headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static(JSON_UTF8));
    headers.insert(header::CACHE_CONTROL, header::HeaderValue::from_static("no-cache"));
    resp
}
