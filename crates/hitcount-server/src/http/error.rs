//! `HitError` -> HTTP response mapping.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use hitcount_core::error::{ClientCode, HitError};

/// Client-visible error: JSON `{"error": "..."}` with a status derived from
/// the error's `ClientCode`.
#[derive(Debug)]
pub struct ApiError {
    err: HitError,
    allow: Option<&'static str>,
}

impl ApiError {
    /// 405 carrying the route's `Allow` header.
    pub fn method_not_allowed(allow: &'static str) -> Self {
        Self {
            err: HitError::MethodNotAllowed,
            allow: Some(allow),
        }
    }

    pub fn code(&self) -> ClientCode {
        self.err.client_code()
    }
}

impl From<HitError> for ApiError {
    fn from(err: HitError) -> Self {
        Self { err, allow: None }
    }
}

fn status_of(code: ClientCode) -> StatusCode {
    match code {
        ClientCode::BadRequest => StatusCode::BAD_REQUEST,
        ClientCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ClientCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ClientCode::NotFound => StatusCode::NOT_FOUND,
        ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        let msg = match code {
            ClientCode::Internal => {
                tracing::error!(error = %self.err, "request failed");
                "internal error".to_string()
            }
            _ => self.err.to_string(),
        };

        let mut resp = (status_of(code), Json(json!({ "error": msg }))).into_response();
        if let Some(allow) = self.allow {
            resp.headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(allow));
        }
        resp
    }
}

pub async fn not_found() -> ApiError {
    HitError::NotFound.into()
}
