use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

/// Acknowledgement returned for every accepted update.
pub fn ack() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "ok": true })))
}
