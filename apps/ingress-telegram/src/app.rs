//! Webhook routes: `POST <webhook_path>` appends the update's `message` to the
//! CSV log and acknowledges with `{"ok": true}`; `GET /healthz` answers 204.

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Extension, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use msglog_core::{Extractor, LogStore, is_present};
use serde_json::Value;
use tracing::{Instrument, Span};

use crate::reqid::{RequestId, with_request_id};
use crate::respond::ack;
use crate::telemetry::{
    annotate_span, record_failure, record_logged, record_skipped, start_ingress_span,
};

pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LogStore>,
    pub extractor: Arc<Extractor>,
    pub secret_token: Option<String>,
}

impl AppState {
    pub fn new(store: LogStore, secret_token: Option<String>) -> Self {
        Self {
            store: Arc::new(store),
            extractor: Arc::new(Extractor::new()),
            secret_token,
        }
    }
}

pub fn router(state: AppState, webhook_path: &str) -> Router {
    Router::new()
        .route(webhook_path, post(handle_update))
        .route("/healthz", get(healthz))
        .layer(middleware::from_fn(with_request_id))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

fn secret_token_valid(expected: &Option<String>, provided: Option<&str>) -> bool {
    match expected {
        Some(exp) => provided == Some(exp.as_str()),
        None => true,
    }
}

/// Returns the update's `message` when it carries anything worth logging.
fn locate_message(payload: &Value) -> Option<&Value> {
    payload.get("message").filter(|message| is_present(message))
}

async fn handle_update(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let provided_token = headers
        .get(SECRET_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if !secret_token_valid(&state.secret_token, provided_token) {
        tracing::warn!("telegram secret token mismatch");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!(error = %err, "bad update body");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let rid = request_id.as_ref().map(|Extension(RequestId(id))| id.as_str());
    let span = start_ingress_span(rid);
    log_update(state, payload, span.clone())
        .instrument(span)
        .await
}

async fn log_update(state: AppState, payload: Value, span: Span) -> Response {
    let Some(message) = locate_message(&payload) else {
        tracing::debug!("update without message; nothing to log");
        record_skipped();
        return ack().into_response();
    };
    tracing::debug!(raw = %message, "raw message");

    let record = match state.extractor.extract(message) {
        Ok(record) => record,
        Err(err) => {
            tracing::warn!(error = %err, "message skipped");
            record_skipped();
            return ack().into_response();
        }
    };
    annotate_span(&span, &record);

    let store = Arc::clone(&state.store);
    let outcome = tokio::task::spawn_blocking(move || store.append(&record)).await;
    match outcome {
        Ok(Ok(())) => {
            record_logged();
            ack().into_response()
        }
        Ok(Err(err)) => {
            tracing::error!(error = %err, "failed to append message");
            record_failure();
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "append task aborted");
            record_failure();
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use msglog_core::{HEADER, KNOWN_POINTS, Record};
    use serde_json::json;
    use std::path::Path;
    use tower::ServiceExt;

    fn test_app(log_path: &Path, secret: Option<&str>) -> Router {
        let store = LogStore::new(log_path);
        store.ensure_initialized().expect("init log");
        router(
            AppState::new(store, secret.map(str::to_string)),
            "/webhook",
        )
    }

    fn post_json(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect")
            .to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn rows(path: &Path) -> Vec<Record> {
        let mut reader = csv::Reader::from_path(path).expect("open log");
        assert_eq!(
            reader.headers().unwrap().iter().collect::<Vec<_>>(),
            HEADER.to_vec()
        );
        reader
            .deserialize()
            .collect::<Result<Vec<Record>, _>>()
            .expect("parse rows")
    }

    #[tokio::test]
    async fn message_is_logged_and_acknowledged() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("db").join("messages.csv");
        let app = test_app(&log, None);

        let response = app
            .oneshot(post_json(json!({
                "update_id": 1,
                "message": {
                    "message_id": 42,
                    "from": { "first_name": "Kostas", "id": 7 },
                    "text": "hi, there"
                }
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(body_json(response).await, json!({ "ok": true }));

        let rows = rows(&log);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.message_id, "42");
        assert_eq!(row.first_name, "Kostas");
        assert_eq!(row.last_name, "");
        assert_eq!(row.sender_id, "7");
        assert_eq!(row.text, "hi, there");
        assert_eq!(row.timestamp.len(), "YYYY-MM-DD HH:MM:SS".len());
        assert!(KNOWN_POINTS.contains(&row.coordinate()));
    }

    #[tokio::test]
    async fn update_without_message_appends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("messages.csv");
        let app = test_app(&log, None);

        for payload in [
            json!({ "update_id": 2, "edited_message": { "message_id": 5 } }),
            json!({ "update_id": 3, "message": {} }),
            json!({ "update_id": 4, "message": null }),
        ] {
            let response = app.clone().oneshot(post_json(payload)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_json(response).await, json!({ "ok": true }));
        }

        assert!(rows(&log).is_empty());
    }

    #[tokio::test]
    async fn sequential_updates_append_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("messages.csv");
        let app = test_app(&log, None);

        for id in 1..=3 {
            let response = app
                .clone()
                .oneshot(post_json(json!({ "message": { "message_id": id, "text": "m" } })))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let ids: Vec<String> = rows(&log).into_iter().map(|r| r.message_id).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn secret_token_is_enforced_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("messages.csv");
        let app = test_app(&log, Some("s3cret"));
        let payload = json!({ "message": { "message_id": 1, "text": "hello" } });

        let denied = app.clone().oneshot(post_json(payload.clone())).await.unwrap();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

        let mut request = post_json(payload);
        request
            .headers_mut()
            .insert(SECRET_TOKEN_HEADER, "s3cret".parse().unwrap());
        let allowed = app.oneshot(request).await.unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);

        assert_eq!(rows(&log).len(), 1);
    }

    #[tokio::test]
    async fn store_failure_is_a_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let app = router(
            AppState::new(LogStore::new(blocker.join("messages.csv")), None),
            "/webhook",
        );

        let response = app
            .oneshot(post_json(json!({ "message": { "message_id": 1 } })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn invalid_json_is_rejected_before_logging() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("messages.csv");
        let app = test_app(&log, None);

        let request = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(rows(&log).is_empty());
    }

    #[tokio::test]
    async fn json_without_content_type_is_still_logged() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("messages.csv");
        let app = test_app(&log, None);

        for content_type in [None, Some("text/plain")] {
            let mut builder = Request::builder().method("POST").uri("/webhook");
            if let Some(content_type) = content_type {
                builder = builder.header("content-type", content_type);
            }
            let request = builder
                .body(Body::from(r#"{"message":{"message_id":1,"text":"x"}}"#))
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_json(response).await, json!({ "ok": true }));
        }

        let rows = rows(&log);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.message_id == "1" && r.text == "x"));
    }

    #[tokio::test]
    async fn healthz_reports_no_content() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir.path().join("messages.csv"), None);
        let request = Request::builder()
            .uri("/healthz")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn secret_token_validates_values() {
        let expected = Some("secret".to_string());
        assert!(secret_token_valid(&expected, Some("secret")));
        assert!(!secret_token_valid(&expected, Some("wrong")));
        assert!(!secret_token_valid(&expected, None));
        assert!(secret_token_valid(&None, None));
    }

    #[test]
    fn locate_message_ignores_empty_values() {
        assert!(locate_message(&json!({ "message": { "text": "x" } })).is_some());
        assert!(locate_message(&json!({ "message": {} })).is_none());
        assert!(locate_message(&json!({ "edited_message": { "text": "x" } })).is_none());
        assert!(locate_message(&json!([1, 2])).is_none());
    }
}
