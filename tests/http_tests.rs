//! HTTP contract tests for the classification service.
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`:
//! - Success responses keep the wire field order
//! - Validation failures map to 400 with an `error` payload
//! - Oversized bodies map to 413, upstream failures to 500
//! - Health, security headers, and request-id propagation

#![cfg(feature = "http")]
// Integration tests use expect/unwrap/panic for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use email_triage::classifier::{CategoryClassifier, LabelTable, ScoreModel};
use email_triage::recognizer::{EntityRecognizer, NoopRecognizer, RecognizedEntity};
use email_triage::server::{MAX_REQUEST_BODY_SIZE, router};
use email_triage::{Error, PiiMasker, TriageService};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

struct Person;

impl EntityRecognizer for Person {
    fn name(&self) -> &'static str {
        "person"
    }

    fn recognize(&self, text: &str) -> email_triage::Result<Vec<RecognizedEntity>> {
        Ok(text
            .find("Rituraj")
            .map(|byte| {
                let start = text[..byte].chars().count();
                vec![RecognizedEntity::new("PER", start, start + 7)]
            })
            .unwrap_or_default())
    }
}

struct Fixed;

impl ScoreModel for Fixed {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn scores(&self, _text: &str, _max_tokens: usize) -> email_triage::Result<Vec<f32>> {
        Ok(vec![0.1, 0.3, 0.2, 0.9])
    }
}

struct Offline;

impl ScoreModel for Offline {
    fn name(&self) -> &'static str {
        "offline"
    }

    fn scores(&self, _text: &str, _max_tokens: usize) -> email_triage::Result<Vec<f32>> {
        Err(Error::OperationFailed {
            operation: "classifier_request".to_string(),
            cause: "connect error".to_string(),
        })
    }
}

fn app_with(recognizer: Arc<dyn EntityRecognizer>, model: Arc<dyn ScoreModel>) -> axum::Router {
    let labels = LabelTable::from_labels(["Change", "Incident", "Problem", "Request"]).unwrap();
    let service = TriageService::new(
        PiiMasker::new(recognizer),
        CategoryClassifier::new(model, Arc::new(labels)),
    );
    router(Arc::new(service))
}

fn app() -> axum::Router {
    app_with(Arc::new(Person), Arc::new(Fixed))
}

fn post_classify(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/classify")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_classify_success_keeps_field_order() {
    let payload = json!({
        "input_email_body": "My name is Rituraj, and I would like to request a change in the account type associated with the email address ritu@akaike.com"
    });

    let response = app()
        .oneshot(post_classify(payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;

    let order: Vec<usize> = [
        "\"input_email_body\"",
        "\"list_of_masked_entities\"",
        "\"masked_email\"",
        "\"category_of_the_email\"",
    ]
    .iter()
    .map(|key| text.find(key).unwrap())
    .collect();
    assert!(order.windows(2).all(|pair| pair[0] < pair[1]), "{text}");

    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        body["masked_email"],
        "My name is [full_name], and I would like to request a change in the account type associated with the email address [email]"
    );
    assert_eq!(body["category_of_the_email"], "Request");
    assert_eq!(body["list_of_masked_entities"][0]["position"], json!([11, 18]));
    assert_eq!(body["list_of_masked_entities"][0]["classification"], "full_name");
    assert_eq!(body["list_of_masked_entities"][1]["classification"], "email");
}

#[tokio::test]
async fn test_classify_missing_field() {
    let response = app()
        .oneshot(post_classify(r#"{"email_body": "hi"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body, json!({"error": "Missing 'input_email_body'"}));
}

#[tokio::test]
async fn test_classify_non_object_body_is_missing_field() {
    let response = app().oneshot(post_classify("[1, 2, 3]")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["error"], "Missing 'input_email_body'");
}

#[tokio::test]
async fn test_classify_invalid_json() {
    let response = app().oneshot(post_classify("{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON: "));
}

#[tokio::test]
async fn test_classify_wrong_type() {
    let response = app()
        .oneshot(post_classify(r#"{"input_email_body": 7}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_classify_body_too_large() {
    let body = format!(
        r#"{{"input_email_body": "{}"}}"#,
        "a".repeat(MAX_REQUEST_BODY_SIZE)
    );

    let response = app().oneshot(post_classify(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_classify_upstream_failure() {
    let response = app_with(Arc::new(NoopRecognizer::new()), Arc::new(Offline))
        .oneshot(post_classify(r#"{"input_email_body": "hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(body["error"].is_string());
    assert!(body.get("category_of_the_email").is_none());
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_security_headers() {
    let response = app()
        .oneshot(post_classify(r#"{"input_email_body": "hi"}"#))
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
}

#[tokio::test]
async fn test_request_id_echoed() {
    let request = Request::builder()
        .method("POST")
        .uri("/classify")
        .header("x-request-id", "ticket-1234")
        .body(Body::from(r#"{"input_email_body": "hi"}"#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "ticket-1234");
}

#[tokio::test]
async fn test_request_id_generated() {
    let response = app()
        .oneshot(post_classify(r#"{"input_email_body": "hi"}"#))
        .await
        .unwrap();

    let id = response.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn test_get_classify_not_allowed() {
    let request = Request::builder()
        .uri("/classify")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
