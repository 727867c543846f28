//! API integration tests for archai-server.
//!
//! These tests drive the router with realistic multipart requests and check
//! the classify and feedback flows end to end, using the deterministic mock
//! classifier or small fixed scorers in place of the trained model.

use std::io::Cursor;

use archai_core::{
    ArchError, ClassifierGateway, FeedbackRecorder, FeedbackSummary, PredictionService,
    StyleCatalog, StyleScorer, TensorBatch, MALFORMED_IMAGE_MESSAGE, NO_IMAGE_MESSAGE,
    PROCESSING_ERROR_MESSAGE,
};
use archai_server::{create_router, AppState};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "----TestBoundary7MA4YWxkTrZu0gW";

/// Helper to create multipart body for a classify request
fn create_classify_multipart(
    content: &[u8],
    content_type: &str,
    top: Option<&str>,
) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    // File field
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"building.png\"\r\n",
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(b"\r\n");

    // Top field
    if let Some(top) = top {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"top\"\r\n\r\n");
        body.extend_from_slice(top.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    // End boundary
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

/// Create a PNG with a recognizable facade pattern
fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let mut img = RgbImage::new(width, height);
    for (x, y, px) in img.enumerate_pixels_mut() {
        let column = if (x / 8) % 2 == 0 { 210 } else { 70 };
        *px = Rgb([column, (y * 255 / height) as u8, 120]);
    }
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

/// Scorer returning a fixed vector regardless of input
struct FixedScorer(Vec<f32>);

impl StyleScorer for FixedScorer {
    fn predict(&self, _batch: &TensorBatch) -> archai_core::Result<Vec<f32>> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        "fixed".into()
    }
}

/// Scorer that always fails
struct BrokenScorer;

impl StyleScorer for BrokenScorer {
    fn predict(&self, _batch: &TensorBatch) -> archai_core::Result<Vec<f32>> {
        Err(ArchError::Inference("out of memory".into()))
    }

    fn describe(&self) -> String {
        "broken".into()
    }
}

/// Build the test router over the mock classifier and a temporary log
fn create_test_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::mock(FeedbackRecorder::new(dir.path().join("feedback_log.txt")));
    (create_router(state), dir)
}

fn create_app_with_scorer<S: StyleScorer + 'static>(scorer: S) -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let service = PredictionService::new(ClassifierGateway::new(scorer), StyleCatalog::builtin());
    let state = AppState::new(service, FeedbackRecorder::new(dir.path().join("log.txt")));
    (create_router(state), dir)
}

async fn post_classify(app: Router, content_type: String, body: Vec<u8>) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/classify")
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn post_empty(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

// ============================================================================
// Health & Readiness Tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoint_reports_classifier() {
    let (app, _dir) = create_test_app();

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["styles"], 25);
    assert!(json["classifier"].as_str().unwrap().starts_with("mock"));
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_ready_endpoint_returns_ok() {
    let (app, _dir) = create_test_app();

    let response = get(app, "/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["ready"], true);
}

// ============================================================================
// Classify Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_classify_returns_catalog_style() {
    let (app, _dir) = create_test_app();
    let (content_type, body) = create_classify_multipart(&create_test_png(300, 200), "image/png", None);

    let response = post_classify(app, content_type, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let catalog = StyleCatalog::builtin();
    let style = catalog.describe(json["style"].as_str().unwrap()).unwrap();
    assert_eq!(json["era"], style.era);
    assert_eq!(json["lineage"], style.lineage);
    assert!(json["confidence_percent"].as_str().unwrap().ends_with('%'));
    assert!(json["message"]
        .as_str()
        .unwrap()
        .starts_with("Estilo arquitectónico: "));
    assert!(json["request_id"].is_string());
    assert!(json.get("alternatives").is_none());
}

#[tokio::test]
async fn test_classify_is_deterministic() {
    let png = create_test_png(128, 128);
    let mut styles = Vec::new();

    for _ in 0..2 {
        let (app, _dir) = create_test_app();
        let (content_type, body) = create_classify_multipart(&png, "image/png", None);
        let json = body_json(post_classify(app, content_type, body).await).await;
        styles.push((json["style"].clone(), json["confidence"].clone()));
    }

    assert_eq!(styles[0], styles[1]);
}

#[tokio::test]
async fn test_classify_fixed_scores_picks_gothic() {
    let mut scores = vec![0.01; 25];
    scores[15] = 0.76;
    let (app, _dir) = create_app_with_scorer(FixedScorer(scores));
    let (content_type, body) =
        create_classify_multipart(&create_test_png(512, 512), "image/png", None);

    let json = body_json(post_classify(app, content_type, body).await).await;
    assert_eq!(json["style"], "Arquitectura gótica");
    assert_eq!(json["index"], 15);
    assert_eq!(json["confidence_percent"], "76.00%");
    assert_eq!(json["era"], "Siglos XII-XVI");
}

#[tokio::test]
async fn test_classify_top_returns_ranked_alternatives() {
    let mut scores = vec![0.0; 25];
    scores[6] = 0.6;
    scores[22] = 0.25;
    scores[9] = 0.15;
    let (app, _dir) = create_app_with_scorer(FixedScorer(scores));
    let (content_type, body) =
        create_classify_multipart(&create_test_png(64, 64), "image/png", Some("3"));

    let response = post_classify(app, content_type, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["index"], 6);
    let alternatives = json["alternatives"].as_array().unwrap();
    assert_eq!(alternatives.len(), 2);
    assert_eq!(alternatives[0]["index"], 22);
    assert_eq!(alternatives[1]["index"], 9);
}

#[tokio::test]
async fn test_classify_invalid_top_rejected() {
    let (app, _dir) = create_test_app();
    let (content_type, body) =
        create_classify_multipart(&create_test_png(32, 32), "image/png", Some("0"));

    let response = post_classify(app, content_type, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_classify_missing_file_field() {
    let (app, _dir) = create_test_app();

    // Multipart with only the top field
    let body = format!(
        "--{}\r\nContent-Disposition: form-data; name=\"top\"\r\n\r\n1\r\n--{}--\r\n",
        BOUNDARY, BOUNDARY
    );

    let response = post_classify(
        app,
        format!("multipart/form-data; boundary={}", BOUNDARY),
        body.into_bytes(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NO_IMAGE");
    assert_eq!(json["error"], NO_IMAGE_MESSAGE);
}

#[tokio::test]
async fn test_classify_empty_file_is_missing_image() {
    let (app, _dir) = create_test_app();
    let (content_type, body) = create_classify_multipart(b"", "application/octet-stream", None);

    let response = post_classify(app, content_type, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], NO_IMAGE_MESSAGE);
}

#[tokio::test]
async fn test_classify_corrupt_image() {
    let (app, _dir) = create_test_app();
    let (content_type, body) =
        create_classify_multipart(b"definitely not a jpeg", "image/jpeg", None);

    let response = post_classify(app, content_type, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_IMAGE");
    assert_eq!(json["error"], MALFORMED_IMAGE_MESSAGE);
}

#[tokio::test]
async fn test_classify_rejects_non_image_content_type() {
    let (app, _dir) = create_test_app();
    let (content_type, body) = create_classify_multipart(b"<html></html>", "text/html", None);

    let response = post_classify(app, content_type, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_classify_rejects_oversize_file() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::mock(FeedbackRecorder::new(dir.path().join("log.txt")))
        .with_max_file_size(512);
    let app = create_router(state);
    let (content_type, body) = create_classify_multipart(&[0u8; 1000], "image/png", None);

    let response = post_classify(app, content_type, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_classify_catalog_mismatch_is_server_error() {
    let (app, _dir) = create_app_with_scorer(FixedScorer(vec![0.5, 0.3, 0.2]));
    let (content_type, body) =
        create_classify_multipart(&create_test_png(32, 32), "image/png", None);

    let response = post_classify(app, content_type, body).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "CATALOG_MISMATCH");
    assert_eq!(json["error"], PROCESSING_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_classify_inference_failure() {
    let (app, _dir) = create_app_with_scorer(BrokenScorer);
    let (content_type, body) =
        create_classify_multipart(&create_test_png(32, 32), "image/png", None);

    let response = post_classify(app, content_type, body).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INFERENCE_FAILED");
    assert_eq!(json["error"], PROCESSING_ERROR_MESSAGE);
}

// ============================================================================
// Feedback Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_feedback_correct_then_incorrect() {
    let (app, dir) = create_test_app();

    let response = post_empty(app.clone(), "/feedback/correct").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["recorded"], true);
    assert!(json["message"].as_str().unwrap().contains("fue correcta"));
    assert!(json["timestamp"].is_string());

    let response = post_empty(app, "/feedback/incorrect").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["message"]
        .as_str()
        .unwrap()
        .contains("fue incorrecta"));

    let log = std::fs::read_to_string(dir.path().join("feedback_log.txt")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(" - Predicción Correcta"));
    assert!(lines[1].ends_with(" - Predicción Incorrecta"));
}

#[tokio::test]
async fn test_feedback_concurrent_requests() {
    let (app, dir) = create_test_app();

    let requests: Vec<_> = (0..20)
        .map(|i| {
            let uri = if i % 2 == 0 {
                "/feedback/correct"
            } else {
                "/feedback/incorrect"
            };
            tokio::spawn(post_empty(app.clone(), uri))
        })
        .collect();
    for request in requests {
        assert_eq!(request.await.unwrap().status(), StatusCode::OK);
    }

    let summary = FeedbackSummary::from_log(&dir.path().join("feedback_log.txt")).unwrap();
    assert_eq!(summary.correct, 10);
    assert_eq!(summary.incorrect, 10);
    assert_eq!(summary.unreadable, 0);
}

#[tokio::test]
async fn test_feedback_write_failure() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be opened for appending
    let state = AppState::mock(FeedbackRecorder::new(dir.path()));
    let app = create_router(state);

    let response = post_empty(app, "/feedback/correct").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["recorded"], false);
    assert!(json["message"]
        .as_str()
        .unwrap()
        .starts_with("Error al registrar la retroalimentación: "));
}

// ============================================================================
// Styles Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_styles_lists_catalog_in_order() {
    let (app, _dir) = create_test_app();

    let response = get(app, "/styles").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["count"], 25);
    let styles = json["styles"].as_array().unwrap();
    assert_eq!(styles[0]["name"], "Arquitectura aquemenida");
    assert_eq!(styles[15]["name"], "Arquitectura gótica");
    assert_eq!(styles[15]["index"], 15);
    assert_eq!(styles[24]["name"], "Arquitectura neotudor");
}

// ============================================================================
// OpenAPI Documentation Tests
// ============================================================================

#[tokio::test]
async fn test_openapi_spec_endpoint() {
    let (app, _dir) = create_test_app();

    let response = get(app, "/api-docs/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;

    // Verify OpenAPI structure
    assert!(json["openapi"].as_str().unwrap().starts_with("3."));
    assert!(json["info"]["title"].is_string());
    assert!(json["paths"].is_object());

    // Verify our endpoints are documented
    for path in [
        "/classify",
        "/feedback/correct",
        "/feedback/incorrect",
        "/styles",
        "/health",
        "/ready",
    ] {
        assert!(json["paths"][path].is_object(), "{} should be documented", path);
    }
}

#[tokio::test]
async fn test_swagger_ui_endpoint() {
    let (app, _dir) = create_test_app();

    // Swagger UI is served at /docs/
    let response = get(app, "/docs/").await;
    assert_eq!(
        response.status(),
        StatusCode::OK,
        "Swagger UI should be accessible at /docs/"
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8_lossy(&body);
    assert!(
        html.contains("swagger") || html.contains("Swagger") || html.contains("openapi"),
        "Response should contain Swagger UI"
    );
}
