use super::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tempfile::TempDir;
use tower::ServiceExt;


/// Router backed by a fresh temp root; tools are unset so any request that
/// unexpectedly reaches the pipeline fails loudly instead of shelling out.
fn test_router(root: &TempDir) -> Router {
    let mut config = Config::default();
    config.pipeline.temp_root = Some(root.path().to_path_buf());
    config.tools.search_path = false;
    create_router(Arc::new(config))
}

#[tokio::test]
async fn test_health_endpoint() {
    let root = TempDir::new().unwrap();
    let app = test_router(&root);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_str = String::from_utf8(body.to_vec()).unwrap();

    assert!(body_str.contains("ok"));
    assert!(body_str.contains(env!("CARGO_PKG_VERSION")));
}

#[tokio::test]
async fn test_openapi_endpoint() {
    let root = TempDir::new().unwrap();
    let app = test_router(&root);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let spec: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(spec["paths"]["/download"].is_object());
}

#[tokio::test]
async fn test_cors_enabled() {
    let root = TempDir::new().unwrap();
    let mut config = Config::default();
    config.pipeline.temp_root = Some(root.path().to_path_buf());
    config.server.cors_enabled = true;
    config.server.cors_origins = vec!["*".to_string()];

    let app = create_router(Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let root = TempDir::new().unwrap();
    let mut config = Config::default();
    config.pipeline.temp_root = Some(root.path().to_path_buf());
    config.server.cors_enabled = false;

    let app = create_router(Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be absent when CORS is disabled"
    );
}

#[tokio::test]
async fn test_swagger_ui_disabled_by_default() {
    let root = TempDir::new().unwrap();
    let app = test_router(&root);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/swagger-ui")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
