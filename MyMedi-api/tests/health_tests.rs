use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use my_medi_api::api::{routes::create_app, state::AppState};
use my_medi_domain::config::AppConfig;
use my_medi_domain::health::ComponentStatus;
use my_medi_domain::testing::MockHealthService;

async fn check_health(service: MockHealthService) -> (StatusCode, Value) {
    let state = AppState::with_generator(AppConfig::default(), None).with_health_service(Arc::new(service));
    let response = create_app(state)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_ok() {
    let (status, body) = check_health(MockHealthService::new()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["components"]["database"]["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_degraded_on_in_memory_database() {
    let (status, body) = check_health(MockHealthService::new().with_in_memory_database()).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"]["database"]["status"], "degraded");
}

#[tokio::test]
async fn test_health_error_when_database_unavailable() {
    let service = MockHealthService::new()
        .with_database_error("Database pool is not initialized")
        .with_providers(false, true);
    let (status, body) = check_health(service).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert_eq!(body["components"]["database"]["message"], "Database pool is not initialized");
    assert_eq!(body["components"]["ai"]["status"], "degraded");
    assert_eq!(body["components"]["ai"]["message"], "OPENAI_API_KEY not configured");
    assert_eq!(body["components"]["maps"]["status"], "ok");
}

#[tokio::test]
async fn test_health_reports_additional_components() {
    let service = MockHealthService::new().with_component("cache", ComponentStatus::Unhealthy, Some("evicted"));
    let (status, body) = check_health(service).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["components"]["additional"]["cache"]["status"], "error");
}
