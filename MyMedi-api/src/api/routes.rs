use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, warn};

use my_medi_domain::services::report_reader::MAX_UPLOAD_BYTES;

use crate::api::handlers::{self, health};
use crate::api::pages;
use crate::api::state::AppState;
use crate::openapi::configure_swagger_routes;

/// Headroom above the upload limit so oversized files reach the handler and get a readable error
const OCR_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 2 * 1024 * 1024;

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    let api_routes = Router::new()
        .route("/live-ai-analysis", post(handlers::live_analysis))
        .route("/ai-safety-monitor", post(handlers::safety_monitor))
        .route("/ai-form-helper", post(handlers::form_helper))
        .route("/ai-feedback", get(handlers::feedback_analytics).post(handlers::submit_feedback))
        .route(
            "/ai-accuracy-enhancement",
            get(handlers::accuracy_view).post(handlers::accuracy_action),
        )
        .route("/location", post(handlers::location_lookup))
        .route("/location/validate", get(handlers::validate_maps_key))
        .route("/assistant", post(handlers::assistant))
        .route("/health-assessment", post(handlers::health_assessment))
        .route("/ai-symptom-analyzer", post(handlers::symptom_analyzer))
        .route("/ai-medication-analyzer", post(handlers::medication_analyzer))
        .route(
            "/ocr",
            post(handlers::extract_report_text).layer(DefaultBodyLimit::max(OCR_BODY_LIMIT)),
        )
        .route("/weight-loss-plan", post(handlers::weight_loss_plan))
        .route("/pregnancy", post(handlers::pregnancy_report));

    debug!("API routes configured");

    let page_routes = Router::new()
        .route("/", get(pages::home))
        .route("/pregnancy", get(pages::pregnancy))
        .route("/reports", get(pages::reports))
        .route("/city", get(pages::cities))
        .route("/city/:slug", get(pages::city))
        .route("/privacy", get(pages::privacy))
        .route("/terms", get(pages::terms))
        .route("/about", get(pages::about));

    debug!("Page routes configured");

    let cors = cors_layer(&state.config.cors_allowed_origins);

    let app = Router::new()
        .route("/health", get(health::health_check))
        .merge(page_routes)
        .nest("/api", api_routes)
        .fallback(pages::not_found)
        .with_state(state);

    // Configure the Swagger UI using the helper function
    let app = add_swagger_ui(app);

    debug!("Swagger UI merged");

    health::initialize_server_start_time();

    app.layer(cors).layer(TraceLayer::new_for_http())
}

/// CORS for the configured origins, any origin when none are configured
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ocr_limit_leaves_room_above_upload_limit() {
        assert!(OCR_BODY_LIMIT > MAX_UPLOAD_BYTES);
    }

    #[test]
    fn test_invalid_cors_origins_are_skipped() {
        // Builds without panicking on a header value with a newline
        let _ = cors_layer(&["https://mymedi.ai".to_string(), "bad\norigin".to_string()]);
    }
}
