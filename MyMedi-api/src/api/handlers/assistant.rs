use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{error, info, instrument, warn};

use my_medi_domain::error::ServiceError;

use crate::api::state::AppState;
use crate::entities::common::MessageError;

/// Chat or assessment answer from the text generator
///
/// Accepts `{ prompt }`, `{ message, type: "assessment" }` or any other JSON
/// body, which is forwarded as text.
#[utoipa::path(
    post,
    path = "/api/assistant",
    request_body = Object,
    responses(
        (status = 200, description = "Assistant reply as `{ response }`"),
        (status = 400, description = "Prompt is required.", body = MessageError),
        (status = 502, description = "AI request failed."),
        (status = 500, description = "Internal server error", body = MessageError),
    ),
    tag = "assistant"
)]
#[instrument(skip_all)]
pub async fn assistant(State(state): State<AppState>, payload: Result<Json<Value>, JsonRejection>) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            error!("Assistant body rejected: {}", rejection.body_text());
            return MessageError::new("Internal server error").respond(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    match state.assistant.respond(body).await {
        Ok(response) => {
            info!("Assistant reply served");
            Json(response).into_response()
        }
        Err(ServiceError::Validation(message)) => {
            warn!("Assistant request rejected: {}", message);
            MessageError::new(message).respond(StatusCode::BAD_REQUEST)
        }
        Err(ServiceError::Upstream(detail)) => {
            error!("Assistant upstream failure: {}", detail);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "AI request failed.", "detail": detail })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Assistant failed: {}", e);
            MessageError::new("Internal server error").respond(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Structured advice for a submitted health assessment form
#[utoipa::path(
    post,
    path = "/api/health-assessment",
    request_body = Object,
    responses(
        (status = 200, description = "Assessment advice as `{ response }`"),
        (status = 500, description = "Failed to process health assessment", body = MessageError),
    ),
    tag = "assistant"
)]
#[instrument(skip_all)]
pub async fn health_assessment(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let outcome = match payload {
        Ok(Json(assessment)) => state.assistant.assess(assessment).await.map_err(|e| e.to_string()),
        Err(rejection) => Err(rejection.body_text()),
    };

    match outcome {
        Ok(response) => {
            info!("Health assessment served");
            Json(response).into_response()
        }
        Err(details) => {
            error!("Health assessment failed: {}", details);
            MessageError::new("Failed to process health assessment")
                .with_details(details)
                .respond(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
