use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, instrument, warn};

use my_medi_domain::entities::accuracy::{AccuracyActionRequest, AccuracyMetrics};
use my_medi_domain::error::ServiceError;

use crate::api::state::AppState;
use crate::entities::common::{MessageError, StatusMessage, ViewQuery};

/// Outcome feedback, specialist reviews and knowledge base maintenance
#[utoipa::path(
    post,
    path = "/api/ai-accuracy-enhancement",
    request_body = AccuracyActionRequest,
    responses(
        (status = 200, description = "Action result"),
        (status = 400, description = "Invalid action or missing data", body = StatusMessage),
        (status = 404, description = "Guideline not found", body = StatusMessage),
        (status = 500, description = "Internal server error", body = StatusMessage),
    ),
    tag = "accuracy"
)]
#[instrument(skip_all)]
pub async fn accuracy_action(
    State(state): State<AppState>,
    payload: Result<Json<AccuracyActionRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            error!("Accuracy body rejected: {}", rejection.body_text());
            return StatusMessage::failure("Internal server error").respond(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let action = request.action.clone();
    match state.accuracy.handle_action(request).await {
        Ok(response) => {
            info!(action = %action, "Accuracy action handled");
            Json(response).into_response()
        }
        Err(ServiceError::Validation(message)) => {
            warn!(action = %action, "Accuracy action rejected: {}", message);
            StatusMessage::failure(message).respond(StatusCode::BAD_REQUEST)
        }
        Err(ServiceError::NotFound(message)) => {
            warn!(action = %action, "{}", message);
            StatusMessage::failure(message).respond(StatusCode::NOT_FOUND)
        }
        Err(e) => {
            error!(action = %action, "Accuracy enhancement error: {}", e);
            StatusMessage::failure("Internal server error").respond(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// `?type=metrics|guidelines|specialist_queue`, default summary
#[utoipa::path(
    get,
    path = "/api/ai-accuracy-enhancement",
    params(ViewQuery),
    responses(
        (status = 200, description = "Requested view", body = AccuracyMetrics),
        (status = 500, description = "Data unavailable", body = MessageError),
    ),
    tag = "accuracy"
)]
#[instrument(skip_all)]
pub async fn accuracy_view(State(state): State<AppState>, Query(query): Query<ViewQuery>) -> Response {
    match state.accuracy.view(query.kind.as_deref()).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => {
            error!(view = ?query.kind, "Accuracy view error: {}", e);
            MessageError::new("Unable to retrieve data").respond(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
