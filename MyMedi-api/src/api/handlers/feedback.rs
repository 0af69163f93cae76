use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, info, instrument, warn};

use my_medi_domain::entities::feedback::{FeedbackAnalytics, FeedbackReceipt, FeedbackSubmission};
use my_medi_domain::error::ServiceError;

use crate::api::state::AppState;
use crate::entities::common::{MessageError, StatusMessage, ViewQuery};

/// Record whether a recommendation helped
#[utoipa::path(
    post,
    path = "/api/ai-feedback",
    request_body = FeedbackSubmission,
    responses(
        (status = 200, description = "Feedback recorded", body = FeedbackReceipt),
        (status = 400, description = "Type, context or recommendation missing", body = StatusMessage),
        (status = 500, description = "Feedback could not be stored", body = StatusMessage),
    ),
    tag = "feedback"
)]
#[instrument(skip_all)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackSubmission>, JsonRejection>,
) -> Response {
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => {
            error!("Feedback body rejected: {}", rejection.body_text());
            return StatusMessage::failure("Unable to process feedback").respond(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    match state.feedback.submit(submission).await {
        Ok(receipt) => Json(receipt).into_response(),
        Err(ServiceError::Validation(message)) => {
            warn!("Feedback rejected: {}", message);
            StatusMessage::failure(message).respond(StatusCode::BAD_REQUEST)
        }
        Err(e) => {
            error!("Feedback processing error: {}", e);
            StatusMessage::failure("Unable to process feedback").respond(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Feedback analytics for `?type=analytics`, otherwise a liveness message
#[utoipa::path(
    get,
    path = "/api/ai-feedback",
    params(ViewQuery),
    responses(
        (status = 200, description = "Analytics or a running message", body = FeedbackAnalytics),
        (status = 500, description = "Analytics unavailable", body = MessageError),
    ),
    tag = "feedback"
)]
#[instrument(skip_all)]
pub async fn feedback_analytics(State(state): State<AppState>, Query(query): Query<ViewQuery>) -> Response {
    if query.kind.as_deref() != Some("analytics") {
        return Json(json!({ "message": "AI Feedback API is running" })).into_response();
    }

    match state.feedback.analytics().await {
        Ok(analytics) => {
            info!(total = analytics.total_feedback, "Feedback analytics retrieved");
            Json(analytics).into_response()
        }
        Err(e) => {
            error!("Analytics retrieval error: {}", e);
            MessageError::new("Unable to retrieve analytics").respond(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
