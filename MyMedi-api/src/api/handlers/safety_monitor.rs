use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info, instrument};

use my_medi_domain::entities::safety::{SafetyAssessment, SafetyAssessmentRequest};

use crate::api::state::AppState;

/// Rate the safety of an AI answer before it is shown
#[utoipa::path(
    post,
    path = "/api/ai-safety-monitor",
    request_body = SafetyAssessmentRequest,
    responses(
        (status = 200, description = "Safety assessment", body = SafetyAssessment),
        (status = 500, description = "Body could not be assessed, conservative assessment returned", body = SafetyAssessment),
    ),
    tag = "analysis"
)]
#[instrument(skip_all)]
pub async fn safety_monitor(
    State(state): State<AppState>,
    payload: Result<Json<SafetyAssessmentRequest>, JsonRejection>,
) -> (StatusCode, Json<SafetyAssessment>) {
    match payload {
        Ok(Json(request)) => {
            let assessment = state.safety_monitor.assess(&request);
            info!(
                confidence = assessment.confidence_score,
                level = ?assessment.safety_level,
                "Safety assessment complete"
            );
            (StatusCode::OK, Json(assessment))
        }
        Err(rejection) => {
            error!("Safety monitor body rejected: {}", rejection.body_text());
            (StatusCode::INTERNAL_SERVER_ERROR, Json(SafetyAssessment::fallback()))
        }
    }
}
