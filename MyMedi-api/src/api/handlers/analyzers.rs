use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use my_medi_domain::entities::analyzer::{AnalysisEnvelope, MedicationAnalysisRequest, SymptomAnalysisRequest};
use my_medi_domain::error::ServiceError;

use crate::api::state::AppState;
use crate::entities::common::MessageError;

/// Body returned when the text generator cannot produce an analysis
#[derive(Debug, Serialize, ToSchema)]
pub struct AiErrorResponse {
    pub error: String,
    pub details: String,
    /// Always `ai-error`
    #[serde(rename = "type")]
    pub kind: &'static str,
}

fn analysis_outcome(result: Result<AnalysisEnvelope, ServiceError>, unavailable: &str) -> Response {
    match result {
        Ok(envelope) => {
            info!(analysis_type = %envelope.analysis_type, model = %envelope.model, "Analysis complete");
            Json(envelope).into_response()
        }
        Err(ServiceError::Validation(message)) => {
            warn!("Analysis request rejected: {}", message);
            MessageError::new(message).respond(StatusCode::BAD_REQUEST)
        }
        Err(e) => {
            error!("Analysis failed: {}", e);
            let body = AiErrorResponse {
                error: unavailable.to_string(),
                details: e.to_string(),
                kind: "ai-error",
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// Suggest, relate or fully analyse the reported symptoms
#[utoipa::path(
    post,
    path = "/api/ai-symptom-analyzer",
    request_body = SymptomAnalysisRequest,
    responses(
        (status = 200, description = "Analysis envelope", body = AnalysisEnvelope),
        (status = 400, description = "Symptoms missing or analysis type invalid", body = MessageError),
        (status = 500, description = "AI analysis temporarily unavailable", body = AiErrorResponse),
    ),
    tag = "analyzers"
)]
#[instrument(skip_all)]
pub async fn symptom_analyzer(
    State(state): State<AppState>,
    payload: Result<Json<SymptomAnalysisRequest>, JsonRejection>,
) -> Response {
    const UNAVAILABLE: &str = "AI analysis temporarily unavailable";

    let result = match payload {
        Ok(Json(request)) => state.symptom_analyzer.analyze(request).await,
        Err(rejection) => Err(ServiceError::Upstream(rejection.body_text())),
    };
    analysis_outcome(result, UNAVAILABLE)
}

/// Medication recommendations, interaction checks, prices and safety monitoring
#[utoipa::path(
    post,
    path = "/api/ai-medication-analyzer",
    request_body = MedicationAnalysisRequest,
    responses(
        (status = 200, description = "Analysis envelope with disclaimer", body = AnalysisEnvelope),
        (status = 400, description = "Analysis type invalid", body = MessageError),
        (status = 500, description = "AI medication analysis temporarily unavailable", body = AiErrorResponse),
    ),
    tag = "analyzers"
)]
#[instrument(skip_all)]
pub async fn medication_analyzer(
    State(state): State<AppState>,
    payload: Result<Json<MedicationAnalysisRequest>, JsonRejection>,
) -> Response {
    const UNAVAILABLE: &str = "AI medication analysis temporarily unavailable";

    let result = match payload {
        Ok(Json(request)) => state.medication_analyzer.analyze(request).await,
        Err(rejection) => Err(ServiceError::Upstream(rejection.body_text())),
    };
    analysis_outcome(result, UNAVAILABLE)
}
