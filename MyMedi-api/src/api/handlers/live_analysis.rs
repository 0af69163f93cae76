use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{info, instrument, warn};

use my_medi_domain::entities::live_analysis::{LiveAnalysisRequest, LiveAnalysisResponse};

use crate::api::state::AppState;

/// Score the partially filled symptom form while the user types
///
/// An unreadable body still answers 200 with a neutral analysis so the form
/// keeps rendering.
#[utoipa::path(
    post,
    path = "/api/live-ai-analysis",
    request_body = LiveAnalysisRequest,
    responses(
        (status = 200, description = "Analysis of the current form state", body = LiveAnalysisResponse),
    ),
    tag = "analysis"
)]
#[instrument(skip_all)]
pub async fn live_analysis(
    State(state): State<AppState>,
    payload: Result<Json<LiveAnalysisRequest>, JsonRejection>,
) -> Json<LiveAnalysisResponse> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Live analysis body rejected: {}", rejection.body_text());
            return Json(LiveAnalysisResponse::fallback());
        }
    };

    let analysis = state.live_analysis.analyze(&request);
    info!(
        score = analysis.health_score,
        risk = analysis.risk_level.as_str(),
        emergency = analysis.is_emergency,
        "Live analysis complete"
    );
    Json(analysis)
}
