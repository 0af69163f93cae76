use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, instrument, warn};

use my_medi_domain::entities::weight_plan::{WeightPlan, WeightPlanRequest};

use crate::api::state::AppState;
use crate::entities::common::ErrorResponse;

/// Personalised weight loss plan from body measurements and preferences
#[utoipa::path(
    post,
    path = "/api/weight-loss-plan",
    request_body = WeightPlanRequest,
    responses(
        (status = 200, description = "Weight loss plan", body = WeightPlan),
        (status = 400, description = "Invalid measurements", body = ErrorResponse),
    ),
    tag = "planning"
)]
#[instrument(skip_all)]
pub async fn weight_loss_plan(
    State(state): State<AppState>,
    payload: Result<Json<WeightPlanRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Weight plan body rejected: {}", rejection.body_text());
            return ErrorResponse::bad_request(rejection.body_text()).into_response();
        }
    };

    match state.weight_plan.generate(&request) {
        Ok(plan) => {
            info!(weeks = plan.timeline.estimated_weeks, "Weight loss plan generated");
            Json(plan).into_response()
        }
        Err(e) => {
            warn!("Weight plan request rejected: {}", e);
            ErrorResponse::from(e).into_response()
        }
    }
}
