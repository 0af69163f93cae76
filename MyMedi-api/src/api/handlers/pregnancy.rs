use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, instrument, warn};

use my_medi_domain::entities::pregnancy::{PregnancyReport, PregnancyRequest};

use crate::api::state::AppState;
use crate::entities::common::ErrorResponse;

/// Week-by-week pregnancy report from the current week or last period date
#[utoipa::path(
    post,
    path = "/api/pregnancy",
    request_body = PregnancyRequest,
    responses(
        (status = 200, description = "Pregnancy report", body = PregnancyReport),
        (status = 400, description = "Week or last period date missing or out of range", body = ErrorResponse),
    ),
    tag = "planning"
)]
#[instrument(skip_all)]
pub async fn pregnancy_report(
    State(state): State<AppState>,
    payload: Result<Json<PregnancyRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Pregnancy body rejected: {}", rejection.body_text());
            return ErrorResponse::bad_request(rejection.body_text()).into_response();
        }
    };

    match state.pregnancy.report(&request) {
        Ok(report) => {
            info!(week = report.current_week, "Pregnancy report generated");
            Json(report).into_response()
        }
        Err(e) => {
            warn!("Pregnancy request rejected: {}", e);
            ErrorResponse::from(e).into_response()
        }
    }
}
