use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, instrument, warn};

use my_medi_domain::entities::form_helper::FormHelperRequest;
use my_medi_domain::error::ServiceError;

use crate::api::state::AppState;
use crate::entities::common::MessageError;

/// Glossary lookups, autocomplete, voice clean-up and form checks
#[utoipa::path(
    post,
    path = "/api/ai-form-helper",
    request_body = FormHelperRequest,
    responses(
        (status = 200, description = "Action result"),
        (status = 400, description = "Missing field or unknown action", body = MessageError),
        (status = 500, description = "Internal server error", body = MessageError),
    ),
    tag = "analysis"
)]
#[instrument(skip_all)]
pub async fn form_helper(
    State(state): State<AppState>,
    payload: Result<Json<FormHelperRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            error!("Form helper body rejected: {}", rejection.body_text());
            return MessageError::new("Internal server error")
                .with_details(rejection.body_text())
                .respond(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    match state.form_helper.handle(&request) {
        Ok(response) => Json(response).into_response(),
        Err(ServiceError::Validation(message)) => {
            warn!(action = %request.action, "Form helper request invalid: {}", message);
            MessageError::new(message).respond(StatusCode::BAD_REQUEST)
        }
        Err(e) => {
            error!("Form helper failed: {}", e);
            MessageError::new("Internal server error")
                .with_details(e.to_string())
                .respond(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
