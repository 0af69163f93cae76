use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, instrument, warn};

use my_medi_domain::entities::location::{LocationLookup, LocationRequest, MapsValidation};
use my_medi_domain::error::ServiceError;

use crate::api::state::AppState;
use crate::entities::common::MessageError;

/// Address, nearby hospitals and labs, and regional advice for the user's position
#[utoipa::path(
    post,
    path = "/api/location",
    request_body = LocationRequest,
    responses(
        (status = 200, description = "Location details", body = LocationLookup),
        (status = 400, description = "Coordinates missing", body = MessageError),
        (status = 500, description = "Internal server error", body = MessageError),
    ),
    tag = "location"
)]
#[instrument(skip_all)]
pub async fn location_lookup(
    State(state): State<AppState>,
    payload: Result<Json<LocationRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            error!("Location body rejected: {}", rejection.body_text());
            return MessageError::new("Internal server error").respond(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    match state.location.lookup(request).await {
        Ok(lookup) => {
            info!(
                facilities = lookup.facilities.len(),
                status = %lookup.google_status,
                "Location lookup served"
            );
            Json(lookup).into_response()
        }
        Err(ServiceError::Validation(message)) => {
            warn!("Location lookup rejected: {}", message);
            MessageError::new(message).respond(StatusCode::BAD_REQUEST)
        }
        Err(e) => {
            error!("Location API error: {}", e);
            MessageError::new("Internal server error").respond(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Probe the configured maps key against the geocoding and places APIs
#[utoipa::path(
    get,
    path = "/api/location/validate",
    responses(
        (status = 200, description = "Probe results and the next setup step", body = MapsValidation),
    ),
    tag = "location"
)]
#[instrument(skip_all)]
pub async fn validate_maps_key(State(state): State<AppState>) -> Json<MapsValidation> {
    let validation = state.location.validate().await;
    info!(valid = validation.valid, "Maps key validation served");
    Json(validation)
}
