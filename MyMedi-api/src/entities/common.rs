use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use my_medi_domain::error::ServiceError;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// `{ error, message }` body where `error` is a machine-readable code
/// that also decides the HTTP status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// `validation_error`, `bad_request`, `not_found`, `upstream_error` or `internal_error`
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self { error: code.to_string(), message: message.into() }
    }

    /// Body that could not be parsed
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }

    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" | "bad_request" => StatusCode::BAD_REQUEST,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ErrorResponse {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => Self::new("validation_error", msg),
            ServiceError::NotFound(msg) => Self::new("not_found", msg),
            ServiceError::Upstream(msg) => Self::new("upstream_error", msg),
            // storage details stay in the logs
            ServiceError::Repository(_) => Self::new("internal_error", "An unexpected error occurred"),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// `{ error, details }` body for endpoints whose clients display a single message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageError {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl MessageError {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into(), details: None }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Pair the body with a status code
    pub fn respond(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// `{ success, message }` body used by the feedback and accuracy endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusMessage {
    pub success: bool,
    pub message: String,
}

impl StatusMessage {
    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }

    pub fn respond(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// `?type=` selector of the GET views
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ViewQuery {
    /// Which view to return
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("missing".into()), StatusCode::NOT_FOUND),
            (ServiceError::Upstream("down".into()), StatusCode::BAD_GATEWAY),
            (ServiceError::Repository("locked".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ErrorResponse::from(err).status(), status);
        }
    }

    #[test]
    fn test_repository_details_are_not_exposed() {
        let response = ErrorResponse::from(ServiceError::Repository("disk I/O error".into()));
        assert_eq!(response.message, "An unexpected error occurred");
    }

    #[test]
    fn test_message_error_omits_empty_details() {
        let body = serde_json::to_value(MessageError::new("No file provided")).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "No file provided" }));
    }
}
