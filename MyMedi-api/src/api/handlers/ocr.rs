use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error, info, instrument, warn};

use my_medi_domain::entities::report::{ExtractedReport, ReportUpload};
use my_medi_domain::error::ServiceError;
use my_medi_domain::services::report_reader::{MAX_UPLOAD_BYTES, UPLOAD_TOO_LARGE};

use crate::api::state::AppState;
use crate::entities::common::MessageError;

const FAILED: &str = "Failed to process image for text extraction";

/// Why the form could not be turned into an upload
#[derive(Debug)]
enum UploadError {
    /// The file passed `MAX_UPLOAD_BYTES` or the body hit the route's length limit
    TooLarge,
    Unreadable(String),
}

impl From<MultipartError> for UploadError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::TooLarge
        } else {
            UploadError::Unreadable(e.body_text())
        }
    }
}

impl From<MultipartRejection> for UploadError {
    fn from(rejection: MultipartRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::TooLarge
        } else {
            UploadError::Unreadable(rejection.body_text())
        }
    }
}

/// Read the `file` part of the form, ignoring every other part.
///
/// The file is streamed chunk by chunk and abandoned as soon as it grows
/// past `MAX_UPLOAD_BYTES`.
async fn read_upload(mut multipart: Multipart) -> Result<Option<ReportUpload>, UploadError> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            debug!(field = ?field.name(), "Skipping form field");
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await? {
            if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(UploadError::TooLarge);
            }
            bytes.extend_from_slice(&chunk);
        }

        return Ok(Some(ReportUpload { file_name, content_type, bytes }));
    }
    Ok(None)
}

/// Extract the text of an uploaded medicine photo or lab report
#[utoipa::path(
    post,
    path = "/api/ocr",
    request_body(content = String, content_type = "multipart/form-data", description = "Form with a `file` part"),
    responses(
        (status = 200, description = "Extracted text", body = ExtractedReport),
        (status = 400, description = "No file provided, or the file is too large", body = MessageError),
        (status = 500, description = "Failed to process image for text extraction", body = MessageError),
    ),
    tag = "reports"
)]
#[instrument(skip_all)]
pub async fn extract_report_text(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let upload = match multipart {
        Ok(multipart) => read_upload(multipart).await,
        Err(rejection) => Err(UploadError::from(rejection)),
    };

    let upload = match upload {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            warn!("OCR request without a file");
            return MessageError::new("No file provided").respond(StatusCode::BAD_REQUEST);
        }
        Err(UploadError::TooLarge) => {
            warn!(limit = MAX_UPLOAD_BYTES, "Upload rejected as too large");
            return MessageError::new(UPLOAD_TOO_LARGE).respond(StatusCode::BAD_REQUEST);
        }
        Err(UploadError::Unreadable(details)) => {
            error!("OCR form could not be read: {}", details);
            return MessageError::new(FAILED).with_details(details).respond(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    info!(file = %upload.file_name, size = upload.bytes.len(), "Starting text extraction");

    match state.report_reader.extract_text(upload).await {
        Ok(report) => {
            info!(chars = report.text_length, "Text extraction complete");
            Json(report).into_response()
        }
        Err(ServiceError::Validation(message)) => {
            warn!("Upload rejected: {}", message);
            MessageError::new(message).respond(StatusCode::BAD_REQUEST)
        }
        Err(e) => {
            error!("OCR processing error: {}", e);
            MessageError::new(FAILED)
                .with_details(e.to_string())
                .respond(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
