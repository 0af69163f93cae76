use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::clients::generation::{GenerationError, GenerationRequest, InlineImage, TextGenerator};
use crate::entities::report::{ExtractedReport, ReportUpload};
use crate::error::ServiceError;
use super::ai_reply::missing_generator;

/// Largest upload accepted for text extraction
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const UPLOAD_TOO_LARGE: &str = "File exceeds the 10MB upload limit";

const NO_TEXT: &str = "No text could be extracted from the image.";

const EXTRACTION_PROMPT: &str = "Extract all text from this medicine image with high accuracy. Focus on:

PRIMARY INFORMATION:
- Medicine name (brand name)
- Generic name (if visible)
- Dosage/strength (mg, IU, ml, etc.)
- Manufacturer/company name

SECONDARY INFORMATION:
- Batch number
- Manufacturing date
- Expiry date
- Pack size/quantity
- Any warnings or instructions

FORMATTING:
- Provide extracted text in a clear, organized format
- Separate different types of information
- Include exact spelling as shown on packaging
- Note if text is unclear or partially visible

Please extract ALL visible text accurately, paying special attention to medicine names, dosages, and manufacturer details.";

/// User-facing message for a failed extraction call
pub fn extraction_error_message(err: &GenerationError) -> String {
    match err {
        GenerationError::ApiResponse { status: 400, .. } => {
            "Invalid image format. Please upload a clear JPG or PNG image.".to_string()
        }
        GenerationError::ApiResponse { status: 429, .. } => {
            "Service temporarily busy. Please try again in a moment.".to_string()
        }
        GenerationError::ApiResponse { status: 401, .. } => "Authentication error. Please contact support.".to_string(),
        other => format!("OCR service error: {}", other),
    }
}

/// Trait for reading text out of uploaded reports
#[async_trait]
pub trait ReportReaderServiceTrait {
    async fn extract_text(&self, upload: ReportUpload) -> Result<ExtractedReport, ServiceError>;
}

pub struct ReportReaderService {
    generator: Option<Arc<dyn TextGenerator>>,
    model: String,
}

impl ReportReaderService {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }
}

#[async_trait]
impl ReportReaderServiceTrait for ReportReaderService {
    async fn extract_text(&self, upload: ReportUpload) -> Result<ExtractedReport, ServiceError> {
        let file_size = upload.bytes.len();
        info!(file = %upload.file_name, size = file_size, content_type = %upload.content_type, "Processing report upload");

        if file_size > MAX_UPLOAD_BYTES {
            warn!(size = file_size, "Upload exceeds limit");
            return Err(ServiceError::Validation(UPLOAD_TOO_LARGE.to_string()));
        }

        let generator = self.generator.as_deref().ok_or_else(missing_generator)?;

        let request = GenerationRequest {
            model: Some(self.model.clone()),
            image: Some(InlineImage {
                mime_type: upload.content_type.clone(),
                base64_data: STANDARD.encode(&upload.bytes),
            }),
            ..GenerationRequest::new(EXTRACTION_PROMPT).with_limits(1500, 0.1)
        };

        let reply = generator.generate(request).await.map_err(|e| {
            error!("Text extraction failed: {}", e);
            ServiceError::Upstream(extraction_error_message(&e))
        })?;

        let extracted_text = if reply.text.is_empty() { NO_TEXT.to_string() } else { reply.text };
        info!(length = extracted_text.len(), "Text extraction successful");

        Ok(ExtractedReport {
            success: true,
            text_length: extracted_text.chars().count(),
            extracted_text,
            file_name: upload.file_name,
            file_size,
            file_type: upload.content_type,
            timestamp: Utc::now(),
        })
    }
}

pub fn create_default_report_reader_service(
    generator: Option<Arc<dyn TextGenerator>>,
    model: &str,
) -> ReportReaderService {
    ReportReaderService::new(generator, model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::generation::{GeneratedText, MockTextGenerator};

    fn upload(bytes: Vec<u8>) -> ReportUpload {
        ReportUpload {
            file_name: "strip.png".to_string(),
            content_type: "image/png".to_string(),
            bytes,
        }
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let service = ReportReaderService::new(None, "gpt-4o-mini");
        let result = service.extract_text(upload(vec![0; MAX_UPLOAD_BYTES + 1])).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_image_is_sent_inline() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|req| {
                req.model.as_deref() == Some("gpt-4o-mini")
                    && req.image.as_ref().map(|i| i.data_uri()) == Some("data:image/png;base64,AQID".to_string())
            })
            .returning(|_| Ok(GeneratedText { text: "Crocin 500mg".to_string(), model: "gpt-4o-mini".to_string() }));

        let service = ReportReaderService::new(Some(Arc::new(generator)), "gpt-4o-mini");
        let report = service.extract_text(upload(vec![1, 2, 3])).await.unwrap();

        assert_eq!(report.extracted_text, "Crocin 500mg");
        assert_eq!(report.file_size, 3);
        assert_eq!(report.text_length, 12);
        assert_eq!(report.file_type, "image/png");
    }

    #[tokio::test]
    async fn test_rate_limit_message() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().returning(|_| {
            Err(GenerationError::ApiResponse { status: 429, body: String::new() })
        });

        let service = ReportReaderService::new(Some(Arc::new(generator)), "gpt-4o-mini");
        let result = service.extract_text(upload(vec![1])).await;
        assert!(matches!(result, Err(ServiceError::Upstream(msg)) if msg.starts_with("Service temporarily busy")));
    }
}
