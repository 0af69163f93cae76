use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Uploaded report or medicine photo
#[derive(Debug, Clone, PartialEq)]
pub struct ReportUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ExtractedReport {
    pub success: bool,
    pub extracted_text: String,
    pub file_name: String,
    pub file_size: usize,
    pub file_type: String,
    pub text_length: usize,
    pub timestamp: DateTime<Utc>,
}
