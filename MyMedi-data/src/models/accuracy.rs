use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Review of a recommendation by a medical professional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalVerification {
    pub verified: bool,
    #[serde(default)]
    pub doctor_feedback: String,
    #[serde(default)]
    pub corrections: Vec<String>,
}

/// Patient profile attached to accuracy feedback
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccuracyProfile {
    #[serde(default)]
    pub age: f64,
    #[serde(default)]
    pub gender: String,
    /// Free-form "City, State" location
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub medical_history: Vec<String>,
}

/// Storage model for accuracy feedback on a single recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccuracyRecord {
    pub id: String,
    pub recommendation_id: String,
    /// `accurate`, `partially_accurate`, `inaccurate` or `harmful`
    pub user_feedback: String,
    pub actual_outcome: Option<String>,
    pub professional_verification: Option<ProfessionalVerification>,
    pub user_profile: AccuracyProfile,
    pub timestamp: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input data for storing accuracy feedback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccuracyRequest {
    pub recommendation_id: String,
    pub user_feedback: String,
    pub actual_outcome: Option<String>,
    pub professional_verification: Option<ProfessionalVerification>,
    pub user_profile: AccuracyProfile,
    pub timestamp: Option<String>,
}

/// Storage model for an entry in the specialist review queue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialistReviewRecord {
    pub id: String,
    pub ai_recommendation: String,
    pub user_case: String,
    pub specialist_feedback: Option<String>,
    pub accuracy: u32,
    pub improvements: Vec<String>,
    /// `pending`, `reviewed` or `approved`
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Version information for the medical knowledge base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBaseState {
    pub version: String,
    pub last_updated: DateTime<Utc>,
}

impl KnowledgeBaseState {
    /// Version a fresh knowledge base starts from
    pub const INITIAL_VERSION: &'static str = "1.0.0";

    pub fn initial() -> Self {
        Self {
            version: Self::INITIAL_VERSION.to_string(),
            last_updated: Utc::now(),
        }
    }
}
