use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use my_medi_data::models::accuracy::{
    AccuracyProfile, CreateAccuracyRequest, ProfessionalVerification, SpecialistReviewRecord,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub verified: bool,
    #[serde(default)]
    pub doctor_feedback: String,
    #[serde(default)]
    pub corrections: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct PatientProfile {
    pub age: f64,
    pub gender: String,
    /// "City, State"
    pub location: String,
    pub medical_history: Vec<String>,
}

/// How accurate a recommendation turned out to be
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AccuracyFeedback {
    pub recommendation_id: String,
    /// `accurate`, `partially_accurate`, `inaccurate` or `harmful`
    pub user_feedback: String,
    #[serde(default)]
    pub actual_outcome: Option<String>,
    #[serde(default)]
    pub professional_verification: Option<Verification>,
    #[serde(default)]
    pub user_profile: PatientProfile,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Body of `POST /api/ai-accuracy-enhancement`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct AccuracyActionRequest {
    pub action: String,
    pub feedback: Option<AccuracyFeedback>,
    pub recommendation: Option<String>,
    pub user_case: Option<String>,
    pub guideline: Option<String>,
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub updates: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct CategoryAccuracy {
    pub diagnosis: u32,
    pub medication: u32,
    pub lifestyle: u32,
    pub emergency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AccuracyMetrics {
    pub overall_accuracy: u32,
    pub category_accuracy: CategoryAccuracy,
    /// Age bracket to accuracy percent
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub demographic_accuracy: IndexMap<String, u32>,
    /// State to accuracy percent
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub regional_accuracy: IndexMap<String, u32>,
    pub improvement_areas: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecorded {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_base_updates: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ReviewTicket {
    pub success: bool,
    pub review_id: String,
    pub message: String,
    pub estimated_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBaseInfo {
    pub version: String,
    pub last_updated: DateTime<Utc>,
    pub guidelines: Vec<String>,
    pub total_feedback: usize,
    pub pending_reviews: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct GuidelineUpdate {
    pub success: bool,
    pub message: String,
    pub new_version: String,
}

/// Entry in the specialist review queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SpecialistReview {
    pub id: String,
    pub ai_recommendation: String,
    pub user_case: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialist_feedback: Option<String>,
    pub accuracy: u32,
    pub improvements: Vec<String>,
    /// `pending`, `reviewed` or `approved`
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct SpecialistQueue {
    pub pending: usize,
    pub reviewed: usize,
    pub approved: usize,
    /// First ten entries
    pub queue: Vec<SpecialistReview>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AccuracySummary {
    pub message: String,
    pub version: String,
    pub last_updated: DateTime<Utc>,
    pub total_feedback: usize,
    pub overall_accuracy: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeverManagement {
    /// Fahrenheit
    pub temperature_threshold: f64,
    pub first_line_treatment: &'static [&'static str],
    pub red_flags: &'static [&'static str],
    pub cultural_considerations: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HypertensionGuideline {
    pub diagnostic_criteria: &'static str,
    pub lifestyle_modifications: &'static [&'static str],
    pub common_medications: &'static [&'static str],
    pub dietary_advice: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiabetesGuideline {
    pub hba1c_target: &'static str,
    pub fasting_glucose: &'static str,
    pub lifestyle_factors: &'static [&'static str],
    pub indian_diet_considerations: &'static [&'static str],
}

/// Clinical guideline tables adapted for Indian patients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicalGuidelines {
    pub fever_management: FeverManagement,
    pub hypertension_india: HypertensionGuideline,
    pub diabetes_management: DiabetesGuideline,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidelinesDocument {
    pub guidelines: &'static MedicalGuidelines,
    pub version: String,
    pub last_updated: DateTime<Utc>,
}

/// Response to one of the POST actions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AccuracyActionResponse {
    FeedbackRecorded(FeedbackRecorded),
    ReviewRequested(ReviewTicket),
    Metrics(AccuracyMetrics),
    KnowledgeBase(KnowledgeBaseInfo),
    GuidelineUpdated(GuidelineUpdate),
}

/// Response to the `GET ?type=` views
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AccuracyView {
    Metrics(AccuracyMetrics),
    Guidelines(GuidelinesDocument),
    SpecialistQueue(SpecialistQueue),
    Summary(AccuracySummary),
}

impl From<AccuracyFeedback> for CreateAccuracyRequest {
    fn from(feedback: AccuracyFeedback) -> Self {
        CreateAccuracyRequest {
            recommendation_id: feedback.recommendation_id,
            user_feedback: feedback.user_feedback,
            actual_outcome: feedback.actual_outcome,
            professional_verification: feedback.professional_verification.map(|v| ProfessionalVerification {
                verified: v.verified,
                doctor_feedback: v.doctor_feedback,
                corrections: v.corrections,
            }),
            user_profile: AccuracyProfile {
                age: feedback.user_profile.age,
                gender: feedback.user_profile.gender,
                location: feedback.user_profile.location,
                medical_history: feedback.user_profile.medical_history,
            },
            timestamp: feedback.timestamp,
        }
    }
}

impl From<SpecialistReviewRecord> for SpecialistReview {
    fn from(record: SpecialistReviewRecord) -> Self {
        SpecialistReview {
            id: record.id,
            ai_recommendation: record.ai_recommendation,
            user_case: record.user_case,
            specialist_feedback: record.specialist_feedback,
            accuracy: record.accuracy,
            improvements: record.improvements,
            status: record.status,
        }
    }
}
