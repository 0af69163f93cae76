use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use my_medi_data::models::feedback::{FeedbackProfile, FeedbackRecord};

/// Demographic profile sent with feedback
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FeedbackUserProfile {
    pub age: Option<f64>,
    pub gender: Option<String>,
    pub location: Option<String>,
    /// `vegetarian`, `non-vegetarian` or `vegan`
    pub diet: Option<String>,
    /// `nuclear` or `joint`
    pub family_type: Option<String>,
    /// `low`, `middle` or `high`
    pub economic_status: Option<String>,
    pub language: Option<String>,
}

/// Feedback on a recommendation shown to the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    /// `helpful`, `not_helpful` or `rating`
    #[serde(rename = "type")]
    pub feedback_type: Option<String>,
    pub context: Option<String>,
    pub recommendation: Option<String>,
    pub user_profile: Option<FeedbackUserProfile>,
    pub rating: Option<f64>,
    pub comment: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReceipt {
    pub success: bool,
    pub message: String,
    pub learning_insight: String,
    /// Suggestions for improving recommendations in the same context
    #[serde(skip)]
    pub improvements: Vec<String>,
}

/// Stored feedback entry as returned by analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub feedback_type: String,
    pub context: String,
    pub recommendation: String,
    pub user_profile: Option<FeedbackUserProfile>,
    pub rating: Option<f64>,
    pub comment: Option<String>,
    pub timestamp: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Recommendations grouped by how they were received
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct LearningPatterns {
    pub helpful_explanations: Vec<String>,
    pub unhelpful_explanations: Vec<String>,
    pub preferred_cultural_adaptations: Vec<String>,
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub regional_preferences: IndexMap<String, Vec<String>>,
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub age_group_preferences: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAnalytics {
    pub total_feedback: usize,
    pub helpful_count: usize,
    pub unhelpful_count: usize,
    /// Mean of the non-zero ratings, null when nothing was rated
    pub average_rating: Option<f64>,
    pub learning_patterns: LearningPatterns,
    pub recent_feedback: Vec<FeedbackEntry>,
}

impl From<FeedbackUserProfile> for FeedbackProfile {
    fn from(profile: FeedbackUserProfile) -> Self {
        FeedbackProfile {
            age: profile.age,
            gender: profile.gender,
            location: profile.location,
            diet: profile.diet,
            family_type: profile.family_type,
            economic_status: profile.economic_status,
            language: profile.language,
        }
    }
}

impl From<FeedbackProfile> for FeedbackUserProfile {
    fn from(profile: FeedbackProfile) -> Self {
        FeedbackUserProfile {
            age: profile.age,
            gender: profile.gender,
            location: profile.location,
            diet: profile.diet,
            family_type: profile.family_type,
            economic_status: profile.economic_status,
            language: profile.language,
        }
    }
}

impl From<FeedbackRecord> for FeedbackEntry {
    fn from(record: FeedbackRecord) -> Self {
        FeedbackEntry {
            id: record.id,
            feedback_type: record.feedback_type,
            context: record.context,
            recommendation: record.recommendation,
            user_profile: record.user_profile.map(Into::into),
            rating: record.rating,
            comment: record.comment,
            timestamp: record.timestamp,
            created_at: record.created_at,
        }
    }
}
