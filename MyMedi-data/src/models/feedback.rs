use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Demographic profile attached to a feedback entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackProfile {
    pub age: Option<f64>,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub diet: Option<String>,
    pub family_type: Option<String>,
    pub economic_status: Option<String>,
    pub language: Option<String>,
}

/// Storage model for user feedback on a recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    /// Unique identifier for the entry
    pub id: String,

    /// `helpful`, `not_helpful` or `rating`
    #[serde(rename = "type")]
    pub feedback_type: String,

    /// Where the recommendation was shown (explanation, cultural, suggestions, ...)
    pub context: String,

    /// The recommendation text the feedback refers to
    pub recommendation: String,

    pub user_profile: Option<FeedbackProfile>,

    /// Optional star rating
    pub rating: Option<f64>,

    pub comment: Option<String>,

    /// Client-side timestamp as sent by the browser
    pub timestamp: Option<String>,

    /// When the entry was stored
    pub created_at: DateTime<Utc>,
}

/// Input data for storing a feedback entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFeedbackRequest {
    pub feedback_type: String,
    pub context: String,
    pub recommendation: String,
    pub user_profile: Option<FeedbackProfile>,
    pub rating: Option<f64>,
    pub comment: Option<String>,
    pub timestamp: Option<String>,
}
