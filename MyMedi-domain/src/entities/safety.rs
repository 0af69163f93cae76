use serde::{Deserialize, Serialize};

/// Kind of advice the assessed AI answer gives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Diagnosis,
    Medication,
    Lifestyle,
    Emergency,
    #[default]
    #[serde(other)]
    General,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct SafetyUserProfile {
    pub age: f64,
    pub gender: String,
    pub medical_history: Vec<String>,
    pub current_medications: Vec<String>,
}

/// An AI answer and the user input that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SafetyAssessmentRequest {
    pub ai_response: String,
    pub user_input: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub response_type: ResponseType,
    #[serde(default)]
    pub user_profile: Option<SafetyUserProfile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum SafetyLevel {
    Safe,
    Caution,
    ReviewRequired,
    Emergency,
}

/// Scores between 0 and 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AccuracyIndicators {
    pub data_quality: u32,
    pub symptom_clarity: u32,
    pub medical_complexity: u32,
    pub risk_level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EmergencyProtocol {
    pub is_emergency: bool,
    /// First emergency keyword found
    pub emergency_type: String,
    pub immediate_actions: Vec<String>,
    pub emergency_contacts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SafetyAssessment {
    /// Only set on the fallback assessment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub confidence_score: i32,
    pub safety_level: SafetyLevel,
    pub emergency_flags: Vec<String>,
    pub disclaimer_required: bool,
    pub human_review_required: bool,
    pub safety_recommendations: Vec<String>,
    pub accuracy_indicators: AccuracyIndicators,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_protocol: Option<EmergencyProtocol>,
}

impl SafetyAssessment {
    /// Assessment returned when the request cannot be assessed
    pub fn fallback() -> Self {
        Self {
            error: Some("Safety assessment failed".to_string()),
            confidence_score: 30,
            safety_level: SafetyLevel::ReviewRequired,
            emergency_flags: Vec::new(),
            disclaimer_required: true,
            human_review_required: true,
            safety_recommendations: vec![
                "Error in safety assessment - please consult healthcare professional immediately".to_string(),
            ],
            accuracy_indicators: AccuracyIndicators {
                data_quality: 30,
                symptom_clarity: 30,
                medical_complexity: 50,
                risk_level: 80,
            },
            emergency_protocol: None,
        }
    }
}
