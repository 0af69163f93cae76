use serde::{Deserialize, Serialize};

/// Basic body measurements for live analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub age: f64,
    pub gender: String,
    /// Weight in kilograms
    pub weight: f64,
    /// Height in centimetres
    pub height: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct Lifestyle {
    /// `sedentary`, `rarely`, `moderate`, ...
    pub exercise: String,
    /// `good`, `poor`, `irregular`, ...
    pub sleep: String,
    pub diet: String,
    /// Stress level 0-10
    pub stress: f64,
}

/// Partially completed assessment form sent while the user types
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct LiveAnalysisRequest {
    pub personal_info: PersonalInfo,
    pub primary_symptom: String,
    pub secondary_symptoms: Vec<String>,
    pub medications: Vec<String>,
    pub conditions: Vec<String>,
    /// `less-than-1-day`, `1-2-weeks`, `more-than-2-weeks`, ...
    pub duration: String,
    /// Severity 0-10
    pub severity: f64,
    pub lifestyle: Lifestyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Immediate,
    Soon,
    Routine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EmergencyAlert {
    pub message: String,
    pub actions: Vec<String>,
    pub emergency_services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct MedicationRecommendation {
    pub name: String,
    pub reason: String,
    pub dosage: String,
    pub urgency: Urgency,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub immediate: Vec<String>,
    pub medications: Vec<MedicationRecommendation>,
    pub lifestyle: Vec<String>,
    pub follow_up: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct RiskFactor {
    pub factor: String,
    pub impact: Impact,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AiReasoning {
    pub health_score_rationale: String,
    pub risk_assessment: String,
    pub key_findings: Vec<String>,
}

/// Result of a live analysis pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct LiveAnalysisResponse {
    /// 0-100, higher is healthier
    pub health_score: i32,
    pub risk_level: RiskLevel,
    /// 30-95
    pub confidence_score: i32,
    pub is_emergency: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_alert: Option<EmergencyAlert>,
    pub recommendations: Recommendations,
    pub risk_factors: Vec<RiskFactor>,
    pub ai_reasoning: AiReasoning,
}

impl LiveAnalysisResponse {
    /// Analysis returned when the request body cannot be read
    pub fn fallback() -> Self {
        Self {
            health_score: 75,
            risk_level: RiskLevel::Moderate,
            confidence_score: 50,
            is_emergency: false,
            emergency_alert: None,
            recommendations: Recommendations {
                immediate: vec!["Consult healthcare provider for proper evaluation".to_string()],
                medications: Vec::new(),
                lifestyle: vec!["Maintain healthy lifestyle practices".to_string()],
                follow_up: vec!["Schedule routine health checkup".to_string()],
            },
            risk_factors: Vec::new(),
            ai_reasoning: AiReasoning {
                health_score_rationale: "Analysis temporarily unavailable".to_string(),
                risk_assessment: "Unable to complete full assessment".to_string(),
                key_findings: vec!["Please try again or consult healthcare provider".to_string()],
            },
        }
    }
}
