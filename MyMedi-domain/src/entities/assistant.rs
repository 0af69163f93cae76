use serde::{Deserialize, Serialize};

/// Which preamble the assistant answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantMode {
    Chat,
    Assessment,
}

/// Prompt pulled out of an assistant request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantPrompt {
    pub prompt: String,
    pub mode: AssistantMode,
}

/// Canned assessment returned when no AI key is configured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AssessmentAdvice {
    pub medications: String,
    pub doctors: String,
    pub labs: String,
    pub pharmacy: String,
    pub diet_plan: String,
    pub exercise: String,
    pub general_advice: String,
}

impl AssessmentAdvice {
    pub fn stub() -> Self {
        Self {
            medications: "Paracetamol 500 mg as needed.".to_string(),
            doctors: "Consult a local GP.".to_string(),
            labs: "CBC, thyroid profile.".to_string(),
            pharmacy: "Any licensed pharmacy nearby.".to_string(),
            diet_plan: "Balanced diet rich in fruit and vegetables.".to_string(),
            exercise: "30 min brisk walk daily.".to_string(),
            general_advice: "Stay hydrated, rest, and seek medical advice if symptoms persist.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssistantReply {
    Text(String),
    Assessment(AssessmentAdvice),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantResponse {
    pub response: AssistantReply,
}
