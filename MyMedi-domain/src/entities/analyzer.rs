//! Request and response shapes for the AI symptom and medication analyzers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Symptoms as typed so far, or a list of picked symptoms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SymptomInput {
    Text(String),
    List(Vec<String>),
}

impl SymptomInput {
    pub fn is_empty(&self) -> bool {
        match self {
            SymptomInput::Text(text) => text.is_empty(),
            SymptomInput::List(items) => items.is_empty(),
        }
    }

    /// Primary symptom
    pub fn first(&self) -> &str {
        match self {
            SymptomInput::Text(text) => text,
            SymptomInput::List(items) => items.first().map(String::as_str).unwrap_or_default(),
        }
    }

    pub fn joined(&self) -> String {
        match self {
            SymptomInput::Text(text) => text.clone(),
            SymptomInput::List(items) => items.join(", "),
        }
    }
}

impl std::fmt::Display for SymptomInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // A list prints the way a browser stringifies an array
        match self {
            SymptomInput::Text(text) => f.write_str(text),
            SymptomInput::List(items) => f.write_str(&items.join(",")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SymptomAnalysisRequest {
    #[serde(default)]
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub symptoms: Option<SymptomInput>,
    /// Number or free text
    #[serde(default)]
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub age: Option<Value>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, rename = "type")]
    pub analysis_type: Option<String>,
    #[serde(default)]
    pub medical_history: Option<Vec<String>>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub severity: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct MedicationAnalysisRequest {
    #[serde(default)]
    pub symptoms: Option<Vec<String>>,
    #[serde(default)]
    pub medical_history: Option<Vec<String>>,
    #[serde(default)]
    pub current_medications: Option<Vec<String>>,
    #[serde(default)]
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub age: Option<Value>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub weight: Option<Value>,
    #[serde(default)]
    pub allergies: Option<Vec<String>>,
    #[serde(default, rename = "type")]
    pub analysis_type: Option<String>,
    #[serde(default)]
    pub new_medication: Option<String>,
    #[serde(default)]
    pub medication_list: Option<Vec<String>>,
}

/// Envelope around a parsed analyzer reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct AnalysisEnvelope {
    pub success: bool,
    #[serde(rename = "type")]
    pub analysis_type: String,
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub data: Value,
    pub timestamp: DateTime<Utc>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
}
