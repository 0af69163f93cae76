use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ action, data }` body of the form helper endpoint
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct FormHelperRequest {
    #[serde(default)]
    pub action: String,
    /// Action specific fields: `term`, `query`, `transcript` or `formData`
    #[serde(default)]
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub data: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FormValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Result of a form helper action, flattened into the JSON body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormHelperResponse {
    Explanation {
        success: bool,
        explanation: String,
        term: String,
    },
    Autocomplete {
        success: bool,
        suggestions: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Voice {
        success: bool,
        processed_text: String,
        suggestions: Vec<String>,
    },
    Validation {
        success: bool,
        validation: FormValidation,
    },
}
