use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::entities::form_helper::{FormHelperRequest, FormHelperResponse, FormValidation};
use crate::error::ServiceError;
use crate::rules::{FALLBACK_EXPLANATIONS, MEDICAL_CONDITIONS, MEDICAL_TERMS};

/// Phrases that speech recognition tends to split or capitalise
static VOICE_CORRECTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)\bfever\b", "fever"),
        (r"(?i)\bhead ache\b", "headache"),
        (r"(?i)\bstomach ache\b", "stomach ache"),
        (r"(?i)\bsore throat\b", "sore throat"),
        (r"(?i)\bchest pain\b", "chest pain"),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
    .collect()
});

/// Trait for the form assistant actions
pub trait FormHelperServiceTrait {
    /// Plain-language explanation of a medical term
    fn explain_term(&self, term: &str) -> String;

    /// Up to five vocabulary terms containing the query
    fn autocomplete(&self, query: &str) -> Vec<String>;

    /// Normalise a voice transcript and suggest up to three recognised terms
    fn process_voice(&self, transcript: &str) -> (String, Vec<String>);

    /// Basic checks on the symptom form
    fn validate_form(&self, form_data: &Value) -> FormValidation;

    /// Dispatch an `{ action, data }` request
    fn handle(&self, request: &FormHelperRequest) -> Result<FormHelperResponse, ServiceError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FormHelperService;

impl FormHelperService {
    pub fn new() -> Self {
        Self
    }
}

/// Non-empty string field of the action data
fn required_str<'a>(data: &'a Value, field: &str, label: &str) -> Result<&'a str, ServiceError> {
    match data.get(field).and_then(Value::as_str) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ServiceError::Validation(format!("{} is required", label))),
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl FormHelperServiceTrait for FormHelperService {
    fn explain_term(&self, term: &str) -> String {
        let normalized = term.trim().to_lowercase();

        let condition = MEDICAL_CONDITIONS.iter().find(|(name, _)| {
            *name == normalized || name.contains(normalized.as_str()) || normalized.contains(name)
        });
        if let Some((_, explanation)) = condition {
            return explanation.to_string();
        }

        if let Some((_, explanation)) = FALLBACK_EXPLANATIONS
            .iter()
            .find(|(keyword, _)| normalized.contains(keyword))
        {
            return explanation.to_string();
        }

        format!(
            "{} is a medical term that may require professional evaluation. Please consult with a healthcare provider for detailed information.",
            term
        )
    }

    fn autocomplete(&self, query: &str) -> Vec<String> {
        if query.chars().count() < 2 {
            return Vec::new();
        }
        let normalized = query.trim().to_lowercase();
        MEDICAL_TERMS
            .iter()
            .filter(|term| term.contains(normalized.as_str()))
            .take(5)
            .map(|term| term.to_string())
            .collect()
    }

    fn process_voice(&self, transcript: &str) -> (String, Vec<String>) {
        let processed = VOICE_CORRECTIONS
            .iter()
            .fold(transcript.to_string(), |text, (re, replacement)| {
                re.replace_all(&text, *replacement).into_owned()
            });

        let lowered = processed.to_lowercase();
        let suggestions = MEDICAL_TERMS
            .iter()
            .filter(|term| lowered.contains(*term))
            .take(3)
            .map(|term| term.to_string())
            .collect();

        (processed, suggestions)
    }

    fn validate_form(&self, form_data: &Value) -> FormValidation {
        let mut errors = Vec::new();

        let symptoms_length = match form_data.get("symptoms") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.chars().count()),
            Some(Value::Array(items)) => Some(items.len()),
            _ => None,
        };
        if matches!(symptoms_length, Some(len) if len < 3) {
            errors.push("Please provide more detailed symptom description".to_string());
        }

        // age 0 counts as not provided
        if let Some(age) = form_data.get("age").and_then(numeric) {
            if age != 0.0 && !(0.0..=120.0).contains(&age) {
                errors.push("Please enter a valid age".to_string());
            }
        }

        FormValidation {
            is_valid: errors.is_empty(),
            errors,
            suggestions: Vec::new(),
        }
    }

    fn handle(&self, request: &FormHelperRequest) -> Result<FormHelperResponse, ServiceError> {
        let data = &request.data;
        debug!(action = %request.action, "Form helper action");

        match request.action.as_str() {
            "explain_term" => {
                let term = required_str(data, "term", "Term")?;
                Ok(FormHelperResponse::Explanation {
                    success: true,
                    explanation: self.explain_term(term),
                    term: term.to_string(),
                })
            }
            "autocomplete" => {
                let query = required_str(data, "query", "Query")?;
                Ok(FormHelperResponse::Autocomplete {
                    success: true,
                    suggestions: self.autocomplete(query),
                })
            }
            "process_voice" => {
                let transcript = required_str(data, "transcript", "Transcript")?;
                let (processed_text, suggestions) = self.process_voice(transcript);
                Ok(FormHelperResponse::Voice {
                    success: true,
                    processed_text,
                    suggestions,
                })
            }
            "form_validation" => match data.get("formData") {
                Some(form_data) if !form_data.is_null() => Ok(FormHelperResponse::Validation {
                    success: true,
                    validation: self.validate_form(form_data),
                }),
                _ => Err(ServiceError::Validation("Form data is required".to_string())),
            },
            other => {
                warn!(action = %other, "Unknown form helper action");
                Err(ServiceError::Validation("Invalid action".to_string()))
            }
        }
    }
}

/// Create the default form helper
pub fn create_default_form_helper_service() -> impl FormHelperServiceTrait + Send + Sync {
    FormHelperService::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explain_term_matches_glossary_both_ways() {
        let service = FormHelperService::new();
        assert_eq!(
            service.explain_term("  Hypertension "),
            "High blood pressure - when blood pressure in arteries is consistently too high"
        );
        // query contains the glossary term
        assert!(service.explain_term("severe migraine attack").starts_with("A recurrent throbbing headache"));
        // glossary term contains the query
        assert!(service.explain_term("breath").starts_with("Difficulty breathing"));
    }

    #[test]
    fn test_explain_term_fallbacks() {
        let service = FormHelperService::new();
        assert_eq!(service.explain_term("knee swelling"), "Enlargement of a body part due to fluid buildup or inflammation");
        assert_eq!(
            service.explain_term("Xerosis"),
            "Xerosis is a medical term that may require professional evaluation. Please consult with a healthcare provider for detailed information."
        );
    }

    #[test]
    fn test_autocomplete() {
        let service = FormHelperService::new();
        assert!(service.autocomplete("p").is_empty());
        assert_eq!(service.autocomplete("PAIN"), vec!["chest pain", "back pain", "joint pain", "muscle pain"]);
        assert_eq!(service.autocomplete("a").len(), 0);
        assert_eq!(service.autocomplete("ea").len(), 5);
    }

    #[test]
    fn test_process_voice_normalises_phrases() {
        let service = FormHelperService::new();
        let (text, suggestions) = service.process_voice("I have a Head Ache and FEVER since monday");
        assert_eq!(text, "I have a headache and fever since monday");
        assert_eq!(suggestions, vec!["fever", "headache"]);
    }

    #[test]
    fn test_validate_form() {
        let service = FormHelperService::new();
        let validation = service.validate_form(&json!({"symptoms": "ok", "age": 130}));
        assert!(!validation.is_valid);
        assert_eq!(validation.errors.len(), 2);

        let validation = service.validate_form(&json!({"symptoms": "persistent cough", "age": "45"}));
        assert!(validation.is_valid);
    }

    #[test]
    fn test_handle_requires_fields() {
        let service = FormHelperService::new();
        let request = FormHelperRequest {
            action: "explain_term".to_string(),
            data: json!({}),
        };
        let err = service.handle(&request).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Term is required");

        let request = FormHelperRequest {
            action: "form_validation".to_string(),
            data: Value::Null,
        };
        assert!(matches!(service.handle(&request), Err(ServiceError::Validation(msg)) if msg == "Form data is required"));

        let request = FormHelperRequest {
            action: "translate".to_string(),
            data: json!({}),
        };
        assert!(matches!(service.handle(&request), Err(ServiceError::Validation(msg)) if msg == "Invalid action"));
    }

    #[test]
    fn test_voice_response_serializes_camel_case() {
        let response = FormHelperResponse::Voice {
            success: true,
            processed_text: "fever".to_string(),
            suggestions: vec!["fever".to_string()],
        };
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["processedText"], "fever");
    }
}
