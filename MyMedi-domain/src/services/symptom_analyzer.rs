use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info, instrument, warn};

use crate::clients::generation::{GenerationRequest, TextGenerator};
use crate::entities::analyzer::{AnalysisEnvelope, SymptomAnalysisRequest};
use crate::error::ServiceError;
use super::ai_reply::{describe, describe_list, missing_generator, reply_or_analysis};

const SUGGESTIONS_SYSTEM: &str = r#"You are a medical AI assistant specialized in symptom analysis for Indian patients.
Your role is to suggest related symptoms based on user input. Consider common conditions in India like dengue, malaria, diabetes, hypertension, gastritis, and respiratory infections.

Respond with a JSON array of suggested symptoms. Each suggestion should include:
- symptom: the symptom name
- category: medical category (respiratory, gastrointestinal, neurological, etc.)
- commonality: how common this symptom is (common/moderate/rare)
- urgency: urgency level (routine/urgent/emergency)

Example format: [{"symptom": "fever", "category": "general", "commonality": "common", "urgency": "routine"}]"#;

const RELATED_SYSTEM: &str = "You are a medical AI assistant for Indian patients. When given a primary symptom, suggest related symptoms that commonly occur together. Consider Indian disease patterns and climate-related conditions.

Respond with a JSON array of related symptoms that often accompany the primary symptom.";

const COMPREHENSIVE_SYSTEM: &str = r#"You are Dr. MyMedi, an expert medical AI assistant specializing in Indian healthcare. You have extensive knowledge of:
- Common diseases in India (dengue, malaria, typhoid, diabetes, hypertension, gastritis)
- Indian healthcare system and accessible treatments
- Climate-related health issues in India
- Cultural and dietary factors affecting health in India

Provide comprehensive medical analysis in JSON format with these exact fields:
{
  "primaryAnalysis": {
    "mostLikelyConditions": [
      {
        "condition": "condition name",
        "confidence": 85,
        "reasoning": "detailed explanation",
        "commonInIndia": true/false,
        "prevalence": "percentage in Indian population"
      }
    ],
    "severityAssessment": "mild/moderate/severe",
    "urgencyLevel": "routine/urgent/emergency",
    "overallRiskScore": 1-10
  },
  "symptomAnalysis": {
    "patternRecognition": "explanation of symptom pattern",
    "redFlags": ["list of concerning symptoms"],
    "missingSymptoms": ["symptoms to watch for"],
    "progressionPattern": "how symptoms typically develop"
  },
  "indianHealthcareContext": {
    "commonCauses": ["causes specific to Indian context"],
    "seasonalFactors": "monsoon/summer/winter related factors",
    "dietaryFactors": ["Indian diet-related considerations"],
    "environmentalFactors": ["pollution, water quality, etc."]
  },
  "recommendations": {
    "immediate": ["immediate actions to take"],
    "shortTerm": ["actions for next 24-48 hours"],
    "longTerm": ["ongoing management"],
    "whenToSeekHelp": "specific criteria for medical consultation"
  },
  "emergencyFlags": {
    "isEmergency": true/false,
    "emergencyReasons": ["why this needs immediate attention"],
    "emergencyActions": ["what to do immediately"]
  },
  "culturalConsiderations": {
    "homeRemedies": ["safe traditional remedies"],
    "dietaryAdvice": ["Indian food recommendations"],
    "lifestyleFactors": ["relevant to Indian lifestyle"]
  }
}"#;

/// Kinds of symptom analysis the analyzer accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymptomAnalysisType {
    Suggestions,
    Related,
    Comprehensive,
}

impl SymptomAnalysisType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "symptom_suggestions" => Some(Self::Suggestions),
            "related_symptoms" => Some(Self::Related),
            "comprehensive_analysis" => Some(Self::Comprehensive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suggestions => "symptom_suggestions",
            Self::Related => "related_symptoms",
            Self::Comprehensive => "comprehensive_analysis",
        }
    }

    fn max_tokens(&self) -> u32 {
        match self {
            Self::Comprehensive => 3000,
            _ => 1000,
        }
    }
}

/// Build the system and user prompts for a validated request
pub fn build_symptom_prompts(kind: SymptomAnalysisType, request: &SymptomAnalysisRequest) -> (&'static str, String) {
    let symptoms = request.symptoms.as_ref();
    match kind {
        SymptomAnalysisType::Suggestions => (
            SUGGESTIONS_SYSTEM,
            format!(
                "User is typing: \"{}\". Suggest 8-10 related symptoms that commonly occur with or are similar to what they're describing. Focus on symptoms relevant to Indian healthcare context.",
                symptoms.map(ToString::to_string).unwrap_or_default()
            ),
        ),
        SymptomAnalysisType::Related => (
            RELATED_SYSTEM,
            format!(
                "Primary symptom: \"{}\". What are 6-8 symptoms that commonly occur together with this? Consider conditions common in India.",
                symptoms.map(|s| s.first()).unwrap_or_default()
            ),
        ),
        SymptomAnalysisType::Comprehensive => (
            COMPREHENSIVE_SYSTEM,
            format!(
                "Patient Profile:
- Age: {}
- Gender: {}
- Primary Symptoms: {}
- Duration: {}
- Severity (1-10): {}
- Medical History: {}

Provide comprehensive medical analysis considering Indian healthcare context, common diseases in India, and cultural factors. Be thorough but emphasize when professional medical consultation is needed.",
                describe(request.age.as_ref(), "Not specified"),
                request.gender.as_deref().filter(|g| !g.is_empty()).unwrap_or("Not specified"),
                symptoms.map(|s| s.joined()).unwrap_or_default(),
                request.duration.as_deref().filter(|d| !d.is_empty()).unwrap_or("Not specified"),
                describe(request.severity.as_ref(), "Not specified"),
                describe_list(request.medical_history.as_ref(), "None specified"),
            ),
        ),
    }
}

/// Trait for the AI symptom analyzer
#[async_trait]
pub trait SymptomAnalyzerServiceTrait {
    async fn analyze(&self, request: SymptomAnalysisRequest) -> Result<AnalysisEnvelope, ServiceError>;
}

pub struct SymptomAnalyzerService {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl SymptomAnalyzerService {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl SymptomAnalyzerServiceTrait for SymptomAnalyzerService {
    #[instrument(skip_all, fields(analysis_type = ?request.analysis_type))]
    async fn analyze(&self, request: SymptomAnalysisRequest) -> Result<AnalysisEnvelope, ServiceError> {
        if request.symptoms.as_ref().map_or(true, |s| s.is_empty()) {
            warn!("Symptom analysis without symptoms");
            return Err(ServiceError::Validation("Symptoms are required".to_string()));
        }

        let Some(kind) = request.analysis_type.as_deref().and_then(SymptomAnalysisType::parse) else {
            warn!("Unknown symptom analysis type");
            return Err(ServiceError::Validation("Invalid analysis type".to_string()));
        };

        let generator = self.generator.as_deref().ok_or_else(missing_generator)?;
        let (system, prompt) = build_symptom_prompts(kind, &request);

        let reply = generator
            .generate(
                GenerationRequest::new(prompt)
                    .with_system(system)
                    .with_limits(kind.max_tokens(), 0.3)
                    .json(),
            )
            .await
            .map_err(|e| {
                error!("AI symptom analyzer error: {}", e);
                ServiceError::from(e)
            })?;

        info!("AI analysis completed for type: {}", kind.as_str());

        Ok(AnalysisEnvelope {
            success: true,
            analysis_type: kind.as_str().to_string(),
            data: reply_or_analysis(&reply.text),
            timestamp: Utc::now(),
            model: reply.model,
            disclaimer: None,
        })
    }
}

pub fn create_default_symptom_analyzer_service(generator: Option<Arc<dyn TextGenerator>>) -> SymptomAnalyzerService {
    SymptomAnalyzerService::new(generator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::generation::{GeneratedText, MockTextGenerator};
    use crate::entities::analyzer::SymptomInput;
    use serde_json::json;

    fn request(kind: &str, symptoms: SymptomInput) -> SymptomAnalysisRequest {
        SymptomAnalysisRequest {
            symptoms: Some(symptoms),
            analysis_type: Some(kind.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_validation_order() {
        let service = SymptomAnalyzerService::new(None);

        let missing = service.analyze(request("symptom_suggestions", SymptomInput::List(vec![]))).await;
        assert!(matches!(missing, Err(ServiceError::Validation(msg)) if msg == "Symptoms are required"));

        let bad_type = service.analyze(request("horoscope", SymptomInput::Text("cough".to_string()))).await;
        assert!(matches!(bad_type, Err(ServiceError::Validation(msg)) if msg == "Invalid analysis type"));
    }

    #[tokio::test]
    async fn test_missing_generator_is_upstream_failure() {
        let service = SymptomAnalyzerService::new(None);
        let result = service.analyze(request("symptom_suggestions", SymptomInput::Text("cough".to_string()))).await;
        assert!(matches!(result, Err(ServiceError::Upstream(_))));
    }

    #[test]
    fn test_comprehensive_prompt_fills_defaults() {
        let req = SymptomAnalysisRequest {
            age: Some(json!(42)),
            medical_history: Some(vec!["diabetes".to_string()]),
            ..request(
                "comprehensive_analysis",
                SymptomInput::List(vec!["fever".to_string(), "joint pain".to_string()]),
            )
        };
        let (system, prompt) = build_symptom_prompts(SymptomAnalysisType::Comprehensive, &req);
        assert!(system.starts_with("You are Dr. MyMedi"));
        assert!(prompt.contains("- Age: 42"));
        assert!(prompt.contains("- Gender: Not specified"));
        assert!(prompt.contains("- Primary Symptoms: fever, joint pain"));
        assert!(prompt.contains("- Medical History: diabetes"));
    }

    #[tokio::test]
    async fn test_fenced_json_reply_is_parsed() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|req| req.json_mode && req.max_tokens == 1000 && req.prompt.contains("Primary symptom: \"headache\""))
            .returning(|_| {
                Ok(GeneratedText {
                    text: "```json\n[\"nausea\", \"dizziness\"]\n```".to_string(),
                    model: "gpt-4o".to_string(),
                })
            });

        let service = SymptomAnalyzerService::new(Some(Arc::new(generator)));
        let envelope = service
            .analyze(request("related_symptoms", SymptomInput::List(vec!["headache".to_string()])))
            .await
            .unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.analysis_type, "related_symptoms");
        assert_eq!(envelope.data, json!(["nausea", "dizziness"]));
        assert_eq!(envelope.model, "gpt-4o");
    }

    #[tokio::test]
    async fn test_prose_reply_is_wrapped() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().returning(|_| {
            Ok(GeneratedText { text: "Likely a cold.".to_string(), model: "gpt-4o".to_string() })
        });

        let service = SymptomAnalyzerService::new(Some(Arc::new(generator)));
        let envelope = service
            .analyze(request("symptom_suggestions", SymptomInput::Text("sneez".to_string())))
            .await
            .unwrap();
        assert_eq!(envelope.data, json!({ "analysis": "Likely a cold." }));
    }
}
