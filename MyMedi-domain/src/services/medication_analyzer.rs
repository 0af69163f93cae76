use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::{error, info, warn};

use crate::clients::generation::{GenerationRequest, TextGenerator};
use crate::entities::analyzer::{AnalysisEnvelope, MedicationAnalysisRequest};
use crate::error::ServiceError;
use super::ai_reply::{describe, describe_list, missing_generator, parse_json_reply};

pub const MEDICATION_DISCLAIMER: &str =
    "This AI analysis is for informational purposes only. Always consult healthcare professionals for medical decisions.";

const RECOMMENDATIONS_SYSTEM: &str = r#"You are Dr. PharmAI, an expert pharmaceutical AI specializing in the Indian medication market. You have comprehensive knowledge of:
- Indian pharmaceutical brands (Crocin, Dolo, Combiflam, Glycomet, Pan-40, Omez, etc.)
- Generic alternatives and pricing in Indian rupees
- Drug interactions and contraindications
- Dosage guidelines for Indian population
- Prescription requirements in India
- Common side effects and warnings

Provide medication recommendations in this exact JSON format:
{
  "recommendations": [
    {
      "medicationType": "primary/supportive/preventive",
      "genericName": "paracetamol",
      "condition": "fever/pain relief",
      "brandOptions": [
        {
          "brandName": "Crocin 500mg",
          "manufacturer": "GSK",
          "price": 35,
          "availability": "widely_available",
          "prescriptionRequired": false
        }
      ],
      "dosageInstructions": {
        "adult": "500-1000mg every 6 hours, maximum 4g/day",
        "elderly": "500mg every 6 hours, maximum 3g/day",
        "timing": "Can be taken with or without food",
        "duration": "3-5 days, consult doctor if no improvement"
      },
      "contraindications": ["severe liver disease", "alcohol dependency"],
      "sideEffects": ["nausea (rare)", "liver damage (overdose)"],
      "interactions": ["warfarin", "alcohol"],
      "warnings": ["Do not exceed recommended dose", "Avoid alcohol"],
      "costSavings": "Save ₹20 with generic option",
      "aiReasoning": "Recommended for fever and pain relief based on symptoms"
    }
  ],
  "safetyAlerts": [
    { "severity": "high/medium/low", "message": "Alert message", "action": "Required action" }
  ],
  "overallAssessment": {
    "totalEstimatedCost": 150,
    "treatmentDuration": "5-7 days",
    "prescriptionRequired": false,
    "followUpRequired": true
  }
}"#;

const INTERACTION_SYSTEM: &str = r#"You are a drug interaction specialist AI for the Indian pharmaceutical market. Analyze drug interactions with focus on:
- Severity levels (minor/moderate/severe/contraindicated)
- Specific mechanisms of interaction
- Clinical significance
- Alternative medication suggestions
- Timing adjustments to minimize interactions

Respond in this JSON format:
{
  "interactions": [
    {
      "drug1": "medication name",
      "drug2": "medication name",
      "severity": "minor/moderate/severe/contraindicated",
      "mechanism": "how the interaction occurs",
      "clinicalEffect": "what happens to the patient",
      "management": "how to handle this interaction",
      "alternatives": ["alternative medication options"],
      "timingAdjustment": "spacing recommendations if applicable"
    }
  ],
  "overallRisk": "low/moderate/high/critical",
  "emergencyAlert": true/false,
  "recommendations": ["specific actions to take"],
  "safeAlternatives": ["safer medication combinations"]
}"#;

const PRICE_SYSTEM: &str = r#"You are a pharmaceutical pricing expert for the Indian market. You have real-time knowledge of:
- Current medication prices across Indian pharmacies
- Generic vs branded medication costs
- Pharmacy chain availability (Apollo, MedPlus, 1mg, etc.)
- Regional price variations
- Insurance coverage options

Provide pricing analysis in this JSON format:
{
  "priceComparison": [
    {
      "genericName": "medication name",
      "options": [
        { "type": "branded", "name": "Brand Name", "price": 100, "manufacturer": "Company", "availability": "widely_available/limited/rare" },
        { "type": "generic", "name": "Generic Name", "price": 45, "manufacturer": "Various", "availability": "widely_available" }
      ],
      "costSavings": 55,
      "recommendedOption": "generic/branded",
      "reasoning": "why this option is recommended"
    }
  ],
  "totalCostEstimate": { "branded": 500, "generic": 200, "mixed": 350, "savings": 300 },
  "pharmacyAvailability": [
    { "pharmacy": "Apollo Pharmacy", "distance": "2km", "availability": "in_stock/limited/out_of_stock", "deliveryAvailable": true }
  ]
}"#;

const SAFETY_SYSTEM: &str = r#"You are a medication safety AI specialist. Monitor for:
- Dangerous drug combinations
- Age-related contraindications
- Condition-specific warnings
- Overdose risks
- Prescription requirements
- Emergency situations requiring immediate medical attention

Respond in this JSON format:
{
  "safetyStatus": "safe/caution/dangerous/emergency",
  "alerts": [
    {
      "severity": "low/medium/high/critical",
      "type": "interaction/contraindication/overdose/prescription",
      "message": "detailed alert message",
      "action": "required immediate action",
      "timeframe": "immediate/within_hours/within_days"
    }
  ],
  "prescriptionRequired": true/false,
  "prescriptionReasons": ["reasons why prescription is needed"],
  "emergencySignsToWatch": ["symptoms requiring immediate medical attention"],
  "followUpRequired": true/false,
  "followUpTimeframe": "timeframe for follow-up"
}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedicationAnalysisType {
    Recommendations,
    InteractionCheck,
    PriceComparison,
    SafetyMonitoring,
}

impl MedicationAnalysisType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "medication_recommendations" => Some(Self::Recommendations),
            "drug_interaction_check" => Some(Self::InteractionCheck),
            "price_comparison" => Some(Self::PriceComparison),
            "safety_monitoring" => Some(Self::SafetyMonitoring),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recommendations => "medication_recommendations",
            Self::InteractionCheck => "drug_interaction_check",
            Self::PriceComparison => "price_comparison",
            Self::SafetyMonitoring => "safety_monitoring",
        }
    }

    fn max_tokens(&self) -> u32 {
        match self {
            Self::Recommendations => 4000,
            _ => 2000,
        }
    }
}

pub fn build_medication_prompts(kind: MedicationAnalysisType, req: &MedicationAnalysisRequest) -> (&'static str, String) {
    let age = describe(req.age.as_ref(), "Not specified");
    let gender = req.gender.as_deref().filter(|g| !g.is_empty()).unwrap_or("Not specified");
    let history = describe_list(req.medical_history.as_ref(), "None");
    let current = describe_list(req.current_medications.as_ref(), "None");
    let allergies = describe_list(req.allergies.as_ref(), "None");

    match kind {
        MedicationAnalysisType::Recommendations => (
            RECOMMENDATIONS_SYSTEM,
            format!(
                "Patient Profile:
- Age: {age}
- Gender: {gender}
- Weight: {}kg
- Symptoms: {}
- Medical History: {history}
- Current Medications: {current}
- Allergies: {allergies}

Provide specific medication recommendations with Indian brands, pricing, and safety considerations. Focus on commonly available medications in India.",
                describe(req.weight.as_ref(), "Not specified"),
                describe_list(req.symptoms.as_ref(), "Not specified"),
            ),
        ),
        MedicationAnalysisType::InteractionCheck => (
            INTERACTION_SYSTEM,
            format!(
                "Analyze drug interactions for these medications:
Current medications: {current}
New medication being added: {}
Full medication list: {}

Patient age: {age}
Medical conditions: {history}

Provide detailed interaction analysis with Indian medication context.",
                req.new_medication.as_deref().filter(|m| !m.is_empty()).unwrap_or("None"),
                describe_list(req.medication_list.as_ref(), "None"),
            ),
        ),
        MedicationAnalysisType::PriceComparison => (
            PRICE_SYSTEM,
            format!(
                "Provide price comparison for these medications:
{}

Include Indian pharmacy chains, generic alternatives, and cost savings analysis.",
                describe_list(req.medication_list.as_ref(), "Not specified"),
            ),
        ),
        MedicationAnalysisType::SafetyMonitoring => (
            SAFETY_SYSTEM,
            format!(
                "Safety analysis for:
Patient: Age {age}, Gender {gender}
Medical conditions: {history}
Current medications: {current}
Proposed medications: {}
Allergies: {allergies}

Provide comprehensive safety assessment with emergency detection.",
                describe_list(req.medication_list.as_ref(), "None"),
            ),
        ),
    }
}

/// Trait for the AI medication analyzer
#[async_trait]
pub trait MedicationAnalyzerServiceTrait {
    async fn analyze(&self, request: MedicationAnalysisRequest) -> Result<AnalysisEnvelope, ServiceError>;
}

pub struct MedicationAnalyzerService {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl MedicationAnalyzerService {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl MedicationAnalyzerServiceTrait for MedicationAnalyzerService {
    async fn analyze(&self, request: MedicationAnalysisRequest) -> Result<AnalysisEnvelope, ServiceError> {
        let Some(kind) = request.analysis_type.as_deref().and_then(MedicationAnalysisType::parse) else {
            warn!("Unknown medication analysis type: {:?}", request.analysis_type);
            return Err(ServiceError::Validation("Invalid analysis type".to_string()));
        };

        let generator = self.generator.as_deref().ok_or_else(missing_generator)?;
        let (system, prompt) = build_medication_prompts(kind, &request);

        let reply = generator
            .generate(
                GenerationRequest::new(prompt)
                    .with_system(system)
                    .with_limits(kind.max_tokens(), 0.2)
                    .json(),
            )
            .await
            .map_err(|e| {
                error!("AI medication analyzer error: {}", e);
                ServiceError::from(e)
            })?;

        info!("AI medication analysis completed for type: {}", kind.as_str());

        let data = parse_json_reply(&reply.text).unwrap_or_else(|| {
            json!({ "analysis": reply.text, "error": "Failed to parse structured response" })
        });

        Ok(AnalysisEnvelope {
            success: true,
            analysis_type: kind.as_str().to_string(),
            data,
            timestamp: Utc::now(),
            model: reply.model,
            disclaimer: Some(MEDICATION_DISCLAIMER.to_string()),
        })
    }
}

pub fn create_default_medication_analyzer_service(
    generator: Option<Arc<dyn TextGenerator>>,
) -> MedicationAnalyzerService {
    MedicationAnalyzerService::new(generator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::generation::{GeneratedText, MockTextGenerator};

    #[tokio::test]
    async fn test_invalid_type() {
        let service = MedicationAnalyzerService::new(None);
        let result = service
            .analyze(MedicationAnalysisRequest { analysis_type: Some("diet".to_string()), ..Default::default() })
            .await;
        assert!(matches!(result, Err(ServiceError::Validation(msg)) if msg == "Invalid analysis type"));
    }

    #[test]
    fn test_interaction_prompt() {
        let req = MedicationAnalysisRequest {
            current_medications: Some(vec!["warfarin".to_string()]),
            new_medication: Some("aspirin".to_string()),
            ..Default::default()
        };
        let (system, prompt) = build_medication_prompts(MedicationAnalysisType::InteractionCheck, &req);
        assert!(system.starts_with("You are a drug interaction specialist"));
        assert!(prompt.contains("Current medications: warfarin"));
        assert!(prompt.contains("New medication being added: aspirin"));
        assert!(prompt.contains("Full medication list: None"));
        assert!(prompt.contains("Patient age: Not specified"));
    }

    #[tokio::test]
    async fn test_unparseable_reply_keeps_text_and_disclaimer() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|req| req.max_tokens == 4000 && (req.temperature - 0.2).abs() < f32::EPSILON)
            .returning(|_| Ok(GeneratedText { text: "Take rest".to_string(), model: "gpt-4o".to_string() }));

        let service = MedicationAnalyzerService::new(Some(Arc::new(generator)));
        let envelope = service
            .analyze(MedicationAnalysisRequest {
                analysis_type: Some("medication_recommendations".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(envelope.data["analysis"], "Take rest");
        assert_eq!(envelope.data["error"], "Failed to parse structured response");
        assert_eq!(envelope.disclaimer.as_deref(), Some(MEDICATION_DISCLAIMER));
    }
}
