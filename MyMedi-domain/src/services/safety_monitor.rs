use tracing::{debug, warn};

use crate::entities::safety::{
    AccuracyIndicators, EmergencyProtocol, ResponseType, SafetyAssessment, SafetyAssessmentRequest,
    SafetyLevel, SafetyUserProfile,
};
use crate::rules::{
    contains_any, matching_keywords, CLARITY_TERMS, EMERGENCY_SERVICES, HIGH_RISK_MEDICATIONS,
    SAFETY_EMERGENCY_KEYWORDS, SYMPTOM_DESCRIPTORS,
};

/// Trait for assessing the safety of an AI generated answer
pub trait SafetyMonitorServiceTrait {
    fn calculate_confidence(
        &self,
        user_input: &str,
        ai_response: &str,
        response_type: ResponseType,
        profile: Option<&SafetyUserProfile>,
    ) -> i32;

    /// Emergency protocol when either text mentions an emergency keyword
    fn detect_emergency(&self, user_input: &str, ai_response: &str) -> Option<EmergencyProtocol>;

    fn assess_accuracy_indicators(
        &self,
        user_input: &str,
        ai_response: &str,
        response_type: ResponseType,
    ) -> AccuracyIndicators;

    fn safety_recommendations(
        &self,
        confidence: i32,
        emergency_flags: &[String],
        response_type: ResponseType,
    ) -> Vec<String>;

    /// Run the full assessment
    fn assess(&self, request: &SafetyAssessmentRequest) -> SafetyAssessment;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SafetyMonitorService;

impl SafetyMonitorService {
    pub fn new() -> Self {
        Self
    }
}

fn word_count(text: &str) -> usize {
    text.split(' ').count()
}

impl SafetyMonitorServiceTrait for SafetyMonitorService {
    fn calculate_confidence(
        &self,
        user_input: &str,
        ai_response: &str,
        response_type: ResponseType,
        profile: Option<&SafetyUserProfile>,
    ) -> i32 {
        let mut confidence: i32 = 70;

        let input_length = user_input.chars().count();
        if input_length > 100 {
            confidence += 10;
        }
        if input_length > 200 {
            confidence += 5;
        }

        confidence += matching_keywords(user_input, CLARITY_TERMS).len() as i32 * 2;

        confidence += match response_type {
            ResponseType::Emergency => -20,
            ResponseType::Medication => -10,
            ResponseType::Lifestyle => 10,
            _ => 0,
        };

        if let Some(profile) = profile {
            if profile.age > 0.0 {
                confidence += 5;
            }
            if !profile.medical_history.is_empty() {
                confidence += 5;
            }
            if !profile.current_medications.is_empty() {
                confidence += 5;
            }
        }

        if ai_response.chars().count() > 200 {
            confidence += 5;
        }
        if ai_response.contains("consult") || ai_response.contains("doctor") {
            confidence += 10;
        }

        confidence.clamp(0, 100)
    }

    fn detect_emergency(&self, user_input: &str, ai_response: &str) -> Option<EmergencyProtocol> {
        let input = user_input.to_lowercase();
        let response = ai_response.to_lowercase();

        let first = SAFETY_EMERGENCY_KEYWORDS
            .iter()
            .find(|keyword| input.contains(*keyword) || response.contains(*keyword))?;

        Some(EmergencyProtocol {
            is_emergency: true,
            emergency_type: first.to_string(),
            immediate_actions: [
                "Call emergency services immediately (108)",
                "Do not delay seeking professional medical help",
                "If unconscious, check breathing and pulse",
                "Stay with the patient until help arrives",
                "Provide clear location information to emergency services",
            ]
            .iter()
            .map(|a| a.to_string())
            .collect(),
            emergency_contacts: EMERGENCY_SERVICES.iter().map(|c| c.to_string()).collect(),
        })
    }

    fn assess_accuracy_indicators(
        &self,
        user_input: &str,
        ai_response: &str,
        response_type: ResponseType,
    ) -> AccuracyIndicators {
        let input_words = word_count(user_input);

        let mut data_quality = 50;
        if input_words > 20 {
            data_quality += 20;
        }
        if input_words > 50 {
            data_quality += 15;
        }
        if user_input.contains("duration") || user_input.contains("days") || user_input.contains("weeks") {
            data_quality += 15;
        }

        let symptom_clarity = 60 + matching_keywords(user_input, SYMPTOM_DESCRIPTORS).len() as u32 * 10;

        let medical_complexity = match response_type {
            ResponseType::Emergency => 90,
            ResponseType::Medication => 80,
            ResponseType::Diagnosis => 70,
            ResponseType::Lifestyle => 30,
            ResponseType::General => 40,
        };

        let mut risk_level = 30;
        if contains_any(ai_response, HIGH_RISK_MEDICATIONS) {
            risk_level += 40;
        }
        if contains_any(user_input, SAFETY_EMERGENCY_KEYWORDS) {
            risk_level += 50;
        }

        AccuracyIndicators {
            data_quality: data_quality.min(100),
            symptom_clarity: symptom_clarity.min(100),
            medical_complexity,
            risk_level: risk_level.min(100),
        }
    }

    fn safety_recommendations(
        &self,
        confidence: i32,
        emergency_flags: &[String],
        response_type: ResponseType,
    ) -> Vec<String> {
        let mut out: Vec<&str> = Vec::new();

        if confidence < 60 {
            out.push("AI confidence is low - strongly recommend consulting a healthcare professional");
            out.push("Consider seeking a second opinion from a qualified doctor");
        }

        if !emergency_flags.is_empty() {
            out.push("EMERGENCY: Seek immediate medical attention");
            out.push("Call emergency services (108) without delay");
            out.push("Do not rely solely on AI recommendations for emergency situations");
        }

        match response_type {
            ResponseType::Medication => out.extend([
                "Verify all medication suggestions with a licensed pharmacist or doctor",
                "Check for drug interactions with current medications",
                "Never start or stop medications without professional guidance",
            ]),
            ResponseType::Diagnosis => out.extend([
                "AI cannot provide definitive medical diagnosis",
                "Professional medical examination is required for accurate diagnosis",
                "Use AI insights as preliminary information only",
            ]),
            ResponseType::Emergency => out.extend([
                "Emergency situations require immediate professional medical intervention",
                "Follow emergency protocols and contact emergency services",
            ]),
            _ => {}
        }

        out.push("Always consult qualified healthcare professionals for medical decisions");
        out.push("Monitor symptoms and seek help if condition worsens");

        out.into_iter().map(String::from).collect()
    }

    fn assess(&self, request: &SafetyAssessmentRequest) -> SafetyAssessment {
        let confidence = self.calculate_confidence(
            &request.user_input,
            &request.ai_response,
            request.response_type,
            request.user_profile.as_ref(),
        );
        let protocol = self.detect_emergency(&request.user_input, &request.ai_response);
        let emergency_flags: Vec<String> = protocol
            .iter()
            .map(|p| p.emergency_type.clone())
            .collect();
        let indicators =
            self.assess_accuracy_indicators(&request.user_input, &request.ai_response, request.response_type);

        let safety_level = if protocol.is_some() {
            SafetyLevel::Emergency
        } else if confidence < 40 || indicators.risk_level > 70 {
            SafetyLevel::ReviewRequired
        } else if confidence < 60 || indicators.risk_level > 50 {
            SafetyLevel::Caution
        } else {
            SafetyLevel::Safe
        };

        if safety_level == SafetyLevel::Emergency {
            warn!(flags = ?emergency_flags, "Emergency keywords found in AI exchange");
        }
        debug!(confidence, ?safety_level, "Safety assessment computed");

        let human_review_required = confidence < 60
            || matches!(safety_level, SafetyLevel::ReviewRequired | SafetyLevel::Emergency);

        SafetyAssessment {
            error: None,
            confidence_score: confidence,
            safety_level,
            safety_recommendations: self.safety_recommendations(confidence, &emergency_flags, request.response_type),
            emergency_flags,
            disclaimer_required: true,
            human_review_required,
            accuracy_indicators: indicators,
            emergency_protocol: protocol,
        }
    }
}

/// Create the default safety monitor
pub fn create_default_safety_monitor_service() -> impl SafetyMonitorServiceTrait + Send + Sync {
    SafetyMonitorService::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user_input: &str, ai_response: &str, response_type: ResponseType) -> SafetyAssessmentRequest {
        SafetyAssessmentRequest {
            ai_response: ai_response.to_string(),
            user_input: user_input.to_string(),
            context: String::new(),
            response_type,
            user_profile: None,
        }
    }

    #[test]
    fn test_confidence_for_lifestyle_advice() {
        let service = SafetyMonitorService::new();
        // 70 + 2 (fever) + 2 (headache) + 10 (lifestyle) + 10 (doctor)
        let confidence = service.calculate_confidence(
            "fever and headache",
            "Rest well and see a doctor",
            ResponseType::Lifestyle,
            None,
        );
        assert_eq!(confidence, 94);
    }

    #[test]
    fn test_confidence_with_profile_is_capped() {
        let service = SafetyMonitorService::new();
        let profile = SafetyUserProfile {
            age: 40.0,
            gender: "male".to_string(),
            medical_history: vec!["asthma".to_string()],
            current_medications: vec!["inhaler".to_string()],
        };
        let confidence = service.calculate_confidence(
            &"pain ".repeat(50),
            "please consult a doctor",
            ResponseType::Lifestyle,
            Some(&profile),
        );
        assert_eq!(confidence, 100);
    }

    #[test]
    fn test_emergency_keyword_in_response_triggers_protocol() {
        let service = SafetyMonitorService::new();
        let assessment = service.assess(&request(
            "I feel odd",
            "This could be a Stroke, seek help",
            ResponseType::General,
        ));

        assert_eq!(assessment.safety_level, SafetyLevel::Emergency);
        assert_eq!(assessment.emergency_flags, vec!["stroke".to_string()]);
        assert!(assessment.human_review_required);
        let protocol = assessment.emergency_protocol.unwrap();
        assert_eq!(protocol.immediate_actions.len(), 5);
        assert!(assessment
            .safety_recommendations
            .contains(&"EMERGENCY: Seek immediate medical attention".to_string()));
    }

    #[test]
    fn test_high_risk_medication_requires_caution() {
        let service = SafetyMonitorService::new();
        let assessment = service.assess(&request(
            "what should I take for my sugar levels",
            "Your doctor may adjust insulin",
            ResponseType::Medication,
        ));
        // risk 70 is not above 70, confidence 70 - 10 + 10 = 70
        assert_eq!(assessment.accuracy_indicators.risk_level, 70);
        assert_eq!(assessment.confidence_score, 70);
        assert_eq!(assessment.safety_level, SafetyLevel::Caution);
        assert!(!assessment.human_review_required);
        assert_eq!(assessment.safety_recommendations.len(), 5);
    }

    #[test]
    fn test_accuracy_indicators() {
        let service = SafetyMonitorService::new();
        let indicators = service.assess_accuracy_indicators(
            "sharp throbbing pain for three days",
            "rest",
            ResponseType::Diagnosis,
        );
        assert_eq!(indicators.data_quality, 65);
        assert_eq!(indicators.symptom_clarity, 80);
        assert_eq!(indicators.medical_complexity, 70);
        assert_eq!(indicators.risk_level, 30);
    }

    #[test]
    fn test_recommendations_always_end_with_general_lines() {
        let service = SafetyMonitorService::new();
        let recs = service.safety_recommendations(50, &[], ResponseType::Diagnosis);
        assert_eq!(recs.len(), 7);
        assert_eq!(recs[0], "AI confidence is low - strongly recommend consulting a healthcare professional");
        assert_eq!(recs[6], "Monitor symptoms and seek help if condition worsens");
    }

    #[test]
    fn test_unknown_response_type_parses_as_general() {
        let parsed: SafetyAssessmentRequest = serde_json::from_str(
            r#"{"aiResponse":"ok","userInput":"hi","responseType":"nutrition"}"#,
        )
        .unwrap();
        assert_eq!(parsed.response_type, ResponseType::General);
    }
}
