use tracing::{debug, warn};

use crate::entities::live_analysis::{
    AiReasoning, EmergencyAlert, Impact, LiveAnalysisRequest, LiveAnalysisResponse,
    MedicationRecommendation, Recommendations, RiskFactor, RiskLevel, Urgency,
};
use crate::rules::{
    CRITICAL_COMBINATIONS, EMERGENCY_SERVICES, EMERGENCY_SYMPTOMS,
    HIGH_RISK_CONDITIONS, MODERATE_RISK_CONDITIONS, QUICK_MEDICATIONS,
};
use crate::services::bmi::calculate_bmi;

const EMERGENCY_CALL: &str = "Call emergency services immediately (108)";

/// Score with the sentences explaining each deduction
#[derive(Debug, Clone, PartialEq)]
pub struct HealthScore {
    pub score: i32,
    pub rationale: String,
}

/// Trait for the live health analysis
pub trait LiveAnalysisServiceTrait {
    /// Calculate the 0-100 health score
    fn calculate_health_score(&self, request: &LiveAnalysisRequest) -> HealthScore;

    /// Assess the risk level and its explanation
    fn assess_risk_level(&self, request: &LiveAnalysisRequest, health_score: i32) -> (RiskLevel, &'static str);

    /// Calculate how confident the analysis is given how much of the form is filled in
    fn calculate_confidence(&self, request: &LiveAnalysisRequest) -> i32;

    /// Detect an emergency and build the alert
    fn detect_emergency(&self, request: &LiveAnalysisRequest) -> Option<EmergencyAlert>;

    /// Over-the-counter suggestions for the reported symptoms
    fn recommend_medications(&self, request: &LiveAnalysisRequest) -> Vec<MedicationRecommendation>;

    /// Run the full analysis
    fn analyze(&self, request: &LiveAnalysisRequest) -> LiveAnalysisResponse;
}

/// Rule-based live analysis
#[derive(Debug, Default, Clone, Copy)]
pub struct LiveAnalysisService;

impl LiveAnalysisService {
    pub fn new() -> Self {
        Self
    }
}

fn all_symptoms(request: &LiveAnalysisRequest) -> Vec<String> {
    std::iter::once(&request.primary_symptom)
        .chain(request.secondary_symptoms.iter())
        .map(|s| s.to_lowercase())
        .collect()
}

fn emergency_symptoms_in(symptoms: &[String]) -> Vec<&'static str> {
    EMERGENCY_SYMPTOMS
        .iter()
        .copied()
        .filter(|emergency| symptoms.iter().any(|s| s.contains(emergency)))
        .collect()
}

fn has_critical_combination(symptoms: &[String]) -> bool {
    CRITICAL_COMBINATIONS.iter().any(|combination| {
        combination
            .iter()
            .all(|needed| symptoms.iter().any(|s| s.contains(needed)))
    })
}

impl LiveAnalysisServiceTrait for LiveAnalysisService {
    fn calculate_health_score(&self, request: &LiveAnalysisRequest) -> HealthScore {
        let mut score = 85;
        let mut factors: Vec<String> = Vec::new();
        let info = &request.personal_info;

        if info.age > 65.0 {
            score -= 10;
            factors.push("Advanced age increases health risks".to_string());
        } else if info.age > 45.0 {
            score -= 5;
            factors.push("Middle age requires increased health monitoring".to_string());
        }

        if let Some(bmi) = calculate_bmi(info.weight, info.height) {
            if bmi > 30.0 {
                score -= 15;
                factors.push("Obesity significantly impacts health score".to_string());
            } else if bmi > 25.0 {
                score -= 8;
                factors.push("Overweight status affects overall health".to_string());
            } else if bmi < 18.5 {
                score -= 10;
                factors.push("Underweight status indicates potential health concerns".to_string());
            }
        }

        if request.severity > 8.0 {
            score -= 20;
            factors.push("High symptom severity significantly impacts health".to_string());
        } else if request.severity > 6.0 {
            score -= 12;
            factors.push("Moderate to high symptom severity affects wellbeing".to_string());
        } else if request.severity > 4.0 {
            score -= 6;
            factors.push("Moderate symptoms require attention".to_string());
        }

        for condition in &request.conditions {
            let readable = condition.replacen('-', " ", 1);
            if HIGH_RISK_CONDITIONS.contains(&condition.as_str()) {
                score -= 15;
                factors.push(format!("{} significantly impacts health management", readable));
            } else if MODERATE_RISK_CONDITIONS.contains(&condition.as_str()) {
                score -= 8;
                factors.push(format!("{} requires ongoing monitoring", readable));
            }
        }

        let lifestyle = &request.lifestyle;
        if lifestyle.exercise == "sedentary" || lifestyle.exercise == "rarely" {
            score -= 10;
            factors.push("Sedentary lifestyle negatively impacts health".to_string());
        }

        if lifestyle.sleep == "poor" || lifestyle.sleep == "irregular" {
            score -= 8;
            factors.push("Poor sleep quality affects overall health".to_string());
        }

        if lifestyle.stress > 7.0 {
            score -= 10;
            factors.push("High stress levels significantly impact health".to_string());
        } else if lifestyle.stress > 5.0 {
            score -= 5;
            factors.push("Moderate stress affects wellbeing".to_string());
        }

        match request.duration.as_str() {
            "more-than-2-weeks" => {
                score -= 10;
                factors.push("Prolonged symptoms indicate need for medical attention".to_string());
            }
            "1-2-weeks" => {
                score -= 5;
                factors.push("Extended symptom duration requires monitoring".to_string());
            }
            _ => {}
        }

        let score = score.clamp(0, 100);
        let rationale = format!(
            "Health score calculated based on multiple factors: {}. Score reflects current health status and risk factors.",
            factors.join("; ")
        );

        HealthScore { score, rationale }
    }

    fn assess_risk_level(&self, request: &LiveAnalysisRequest, health_score: i32) -> (RiskLevel, &'static str) {
        let symptoms = all_symptoms(request);

        if !emergency_symptoms_in(&symptoms).is_empty() {
            return (
                RiskLevel::Critical,
                "Emergency symptoms detected requiring immediate medical attention. Critical risk level due to potentially life-threatening conditions.",
            );
        }

        if has_critical_combination(&symptoms) {
            return (
                RiskLevel::Critical,
                "Critical symptom combination detected. Immediate medical evaluation required due to high risk of serious complications.",
            );
        }

        if health_score < 40 || request.severity > 8.0 {
            return (
                RiskLevel::High,
                "High risk due to low health score or severe symptoms. Prompt medical attention recommended within 24-48 hours.",
            );
        }

        if health_score < 60 || request.severity > 6.0 || request.conditions.len() > 2 {
            return (
                RiskLevel::Moderate,
                "Moderate risk requiring medical consultation. Multiple risk factors present that need professional evaluation.",
            );
        }

        (
            RiskLevel::Low,
            "Low risk based on current assessment. Continue monitoring symptoms and maintain healthy lifestyle practices.",
        )
    }

    fn calculate_confidence(&self, request: &LiveAnalysisRequest) -> i32 {
        let info = &request.personal_info;
        let mut confidence = 50;

        if info.age > 0.0 {
            confidence += 10;
        }
        if !info.gender.is_empty() {
            confidence += 5;
        }
        if info.weight > 0.0 && info.height > 0.0 {
            confidence += 10;
        }
        if !request.primary_symptom.is_empty() {
            confidence += 15;
        }
        if !request.secondary_symptoms.is_empty() {
            confidence += 10;
        }
        if !request.duration.is_empty() {
            confidence += 5;
        }
        if request.severity > 1.0 {
            confidence += 5;
        }
        if !request.conditions.is_empty() {
            confidence += 10;
        }
        if !request.medications.is_empty() {
            confidence += 5;
        }

        // Complex cases are less certain
        if request.conditions.len() > 3 {
            confidence -= 5;
        }
        if request.medications.len() > 5 {
            confidence -= 5;
        }
        if request.severity > 8.0 && request.primary_symptom.is_empty() {
            confidence -= 10;
        }

        confidence.clamp(30, 95)
    }

    fn detect_emergency(&self, request: &LiveAnalysisRequest) -> Option<EmergencyAlert> {
        let symptoms = all_symptoms(request);
        let emergency = emergency_symptoms_in(&symptoms);
        let critical = has_critical_combination(&symptoms);
        let high_severity = request.severity > 8.0
            && symptoms
                .iter()
                .any(|s| s.contains("chest") || s.contains("breathing") || s.contains("severe"));

        if emergency.is_empty() && !critical && !high_severity {
            return None;
        }

        let (headline, actions): (&str, Vec<&str>) = if emergency.contains(&"chest pain") {
            (
                "Chest pain detected - possible cardiac emergency",
                vec![
                    EMERGENCY_CALL,
                    "Do not drive yourself to hospital",
                    "Chew aspirin if not allergic (unless bleeding)",
                    "Sit upright and stay calm",
                ],
            )
        } else if emergency.contains(&"difficulty breathing") || emergency.contains(&"shortness of breath") {
            (
                "Severe breathing difficulty detected",
                vec![
                    EMERGENCY_CALL,
                    "Sit upright, do not lie down",
                    "Loosen tight clothing",
                    "Use rescue inhaler if available",
                ],
            )
        } else if emergency.contains(&"severe headache") {
            (
                "Severe headache - possible neurological emergency",
                vec![
                    EMERGENCY_CALL,
                    "Avoid bright lights and loud sounds",
                    "Do not take multiple pain medications",
                    "Monitor for vision changes or confusion",
                ],
            )
        } else {
            (
                "Critical symptoms detected requiring immediate attention",
                vec![
                    EMERGENCY_CALL,
                    "Do not delay seeking medical care",
                    "Have someone stay with you",
                ],
            )
        };

        warn!(matched = ?emergency, critical, high_severity, "Emergency detected in live analysis");

        Some(EmergencyAlert {
            message: format!("🚨 EMERGENCY ALERT: {}", headline),
            actions: actions.iter().map(|a| a.to_string()).collect(),
            emergency_services: EMERGENCY_SERVICES.iter().map(|s| s.to_string()).collect(),
        })
    }

    fn recommend_medications(&self, request: &LiveAnalysisRequest) -> Vec<MedicationRecommendation> {
        let mut picked: Vec<MedicationRecommendation> = Vec::new();

        let primary = request.primary_symptom.to_lowercase();
        for (symptom, meds) in QUICK_MEDICATIONS {
            if primary.contains(symptom) {
                picked.extend(meds.iter().map(to_recommendation));
            }
        }

        for secondary in &request.secondary_symptoms {
            let secondary = secondary.to_lowercase();
            for (symptom, meds) in QUICK_MEDICATIONS {
                if !secondary.contains(symptom) {
                    continue;
                }
                for med in meds {
                    if !picked.iter().any(|rec| rec.name == med.name) {
                        picked.push(to_recommendation(med));
                    }
                }
            }
        }

        if request.severity > 7.0 {
            for rec in picked.iter_mut() {
                if rec.urgency == Urgency::Routine {
                    rec.urgency = Urgency::Soon;
                }
                if rec.urgency == Urgency::Soon && request.severity > 8.0 {
                    rec.urgency = Urgency::Immediate;
                }
            }
        }

        picked.truncate(4);
        picked
    }

    fn analyze(&self, request: &LiveAnalysisRequest) -> LiveAnalysisResponse {
        let HealthScore { score, rationale } = self.calculate_health_score(request);
        let (risk_level, risk_assessment) = self.assess_risk_level(request, score);
        let confidence = self.calculate_confidence(request);
        let emergency_alert = self.detect_emergency(request);
        let medications = self.recommend_medications(request);

        debug!(score, %risk_level, confidence, "Live analysis computed");

        LiveAnalysisResponse {
            health_score: score,
            risk_level,
            confidence_score: confidence,
            is_emergency: emergency_alert.is_some(),
            emergency_alert,
            recommendations: Recommendations {
                immediate: immediate_recommendations(request),
                medications,
                lifestyle: lifestyle_recommendations(request),
                follow_up: follow_up_recommendations(request, risk_level),
            },
            risk_factors: risk_factors(request),
            ai_reasoning: AiReasoning {
                health_score_rationale: rationale,
                risk_assessment: risk_assessment.to_string(),
                key_findings: vec![
                    format!(
                        "Primary symptom: {}",
                        if request.primary_symptom.is_empty() { "Not specified" } else { request.primary_symptom.as_str() }
                    ),
                    format!("Severity level: {}/10", request.severity),
                    format!("Risk level: {}", risk_level),
                    format!("Confidence: {}%", confidence),
                ],
            },
        }
    }
}

fn to_recommendation(med: &crate::rules::QuickMedication) -> MedicationRecommendation {
    MedicationRecommendation {
        name: med.name.to_string(),
        reason: med.reason.to_string(),
        dosage: med.dosage.to_string(),
        urgency: med.urgency,
    }
}

fn immediate_recommendations(request: &LiveAnalysisRequest) -> Vec<String> {
    let mut out = Vec::new();
    let primary = request.primary_symptom.to_lowercase();

    if request.severity > 6.0 {
        out.push("Monitor symptoms closely and track changes".to_string());
    }
    if primary.contains("fever") {
        out.push("Stay hydrated with plenty of fluids".to_string());
        out.push("Rest and avoid strenuous activities".to_string());
    }
    if primary.contains("pain") {
        out.push("Apply appropriate hot/cold therapy".to_string());
        out.push("Avoid activities that worsen pain".to_string());
    }
    out
}

fn lifestyle_recommendations(request: &LiveAnalysisRequest) -> Vec<String> {
    let mut out = Vec::new();
    if request.lifestyle.exercise == "sedentary" {
        out.push("Start with 15-minute daily walks".to_string());
    }
    if request.lifestyle.sleep == "poor" {
        out.push("Establish regular sleep schedule".to_string());
    }
    if request.lifestyle.stress > 6.0 {
        out.push("Practice stress reduction techniques".to_string());
    }
    out
}

fn follow_up_recommendations(request: &LiveAnalysisRequest, risk_level: RiskLevel) -> Vec<String> {
    let mut out = Vec::new();
    if request.severity > 7.0 || risk_level == RiskLevel::High {
        out.push("Schedule doctor appointment within 24-48 hours".to_string());
    } else if request.severity > 5.0 || risk_level == RiskLevel::Moderate {
        out.push("Consider medical consultation within 1 week".to_string());
    }
    if !request.conditions.is_empty() {
        out.push("Regular monitoring of existing conditions".to_string());
    }
    out
}

fn risk_factors(request: &LiveAnalysisRequest) -> Vec<RiskFactor> {
    let mut out = Vec::new();
    if request.personal_info.age > 65.0 {
        out.push(RiskFactor {
            factor: "Advanced Age".to_string(),
            impact: Impact::Medium,
            explanation: "Age increases susceptibility to various health conditions".to_string(),
        });
    }
    if request.conditions.iter().any(|c| c == "diabetes-type2") {
        out.push(RiskFactor {
            factor: "Diabetes".to_string(),
            impact: Impact::High,
            explanation: "Diabetes significantly increases cardiovascular and other health risks".to_string(),
        });
    }
    if request.severity > 7.0 {
        out.push(RiskFactor {
            factor: "High Symptom Severity".to_string(),
            impact: Impact::High,
            explanation: "Severe symptoms may indicate serious underlying conditions".to_string(),
        });
    }
    out
}

/// Create the default live analysis service
pub fn create_default_live_analysis_service() -> impl LiveAnalysisServiceTrait + Send + Sync {
    LiveAnalysisService::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::live_analysis::{Lifestyle, PersonalInfo};

    fn healthy_request() -> LiveAnalysisRequest {
        LiveAnalysisRequest {
            personal_info: PersonalInfo {
                age: 30.0,
                gender: "female".to_string(),
                weight: 60.0,
                height: 165.0,
            },
            primary_symptom: "mild cough".to_string(),
            duration: "less-than-1-day".to_string(),
            severity: 2.0,
            lifestyle: Lifestyle {
                exercise: "moderate".to_string(),
                sleep: "good".to_string(),
                diet: "balanced".to_string(),
                stress: 3.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_healthy_profile_keeps_base_score() {
        let service = LiveAnalysisService::new();
        let score = service.calculate_health_score(&healthy_request());
        assert_eq!(score.score, 85);
        assert!(score.rationale.starts_with("Health score calculated based on multiple factors: ."));
    }

    #[test]
    fn test_score_deductions_accumulate_and_clamp() {
        let service = LiveAnalysisService::new();
        let mut request = healthy_request();
        request.personal_info.age = 70.0;
        request.personal_info.weight = 110.0;
        request.severity = 9.0;
        request.conditions = vec!["diabetes-type2".into(), "heart-disease".into(), "hypertension".into()];
        request.lifestyle.exercise = "sedentary".into();
        request.lifestyle.sleep = "poor".into();
        request.lifestyle.stress = 9.0;
        request.duration = "more-than-2-weeks".into();

        let score = service.calculate_health_score(&request);
        assert_eq!(score.score, 0);
        assert!(score.rationale.contains("diabetes type2 significantly impacts health management"));
        assert!(score.rationale.contains("hypertension requires ongoing monitoring"));
    }

    #[test]
    fn test_chest_pain_is_critical_emergency() {
        let service = LiveAnalysisService::new();
        let mut request = healthy_request();
        request.primary_symptom = "Chest pain".to_string();

        let response = service.analyze(&request);
        assert!(response.is_emergency);
        assert_eq!(response.risk_level, RiskLevel::Critical);

        let alert = response.emergency_alert.unwrap();
        assert_eq!(alert.message, "🚨 EMERGENCY ALERT: Chest pain detected - possible cardiac emergency");
        assert_eq!(alert.actions[0], EMERGENCY_CALL);
        assert_eq!(alert.emergency_services.len(), 4);
    }

    #[test]
    fn test_critical_combination_without_listed_symptom() {
        let service = LiveAnalysisService::new();
        let mut request = healthy_request();
        request.primary_symptom = "fever".to_string();
        request.secondary_symptoms = vec!["neck stiffness".to_string()];

        let (level, text) = service.assess_risk_level(&request, 80);
        assert_eq!(level, RiskLevel::Critical);
        assert!(text.starts_with("Critical symptom combination"));

        let alert = service.detect_emergency(&request).unwrap();
        assert!(alert.message.ends_with("Critical symptoms detected requiring immediate attention"));
        assert_eq!(alert.actions.len(), 3);
    }

    #[test]
    fn test_high_severity_with_breathing_word_is_emergency() {
        let service = LiveAnalysisService::new();
        let mut request = healthy_request();
        request.primary_symptom = "noisy breathing".to_string();
        request.severity = 9.0;
        assert!(service.detect_emergency(&request).is_some());

        request.severity = 8.0;
        assert!(service.detect_emergency(&request).is_none());
    }

    #[test]
    fn test_risk_level_bands() {
        let service = LiveAnalysisService::new();
        let request = healthy_request();
        assert_eq!(service.assess_risk_level(&request, 85).0, RiskLevel::Low);
        assert_eq!(service.assess_risk_level(&request, 55).0, RiskLevel::Moderate);
        assert_eq!(service.assess_risk_level(&request, 35).0, RiskLevel::High);
    }

    #[test]
    fn test_confidence_bounds() {
        let service = LiveAnalysisService::new();
        assert_eq!(service.calculate_confidence(&LiveAnalysisRequest::default()), 50);

        let mut request = healthy_request();
        request.secondary_symptoms = vec!["sore throat".into()];
        request.conditions = vec!["asthma".into()];
        request.medications = vec!["inhaler".into()];
        assert_eq!(service.calculate_confidence(&request), 95);
    }

    #[test]
    fn test_medications_deduplicated_and_escalated() {
        let service = LiveAnalysisService::new();
        let mut request = healthy_request();
        request.primary_symptom = "fever".to_string();
        request.secondary_symptoms = vec!["headache".to_string(), "acidity".to_string()];
        request.severity = 9.0;

        let meds = service.recommend_medications(&request);
        let names: Vec<&str> = meds.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Paracetamol 500mg", "Ibuprofen 400mg", "Omeprazole 20mg", "Pantoprazole 40mg"]);
        assert!(meds.iter().all(|m| m.urgency == Urgency::Immediate));
    }

    #[test]
    fn test_routine_medication_becomes_soon_at_severity_eight() {
        let service = LiveAnalysisService::new();
        let mut request = healthy_request();
        request.primary_symptom = "cough".to_string();
        request.severity = 8.0;

        let meds = service.recommend_medications(&request);
        assert_eq!(meds.len(), 2);
        assert!(meds.iter().all(|m| m.urgency == Urgency::Soon));
    }

    #[test]
    fn test_key_findings_default_primary_symptom() {
        let service = LiveAnalysisService::new();
        let response = service.analyze(&LiveAnalysisRequest::default());
        assert_eq!(response.ai_reasoning.key_findings[0], "Primary symptom: Not specified");
        assert_eq!(response.ai_reasoning.key_findings[1], "Severity level: 0/10");
        assert_eq!(response.recommendations.follow_up, Vec::<String>::new());
    }
}
