use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use rand::Rng;
use tracing::{info, warn};

use crate::entities::accuracy::{
    AccuracyActionRequest, AccuracyActionResponse, AccuracyFeedback, AccuracyMetrics, AccuracySummary,
    AccuracyView, CategoryAccuracy, DiabetesGuideline, FeedbackRecorded, FeverManagement,
    GuidelineUpdate, GuidelinesDocument, HypertensionGuideline, KnowledgeBaseInfo, MedicalGuidelines,
    ReviewTicket, SpecialistQueue, SpecialistReview,
};
use crate::error::ServiceError;
use my_medi_data::models::accuracy::{AccuracyRecord, KnowledgeBaseState, SpecialistReviewRecord};
use my_medi_data::repository::AccuracyRepositoryTrait;

/// Feedback submissions between knowledge base updates
const UPDATE_INTERVAL: usize = 10;

/// Entries a region needs in one batch before its guidelines are revised
const REGIONAL_THRESHOLD: usize = 5;

const CATEGORIES: [&str; 4] = ["diagnosis", "medication", "lifestyle", "emergency"];

/// Age brackets with inclusive bounds
const AGE_GROUPS: [(&str, f64, f64); 4] = [
    ("18-30", 18.0, 30.0),
    ("31-50", 31.0, 50.0),
    ("51-70", 51.0, 70.0),
    ("70+", 70.0, 150.0),
];

pub static MEDICAL_GUIDELINES: MedicalGuidelines = MedicalGuidelines {
    fever_management: FeverManagement {
        temperature_threshold: 100.4,
        first_line_treatment: &["Paracetamol 500mg", "Adequate hydration", "Rest"],
        red_flags: &["High fever >103°F", "Persistent fever >3 days", "Associated symptoms"],
        cultural_considerations: &["Avoid cold foods in fever", "Tulsi and ginger tea beneficial"],
    },
    hypertension_india: HypertensionGuideline {
        diagnostic_criteria: "≥140/90 mmHg",
        lifestyle_modifications: &["Low salt diet", "Regular exercise", "Stress management"],
        common_medications: &["Amlodipine", "Telmisartan", "Metoprolol"],
        dietary_advice: &["Reduce salt intake", "Include potassium-rich foods", "Limit processed foods"],
    },
    diabetes_management: DiabetesGuideline {
        hba1c_target: "<7%",
        fasting_glucose: "80-130 mg/dL",
        lifestyle_factors: &["Carbohydrate counting", "Regular exercise", "Weight management"],
        indian_diet_considerations: &["Portion control of rice/roti", "Include millets", "Avoid sugary drinks"],
    },
};

/// Guideline keys in declaration order
pub const GUIDELINE_NAMES: [&str; 3] = ["fever_management", "hypertension_india", "diabetes_management"];

fn is_accurate(record: &AccuracyRecord) -> bool {
    record.user_feedback == "accurate" || record.user_feedback == "partially_accurate"
}

fn percent_accurate<'a>(records: impl IntoIterator<Item = &'a AccuracyRecord>) -> Option<u32> {
    let (total, accurate) = records
        .into_iter()
        .fold((0usize, 0usize), |(total, accurate), r| (total + 1, accurate + is_accurate(r) as usize));
    if total == 0 {
        None
    } else {
        Some(((accurate as f64 / total as f64) * 100.0).round() as u32)
    }
}

/// State part of a "City, State" location
fn region_of(location: &str) -> Option<&str> {
    location.split(',').nth(1).map(str::trim).filter(|r| !r.is_empty())
}

/// Bump the patch component of a `major.minor.patch` version
pub fn increment_version(version: &str) -> String {
    let mut parts = version.split('.');
    let major = parts.next().unwrap_or("1");
    let minor = parts.next().unwrap_or("0");
    let patch = parts.next().and_then(|p| p.parse::<u64>().ok()).unwrap_or(0) + 1;
    format!("{}.{}.{}", major, minor, patch)
}

/// Queue identifier of the form `review_<millis>_<9 base36 chars>`
pub fn generate_review_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("review_{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// Accuracy metrics over all recorded feedback
pub fn calculate_metrics(records: &[AccuracyRecord]) -> AccuracyMetrics {
    let Some(overall) = percent_accurate(records) else {
        return AccuracyMetrics {
            overall_accuracy: 85,
            category_accuracy: CategoryAccuracy {
                diagnosis: 80,
                medication: 90,
                lifestyle: 95,
                emergency: 98,
            },
            demographic_accuracy: IndexMap::new(),
            regional_accuracy: IndexMap::new(),
            improvement_areas: vec![
                "Increase diagnostic accuracy".to_string(),
                "Improve cultural adaptation".to_string(),
            ],
            last_updated: Utc::now(),
        };
    };

    let [diagnosis, medication, lifestyle, emergency] = CATEGORIES.map(|category| {
        percent_accurate(records.iter().filter(|r| r.recommendation_id.contains(category))).unwrap_or(85)
    });
    let category_accuracy = CategoryAccuracy { diagnosis, medication, lifestyle, emergency };

    let mut demographic_accuracy: IndexMap<String, u32> = IndexMap::new();
    for (label, min, max) in AGE_GROUPS {
        let in_group = records
            .iter()
            .filter(|r| r.user_profile.age >= min && r.user_profile.age <= max);
        if let Some(percent) = percent_accurate(in_group) {
            demographic_accuracy.insert(label.to_string(), percent);
        }
    }

    let mut regional_accuracy: IndexMap<String, u32> = IndexMap::new();
    for record in records {
        let Some(region) = region_of(&record.user_profile.location) else { continue };
        if regional_accuracy.contains_key(region) {
            continue;
        }
        let in_region = records.iter().filter(|r| r.user_profile.location.contains(region));
        if let Some(percent) = percent_accurate(in_region) {
            regional_accuracy.insert(region.to_string(), percent);
        }
    }

    let mut improvement_areas = Vec::new();
    if category_accuracy.diagnosis < 85 {
        improvement_areas.push("Improve diagnostic accuracy".to_string());
    }
    if category_accuracy.medication < 90 {
        improvement_areas.push("Enhance medication recommendations".to_string());
    }
    if overall < 80 {
        improvement_areas.push("General accuracy improvement needed".to_string());
    }
    let inaccurate = records.iter().filter(|r| r.user_feedback == "inaccurate").count();
    if inaccurate as f64 > records.len() as f64 * 0.1 {
        improvement_areas.push("Address common inaccuracy patterns".to_string());
    }

    AccuracyMetrics {
        overall_accuracy: overall,
        category_accuracy,
        demographic_accuracy,
        regional_accuracy,
        improvement_areas,
        last_updated: Utc::now(),
    }
}

/// Knowledge base update lines for a batch of feedback, with the number of
/// verified professional corrections it contained
pub fn knowledge_base_updates(batch: &[AccuracyRecord]) -> (Vec<String>, usize) {
    let mut updates = Vec::new();

    let corrections: usize = batch
        .iter()
        .filter_map(|r| r.professional_verification.as_ref())
        .filter(|v| v.verified)
        .map(|v| v.corrections.len())
        .sum();
    if corrections > 0 {
        updates.push(format!(
            "Updated medical guidelines based on {} professional corrections",
            corrections
        ));
    }

    let mut by_region: IndexMap<&str, usize> = IndexMap::new();
    for record in batch {
        if let Some(region) = region_of(&record.user_profile.location) {
            *by_region.entry(region).or_default() += 1;
        }
    }
    for (region, count) in by_region {
        if count >= REGIONAL_THRESHOLD {
            updates.push(format!("Updated regional guidelines for {}", region));
        }
    }

    (updates, corrections)
}

/// Trait for accuracy tracking and the medical knowledge base
#[async_trait]
pub trait AccuracyServiceTrait {
    /// Record feedback; every tenth submission revises the knowledge base
    async fn submit_feedback(&self, feedback: AccuracyFeedback) -> Result<FeedbackRecorded, ServiceError>;

    /// Queue a recommendation for review by a specialist
    async fn request_specialist_review(
        &self,
        recommendation: String,
        user_case: String,
    ) -> Result<ReviewTicket, ServiceError>;

    async fn accuracy_metrics(&self) -> Result<AccuracyMetrics, ServiceError>;

    async fn knowledge_base_info(&self) -> Result<KnowledgeBaseInfo, ServiceError>;

    /// Revise a known guideline, bumping the knowledge base version
    async fn update_guideline(&self, guideline: &str) -> Result<GuidelineUpdate, ServiceError>;

    /// Dispatch a POST action
    async fn handle_action(&self, request: AccuracyActionRequest) -> Result<AccuracyActionResponse, ServiceError>;

    /// Read-only view selected by `GET ?type=`
    async fn view(&self, kind: Option<&str>) -> Result<AccuracyView, ServiceError>;
}

pub struct AccuracyService<R: AccuracyRepositoryTrait> {
    repository: R,
}

impl<R: AccuracyRepositoryTrait> AccuracyService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: AccuracyRepositoryTrait + Send + Sync> AccuracyServiceTrait for AccuracyService<R> {
    async fn submit_feedback(&self, feedback: AccuracyFeedback) -> Result<FeedbackRecorded, ServiceError> {
        let (record, total) = self.repository.add_feedback(feedback.into()).await?;
        info!(recommendation_id = %record.recommendation_id, total, "Accuracy feedback recorded");

        if total % UPDATE_INTERVAL != 0 {
            return Ok(FeedbackRecorded {
                success: true,
                message: "Feedback recorded successfully".to_string(),
                knowledge_base_updates: None,
                current_version: None,
            });
        }

        let batch = self.repository.get_recent_feedback(UPDATE_INTERVAL).await?;
        let (updates, corrections) = knowledge_base_updates(&batch);

        let mut state = self.repository.get_knowledge_base().await?;
        if corrections > 0 {
            state = self
                .repository
                .update_knowledge_base(KnowledgeBaseState {
                    version: increment_version(&state.version),
                    last_updated: Utc::now(),
                })
                .await?;
            info!(version = %state.version, corrections, "Knowledge base updated");
        }

        Ok(FeedbackRecorded {
            success: true,
            message: "Feedback recorded successfully".to_string(),
            knowledge_base_updates: Some(updates),
            current_version: Some(state.version),
        })
    }

    async fn request_specialist_review(
        &self,
        recommendation: String,
        user_case: String,
    ) -> Result<ReviewTicket, ServiceError> {
        let review = self
            .repository
            .create_review(SpecialistReviewRecord {
                id: generate_review_id(),
                ai_recommendation: recommendation,
                user_case,
                specialist_feedback: None,
                accuracy: 0,
                improvements: Vec::new(),
                status: "pending".to_string(),
                created_at: Utc::now(),
            })
            .await?;

        Ok(ReviewTicket {
            success: true,
            review_id: review.id,
            message: "Specialist review requested".to_string(),
            estimated_time: "24-48 hours".to_string(),
        })
    }

    async fn accuracy_metrics(&self) -> Result<AccuracyMetrics, ServiceError> {
        let records = self.repository.get_all_feedback().await?;
        Ok(calculate_metrics(&records))
    }

    async fn knowledge_base_info(&self) -> Result<KnowledgeBaseInfo, ServiceError> {
        let state = self.repository.get_knowledge_base().await?;
        let total_feedback = self.repository.get_all_feedback().await?.len();
        let pending_reviews = self
            .repository
            .get_reviews()
            .await?
            .iter()
            .filter(|r| r.status == "pending")
            .count();

        Ok(KnowledgeBaseInfo {
            version: state.version,
            last_updated: state.last_updated,
            guidelines: GUIDELINE_NAMES.iter().map(|g| g.to_string()).collect(),
            total_feedback,
            pending_reviews,
        })
    }

    async fn update_guideline(&self, guideline: &str) -> Result<GuidelineUpdate, ServiceError> {
        if !GUIDELINE_NAMES.contains(&guideline) {
            warn!(guideline, "Unknown guideline");
            return Err(ServiceError::NotFound("Guideline not found".to_string()));
        }

        let state = self.repository.get_knowledge_base().await?;
        let state = self
            .repository
            .update_knowledge_base(KnowledgeBaseState {
                version: increment_version(&state.version),
                last_updated: Utc::now(),
            })
            .await?;

        Ok(GuidelineUpdate {
            success: true,
            message: format!("Guidelines updated for {}", guideline),
            new_version: state.version,
        })
    }

    async fn handle_action(&self, request: AccuracyActionRequest) -> Result<AccuracyActionResponse, ServiceError> {
        match request.action.as_str() {
            "submit_feedback" => {
                let feedback = request
                    .feedback
                    .ok_or_else(|| ServiceError::Validation("Feedback is required".to_string()))?;
                Ok(AccuracyActionResponse::FeedbackRecorded(self.submit_feedback(feedback).await?))
            }
            "request_specialist_review" => {
                let ticket = self
                    .request_specialist_review(
                        request.recommendation.unwrap_or_default(),
                        request.user_case.unwrap_or_default(),
                    )
                    .await?;
                Ok(AccuracyActionResponse::ReviewRequested(ticket))
            }
            "get_accuracy_metrics" => Ok(AccuracyActionResponse::Metrics(self.accuracy_metrics().await?)),
            "get_knowledge_base_info" => Ok(AccuracyActionResponse::KnowledgeBase(self.knowledge_base_info().await?)),
            "update_guidelines" => {
                let guideline = request.guideline.unwrap_or_default();
                Ok(AccuracyActionResponse::GuidelineUpdated(self.update_guideline(&guideline).await?))
            }
            other => {
                warn!(action = %other, "Unknown accuracy action");
                Err(ServiceError::Validation("Invalid action".to_string()))
            }
        }
    }

    async fn view(&self, kind: Option<&str>) -> Result<AccuracyView, ServiceError> {
        match kind {
            Some("metrics") => Ok(AccuracyView::Metrics(self.accuracy_metrics().await?)),
            Some("guidelines") => {
                let state = self.repository.get_knowledge_base().await?;
                Ok(AccuracyView::Guidelines(GuidelinesDocument {
                    guidelines: &MEDICAL_GUIDELINES,
                    version: state.version,
                    last_updated: state.last_updated,
                }))
            }
            Some("specialist_queue") => {
                let reviews = self.repository.get_reviews().await?;
                let count = |status: &str| reviews.iter().filter(|r| r.status == status).count();
                Ok(AccuracyView::SpecialistQueue(SpecialistQueue {
                    pending: count("pending"),
                    reviewed: count("reviewed"),
                    approved: count("approved"),
                    queue: reviews.iter().take(10).cloned().map(SpecialistReview::from).collect(),
                }))
            }
            _ => {
                let state = self.repository.get_knowledge_base().await?;
                let records = self.repository.get_all_feedback().await?;
                Ok(AccuracyView::Summary(AccuracySummary {
                    message: "AI Accuracy Enhancement System".to_string(),
                    version: state.version,
                    last_updated: state.last_updated,
                    total_feedback: records.len(),
                    overall_accuracy: calculate_metrics(&records).overall_accuracy,
                }))
            }
        }
    }
}

/// Create the accuracy service over the default repository
pub fn create_default_accuracy_service() -> impl AccuracyServiceTrait + Send + Sync {
    AccuracyService::new(my_medi_data::repository::AccuracyRepository::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::accuracy::{PatientProfile, Verification};
    use my_medi_data::models::accuracy::{AccuracyProfile, ProfessionalVerification};
    use my_medi_data::repository::mocks::MockAccuracyRepository;

    fn record(id: &str, feedback: &str, age: f64, location: &str) -> AccuracyRecord {
        AccuracyRecord {
            id: id.to_string(),
            recommendation_id: id.to_string(),
            user_feedback: feedback.to_string(),
            actual_outcome: None,
            professional_verification: None,
            user_profile: AccuracyProfile {
                age,
                gender: "female".to_string(),
                location: location.to_string(),
                medical_history: Vec::new(),
            },
            timestamp: None,
            created_at: Utc::now(),
        }
    }

    fn feedback(location: &str, verified_corrections: usize) -> AccuracyFeedback {
        AccuracyFeedback {
            recommendation_id: "rec_lifestyle_1".to_string(),
            user_feedback: "accurate".to_string(),
            actual_outcome: None,
            professional_verification: (verified_corrections > 0).then(|| Verification {
                verified: true,
                doctor_feedback: "ok".to_string(),
                corrections: vec!["adjust dose".to_string(); verified_corrections],
            }),
            user_profile: PatientProfile {
                age: 40.0,
                gender: "male".to_string(),
                location: location.to_string(),
                medical_history: Vec::new(),
            },
            timestamp: None,
        }
    }

    #[test]
    fn test_increment_version() {
        assert_eq!(increment_version("1.0.0"), "1.0.1");
        assert_eq!(increment_version("2.3.9"), "2.3.10");
    }

    #[test]
    fn test_review_id_shape() {
        let id = generate_review_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "review");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_baseline_metrics_without_data() {
        let metrics = calculate_metrics(&[]);
        assert_eq!(metrics.overall_accuracy, 85);
        assert_eq!(metrics.category_accuracy.emergency, 98);
        assert_eq!(metrics.improvement_areas, vec!["Increase diagnostic accuracy", "Improve cultural adaptation"]);
    }

    #[test]
    fn test_metrics_breakdown() {
        let records = vec![
            record("rec_diagnosis_1", "accurate", 25.0, "Mumbai, Maharashtra"),
            record("rec_diagnosis_2", "inaccurate", 45.0, "Pune, Maharashtra"),
            record("rec_medication_1", "partially_accurate", 60.0, "Chennai, Tamil Nadu"),
            record("rec_medication_2", "harmful", 75.0, "Delhi"),
        ];
        let metrics = calculate_metrics(&records);

        assert_eq!(metrics.overall_accuracy, 50);
        assert_eq!(metrics.category_accuracy.diagnosis, 50);
        assert_eq!(metrics.category_accuracy.medication, 50);
        assert_eq!(metrics.category_accuracy.lifestyle, 85);
        assert_eq!(metrics.demographic_accuracy.get("18-30"), Some(&100));
        assert_eq!(metrics.demographic_accuracy.get("70+"), Some(&0));
        assert_eq!(metrics.regional_accuracy.get("Maharashtra"), Some(&50));
        assert_eq!(metrics.regional_accuracy.get("Tamil Nadu"), Some(&100));
        assert_eq!(metrics.regional_accuracy.len(), 2);
        assert_eq!(
            metrics.improvement_areas,
            vec![
                "Improve diagnostic accuracy",
                "Enhance medication recommendations",
                "General accuracy improvement needed",
                "Address common inaccuracy patterns",
            ]
        );
    }

    #[test]
    fn test_knowledge_base_updates_need_corrections_and_regional_volume() {
        let mut batch: Vec<AccuracyRecord> = (0..5)
            .map(|i| record(&format!("r{}", i), "accurate", 30.0, "Jaipur, Rajasthan"))
            .collect();
        batch.push(record("r5", "accurate", 30.0, "Kochi, Kerala"));
        batch[0].professional_verification = Some(ProfessionalVerification {
            verified: true,
            doctor_feedback: String::new(),
            corrections: vec!["a".to_string(), "b".to_string()],
        });

        let (updates, corrections) = knowledge_base_updates(&batch);
        assert_eq!(corrections, 2);
        assert_eq!(
            updates,
            vec![
                "Updated medical guidelines based on 2 professional corrections",
                "Updated regional guidelines for Rajasthan",
            ]
        );
    }

    #[tokio::test]
    async fn test_tenth_submission_updates_knowledge_base() {
        let service = AccuracyService::new(MockAccuracyRepository::new());

        for _ in 0..9 {
            let recorded = service.submit_feedback(feedback("Jaipur, Rajasthan", 0)).await.unwrap();
            assert!(recorded.knowledge_base_updates.is_none());
        }

        let recorded = service.submit_feedback(feedback("Jaipur, Rajasthan", 1)).await.unwrap();
        assert_eq!(recorded.current_version.as_deref(), Some("1.0.1"));
        let updates = recorded.knowledge_base_updates.unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1], "Updated regional guidelines for Rajasthan");
    }

    #[tokio::test]
    async fn test_specialist_review_is_queued() {
        let service = AccuracyService::new(MockAccuracyRepository::new());
        let ticket = service
            .request_specialist_review("Take rest".to_string(), "Fever for 3 days".to_string())
            .await
            .unwrap();
        assert!(ticket.review_id.starts_with("review_"));
        assert_eq!(ticket.estimated_time, "24-48 hours");

        let info = service.knowledge_base_info().await.unwrap();
        assert_eq!(info.pending_reviews, 1);
        assert_eq!(info.guidelines, vec!["fever_management", "hypertension_india", "diabetes_management"]);

        match service.view(Some("specialist_queue")).await.unwrap() {
            AccuracyView::SpecialistQueue(queue) => {
                assert_eq!(queue.pending, 1);
                assert_eq!(queue.queue[0].status, "pending");
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_guideline() {
        let service = AccuracyService::new(MockAccuracyRepository::new());
        let update = service.update_guideline("diabetes_management").await.unwrap();
        assert_eq!(update.new_version, "1.0.1");
        assert_eq!(update.message, "Guidelines updated for diabetes_management");

        let missing = service.update_guideline("asthma_protocol").await;
        assert!(matches!(missing, Err(ServiceError::NotFound(msg)) if msg == "Guideline not found"));
    }

    #[tokio::test]
    async fn test_handle_action_rejects_unknown() {
        let service = AccuracyService::new(MockAccuracyRepository::new());
        let request = AccuracyActionRequest {
            action: "retrain".to_string(),
            ..Default::default()
        };
        assert!(matches!(service.handle_action(request).await, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_guidelines_serialize_in_declaration_order() {
        let value = serde_json::to_string(&MEDICAL_GUIDELINES).unwrap();
        let fever = value.find("fever_management").unwrap();
        let diabetes = value.find("diabetes_management").unwrap();
        assert!(fever < diabetes);
        assert!(value.contains("Include millets"));
    }
}
