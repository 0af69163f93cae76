use async_trait::async_trait;
use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::entities::feedback::{
    FeedbackAnalytics, FeedbackEntry, FeedbackReceipt, FeedbackSubmission, LearningPatterns,
};
use crate::error::ServiceError;
use my_medi_data::models::feedback::{CreateFeedbackRequest, FeedbackRecord};
use my_medi_data::repository::FeedbackRepositoryTrait;

const BASE_INSIGHTS: &[&str] = &[
    "Your feedback helps our AI better understand Indian healthcare preferences.",
    "We're learning that this type of recommendation works well for your demographic.",
    "Your input contributes to making AI more culturally sensitive for Indian patients.",
    "This feedback helps us improve recommendations for your region and age group.",
    "Thank you! Your feedback makes our AI smarter for future Indian patients.",
];

const THANK_YOU: &str = "Thank you for your feedback! It helps improve our AI for Indian patients.";

/// Age bracket used to group feedback
pub fn age_group(age: f64) -> &'static str {
    if age < 18.0 {
        "child"
    } else if age < 30.0 {
        "young_adult"
    } else if age < 50.0 {
        "middle_aged"
    } else if age < 65.0 {
        "senior"
    } else {
        "elderly"
    }
}

/// Ways to improve recommendations shown in a given context
pub fn improvement_suggestions(context: &str) -> Vec<String> {
    let suggestions: &[&str] = match context {
        "explanation" => &[
            "Use simpler language and more examples",
            "Include more visual analogies",
            "Add regional context and local examples",
            "Provide step-by-step explanations",
        ],
        "cultural" => &[
            "Include more Ayurvedic alternatives",
            "Consider regional dietary preferences",
            "Add family involvement strategies",
            "Include economic alternatives",
        ],
        "suggestions" => &[
            "Make questions more specific to Indian context",
            "Include culturally relevant examples",
            "Consider regional health patterns",
            "Add preventive care suggestions",
        ],
        _ => &["Continue improving based on user feedback"],
    };
    suggestions.iter().map(|s| s.to_string()).collect()
}

/// Candidate insights for a helpful vote, extended by the user's profile
pub fn learning_insights(submission: &FeedbackSubmission) -> Vec<&'static str> {
    let mut insights = BASE_INSIGHTS.to_vec();
    if let Some(profile) = &submission.user_profile {
        if profile.diet.as_deref() == Some("vegetarian") {
            insights.push("Your feedback helps us better serve vegetarian patients in India.");
        }
        if profile.family_type.as_deref() == Some("joint") {
            insights.push("Your input helps us understand joint family healthcare dynamics better.");
        }
        if profile.economic_status.as_deref() == Some("low") {
            insights.push("Your feedback helps us provide more affordable healthcare recommendations.");
        }
    }
    insights
}

/// Group stored feedback into learning patterns
pub fn learning_patterns(records: &[FeedbackRecord]) -> LearningPatterns {
    let mut patterns = LearningPatterns::default();

    for record in records {
        match record.feedback_type.as_str() {
            "helpful" => {
                match record.context.as_str() {
                    "explanation" => patterns.helpful_explanations.push(record.recommendation.clone()),
                    "cultural" => patterns.preferred_cultural_adaptations.push(record.recommendation.clone()),
                    _ => {}
                }

                let Some(profile) = &record.user_profile else { continue };
                if let Some(location) = profile.location.as_ref().filter(|l| !l.is_empty()) {
                    patterns
                        .regional_preferences
                        .entry(location.clone())
                        .or_default()
                        .push(record.recommendation.clone());
                }
                if let Some(age) = profile.age.filter(|age| *age > 0.0) {
                    patterns
                        .age_group_preferences
                        .entry(age_group(age).to_string())
                        .or_default()
                        .push(record.recommendation.clone());
                }
            }
            "not_helpful" if record.context == "explanation" => {
                patterns.unhelpful_explanations.push(record.recommendation.clone());
            }
            _ => {}
        }
    }

    patterns
}

/// Trait for recommendation feedback operations
#[async_trait]
pub trait FeedbackServiceTrait {
    /// Validate and store feedback, returning the thank-you message and a learning insight
    async fn submit(&self, submission: FeedbackSubmission) -> Result<FeedbackReceipt, ServiceError>;

    /// Aggregate statistics over all stored feedback
    async fn analytics(&self) -> Result<FeedbackAnalytics, ServiceError>;
}

pub struct FeedbackService<R: FeedbackRepositoryTrait> {
    repository: R,
}

impl<R: FeedbackRepositoryTrait> FeedbackService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

#[async_trait]
impl<R: FeedbackRepositoryTrait + Send + Sync> FeedbackServiceTrait for FeedbackService<R> {
    async fn submit(&self, submission: FeedbackSubmission) -> Result<FeedbackReceipt, ServiceError> {
        let (Some(feedback_type), Some(context), Some(recommendation)) = (
            non_empty(&submission.feedback_type),
            non_empty(&submission.context),
            non_empty(&submission.recommendation),
        ) else {
            warn!("Rejected feedback with missing type, context or recommendation");
            return Err(ServiceError::Validation("Invalid feedback data".to_string()));
        };

        let learning_insight = match feedback_type.as_str() {
            "helpful" => learning_insights(&submission)
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(BASE_INSIGHTS[0])
                .to_string(),
            "not_helpful" => "Thank you for the feedback. We'll improve this type of recommendation.".to_string(),
            _ => "Feedback recorded successfully.".to_string(),
        };

        let improvements = improvement_suggestions(&context);

        info!(
            feedback_type = %feedback_type,
            context = %context,
            profile = ?submission.user_profile,
            timestamp = ?submission.timestamp,
            improvements = ?improvements,
            "AI feedback received"
        );

        self.repository
            .create(CreateFeedbackRequest {
                feedback_type,
                context,
                recommendation,
                user_profile: submission.user_profile.map(Into::into),
                rating: submission.rating,
                comment: submission.comment,
                timestamp: submission.timestamp,
            })
            .await?;

        Ok(FeedbackReceipt {
            success: true,
            message: THANK_YOU.to_string(),
            learning_insight,
            improvements,
        })
    }

    async fn analytics(&self) -> Result<FeedbackAnalytics, ServiceError> {
        let records = self.repository.get_all().await?;

        let ratings: Vec<f64> = records
            .iter()
            .filter_map(|r| r.rating)
            .filter(|rating| *rating != 0.0)
            .collect();
        let average_rating = if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
        };

        let recent_start = records.len().saturating_sub(10);

        Ok(FeedbackAnalytics {
            total_feedback: records.len(),
            helpful_count: records.iter().filter(|r| r.feedback_type == "helpful").count(),
            unhelpful_count: records.iter().filter(|r| r.feedback_type == "not_helpful").count(),
            average_rating,
            learning_patterns: learning_patterns(&records),
            recent_feedback: records[recent_start..]
                .iter()
                .cloned()
                .map(FeedbackEntry::from)
                .collect(),
        })
    }
}

/// Create the feedback service over the default repository
pub fn create_default_feedback_service() -> impl FeedbackServiceTrait + Send + Sync {
    FeedbackService::new(my_medi_data::repository::FeedbackRepository::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::feedback::FeedbackUserProfile;
    use my_medi_data::repository::mocks::MockFeedbackRepository;

    fn submission(feedback_type: &str, context: &str) -> FeedbackSubmission {
        FeedbackSubmission {
            feedback_type: Some(feedback_type.to_string()),
            context: Some(context.to_string()),
            recommendation: Some("Drink warm water with turmeric".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_age_groups() {
        assert_eq!(age_group(10.0), "child");
        assert_eq!(age_group(17.5), "child");
        assert_eq!(age_group(18.0), "young_adult");
        assert_eq!(age_group(29.9), "young_adult");
        assert_eq!(age_group(30.0), "middle_aged");
        assert_eq!(age_group(64.0), "senior");
        assert_eq!(age_group(65.0), "elderly");
    }

    #[test]
    fn test_insights_extend_with_profile() {
        let mut sub = submission("helpful", "cultural");
        sub.user_profile = Some(FeedbackUserProfile {
            diet: Some("vegetarian".to_string()),
            family_type: Some("joint".to_string()),
            economic_status: Some("middle".to_string()),
            ..Default::default()
        });
        assert_eq!(learning_insights(&sub).len(), 7);
    }

    #[test]
    fn test_unknown_context_gets_generic_improvement() {
        assert_eq!(improvement_suggestions("other"), vec!["Continue improving based on user feedback"]);
        assert_eq!(improvement_suggestions("cultural").len(), 4);
    }

    #[tokio::test]
    async fn test_submit_rejects_missing_fields() {
        let service = FeedbackService::new(MockFeedbackRepository::new());
        let mut sub = submission("helpful", "explanation");
        sub.recommendation = Some(String::new());

        let result = service.submit(sub).await;
        assert!(matches!(result, Err(ServiceError::Validation(msg)) if msg == "Invalid feedback data"));
    }

    #[tokio::test]
    async fn test_submit_helpful_returns_known_insight() {
        let service = FeedbackService::new(MockFeedbackRepository::new());
        let receipt = service.submit(submission("helpful", "explanation")).await.unwrap();

        assert!(receipt.success);
        assert_eq!(receipt.message, THANK_YOU);
        assert!(BASE_INSIGHTS.contains(&receipt.learning_insight.as_str()));
        assert_eq!(receipt.improvements.len(), 4);
    }

    #[tokio::test]
    async fn test_submit_not_helpful_and_rating_messages() {
        let service = FeedbackService::new(MockFeedbackRepository::new());
        let receipt = service.submit(submission("not_helpful", "explanation")).await.unwrap();
        assert_eq!(receipt.learning_insight, "Thank you for the feedback. We'll improve this type of recommendation.");

        let receipt = service.submit(submission("rating", "suggestions")).await.unwrap();
        assert_eq!(receipt.learning_insight, "Feedback recorded successfully.");
    }

    #[tokio::test]
    async fn test_submit_propagates_storage_failure() {
        let service = FeedbackService::new(MockFeedbackRepository::failing());
        let result = service.submit(submission("helpful", "explanation")).await;
        assert!(matches!(result, Err(ServiceError::Repository(_))));
    }

    #[tokio::test]
    async fn test_analytics_over_stored_feedback() {
        let service = FeedbackService::new(MockFeedbackRepository::new());

        let analytics = service.analytics().await.unwrap();
        assert_eq!(analytics.total_feedback, 0);
        assert_eq!(analytics.average_rating, None);

        let mut helpful = submission("helpful", "explanation");
        helpful.user_profile = Some(FeedbackUserProfile {
            age: Some(34.0),
            location: Some("Pune, Maharashtra".to_string()),
            ..Default::default()
        });
        helpful.rating = Some(4.0);
        service.submit(helpful).await.unwrap();

        let mut rated = submission("rating", "suggestions");
        rated.rating = Some(2.0);
        service.submit(rated).await.unwrap();

        service.submit(submission("not_helpful", "explanation")).await.unwrap();

        let analytics = service.analytics().await.unwrap();
        assert_eq!(analytics.total_feedback, 3);
        assert_eq!(analytics.helpful_count, 1);
        assert_eq!(analytics.unhelpful_count, 1);
        assert_eq!(analytics.average_rating, Some(3.0));
        assert_eq!(analytics.learning_patterns.helpful_explanations.len(), 1);
        assert_eq!(analytics.learning_patterns.unhelpful_explanations.len(), 1);
        assert!(analytics.learning_patterns.regional_preferences.contains_key("Pune, Maharashtra"));
        assert!(analytics.learning_patterns.age_group_preferences.contains_key("middle_aged"));
        assert_eq!(analytics.recent_feedback.len(), 3);
    }
}
