use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Rule-based analysis
        crate::api::handlers::live_analysis::live_analysis,
        crate::api::handlers::safety_monitor::safety_monitor,
        crate::api::handlers::form_helper::form_helper,

        // Learning loops
        crate::api::handlers::feedback::submit_feedback,
        crate::api::handlers::feedback::feedback_analytics,
        crate::api::handlers::accuracy::accuracy_action,
        crate::api::handlers::accuracy::accuracy_view,

        // Location
        crate::api::handlers::location::location_lookup,
        crate::api::handlers::location::validate_maps_key,

        // Text generation backed endpoints
        crate::api::handlers::assistant::assistant,
        crate::api::handlers::assistant::health_assessment,
        crate::api::handlers::analyzers::symptom_analyzer,
        crate::api::handlers::analyzers::medication_analyzer,
        crate::api::handlers::ocr::extract_report_text,

        // Planning
        crate::api::handlers::weight_plan::weight_loss_plan,
        crate::api::handlers::pregnancy::pregnancy_report
    ),
    components(
        schemas(
            // Common bodies
            crate::entities::common::ErrorResponse,
            crate::entities::common::MessageError,
            crate::entities::common::StatusMessage,
            crate::api::handlers::analyzers::AiErrorResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Live analysis
            my_medi_domain::entities::live_analysis::PersonalInfo,
            my_medi_domain::entities::live_analysis::Lifestyle,
            my_medi_domain::entities::live_analysis::LiveAnalysisRequest,
            my_medi_domain::entities::live_analysis::LiveAnalysisResponse,
            my_medi_domain::entities::live_analysis::RiskLevel,
            my_medi_domain::entities::live_analysis::Urgency,
            my_medi_domain::entities::live_analysis::Impact,
            my_medi_domain::entities::live_analysis::EmergencyAlert,
            my_medi_domain::entities::live_analysis::MedicationRecommendation,
            my_medi_domain::entities::live_analysis::Recommendations,
            my_medi_domain::entities::live_analysis::RiskFactor,
            my_medi_domain::entities::live_analysis::AiReasoning,

            // Safety monitor
            my_medi_domain::entities::safety::ResponseType,
            my_medi_domain::entities::safety::SafetyUserProfile,
            my_medi_domain::entities::safety::SafetyAssessmentRequest,
            my_medi_domain::entities::safety::SafetyLevel,
            my_medi_domain::entities::safety::AccuracyIndicators,
            my_medi_domain::entities::safety::EmergencyProtocol,
            my_medi_domain::entities::safety::SafetyAssessment,

            // Form helper
            my_medi_domain::entities::form_helper::FormHelperRequest,
            my_medi_domain::entities::form_helper::FormValidation,

            // Feedback
            my_medi_domain::entities::feedback::FeedbackUserProfile,
            my_medi_domain::entities::feedback::FeedbackSubmission,
            my_medi_domain::entities::feedback::FeedbackReceipt,
            my_medi_domain::entities::feedback::FeedbackEntry,
            my_medi_domain::entities::feedback::LearningPatterns,
            my_medi_domain::entities::feedback::FeedbackAnalytics,

            // Accuracy
            my_medi_domain::entities::accuracy::Verification,
            my_medi_domain::entities::accuracy::PatientProfile,
            my_medi_domain::entities::accuracy::AccuracyFeedback,
            my_medi_domain::entities::accuracy::AccuracyActionRequest,
            my_medi_domain::entities::accuracy::CategoryAccuracy,
            my_medi_domain::entities::accuracy::AccuracyMetrics,
            my_medi_domain::entities::accuracy::FeedbackRecorded,
            my_medi_domain::entities::accuracy::ReviewTicket,
            my_medi_domain::entities::accuracy::KnowledgeBaseInfo,
            my_medi_domain::entities::accuracy::GuidelineUpdate,
            my_medi_domain::entities::accuracy::SpecialistReview,
            my_medi_domain::entities::accuracy::SpecialistQueue,
            my_medi_domain::entities::accuracy::AccuracySummary,

            // Location
            my_medi_domain::entities::location::Coordinates,
            my_medi_domain::entities::location::LocationRequest,
            my_medi_domain::entities::location::LocationInfo,
            my_medi_domain::entities::location::FacilityHours,
            my_medi_domain::entities::location::FacilityGeometry,
            my_medi_domain::entities::location::HealthcareFacility,
            my_medi_domain::entities::location::LocationLookup,
            my_medi_domain::entities::location::ApiProbe,
            my_medi_domain::entities::location::ProbeResults,
            my_medi_domain::entities::location::SetupStep,
            my_medi_domain::entities::location::MapsValidation,

            // Analyzers and reports
            my_medi_domain::entities::assistant::AssessmentAdvice,
            my_medi_domain::entities::analyzer::SymptomAnalysisRequest,
            my_medi_domain::entities::analyzer::MedicationAnalysisRequest,
            my_medi_domain::entities::analyzer::AnalysisEnvelope,
            my_medi_domain::entities::report::ExtractedReport,

            // Planning
            my_medi_domain::entities::weight_plan::WeightPlanRequest,
            my_medi_domain::entities::weight_plan::PlanRiskLevel,
            my_medi_domain::entities::weight_plan::BmiSummary,
            my_medi_domain::entities::weight_plan::CaloriePlan,
            my_medi_domain::entities::weight_plan::Milestone,
            my_medi_domain::entities::weight_plan::Timeline,
            my_medi_domain::entities::weight_plan::DietPlan,
            my_medi_domain::entities::weight_plan::ExercisePlan,
            my_medi_domain::entities::weight_plan::PlanRiskAssessment,
            my_medi_domain::entities::weight_plan::FollowUpPlan,
            my_medi_domain::entities::weight_plan::WeightPlan,
            my_medi_domain::services::bmi::BmiCategory,
            my_medi_domain::entities::pregnancy::PregnancyRequest,
            my_medi_domain::entities::pregnancy::TrimesterProgress,
            my_medi_domain::entities::pregnancy::PregnancyReport
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "analysis", description = "Rule-based symptom scoring, answer safety checks and form assistance"),
        (name = "feedback", description = "Recommendation feedback and learning analytics"),
        (name = "accuracy", description = "Outcome tracking, specialist review and medical guidelines"),
        (name = "location", description = "Nearby healthcare facilities and maps key checks"),
        (name = "assistant", description = "Chat assistant and health assessment advice"),
        (name = "analyzers", description = "Generated symptom and medication analyses"),
        (name = "reports", description = "Text extraction from report photos"),
        (name = "planning", description = "Weight loss and pregnancy plans")
    ),
    info(
        title = "MyMedi API",
        version = "0.1.0",
        description = "Health information API for Indian patients and families",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_generation() {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "MyMedi API");
        assert_eq!(openapi.info.version, "0.1.0");

        let tags = openapi.tags.as_ref().expect("tags are defined");
        assert!(tags.iter().any(|tag| tag.name == "health"));
        assert!(tags.iter().any(|tag| tag.name == "planning"));

        for path in [
            "/health",
            "/api/live-ai-analysis",
            "/api/ai-feedback",
            "/api/ai-accuracy-enhancement",
            "/api/location/validate",
            "/api/ocr",
            "/api/pregnancy",
        ] {
            assert!(openapi.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
