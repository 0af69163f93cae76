// Domain services
// This module contains business logic implementations.

pub mod accuracy;
pub mod ai_reply;
pub mod assistant;
pub mod bmi;
pub mod cities;
pub mod feedback;
pub mod form_helper;
pub mod live_analysis;
pub mod location;
pub mod medication_analyzer;
pub mod pregnancy;
pub mod report_reader;
pub mod safety_monitor;
pub mod symptom_analyzer;
pub mod weight_plan;

// Re-export service traits and factory functions
pub use accuracy::{create_default_accuracy_service, AccuracyServiceTrait};
pub use assistant::{create_default_assistant_service, AssistantServiceTrait};
pub use cities::{create_default_city_service, CityServiceTrait};
pub use feedback::{create_default_feedback_service, FeedbackServiceTrait};
pub use form_helper::{create_default_form_helper_service, FormHelperServiceTrait};
pub use live_analysis::{create_default_live_analysis_service, LiveAnalysisServiceTrait};
pub use location::{create_default_location_service, LocationServiceTrait};
pub use medication_analyzer::{create_default_medication_analyzer_service, MedicationAnalyzerServiceTrait};
pub use pregnancy::{create_default_pregnancy_service, PregnancyServiceTrait};
pub use report_reader::{create_default_report_reader_service, ReportReaderServiceTrait};
pub use safety_monitor::{create_default_safety_monitor_service, SafetyMonitorServiceTrait};
pub use symptom_analyzer::{create_default_symptom_analyzer_service, SymptomAnalyzerServiceTrait};
pub use weight_plan::{create_default_weight_plan_service, WeightPlanServiceTrait};
