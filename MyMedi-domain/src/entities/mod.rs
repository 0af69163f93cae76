// Domain entities and value objects
pub mod accuracy;
pub mod analyzer;
pub mod assistant;
pub mod city;
pub mod feedback;
pub mod form_helper;
pub mod live_analysis;
pub mod location;
pub mod pregnancy;
pub mod report;
pub mod safety;
pub mod weight_plan;

// Re-export common types for easier imports
pub use live_analysis::{LiveAnalysisRequest, LiveAnalysisResponse, RiskLevel, Urgency};
pub use safety::{SafetyAssessment, SafetyAssessmentRequest, SafetyLevel};
