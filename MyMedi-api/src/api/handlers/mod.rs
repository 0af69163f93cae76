pub mod accuracy;
pub mod analyzers;
pub mod assistant;
pub mod feedback;
pub mod form_helper;
pub mod health;
pub mod live_analysis;
pub mod location;
pub mod ocr;
pub mod pregnancy;
pub mod safety_monitor;
pub mod weight_plan;

// Re-export handlers for easier imports
pub use accuracy::{accuracy_action, accuracy_view};
pub use analyzers::{medication_analyzer, symptom_analyzer};
pub use assistant::{assistant, health_assessment};
pub use feedback::{feedback_analytics, submit_feedback};
pub use form_helper::form_helper;
pub use health::health_check;
pub use live_analysis::live_analysis;
pub use location::{location_lookup, validate_maps_key};
pub use ocr::extract_report_text;
pub use pregnancy::pregnancy_report;
pub use safety_monitor::safety_monitor;
pub use weight_plan::weight_loss_plan;
