// Storage models
pub mod accuracy;
pub mod feedback;
