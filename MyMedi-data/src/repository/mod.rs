// Repository module structure
pub mod errors;
mod accuracy;
mod feedback;
mod in_memory;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use accuracy::{AccuracyRepository, AccuracyRepositoryTrait};
pub use feedback::{FeedbackRepository, FeedbackRepositoryTrait};

// Re-export mock repositories for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub mod mocks {
    pub use super::accuracy::tests::MockAccuracyRepository;
    pub use super::feedback::tests::MockFeedbackRepository;
}
