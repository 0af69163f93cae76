use thiserror::Error;

use my_medi_data::repository::RepositoryError;
use crate::clients::generation::GenerationError;
use crate::clients::maps::MapsError;

/// Errors returned by domain services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request data failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Requested item does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage layer failure
    #[error("Repository error: {0}")]
    Repository(String),

    /// Text generation or maps provider failure
    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        ServiceError::Repository(err.to_string())
    }
}

impl From<GenerationError> for ServiceError {
    fn from(err: GenerationError) -> Self {
        ServiceError::Upstream(err.to_string())
    }
}

impl From<MapsError> for ServiceError {
    fn from(err: MapsError) -> Self {
        ServiceError::Upstream(err.to_string())
    }
}
