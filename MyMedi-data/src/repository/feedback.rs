use chrono::Utc;
use tracing::{debug, error};
use uuid::Uuid;
use async_trait::async_trait;

use crate::models::feedback::{CreateFeedbackRequest, FeedbackRecord};
use crate::database::{get_db_pool, DatabaseError, DatabasePool};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;

/// Repository trait for recommendation feedback
#[async_trait]
pub trait FeedbackRepositoryTrait {
    /// Store a new feedback entry
    async fn create(&self, request: CreateFeedbackRequest) -> Result<FeedbackRecord, RepositoryError>;

    /// Get all feedback entries, oldest first
    async fn get_all(&self) -> Result<Vec<FeedbackRecord>, RepositoryError>;
}

/// Repository for recommendation feedback.
/// Uses the SQLite pool when one is available and falls back to memory otherwise.
#[derive(Debug, Clone, Default)]
pub struct FeedbackRepository {
    storage: InMemoryStorage,
    pool: Option<DatabasePool>,
}

impl FeedbackRepository {
    /// Create a repository backed by the global database pool
    pub fn new() -> Self {
        Self {
            storage: InMemoryStorage::new(),
            pool: None,
        }
    }

    /// Create a repository bound to a specific pool
    pub fn with_pool(pool: DatabasePool) -> Self {
        Self {
            storage: InMemoryStorage::new(),
            pool: Some(pool),
        }
    }

    fn pool(&self) -> Result<DatabasePool, DatabaseError> {
        match &self.pool {
            Some(pool) => Ok(pool.clone()),
            None => get_db_pool(),
        }
    }
}

#[async_trait]
impl FeedbackRepositoryTrait for FeedbackRepository {
    async fn create(&self, request: CreateFeedbackRequest) -> Result<FeedbackRecord, RepositoryError> {
        let record = FeedbackRecord {
            id: Uuid::new_v4().to_string(),
            feedback_type: request.feedback_type,
            context: request.context,
            recommendation: request.recommendation,
            user_profile: request.user_profile,
            rating: request.rating,
            comment: request.comment,
            timestamp: request.timestamp,
            created_at: Utc::now(),
        };

        match self.pool() {
            Ok(pool) => match DatabaseStorage::store_feedback(&pool, &record).await {
                Ok(_) => Ok(record),
                Err(e) => {
                    error!("Failed to store feedback in database: {}", e);
                    self.storage.store_feedback(&record).await
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.store_feedback(&record).await
            }
        }
    }

    async fn get_all(&self) -> Result<Vec<FeedbackRecord>, RepositoryError> {
        match self.pool() {
            Ok(pool) => match DatabaseStorage::get_all_feedback(&pool).await {
                Ok(records) => Ok(records),
                Err(e) => {
                    error!("Failed to get feedback from database: {}", e);
                    self.storage.get_all_feedback().await
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for get_all", e);
                self.storage.get_all_feedback().await
            }
        }
    }
}

/// Mock feedback repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock implementation of FeedbackRepository that keeps entries in a vector
    #[derive(Debug, Clone, Default)]
    pub struct MockFeedbackRepository {
        records: Arc<Mutex<Vec<FeedbackRecord>>>,
        fail: bool,
    }

    impl MockFeedbackRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository that fails every call
        pub fn failing() -> Self {
            Self { fail: true, ..Self::default() }
        }
    }

    #[async_trait]
    impl FeedbackRepositoryTrait for MockFeedbackRepository {
        async fn create(&self, request: CreateFeedbackRequest) -> Result<FeedbackRecord, RepositoryError> {
            if self.fail {
                return Err(RepositoryError::Lock("mock failure".to_string()));
            }

            let record = FeedbackRecord {
                id: Uuid::new_v4().to_string(),
                feedback_type: request.feedback_type,
                context: request.context,
                recommendation: request.recommendation,
                user_profile: request.user_profile,
                rating: request.rating,
                comment: request.comment,
                timestamp: request.timestamp,
                created_at: Utc::now(),
            };
            self.records.lock()?.push(record.clone());
            Ok(record)
        }

        async fn get_all(&self) -> Result<Vec<FeedbackRecord>, RepositoryError> {
            if self.fail {
                return Err(RepositoryError::Lock("mock failure".to_string()));
            }
            Ok(self.records.lock()?.clone())
        }
    }

    #[cfg(test)]
    mod behaviour {
        use super::*;

        fn request(feedback_type: &str) -> CreateFeedbackRequest {
            CreateFeedbackRequest {
                feedback_type: feedback_type.to_string(),
                context: "explanation".to_string(),
                recommendation: "Take rest".to_string(),
                user_profile: None,
                rating: None,
                comment: None,
                timestamp: None,
            }
        }

        #[tokio::test]
        async fn test_create_and_list_with_pool() {
            let repo = FeedbackRepository::with_pool(DatabasePool::in_memory().unwrap());
            repo.create(request("helpful")).await.unwrap();
            repo.create(request("not_helpful")).await.unwrap();

            let all = repo.get_all().await.unwrap();
            assert_eq!(all.len(), 2);
            assert_eq!(all[0].feedback_type, "helpful");
            assert_eq!(all[1].feedback_type, "not_helpful");
        }

        #[tokio::test]
        async fn test_mock_repository_failure() {
            let repo = MockFeedbackRepository::failing();
            assert!(repo.create(request("helpful")).await.is_err());
        }
    }
}
