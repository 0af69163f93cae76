use chrono::Utc;
use tracing::{debug, error};
use uuid::Uuid;
use async_trait::async_trait;

use crate::models::accuracy::{
    AccuracyRecord, CreateAccuracyRequest, KnowledgeBaseState, SpecialistReviewRecord,
};
use crate::database::{get_db_pool, DatabaseError, DatabasePool};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;

/// Repository trait for accuracy feedback, the specialist review queue and
/// the knowledge base version
#[async_trait]
pub trait AccuracyRepositoryTrait {
    /// Store accuracy feedback and return it with the new total count
    async fn add_feedback(&self, request: CreateAccuracyRequest) -> Result<(AccuracyRecord, usize), RepositoryError>;

    /// Get all accuracy feedback, oldest first
    async fn get_all_feedback(&self) -> Result<Vec<AccuracyRecord>, RepositoryError>;

    /// Get the last `limit` accuracy records, oldest first
    async fn get_recent_feedback(&self, limit: usize) -> Result<Vec<AccuracyRecord>, RepositoryError>;

    /// Add a case to the specialist review queue
    async fn create_review(&self, review: SpecialistReviewRecord) -> Result<SpecialistReviewRecord, RepositoryError>;

    /// Get the specialist review queue, oldest first
    async fn get_reviews(&self) -> Result<Vec<SpecialistReviewRecord>, RepositoryError>;

    /// Get the current knowledge base version
    async fn get_knowledge_base(&self) -> Result<KnowledgeBaseState, RepositoryError>;

    /// Replace the knowledge base version
    async fn update_knowledge_base(&self, state: KnowledgeBaseState) -> Result<KnowledgeBaseState, RepositoryError>;
}

/// Repository for accuracy tracking data.
/// Uses the SQLite pool when one is available and falls back to memory otherwise.
#[derive(Debug, Clone, Default)]
pub struct AccuracyRepository {
    storage: InMemoryStorage,
    pool: Option<DatabasePool>,
}

impl AccuracyRepository {
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
impl AccuracyRepositoryTrait for AccuracyRepository {
    async fn add_feedback(&self, request: CreateAccuracyRequest) -> Result<(AccuracyRecord, usize), RepositoryError> {
        let record = AccuracyRecord {
            id: Uuid::new_v4().to_string(),
            recommendation_id: request.recommendation_id,
            user_feedback: request.user_feedback,
            actual_outcome: request.actual_outcome,
            professional_verification: request.professional_verification,
            user_profile: request.user_profile,
            timestamp: request.timestamp,
            created_at: Utc::now(),
        };

        let total = match self.pool() {
            Ok(pool) => match DatabaseStorage::store_accuracy(&pool, &record).await {
                Ok(total) => total,
                Err(e) => {
                    error!("Failed to store accuracy feedback in database: {}", e);
                    self.storage.store_accuracy(&record).await?
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.store_accuracy(&record).await?
            }
        };

        Ok((record, total))
    }

    async fn get_all_feedback(&self) -> Result<Vec<AccuracyRecord>, RepositoryError> {
        match self.pool() {
            Ok(pool) => match DatabaseStorage::get_all_accuracy(&pool).await {
                Ok(records) => Ok(records),
                Err(e) => {
                    error!("Failed to get accuracy feedback from database: {}", e);
                    self.storage.get_all_accuracy().await
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for get_all_feedback", e);
                self.storage.get_all_accuracy().await
            }
        }
    }

    async fn get_recent_feedback(&self, limit: usize) -> Result<Vec<AccuracyRecord>, RepositoryError> {
        match self.pool() {
            Ok(pool) => match DatabaseStorage::get_recent_accuracy(&pool, limit).await {
                Ok(records) => Ok(records),
                Err(e) => {
                    error!("Failed to get recent accuracy feedback from database: {}", e);
                    self.storage.get_recent_accuracy(limit).await
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for get_recent_feedback", e);
                self.storage.get_recent_accuracy(limit).await
            }
        }
    }

    async fn create_review(&self, review: SpecialistReviewRecord) -> Result<SpecialistReviewRecord, RepositoryError> {
        match self.pool() {
            Ok(pool) => match DatabaseStorage::store_review(&pool, &review).await {
                Ok(_) => Ok(review),
                Err(e) => {
                    error!("Failed to store specialist review in database: {}", e);
                    self.storage.store_review(&review).await
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.store_review(&review).await
            }
        }
    }

    async fn get_reviews(&self) -> Result<Vec<SpecialistReviewRecord>, RepositoryError> {
        match self.pool() {
            Ok(pool) => match DatabaseStorage::get_all_reviews(&pool).await {
                Ok(reviews) => Ok(reviews),
                Err(e) => {
                    error!("Failed to get specialist reviews from database: {}", e);
                    self.storage.get_all_reviews().await
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for get_reviews", e);
                self.storage.get_all_reviews().await
            }
        }
    }

    async fn get_knowledge_base(&self) -> Result<KnowledgeBaseState, RepositoryError> {
        match self.pool() {
            Ok(pool) => match DatabaseStorage::get_knowledge_base(&pool).await {
                Ok(state) => Ok(state),
                Err(e) => {
                    error!("Failed to get knowledge base from database: {}", e);
                    self.storage.get_knowledge_base().await
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory knowledge base", e);
                self.storage.get_knowledge_base().await
            }
        }
    }

    async fn update_knowledge_base(&self, state: KnowledgeBaseState) -> Result<KnowledgeBaseState, RepositoryError> {
        match self.pool() {
            Ok(pool) => match DatabaseStorage::set_knowledge_base(&pool, &state).await {
                Ok(_) => Ok(state),
                Err(e) => {
                    error!("Failed to update knowledge base in database: {}", e);
                    self.storage.set_knowledge_base(&state).await
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory knowledge base", e);
                self.storage.set_knowledge_base(&state).await
            }
        }
    }
}

/// Mock accuracy repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;

    /// Mock implementation of AccuracyRepository backed only by memory
    #[derive(Debug, Clone, Default)]
    pub struct MockAccuracyRepository {
        storage: InMemoryStorage,
    }

    impl MockAccuracyRepository {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl AccuracyRepositoryTrait for MockAccuracyRepository {
        async fn add_feedback(&self, request: CreateAccuracyRequest) -> Result<(AccuracyRecord, usize), RepositoryError> {
            let record = AccuracyRecord {
                id: Uuid::new_v4().to_string(),
                recommendation_id: request.recommendation_id,
                user_feedback: request.user_feedback,
                actual_outcome: request.actual_outcome,
                professional_verification: request.professional_verification,
                user_profile: request.user_profile,
                timestamp: request.timestamp,
                created_at: Utc::now(),
            };
            let total = self.storage.store_accuracy(&record).await?;
            Ok((record, total))
        }

        async fn get_all_feedback(&self) -> Result<Vec<AccuracyRecord>, RepositoryError> {
            self.storage.get_all_accuracy().await
        }

        async fn get_recent_feedback(&self, limit: usize) -> Result<Vec<AccuracyRecord>, RepositoryError> {
            self.storage.get_recent_accuracy(limit).await
        }

        async fn create_review(&self, review: SpecialistReviewRecord) -> Result<SpecialistReviewRecord, RepositoryError> {
            self.storage.store_review(&review).await
        }

        async fn get_reviews(&self) -> Result<Vec<SpecialistReviewRecord>, RepositoryError> {
            self.storage.get_all_reviews().await
        }

        async fn get_knowledge_base(&self) -> Result<KnowledgeBaseState, RepositoryError> {
            self.storage.get_knowledge_base().await
        }

        async fn update_knowledge_base(&self, state: KnowledgeBaseState) -> Result<KnowledgeBaseState, RepositoryError> {
            self.storage.set_knowledge_base(&state).await
        }
    }

    #[cfg(test)]
    mod behaviour {
        use super::*;
        use crate::models::accuracy::AccuracyProfile;

        fn request(feedback: &str) -> CreateAccuracyRequest {
            CreateAccuracyRequest {
                recommendation_id: "rec_medication_1".to_string(),
                user_feedback: feedback.to_string(),
                actual_outcome: None,
                professional_verification: None,
                user_profile: AccuracyProfile {
                    age: 52.0,
                    gender: "male".to_string(),
                    location: "Mumbai, Maharashtra".to_string(),
                    medical_history: Vec::new(),
                },
                timestamp: None,
            }
        }

        #[tokio::test]
        async fn test_add_feedback_reports_running_total() {
            let repo = AccuracyRepository::with_pool(DatabasePool::in_memory().unwrap());
            let (_, first) = repo.add_feedback(request("accurate")).await.unwrap();
            let (record, second) = repo.add_feedback(request("inaccurate")).await.unwrap();

            assert_eq!(first, 1);
            assert_eq!(second, 2);
            assert_eq!(record.user_feedback, "inaccurate");
            assert_eq!(repo.get_all_feedback().await.unwrap().len(), 2);
        }

        #[tokio::test]
        async fn test_reviews_and_knowledge_base_persist() {
            let repo = AccuracyRepository::with_pool(DatabasePool::in_memory().unwrap());
            let review = SpecialistReviewRecord {
                id: "review_1".to_string(),
                ai_recommendation: "Paracetamol 500mg".to_string(),
                user_case: "Fever for two days".to_string(),
                specialist_feedback: None,
                accuracy: 0,
                improvements: Vec::new(),
                status: "pending".to_string(),
                created_at: Utc::now(),
            };
            repo.create_review(review).await.unwrap();
            assert_eq!(repo.get_reviews().await.unwrap()[0].status, "pending");

            let kb = repo.get_knowledge_base().await.unwrap();
            assert_eq!(kb.version, KnowledgeBaseState::INITIAL_VERSION);

            repo.update_knowledge_base(KnowledgeBaseState { version: "1.0.1".to_string(), last_updated: Utc::now() })
                .await
                .unwrap();
            assert_eq!(repo.get_knowledge_base().await.unwrap().version, "1.0.1");
        }

        #[tokio::test]
        async fn test_in_memory_fallback_without_pool() {
            let repo = AccuracyRepository::new();
            let (_, total) = repo.add_feedback(request("accurate")).await.unwrap();
            assert_eq!(total, 1);
            assert_eq!(repo.get_recent_feedback(10).await.unwrap().len(), 1);
        }
    }
}
