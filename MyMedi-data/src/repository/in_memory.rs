use std::sync::{Arc, Mutex};

use crate::models::accuracy::{AccuracyRecord, KnowledgeBaseState, SpecialistReviewRecord};
use crate::models::feedback::FeedbackRecord;
use super::errors::RepositoryError;

/// In-memory storage used when the database is not available.
///
/// Records are kept in insertion order so "recent" queries behave the same
/// as the SQLite storage, which orders by rowid.
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    feedback: Arc<Mutex<Vec<FeedbackRecord>>>,
    accuracy: Arc<Mutex<Vec<AccuracyRecord>>>,
    reviews: Arc<Mutex<Vec<SpecialistReviewRecord>>>,
    knowledge_base: Arc<Mutex<KnowledgeBaseState>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            feedback: Arc::new(Mutex::new(Vec::new())),
            accuracy: Arc::new(Mutex::new(Vec::new())),
            reviews: Arc::new(Mutex::new(Vec::new())),
            knowledge_base: Arc::new(Mutex::new(KnowledgeBaseState::initial())),
        }
    }

    pub async fn store_feedback(&self, record: &FeedbackRecord) -> Result<FeedbackRecord, RepositoryError> {
        let mut store = self.feedback.lock()?;
        store.push(record.clone());
        Ok(record.clone())
    }

    pub async fn get_all_feedback(&self) -> Result<Vec<FeedbackRecord>, RepositoryError> {
        let store = self.feedback.lock()?;
        Ok(store.clone())
    }

    pub async fn store_accuracy(&self, record: &AccuracyRecord) -> Result<usize, RepositoryError> {
        let mut store = self.accuracy.lock()?;
        store.push(record.clone());
        Ok(store.len())
    }

    pub async fn get_all_accuracy(&self) -> Result<Vec<AccuracyRecord>, RepositoryError> {
        let store = self.accuracy.lock()?;
        Ok(store.clone())
    }

    /// Get the last `limit` accuracy records, oldest first
    pub async fn get_recent_accuracy(&self, limit: usize) -> Result<Vec<AccuracyRecord>, RepositoryError> {
        let store = self.accuracy.lock()?;
        let skip = store.len().saturating_sub(limit);
        Ok(store.iter().skip(skip).cloned().collect())
    }

    pub async fn store_review(&self, review: &SpecialistReviewRecord) -> Result<SpecialistReviewRecord, RepositoryError> {
        let mut store = self.reviews.lock()?;
        store.push(review.clone());
        Ok(review.clone())
    }

    pub async fn get_all_reviews(&self) -> Result<Vec<SpecialistReviewRecord>, RepositoryError> {
        let store = self.reviews.lock()?;
        Ok(store.clone())
    }

    pub async fn get_knowledge_base(&self) -> Result<KnowledgeBaseState, RepositoryError> {
        let state = self.knowledge_base.lock()?;
        Ok(state.clone())
    }

    pub async fn set_knowledge_base(&self, next: &KnowledgeBaseState) -> Result<KnowledgeBaseState, RepositoryError> {
        let mut state = self.knowledge_base.lock()?;
        *state = next.clone();
        Ok(state.clone())
    }
}
