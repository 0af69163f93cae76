use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::database::DatabasePool;
use crate::models::accuracy::{AccuracyRecord, KnowledgeBaseState, SpecialistReviewRecord};
use crate::models::feedback::FeedbackRecord;
use super::errors::RepositoryError;

/// Decode a JSON text column
fn json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Decode a nullable JSON text column
fn optional_json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        None => Ok(None),
    }
}

/// Decode an RFC 3339 timestamp column
fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn feedback_from_row(row: &Row<'_>) -> rusqlite::Result<FeedbackRecord> {
    Ok(FeedbackRecord {
        id: row.get(0)?,
        feedback_type: row.get(1)?,
        context: row.get(2)?,
        recommendation: row.get(3)?,
        user_profile: optional_json_column(row, 4)?,
        rating: row.get(5)?,
        comment: row.get(6)?,
        timestamp: row.get(7)?,
        created_at: timestamp_column(row, 8)?,
    })
}

fn accuracy_from_row(row: &Row<'_>) -> rusqlite::Result<AccuracyRecord> {
    Ok(AccuracyRecord {
        id: row.get(0)?,
        recommendation_id: row.get(1)?,
        user_feedback: row.get(2)?,
        actual_outcome: row.get(3)?,
        professional_verification: optional_json_column(row, 4)?,
        user_profile: json_column(row, 5)?,
        timestamp: row.get(6)?,
        created_at: timestamp_column(row, 7)?,
    })
}

fn review_from_row(row: &Row<'_>) -> rusqlite::Result<SpecialistReviewRecord> {
    Ok(SpecialistReviewRecord {
        id: row.get(0)?,
        ai_recommendation: row.get(1)?,
        user_case: row.get(2)?,
        specialist_feedback: row.get(3)?,
        accuracy: row.get(4)?,
        improvements: json_column(row, 5)?,
        status: row.get(6)?,
        created_at: timestamp_column(row, 7)?,
    })
}

const FEEDBACK_COLUMNS: &str =
    "id, feedback_type, context, recommendation, user_profile, rating, comment, timestamp, created_at";

const ACCURACY_COLUMNS: &str =
    "id, recommendation_id, user_feedback, actual_outcome, professional_verification, user_profile, timestamp, created_at";

const REVIEW_COLUMNS: &str =
    "id, ai_recommendation, user_case, specialist_feedback, accuracy, improvements, status, created_at";

/// SQLite storage operations for feedback, accuracy tracking and reviews
pub struct DatabaseStorage;

impl DatabaseStorage {
    /// Store a feedback entry
    pub async fn store_feedback(pool: &DatabasePool, record: &FeedbackRecord) -> Result<(), RepositoryError> {
        debug!("Storing feedback entry in database: id={}", record.id);

        let profile = record.user_profile.as_ref().map(serde_json::to_string).transpose()?;
        let conn = pool.connection()?;
        conn.execute(
            &format!("INSERT INTO feedback_entries ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)", FEEDBACK_COLUMNS),
            params![
                record.id,
                record.feedback_type,
                record.context,
                record.recommendation,
                profile,
                record.rating,
                record.comment,
                record.timestamp,
                record.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Get all feedback entries in insertion order
    pub async fn get_all_feedback(pool: &DatabasePool) -> Result<Vec<FeedbackRecord>, RepositoryError> {
        let conn = pool.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM feedback_entries ORDER BY rowid ASC", FEEDBACK_COLUMNS
        ))?;

        let records = stmt
            .query_map([], feedback_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Store an accuracy feedback record and return the new total
    pub async fn store_accuracy(pool: &DatabasePool, record: &AccuracyRecord) -> Result<usize, RepositoryError> {
        debug!("Storing accuracy feedback in database: id={}", record.id);

        let verification = record.professional_verification.as_ref().map(serde_json::to_string).transpose()?;
        let profile = serde_json::to_string(&record.user_profile)?;
        let conn = pool.connection()?;
        conn.execute(
            &format!("INSERT INTO accuracy_feedback ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)", ACCURACY_COLUMNS),
            params![
                record.id,
                record.recommendation_id,
                record.user_feedback,
                record.actual_outcome,
                verification,
                profile,
                record.timestamp,
                record.created_at.to_rfc3339(),
            ],
        )?;

        let total: i64 = conn.query_row("SELECT COUNT(*) FROM accuracy_feedback", [], |row| row.get(0))?;
        Ok(total as usize)
    }

    /// Get all accuracy feedback in insertion order
    pub async fn get_all_accuracy(pool: &DatabasePool) -> Result<Vec<AccuracyRecord>, RepositoryError> {
        let conn = pool.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM accuracy_feedback ORDER BY rowid ASC", ACCURACY_COLUMNS
        ))?;

        let records = stmt
            .query_map([], accuracy_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Get the last `limit` accuracy records, oldest first
    pub async fn get_recent_accuracy(pool: &DatabasePool, limit: usize) -> Result<Vec<AccuracyRecord>, RepositoryError> {
        let conn = pool.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM (SELECT rowid AS rid, * FROM accuracy_feedback ORDER BY rowid DESC LIMIT ?1) ORDER BY rid ASC",
            ACCURACY_COLUMNS
        ))?;

        let records = stmt
            .query_map([limit as i64], accuracy_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Add an entry to the specialist review queue
    pub async fn store_review(pool: &DatabasePool, review: &SpecialistReviewRecord) -> Result<(), RepositoryError> {
        debug!("Storing specialist review in database: id={}", review.id);

        let improvements = serde_json::to_string(&review.improvements)?;
        let conn = pool.connection()?;
        conn.execute(
            &format!("INSERT INTO specialist_reviews ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)", REVIEW_COLUMNS),
            params![
                review.id,
                review.ai_recommendation,
                review.user_case,
                review.specialist_feedback,
                review.accuracy,
                improvements,
                review.status,
                review.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Get the specialist review queue in insertion order
    pub async fn get_all_reviews(pool: &DatabasePool) -> Result<Vec<SpecialistReviewRecord>, RepositoryError> {
        let conn = pool.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM specialist_reviews ORDER BY rowid ASC", REVIEW_COLUMNS
        ))?;

        let reviews = stmt
            .query_map([], review_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reviews)
    }

    /// Get the knowledge base version, seeding the initial row on first use
    pub async fn get_knowledge_base(pool: &DatabasePool) -> Result<KnowledgeBaseState, RepositoryError> {
        let conn = pool.connection()?;
        let existing = conn
            .query_row(
                "SELECT version, last_updated FROM knowledge_base WHERE id = 1",
                [],
                |row| Ok(KnowledgeBaseState {
                    version: row.get(0)?,
                    last_updated: timestamp_column(row, 1)?,
                }),
            )
            .optional()?;

        match existing {
            Some(state) => Ok(state),
            None => {
                let initial = KnowledgeBaseState::initial();
                conn.execute(
                    "INSERT OR IGNORE INTO knowledge_base (id, version, last_updated) VALUES (1, ?1, ?2)",
                    params![initial.version, initial.last_updated.to_rfc3339()],
                )?;
                Ok(initial)
            }
        }
    }

    /// Replace the knowledge base version
    pub async fn set_knowledge_base(pool: &DatabasePool, state: &KnowledgeBaseState) -> Result<(), RepositoryError> {
        let conn = pool.connection()?;
        conn.execute(
            "INSERT INTO knowledge_base (id, version, last_updated) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET version = excluded.version, last_updated = excluded.last_updated",
            params![state.version, state.last_updated.to_rfc3339()],
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::accuracy::AccuracyProfile;
    use crate::models::feedback::FeedbackProfile;

    fn accuracy_record(id: &str) -> AccuracyRecord {
        AccuracyRecord {
            id: id.to_string(),
            recommendation_id: "rec_diagnosis_1".to_string(),
            user_feedback: "accurate".to_string(),
            actual_outcome: None,
            professional_verification: None,
            user_profile: AccuracyProfile {
                age: 34.0,
                gender: "female".to_string(),
                location: "Pune, Maharashtra".to_string(),
                medical_history: vec!["asthma".to_string()],
            },
            timestamp: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_feedback_profile_survives_storage() {
        let pool = DatabasePool::in_memory().unwrap();
        let record = FeedbackRecord {
            id: "fb-1".to_string(),
            feedback_type: "helpful".to_string(),
            context: "explanation".to_string(),
            recommendation: "Drink warm water".to_string(),
            user_profile: Some(FeedbackProfile {
                age: Some(41.5),
                diet: Some("vegetarian".to_string()),
                ..Default::default()
            }),
            rating: Some(4.0),
            comment: None,
            timestamp: Some("2024-01-01T10:00:00Z".to_string()),
            created_at: Utc::now(),
        };

        DatabaseStorage::store_feedback(&pool, &record).await.unwrap();
        let stored = DatabaseStorage::get_all_feedback(&pool).await.unwrap();

        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].user_profile, record.user_profile);
        assert_eq!(stored[0].rating, Some(4.0));
    }

    #[tokio::test]
    async fn test_recent_accuracy_returns_tail_in_order() {
        let pool = DatabasePool::in_memory().unwrap();
        for i in 0..5 {
            let total = DatabaseStorage::store_accuracy(&pool, &accuracy_record(&format!("acc-{}", i)))
                .await
                .unwrap();
            assert_eq!(total, i + 1);
        }

        let recent = DatabaseStorage::get_recent_accuracy(&pool, 3).await.unwrap();
        let ids: Vec<&str> = recent.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["acc-2", "acc-3", "acc-4"]);
    }

    #[tokio::test]
    async fn test_knowledge_base_is_seeded_then_updated() {
        let pool = DatabasePool::in_memory().unwrap();
        let initial = DatabaseStorage::get_knowledge_base(&pool).await.unwrap();
        assert_eq!(initial.version, "1.0.0");

        let next = KnowledgeBaseState { version: "1.0.1".to_string(), last_updated: Utc::now() };
        DatabaseStorage::set_knowledge_base(&pool, &next).await.unwrap();

        let stored = DatabaseStorage::get_knowledge_base(&pool).await.unwrap();
        assert_eq!(stored.version, "1.0.1");
    }
}
