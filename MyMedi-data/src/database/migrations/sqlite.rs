use rusqlite::Connection;
use tracing::info;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    info!("Running SQLite migrations");

    create_feedback_table(conn)?;
    create_accuracy_feedback_table(conn)?;
    create_specialist_reviews_table(conn)?;
    create_knowledge_base_table(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the recommendation feedback table
fn create_feedback_table(conn: &Connection) -> Result<(), String> {
    info!("Creating feedback_entries table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS feedback_entries (
            id TEXT PRIMARY KEY,
            feedback_type TEXT NOT NULL,
            context TEXT NOT NULL,
            recommendation TEXT NOT NULL,
            user_profile TEXT,
            rating REAL,
            comment TEXT,
            timestamp TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    ).map_err(|e| e.to_string())?;

    Ok(())
}

/// Create the accuracy feedback table
fn create_accuracy_feedback_table(conn: &Connection) -> Result<(), String> {
    info!("Creating accuracy_feedback table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS accuracy_feedback (
            id TEXT PRIMARY KEY,
            recommendation_id TEXT NOT NULL,
            user_feedback TEXT NOT NULL,
            actual_outcome TEXT,
            professional_verification TEXT,
            user_profile TEXT NOT NULL,
            timestamp TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    ).map_err(|e| e.to_string())?;

    Ok(())
}

/// Create the specialist review queue table
fn create_specialist_reviews_table(conn: &Connection) -> Result<(), String> {
    info!("Creating specialist_reviews table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS specialist_reviews (
            id TEXT PRIMARY KEY,
            ai_recommendation TEXT NOT NULL,
            user_case TEXT NOT NULL,
            specialist_feedback TEXT,
            accuracy INTEGER NOT NULL DEFAULT 0,
            improvements TEXT NOT NULL,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    ).map_err(|e| e.to_string())?;

    Ok(())
}

/// Create the single-row knowledge base version table
fn create_knowledge_base_table(conn: &Connection) -> Result<(), String> {
    info!("Creating knowledge_base table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS knowledge_base (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version TEXT NOT NULL,
            last_updated TEXT NOT NULL
        )",
        [],
    ).map_err(|e| format!("Failed to create knowledge_base table: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
    }
}
