//! SQLite pool shared by the repositories
//!
//! The server opens one file-backed pool at startup. If the file cannot be
//! opened it runs on an in-memory database instead, which `PoolStatus`
//! reports so the health check can flag that nothing is persisted.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use once_cell::sync::OnceCell;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use thiserror::Error;
use tracing::{error, info, warn};

use super::migrations::run_sqlite_migrations;

static DB_POOL: OnceCell<DatabasePool> = OnceCell::new();

const DEFAULT_SQLITE_PATH: &str = "data/mymedi.db";

pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Database pool is already initialized")]
    PoolAlreadyInitialized,

    #[error("Database pool is not initialized")]
    PoolNotInitialized,

    /// `DB_TYPE` named something other than SQLite
    #[error("Unsupported database type: {0}")]
    UnsupportedDatabaseType(String),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Database directory error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pool settings read from `DB_*` variables
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub sqlite_path: PathBuf,
    pub max_connections: u32,
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: PathBuf::from(DEFAULT_SQLITE_PATH),
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

fn env_number<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, DatabaseError> {
        let db_type = env::var("DB_TYPE").unwrap_or_else(|_| "sqlite".to_string());
        if !db_type.eq_ignore_ascii_case("sqlite") {
            return Err(DatabaseError::UnsupportedDatabaseType(db_type));
        }

        let defaults = Self::default();
        let config = Self {
            sqlite_path: env::var("DB_SQLITE_PATH").map(PathBuf::from).unwrap_or(defaults.sqlite_path),
            max_connections: env_number("DB_MAX_CONNECTIONS", defaults.max_connections),
            timeout_seconds: env_number("DB_TIMEOUT_SECONDS", defaults.timeout_seconds),
        };

        info!(
            path = %config.sqlite_path.display(),
            max_connections = config.max_connections,
            timeout = config.timeout_seconds,
            "Database configuration loaded"
        );
        Ok(config)
    }
}

/// Snapshot of the pool for health reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub in_memory: bool,
    pub connections: u32,
    pub idle_connections: u32,
}

#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: r2d2::Pool<SqliteConnectionManager>,
    in_memory: bool,
}

impl DatabasePool {
    /// Open the database file, falling back to memory when it is unusable
    pub fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        match Self::open_file(config) {
            Ok(pool) => Ok(pool),
            Err(e) => {
                error!("Failed to open SQLite database at {}: {}", config.sqlite_path.display(), e);
                warn!("Falling back to in-memory SQLite database");
                Self::in_memory()
            }
        }
    }

    fn open_file(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if let Some(parent) = config.sqlite_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                info!("Creating database directory {}", parent.display());
                fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(Path::new(&config.sqlite_path))
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE);
        let pool = r2d2::Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(Duration::from_secs(config.timeout_seconds))
            .build(manager)?;

        let db = Self { pool, in_memory: false };
        db.migrate()?;
        info!("SQLite pool ready at {}", config.sqlite_path.display());
        Ok(db)
    }

    /// Single-connection in-memory pool with the schema applied.
    ///
    /// Each `:memory:` connection is a separate database, so the pool never
    /// grows past one connection.
    pub fn in_memory() -> Result<Self, DatabaseError> {
        let pool = r2d2::Pool::builder()
            .max_size(1)
            .build(SqliteConnectionManager::memory())?;

        let db = Self { pool, in_memory: true };
        db.migrate()?;
        Ok(db)
    }

    pub fn connection(&self) -> Result<PooledConnection, DatabaseError> {
        Ok(self.pool.get()?)
    }

    /// Run a trivial query and report pool occupancy
    pub fn status(&self) -> Result<PoolStatus, DatabaseError> {
        let conn = self.connection()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;

        let state = self.pool.state();
        Ok(PoolStatus {
            in_memory: self.in_memory,
            connections: state.connections,
            idle_connections: state.idle_connections,
        })
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        let conn = self.connection()?;
        run_sqlite_migrations(&conn).map_err(DatabaseError::Migration)
    }
}

/// Open the global pool. Fails if called twice.
pub fn initialize_database_pool(config: &DatabaseConfig) -> Result<(), DatabaseError> {
    if DB_POOL.get().is_some() {
        return Err(DatabaseError::PoolAlreadyInitialized);
    }

    let pool = DatabasePool::open(config)?;

    DB_POOL.set(pool).map_err(|_| DatabaseError::PoolAlreadyInitialized)
}

pub fn get_db_pool() -> Result<DatabasePool, DatabaseError> {
    DB_POOL.get().cloned().ok_or(DatabaseError::PoolNotInitialized)
}

/// Status of the global pool
pub fn pool_status() -> Result<PoolStatus, DatabaseError> {
    get_db_pool()?.status()
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.sqlite_path, PathBuf::from("data/mymedi.db"));
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_in_memory_pool_has_schema() {
        let pool = DatabasePool::in_memory().unwrap();
        let conn = pool.connection().unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
                 ('feedback_entries', 'accuracy_feedback', 'specialist_reviews', 'knowledge_base')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 4);
    }

    #[test]
    fn test_in_memory_status() {
        let status = DatabasePool::in_memory().unwrap().status().unwrap();
        assert!(status.in_memory);
        assert_eq!(status.connections, 1);
    }

    #[test]
    fn test_open_file_pool() {
        let dir = env::temp_dir().join(format!("mymedi-db-{}", std::process::id()));
        let config = DatabaseConfig {
            sqlite_path: dir.join("nested").join("test.db"),
            max_connections: 2,
            timeout_seconds: 5,
        };

        let pool = DatabasePool::open(&config).unwrap();
        assert!(!pool.status().unwrap().in_memory);
        assert!(config.sqlite_path.exists());

        let _ = fs::remove_dir_all(dir);
    }
}
