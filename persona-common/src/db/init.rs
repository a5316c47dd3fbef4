//! Database initialization
//!
//! Opens (or creates) the persons store and applies the schema. Schema
//! creation is idempotent, so this runs on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Busy timeout applied to every pooled connection
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Initialize database connection pool and create tables if needed
///
/// `database_url` is a sqlx SQLite URL (`sqlite://path/to/file.db` or
/// `sqlite::memory:`). Missing database files are created.
///
/// An in-memory database lives only as long as its connection, so it is
/// served from a single connection that is never recycled.
pub async fn init_database(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let in_memory = database_url.contains(":memory:");

    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    // WAL allows concurrent readers alongside the single writer
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections.max(1))
    };

    let pool = pool_options.connect_with(options).await?;

    if in_memory {
        info!("Opened in-memory database");
    } else {
        info!(
            database_url = %database_url,
            max_connections = max_connections,
            "Opened database"
        );
    }

    create_persons_table(&pool).await?;

    Ok(pool)
}

/// Create the persons table
///
/// Ids are stored as hyphenated UUID text. Gender is constrained to the
/// closed set and age to non-negative values.
pub async fn create_persons_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS persons (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            surname TEXT NOT NULL,
            patronymic TEXT,
            age INTEGER NOT NULL CHECK (age >= 0),
            gender TEXT NOT NULL CHECK (gender IN ('male', 'female')),
            country TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    debug!("Ensured persons table exists");

    Ok(())
}
