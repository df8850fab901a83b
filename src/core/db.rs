/// SQLite connection pool and schema
///
/// Foreign keys are declared without `ON DELETE CASCADE`: dependent rows are
/// removed explicitly by the services before their parent.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use super::config::DatabaseConfig;
use super::error::DbError;

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS user_tb (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email VARCHAR(30) NOT NULL UNIQUE,
        name TEXT,
        password TEXT,
        role TEXT NOT NULL,
        pending BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS course_tb (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(256) NOT NULL,
        description VARCHAR(256) NOT NULL,
        user_id INTEGER UNIQUE REFERENCES user_tb(id),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS course_user_tb (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        course_id INTEGER NOT NULL REFERENCES course_tb(id),
        user_id INTEGER NOT NULL REFERENCES user_tb(id),
        UNIQUE (course_id, user_id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS vm_tb (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES user_tb(id),
        name TEXT NOT NULL,
        created_at TEXT NOT NULL
    )"#,
];

/// Open a pool for the configured database URL
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| DbError::Query(format!("Invalid database url: {}", e)))?
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new();
    let max_connections = if config.url.contains(":memory:") {
        // An in-memory database only lives as long as its single connection
        pool_options = pool_options
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>);
        1
    } else {
        config.max_connections.max(1)
    };

    let pool = pool_options
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    info!(url = %config.url, max_connections, "database connected");
    Ok(pool)
}

/// Create tables that do not exist yet
pub async fn init_schema(pool: &SqlitePool) -> Result<(), DbError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Connect and ensure the schema in one step
pub async fn open(config: &DatabaseConfig) -> Result<SqlitePool, DbError> {
    let pool = connect(config).await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// In-memory database with schema, used by tests and `--memory` runs
pub async fn open_in_memory() -> Result<SqlitePool, DbError> {
    open(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    })
    .await
}
