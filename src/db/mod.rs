mod favorite_repo;

pub use favorite_repo::{FavoriteRepository, SqliteFavoriteRepository};

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Failed to create database directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Database configuration
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data/clima.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Create and configure a SQLite connection pool
pub async fn create_pool(config: &DbConfig) -> Result<SqlitePool, DbError> {
    // Ensure the data directory exists (skipped for in-memory databases)
    if let Some(db_path) = config.url.strip_prefix("sqlite:") {
        if !db_path.starts_with(":memory:") {
            if let Some(parent) = Path::new(db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&format!("{}?mode=rwc", config.url))
        .await?;

    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    let migration_001 = include_str!("../../migrations/001_create_favorites.sql");
    sqlx::raw_sql(migration_001).execute(pool).await?;

    tracing::info!("Database migrations completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool() {
        let config = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        };
        let pool = create_pool(&config).await.expect("Failed to create pool");
        run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        // Migrations are idempotent
        run_migrations(&pool)
            .await
            .expect("Failed to re-run migrations");
    }

    #[tokio::test]
    async fn test_unwritable_directory_is_io_error() {
        // A regular file where the data directory should be
        let blocker = std::env::temp_dir().join(format!("clima-db-{}", uuid::Uuid::new_v4()));
        std::fs::write(&blocker, b"").expect("Failed to create blocker file");

        let config = DbConfig {
            url: format!("sqlite:{}/data/clima.db", blocker.display()),
            max_connections: 1,
        };
        let result = create_pool(&config).await;
        let _ = std::fs::remove_file(&blocker);

        assert!(matches!(result, Err(DbError::Io(_))));
    }
}
