use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::favorites::Favorite;

use super::DbError;

/// Repository trait for favorite cities
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Store a new favorite
    async fn insert(&self, favorite: &Favorite) -> Result<(), DbError>;

    /// All favorites of a user, newest first
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Favorite>, DbError>;

    /// Remove a favorite by id, returning it if it existed
    async fn delete(&self, id: &str) -> Result<Option<Favorite>, DbError>;
}

/// SQLite implementation of FavoriteRepository
pub struct SqliteFavoriteRepository {
    pool: SqlitePool,
}

impl SqliteFavoriteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Internal row structure for SQLite queries
#[derive(sqlx::FromRow)]
struct FavoriteRow {
    id: String,
    user_id: i64,
    city: String,
    lat: f64,
    lon: f64,
    created_at: i64,
}

impl From<FavoriteRow> for Favorite {
    fn from(row: FavoriteRow) -> Self {
        Favorite {
            id: row.id,
            user_id: row.user_id,
            city: row.city,
            lat: row.lat,
            lon: row.lon,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl FavoriteRepository for SqliteFavoriteRepository {
    async fn insert(&self, favorite: &Favorite) -> Result<(), DbError> {
        sqlx::query(
            "INSERT INTO favorites (id, user_id, city, lat, lon, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&favorite.id)
        .bind(favorite.user_id)
        .bind(&favorite.city)
        .bind(favorite.lat)
        .bind(favorite.lon)
        .bind(favorite.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Favorite>, DbError> {
        let rows: Vec<FavoriteRow> = sqlx::query_as(
            "SELECT id, user_id, city, lat, lon, created_at
             FROM favorites WHERE user_id = ?
             ORDER BY created_at DESC, rowid DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Favorite::from).collect())
    }

    async fn delete(&self, id: &str) -> Result<Option<Favorite>, DbError> {
        let row: Option<FavoriteRow> = sqlx::query_as(
            "DELETE FROM favorites WHERE id = ?
             RETURNING id, user_id, city, lat, lon, created_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Favorite::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, DbConfig};

    async fn setup_test_db() -> SqlitePool {
        let config = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        };
        let pool = create_pool(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    fn create_test_favorite(user_id: i64, city: &str, created_at: i64) -> Favorite {
        Favorite {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            city: city.to_string(),
            lat: 40.4,
            lon: -3.7,
            created_at,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_by_user() {
        let pool = setup_test_db().await;
        let repo = SqliteFavoriteRepository::new(pool);

        let favorite = create_test_favorite(1, "Madrid", 1_700_000_000_000);
        repo.insert(&favorite).await.unwrap();

        let listed = repo.list_by_user(1).await.unwrap();
        assert_eq!(listed, vec![favorite]);
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_scoped_to_user() {
        let pool = setup_test_db().await;
        let repo = SqliteFavoriteRepository::new(pool);

        repo.insert(&create_test_favorite(1, "Lima", 1_000)).await.unwrap();
        repo.insert(&create_test_favorite(1, "Quito", 3_000)).await.unwrap();
        repo.insert(&create_test_favorite(1, "Bogota", 2_000)).await.unwrap();
        repo.insert(&create_test_favorite(2, "Oslo", 4_000)).await.unwrap();

        let cities: Vec<String> = repo
            .list_by_user(1)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.city)
            .collect();
        assert_eq!(cities, vec!["Quito", "Bogota", "Lima"]);

        assert!(repo.list_by_user(99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_returns_removed_row() {
        let pool = setup_test_db().await;
        let repo = SqliteFavoriteRepository::new(pool);

        let favorite = create_test_favorite(1, "Madrid", 1_000);
        repo.insert(&favorite).await.unwrap();

        let removed = repo.delete(&favorite.id).await.unwrap();
        assert_eq!(removed, Some(favorite));
        assert!(repo.list_by_user(1).await.unwrap().is_empty());

        let removed_again = repo.delete("missing-id").await.unwrap();
        assert!(removed_again.is_none());
    }
}
