use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use super::models::{CreateFavoriteRequest, Favorite};
use crate::db::{DbError, FavoriteRepository};
use crate::error::HttpError;
use crate::impl_into_response;

#[derive(Error, Debug)]
pub enum FavoritesError {
    #[error("Favorite not found")]
    NotFound,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Database(#[from] DbError),
}

impl HttpError for FavoritesError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::NotFound => Some("FAVORITE_NOT_FOUND"),
            Self::InvalidInput(_) => Some("INVALID_INPUT"),
            Self::Database(_) => Some("DATABASE_ERROR"),
        }
    }
}

impl_into_response!(FavoritesError);

/// Service for saving and removing favorite cities
pub struct FavoritesService {
    repo: Arc<dyn FavoriteRepository>,
}

impl FavoritesService {
    pub fn new(repo: Arc<dyn FavoriteRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, request: CreateFavoriteRequest) -> Result<Favorite, FavoritesError> {
        let city = request.city.trim();
        if city.is_empty() {
            return Err(FavoritesError::InvalidInput(
                "City name is required".to_string(),
            ));
        }
        if !request.lat.is_finite() || !request.lon.is_finite() {
            return Err(FavoritesError::InvalidInput(
                "Coordinates must be numeric values".to_string(),
            ));
        }

        let favorite = Favorite {
            id: Uuid::new_v4().to_string(),
            user_id: request.user_id,
            city: city.to_string(),
            lat: request.lat,
            lon: request.lon,
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        self.repo.insert(&favorite).await?;

        tracing::info!(
            favorite_id = %favorite.id,
            user_id = favorite.user_id,
            city = %favorite.city,
            "Favorite created"
        );

        Ok(favorite)
    }

    /// Favorites of a user, newest first. The id comes raw from the path.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Favorite>, FavoritesError> {
        let user_id: i64 = user_id.trim().parse().map_err(|_| {
            FavoritesError::InvalidInput(format!("Invalid user id: {}", user_id))
        })?;

        let favorites = self.repo.list_by_user(user_id).await?;
        tracing::debug!(user_id, count = favorites.len(), "Listed favorites");

        Ok(favorites)
    }

    pub async fn delete(&self, id: &str) -> Result<Favorite, FavoritesError> {
        let removed = self
            .repo
            .delete(id)
            .await?
            .ok_or(FavoritesError::NotFound)?;

        tracing::info!(favorite_id = %removed.id, "Favorite deleted");

        Ok(removed)
    }
}
