use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::models::{CreateFavoriteRequest, Favorite};
use super::service::FavoritesError;
use crate::auth::Claims;
use crate::extractors::JsonBody;
use crate::AppState;

/// POST /favorites - Save a favorite city
pub async fn create_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    JsonBody(request): JsonBody<CreateFavoriteRequest>,
) -> Result<(StatusCode, Json<Favorite>), FavoritesError> {
    tracing::debug!(actor = claims.sub, user_id = request.user_id, "Creating favorite");

    let favorite = state.favorites_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// GET /favorites/{userId} - Favorites of a user, newest first
pub async fn list_favorites(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Favorite>>, FavoritesError> {
    let favorites = state.favorites_service.list_for_user(&user_id).await?;
    Ok(Json(favorites))
}

/// DELETE /favorites/{id} - Remove a favorite
pub async fn delete_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<Favorite>, FavoritesError> {
    tracing::debug!(actor = claims.sub, favorite_id = %id, "Deleting favorite");

    let favorite = state.favorites_service.delete(&id).await?;
    Ok(Json(favorite))
}
