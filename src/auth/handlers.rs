use axum::{extract::State, Json};

use super::models::{LoginRequest, LoginResponse};
use super::service::AuthError;
use crate::extractors::JsonBody;
use crate::AppState;

/// Exchange credentials for an access token
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let response = state.auth_service.login(&request).await?;
    Ok(Json(response))
}
