use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::AuthError;
use crate::AppState;

/// Middleware that requires a valid `Authorization: Bearer <jwt>` header.
///
/// On success the verified [`crate::auth::Claims`] are added to the request
/// extensions for handlers to pick up.
pub async fn require_bearer_token(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Ok(token) => token,
        Err(err) => {
            tracing::warn!(path = %request.uri().path(), "Missing or malformed bearer token");
            return err.into_response();
        }
    };

    match state.auth_service.verify_token(token) {
        Ok(claims) => {
            tracing::debug!(user_id = claims.sub, "Bearer token accepted");
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(path = %request.uri().path(), "Invalid bearer token");
            err.into_response()
        }
    }
}

fn bearer_token(request: &Request<Body>) -> Result<&str, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    let value = header.to_str().map_err(|_| AuthError::MalformedHeader)?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MalformedHeader)
}
