use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth_handlers;
use crate::autocomplete::handlers as autocomplete_handlers;
use crate::favorites::handlers as favorites_handlers;
use crate::middleware::require_bearer_token;
use crate::openapi::swagger_ui;
use crate::weather::handlers as weather_handlers;
use crate::AppState;

/// Build the authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(auth_handlers::login))
}

/// Build the weather lookup routes
fn weather_routes() -> Router<AppState> {
    Router::new().route("/weather", get(weather_handlers::get_weather))
}

/// Build the city autocomplete routes
fn autocomplete_routes() -> Router<AppState> {
    Router::new().route(
        "/autocomplete",
        get(autocomplete_handlers::autocomplete),
    )
}

/// Build the favorites routes.
///
/// `{id}` is the user id for GET and the favorite id for DELETE.
fn favorites_routes() -> Router<AppState> {
    Router::new()
        .route("/favorites", post(favorites_handlers::create_favorite))
        .route(
            "/favorites/{id}",
            get(favorites_handlers::list_favorites).delete(favorites_handlers::delete_favorite),
        )
}

/// Routes that need a bearer token
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(weather_routes())
        .merge(autocomplete_routes())
        .merge(favorites_routes())
        .route_layer(middleware::from_fn_with_state(state, require_bearer_token))
}

/// Build the complete application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check at root level
        .route("/", get(weather_handlers::health))
        .route("/health", get(weather_handlers::health))
        .merge(auth_routes())
        .merge(protected_routes(state.clone()))
        // Swagger UI for API documentation
        .merge(swagger_ui())
        .with_state(state)
}
