use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::models::{LoginRequest, LoginResponse};
use crate::autocomplete::models::Suggestion;
use crate::error::ErrorResponse;
use crate::favorites::models::{CreateFavoriteRequest, Favorite};
use crate::weather::models::{ConditionRecord, CurrentRecord, LocationRecord, WeatherRecord};

/// OpenAPI documentation for the Clima API
///
/// Schema-only for now; handlers carry no path annotations.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clima API",
        version = "1.0.0",
        description = "Weather lookup backend: current conditions by city or coordinates, city autocomplete and per-user favorites.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    tags(
        (name = "auth", description = "Login and access tokens"),
        (name = "weather", description = "Current weather by city or coordinates"),
        (name = "autocomplete", description = "City suggestions"),
        (name = "favorites", description = "Saved cities per user")
    ),
    components(
        schemas(
            ErrorResponse,
            WeatherRecord,
            LocationRecord,
            CurrentRecord,
            ConditionRecord,
            Suggestion,
            Favorite,
            CreateFavoriteRequest,
            LoginRequest,
            LoginResponse,
        )
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_weather_record() {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;
        assert!(schemas.contains_key("WeatherRecord"));
        assert!(schemas.contains_key("Favorite"));
        assert!(schemas.contains_key("ErrorResponse"));
    }
}
