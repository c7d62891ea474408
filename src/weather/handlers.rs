use axum::{extract::State, Json};
use serde::Serialize;

use super::models::WeatherRecord;
use super::service::WeatherError;
use crate::extractors::WeatherSearch;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Current weather by city or by coordinates
///
/// GET /weather?city=Madrid&lang=es
/// GET /weather?lat=40.4&lon=-3.7
pub async fn get_weather(
    State(state): State<AppState>,
    search: WeatherSearch,
) -> Result<Json<WeatherRecord>, WeatherError> {
    let record = match search {
        WeatherSearch::City { city, lang } => {
            state
                .weather_service
                .lookup_by_city(&city, lang.as_deref())
                .await?
        }
        WeatherSearch::Coordinates { lat, lon, lang } => {
            state
                .weather_service
                .lookup_by_coordinates(Some(&lat), Some(&lon), lang.as_deref())
                .await?
        }
    };

    Ok(Json(record))
}
