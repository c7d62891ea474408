use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};

use crate::error::ErrorResponse;

const CITY_MIN_CHARS: usize = 2;
const CITY_MAX_CHARS: usize = 50;

/// Raw query string of `GET /weather`
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub city: Option<String>,
    pub lang: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// What a weather request asks for.
///
/// Coordinates win whenever both `lat` and `lon` are present, even if a city
/// is also given. Coordinate strings are passed through unvalidated; the
/// weather service checks them.
#[derive(Debug, PartialEq)]
pub enum WeatherSearch {
    City {
        city: String,
        lang: Option<String>,
    },
    Coordinates {
        lat: String,
        lon: String,
        lang: Option<String>,
    },
}

impl WeatherSearch {
    pub fn from_params(params: SearchParams) -> Result<Self, InputRejection> {
        match (params.lat, params.lon) {
            (Some(lat), Some(lon)) => Ok(Self::Coordinates {
                lat,
                lon,
                lang: params.lang,
            }),
            _ => Ok(Self::City {
                city: validate_city(params.city)?,
                lang: params.lang,
            }),
        }
    }
}

fn is_city_char(c: char) -> bool {
    c.is_ascii_alphabetic()
        || ('\u{00C0}'..='\u{00FF}').contains(&c)
        || c.is_whitespace()
        || c == '-'
        || c == '\''
}

/// Shape rules for a city name: 2-50 characters of letters, spaces, `-` or `'`
fn validate_city(city: Option<String>) -> Result<String, InputRejection> {
    let city = city
        .filter(|c| !c.is_empty())
        .ok_or_else(|| InputRejection::new("City name is required"))?;

    let len = city.chars().count();
    if !(CITY_MIN_CHARS..=CITY_MAX_CHARS).contains(&len) {
        return Err(InputRejection::new(format!(
            "City name must be between {} and {} characters",
            CITY_MIN_CHARS, CITY_MAX_CHARS
        )));
    }

    if !city.chars().all(is_city_char) {
        return Err(InputRejection::new(
            "City name may only contain letters and spaces",
        ));
    }

    Ok(city)
}

impl<S> FromRequestParts<S> for WeatherSearch
where
    S: Send + Sync,
{
    type Rejection = InputRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<SearchParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| InputRejection::new(e.body_text()))?;

        Self::from_params(params)
    }
}

/// JSON request body whose decoding failures answer 400 `INVALID_INPUT`
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = InputRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| InputRejection::new(e.body_text()))?;

        Ok(Self(value))
    }
}

/// Rejection for a malformed query string or request body
#[derive(Debug)]
pub struct InputRejection(pub String);

impl InputRejection {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl IntoResponse for InputRejection {
    fn into_response(self) -> Response {
        tracing::warn!(reason = %self.0, "Rejected request input");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::with_code(self.0, "INVALID_INPUT")),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(city: Option<&str>, lat: Option<&str>, lon: Option<&str>) -> SearchParams {
        SearchParams {
            city: city.map(String::from),
            lang: Some("en".to_string()),
            lat: lat.map(String::from),
            lon: lon.map(String::from),
        }
    }

    #[test]
    fn test_coordinates_take_precedence() {
        let search = WeatherSearch::from_params(params(Some("Madrid"), Some("40.4"), Some("-3.7")));
        assert_eq!(
            search.unwrap(),
            WeatherSearch::Coordinates {
                lat: "40.4".to_string(),
                lon: "-3.7".to_string(),
                lang: Some("en".to_string()),
            }
        );
    }

    #[test]
    fn test_single_coordinate_means_city_mode() {
        let search = WeatherSearch::from_params(params(Some("Madrid"), Some("40.4"), None));
        assert!(matches!(search, Ok(WeatherSearch::City { .. })));
    }

    #[test]
    fn test_empty_coordinates_still_select_coordinate_mode() {
        let search = WeatherSearch::from_params(params(None, Some(""), Some("")));
        assert!(matches!(search, Ok(WeatherSearch::Coordinates { .. })));
    }

    #[test]
    fn test_city_is_required() {
        assert!(WeatherSearch::from_params(params(None, None, None)).is_err());
        assert!(WeatherSearch::from_params(params(Some(""), None, None)).is_err());
    }

    #[test]
    fn test_city_length_bounds() {
        assert!(validate_city(Some("A".to_string())).is_err());
        assert!(validate_city(Some("Ab".to_string())).is_ok());
        assert!(validate_city(Some("a".repeat(50))).is_ok());
        assert!(validate_city(Some("a".repeat(51))).is_err());
    }

    #[test]
    fn test_city_character_class() {
        assert!(validate_city(Some("São Paulo".to_string())).is_ok());
        assert!(validate_city(Some("Saint-Étienne".to_string())).is_ok());
        assert!(validate_city(Some("L'Aquila".to_string())).is_ok());
        assert!(validate_city(Some("Madrid1".to_string())).is_err());
        assert!(validate_city(Some("Łódź".to_string())).is_err());
        assert!(validate_city(Some("Paris; DROP".to_string())).is_err());
    }
}
