use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::models::{CoordinateFallback, UpstreamPayload, WeatherRecord};
use crate::error::HttpError;
use crate::impl_into_response;
use crate::provider::{ProviderEndpoint, ProviderSettings};

const CURRENT_RESOURCE: &str = "current.json";

/// City lookups carry their own timeout; coordinate lookups use the client's
const CITY_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Weather service configuration is not available")]
    Configuration,

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Weather provider refused our credentials (HTTP {0})")]
    UpstreamAuth(u16),

    #[error("Weather provider is unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Weather provider did not respond in time")]
    UpstreamTimeout,

    #[error("Invalid response from weather provider: {0}")]
    UpstreamProtocol(String),

    #[error("Failed to query weather information: {0}")]
    Internal(String),
}

impl HttpError for WeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UpstreamAuth(_) => StatusCode::BAD_GATEWAY,
            Self::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::UpstreamProtocol(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Configuration => Some("CONFIGURATION_ERROR"),
            Self::InvalidInput(_) => Some("INVALID_INPUT"),
            Self::NotFound(_) => Some("NOT_FOUND"),
            Self::UpstreamAuth(_) => Some("UPSTREAM_AUTH_ERROR"),
            Self::UpstreamUnavailable(_) => Some("UPSTREAM_UNAVAILABLE"),
            Self::UpstreamTimeout => Some("UPSTREAM_TIMEOUT"),
            Self::UpstreamProtocol(_) => Some("UPSTREAM_PROTOCOL_ERROR"),
            Self::Internal(_) => Some("INTERNAL_ERROR"),
        }
    }
}

impl_into_response!(WeatherError);

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::UpstreamTimeout
        } else if err.is_connect() {
            Self::UpstreamUnavailable(format!("could not connect: {}", err))
        } else {
            Self::Internal(err.to_string())
        }
    }
}

/// Which query produced an upstream reply. The two modes read HTTP 400
/// differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LookupMode {
    City,
    Coordinates,
}

impl LookupMode {
    fn not_found(self, term: &str) -> WeatherError {
        match self {
            Self::City => WeatherError::NotFound(format!("City \"{}\" not found", term)),
            Self::Coordinates => WeatherError::NotFound(
                "No weather data found for the given coordinates".to_string(),
            ),
        }
    }
}

/// Map an upstream status (plus any error body) to a failure.
///
/// Returns `None` when the reply should go on to shape validation, which
/// includes statuses no rule covers.
fn classify_reply(
    mode: LookupMode,
    status: StatusCode,
    payload: &UpstreamPayload,
    term: &str,
) -> Option<WeatherError> {
    let not_found_status = match mode {
        LookupMode::City => StatusCode::NOT_FOUND,
        LookupMode::Coordinates => StatusCode::BAD_REQUEST,
    };
    if status == not_found_status || payload.is_location_not_found() {
        return Some(mode.not_found(term));
    }

    if status.is_success() {
        return None;
    }

    match status {
        StatusCode::BAD_REQUEST if mode == LookupMode::City => Some(WeatherError::InvalidInput(
            "Invalid request to the weather provider".to_string(),
        )),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Some(WeatherError::UpstreamAuth(status.as_u16()))
        }
        s if s.is_server_error() => Some(WeatherError::UpstreamUnavailable(format!(
            "provider answered HTTP {}",
            s
        ))),
        _ => None,
    }
}

/// Validate raw coordinate strings.
///
/// Checks run in order: missing, non-numeric, latitude range, longitude range.
pub fn parse_coordinates(lat: Option<&str>, lon: Option<&str>) -> Result<(f64, f64), WeatherError> {
    fn present(v: Option<&str>) -> Option<&str> {
        v.map(str::trim).filter(|v| !v.is_empty())
    }

    let (Some(lat), Some(lon)) = (present(lat), present(lon)) else {
        return Err(WeatherError::InvalidInput(
            "Coordinates (latitude and longitude) are required".to_string(),
        ));
    };

    let (Ok(lat), Ok(lon)) = (lat.parse::<f64>(), lon.parse::<f64>()) else {
        return Err(WeatherError::InvalidInput(
            "Coordinates must be numeric values".to_string(),
        ));
    };
    if !lat.is_finite() || !lon.is_finite() {
        return Err(WeatherError::InvalidInput(
            "Coordinates must be numeric values".to_string(),
        ));
    }

    if !(-90.0..=90.0).contains(&lat) {
        return Err(WeatherError::InvalidInput(
            "Latitude must be between -90 and 90 degrees".to_string(),
        ));
    }

    if !(-180.0..=180.0).contains(&lon) {
        return Err(WeatherError::InvalidInput(
            "Longitude must be between -180 and 180 degrees".to_string(),
        ));
    }

    Ok((lat, lon))
}

/// Current-conditions lookups against the provider's `current.json`
pub struct WeatherService {
    client: Client,
    provider: Arc<ProviderSettings>,
    default_lang: String,
    city_timeout: Duration,
}

impl WeatherService {
    pub fn new(client: Client, provider: Arc<ProviderSettings>, default_lang: &str) -> Self {
        Self {
            client,
            provider,
            default_lang: default_lang.to_string(),
            city_timeout: CITY_LOOKUP_TIMEOUT,
        }
    }

    #[cfg(test)]
    fn with_city_timeout(mut self, timeout: Duration) -> Self {
        self.city_timeout = timeout;
        self
    }

    fn endpoint(&self) -> Result<ProviderEndpoint<'_>, WeatherError> {
        self.provider.endpoint().ok_or_else(|| {
            tracing::error!("Weather provider API key or base URL is not configured");
            WeatherError::Configuration
        })
    }

    fn lang<'a>(&'a self, lang: Option<&'a str>) -> &'a str {
        lang.map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(self.default_lang.as_str())
    }

    /// Current weather for a city name
    pub async fn lookup_by_city(
        &self,
        city: &str,
        lang: Option<&str>,
    ) -> Result<WeatherRecord, WeatherError> {
        let endpoint = self.endpoint()?;

        let city = city.trim();
        if city.is_empty() {
            tracing::warn!("City lookup without a city name");
            return Err(WeatherError::InvalidInput(
                "City name is required".to_string(),
            ));
        }

        let lang = self.lang(lang);
        tracing::debug!(city = %city, lang = %lang, "Fetching current weather by city");

        self.fetch_current(
            endpoint,
            LookupMode::City,
            city,
            lang,
            Some(self.city_timeout),
            CoordinateFallback::default(),
        )
        .await
        .inspect(|w| tracing::info!(city = %w.location.name, temp_c = %w.current.temp_c, "Weather fetched"))
        .inspect_err(|e| tracing::error!(error = %e, city = %city, "City weather lookup failed"))
    }

    /// Current weather for a latitude/longitude pair given as raw strings
    pub async fn lookup_by_coordinates(
        &self,
        lat: Option<&str>,
        lon: Option<&str>,
        lang: Option<&str>,
    ) -> Result<WeatherRecord, WeatherError> {
        let endpoint = self.endpoint()?;

        let (lat, lon) = parse_coordinates(lat, lon)
            .inspect_err(|e| tracing::warn!(error = %e, "Rejected coordinates"))?;

        let term = format!("{},{}", lat, lon);
        let lang = self.lang(lang);
        tracing::debug!(q = %term, lang = %lang, "Fetching current weather by coordinates");

        self.fetch_current(
            endpoint,
            LookupMode::Coordinates,
            &term,
            lang,
            None,
            CoordinateFallback { lat, lon },
        )
        .await
        .inspect(|w| tracing::info!(location = %w.location.name, temp_c = %w.current.temp_c, "Weather fetched"))
        .inspect_err(|e| tracing::error!(error = %e, q = %term, "Coordinate weather lookup failed"))
    }

    async fn fetch_current(
        &self,
        endpoint: ProviderEndpoint<'_>,
        mode: LookupMode,
        term: &str,
        lang: &str,
        timeout: Option<Duration>,
        fallback: CoordinateFallback,
    ) -> Result<WeatherRecord, WeatherError> {
        let mut request = self
            .client
            .get(endpoint.url(CURRENT_RESOURCE))
            .query(&[
                ("key", endpoint.api_key),
                ("q", term),
                ("lang", lang),
                ("aqi", "no"),
            ]);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(status = %status, "Received provider response");

        // Error bodies are best effort: an unreadable one counts as empty
        let payload = serde_json::from_str::<UpstreamPayload>(&body).ok();
        let empty = UpstreamPayload::default();
        let view = payload.as_ref().unwrap_or(&empty);

        if let Some(err) = classify_reply(mode, status, view, term) {
            tracing::debug!(
                status = %status,
                provider_code = ?view.error_code(),
                provider_message = ?view.error_message(),
                "Provider reported a failure"
            );
            return Err(err);
        }

        let Some(payload) = payload else {
            tracing::error!(status = %status, body_len = body.len(), "Provider body is not a JSON object");
            return Err(WeatherError::UpstreamProtocol(
                "body is not a JSON object".to_string(),
            ));
        };

        match (payload.location, payload.current) {
            (Some(location), Some(current)) => {
                Ok(WeatherRecord::from_upstream(location, current, fallback))
            }
            (location, current) => {
                tracing::error!(
                    status = %status,
                    has_location = location.is_some(),
                    has_current = current.is_some(),
                    "Provider payload is missing a section"
                );
                Err(WeatherError::UpstreamProtocol(
                    "missing location or current section".to_string(),
                ))
            }
        }
    }
}
