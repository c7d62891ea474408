use std::sync::Arc;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::models::{SearchResult, Suggestion};
use crate::error::HttpError;
use crate::impl_into_response;
use crate::provider::ProviderSettings;

const SEARCH_RESOURCE: &str = "search.json";

#[derive(Error, Debug)]
pub enum AutocompleteError {
    #[error("Weather service configuration is not available")]
    Configuration,

    #[error("City search failed with HTTP {0}")]
    Upstream(u16),

    #[error("Weather provider did not respond in time")]
    Timeout,

    #[error("Weather provider is unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid search response: {0}")]
    InvalidResponse(String),

    #[error("City search failed: {0}")]
    Internal(String),
}

impl HttpError for AutocompleteError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Unavailable(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Configuration => Some("CONFIGURATION_ERROR"),
            Self::Upstream(_) => Some("UPSTREAM_ERROR"),
            Self::Timeout => Some("UPSTREAM_TIMEOUT"),
            Self::Unavailable(_) => Some("UPSTREAM_UNAVAILABLE"),
            Self::InvalidResponse(_) => Some("UPSTREAM_PROTOCOL_ERROR"),
            Self::Internal(_) => Some("INTERNAL_ERROR"),
        }
    }
}

impl_into_response!(AutocompleteError);

impl From<reqwest::Error> for AutocompleteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Unavailable(format!("could not connect: {}", err))
        } else {
            Self::Internal(err.to_string())
        }
    }
}

/// City suggestions from the provider's `search.json`
pub struct AutocompleteService {
    client: Client,
    provider: Arc<ProviderSettings>,
}

impl AutocompleteService {
    pub fn new(client: Client, provider: Arc<ProviderSettings>) -> Self {
        Self { client, provider }
    }

    pub async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, AutocompleteError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let endpoint = self.provider.endpoint().ok_or_else(|| {
            tracing::error!("Weather provider API key or base URL is not configured");
            AutocompleteError::Configuration
        })?;

        tracing::debug!(query = %query, "Searching cities");

        let response = self
            .client
            .get(endpoint.url(SEARCH_RESOURCE))
            .query(&[("key", endpoint.api_key), ("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, query = %query, "City search rejected by provider");
            return Err(AutocompleteError::Upstream(status.as_u16()));
        }

        let body = response.text().await?;
        let results: Vec<SearchResult> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Unreadable city search response");
            AutocompleteError::InvalidResponse(e.to_string())
        })?;

        let suggestions: Vec<Suggestion> = results.into_iter().map(Suggestion::from).collect();
        tracing::debug!(query = %query, count = suggestions.len(), "City search complete");

        Ok(suggestions)
    }
}
