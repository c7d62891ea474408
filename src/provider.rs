//! Connection settings for the upstream weather provider.
//!
//! Key and base URL are read once at startup and never change, so services
//! share one [`ProviderSettings`] behind an `Arc` without locking.

use crate::config::AppConfig;

#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    api_key: Option<String>,
    base_url: Option<String>,
}

/// A fully configured provider: both key and base URL are present
#[derive(Debug, Clone, Copy)]
pub struct ProviderEndpoint<'a> {
    pub api_key: &'a str,
    base_url: &'a str,
}

impl ProviderSettings {
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.filter(|u| !u.trim().is_empty()),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.weather_api_key.clone(),
            config.weather_api_base_url.clone(),
        )
    }

    /// Returns `None` when either the key or the base URL is missing
    pub fn endpoint(&self) -> Option<ProviderEndpoint<'_>> {
        Some(ProviderEndpoint {
            api_key: self.api_key.as_deref()?,
            base_url: self.base_url.as_deref()?,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint().is_some()
    }
}

impl ProviderEndpoint<'_> {
    /// URL of a provider resource such as `current.json`.
    ///
    /// The base URL may be given with or without a trailing slash.
    pub fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), resource)
    }
}
