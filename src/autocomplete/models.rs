use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    /// Partial city name typed by the user
    pub query: Option<String>,
}

/// One city suggestion, `name` formatted as "city, country"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Suggestion {
    pub id: i64,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Entry of the provider's `search.json` array (fields we do not use are skipped)
#[derive(Debug, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
}

impl From<SearchResult> for Suggestion {
    fn from(r: SearchResult) -> Self {
        Suggestion {
            id: r.id,
            name: format!("{}, {}", r.name, r.country),
            lat: r.lat,
            lon: r.lon,
        }
    }
}
