use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A city a user saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    /// Generated on creation (UUID v4)
    pub id: String,

    pub user_id: i64,

    pub city: String,

    pub lat: f64,

    pub lon: f64,

    /// Creation time, unix milliseconds
    pub created_at: i64,
}

/// Request to save a favorite
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFavoriteRequest {
    pub user_id: i64,
    pub city: String,
    pub lat: f64,
    pub lon: f64,
}
