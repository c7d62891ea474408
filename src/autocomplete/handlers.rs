use axum::{
    extract::{Query, State},
    Json,
};

use super::models::{AutocompleteQuery, Suggestion};
use super::service::AutocompleteError;
use crate::AppState;

/// City suggestions for a partial name
///
/// GET /autocomplete?query=Mad
pub async fn autocomplete(
    State(state): State<AppState>,
    Query(query): Query<AutocompleteQuery>,
) -> Result<Json<Vec<Suggestion>>, AutocompleteError> {
    let suggestions = state
        .autocomplete_service
        .suggest(query.query.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(suggestions))
}
