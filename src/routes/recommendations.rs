use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::SessionId,
    models::{FilterCriteria, Recommendation},
    routes::AppState,
    services::{filters::lenient_decimal, recommendations, selections},
};

/// Filter fields as typed into the form. Unparseable values mean "no constraint".
#[derive(Debug, Default, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub max_age: Option<f64>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub max_play_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub min_player_count: Option<f64>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub max_complexity: Option<f64>,
}

impl From<RecommendationRequest> for FilterCriteria {
    fn from(request: RecommendationRequest) -> Self {
        FilterCriteria {
            max_age: request.max_age,
            max_play_time: request.max_play_time,
            min_player_count: request.min_player_count,
            max_complexity: request.max_complexity,
        }
    }
}

/// Handler for recommendations endpoint
///
/// Always answers 200; an empty list comes with a message explaining why.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Recommendation>> {
    let selection = selections::current_selection(state.selections.as_ref(), &session_id).await?;
    let filters = FilterCriteria::from(request);

    tracing::info!(
        session_id = %session_id,
        selections = selection.names.len(),
        filters = ?filters,
        "Processing recommendation request"
    );

    let result = recommendations::recommend(&state.games, &selection.names, &filters);
    Ok(Json(result))
}
