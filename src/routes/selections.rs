use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::{
    error::AppResult,
    middleware::SessionId,
    models::{SelectionSubmission, UserSelection},
    routes::AppState,
    services::selections,
};

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub selections: Vec<String>,
}

impl From<UserSelection> for SelectionResponse {
    fn from(selection: UserSelection) -> Self {
        Self {
            selections: selection.names,
        }
    }
}

/// Returns the games picked so far in this session
pub async fn get_selection(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> AppResult<Json<SelectionResponse>> {
    let selection = selections::current_selection(state.selections.as_ref(), &session_id).await?;
    Ok(Json(selection.into()))
}

/// Appends a free-text entry and/or checked suggestions to the session's list
pub async fn add_selection(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Json(submission): Json<SelectionSubmission>,
) -> AppResult<Json<SelectionResponse>> {
    let selection = selections::add_to_selection(
        state.selections.as_ref(),
        &session_id,
        submission.entries(),
    )
    .await?;
    Ok(Json(selection.into()))
}

/// Empties the session's list
pub async fn clear_selection(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> AppResult<Json<SelectionResponse>> {
    let selection = selections::clear_selection(state.selections.as_ref(), &session_id).await?;
    Ok(Json(selection.into()))
}
