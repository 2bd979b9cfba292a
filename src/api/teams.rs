//! Roster endpoint.

use axum::{
    extract::{Path, State},
    Json,
};

use super::ApiResult;
use crate::errors::AppError;
use crate::models::TeamDetail;
use crate::AppState;

/// GET /teams/:id - Get a team with its roster.
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<TeamDetail> {
    if id.trim().is_empty() {
        return Err(AppError::Validation("Team id is required".to_string()));
    }

    match state.repo.get_team(&id).await? {
        Some(team) => Ok(Json(team)),
        None => Err(AppError::NotFound(format!("Team {} not found", id))),
    }
}
