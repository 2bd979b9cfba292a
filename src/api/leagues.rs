//! League directory endpoint.

use axum::{extract::State, Json};

use super::ApiResult;
use crate::models::LeagueDirectory;
use crate::AppState;

/// GET /dashboard - List every league with its teams.
pub async fn list_leagues(State(state): State<AppState>) -> ApiResult<LeagueDirectory> {
    let leagues = state.repo.list_leagues().await?;
    tracing::debug!(leagues = leagues.len(), "Listed league directory");
    Ok(Json(LeagueDirectory { leagues }))
}
