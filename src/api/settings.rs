//! Settings bridge endpoint.

use axum::{extract::State, Json};

use super::ApiResult;
use crate::models::SettingsDocument;
use crate::settings;
use crate::AppState;

/// GET /fod-bridge/v1/site-settings - Assemble the site settings document.
pub async fn get_site_settings(State(state): State<AppState>) -> ApiResult<SettingsDocument> {
    let document = settings::aggregate(state.fields.as_ref(), &state.config.leagues).await?;
    Ok(Json(document))
}
