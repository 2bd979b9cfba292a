//! League dashboard view.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};

use super::{escape_html, page, ApiClient, LoadState, ViewHandle};
use crate::models::League;
use crate::AppState;

/// GET / - Render the league directory as a grid of league cards.
pub async fn dashboard_page(State(state): State<AppState>) -> Response {
    let api = state.api.clone();
    let mut view = ViewHandle::mount(async move { load_directory(&api).await });

    let current = view.settled().await;
    (current.status_code(), Html(render_dashboard(&current))).into_response()
}

async fn load_directory(api: &ApiClient) -> LoadState<Vec<League>> {
    match api.fetch_directory().await {
        Ok(leagues) => LoadState::Loaded(leagues),
        Err(e) => {
            tracing::error!("Failed to load dashboard: {}", e);
            LoadState::Failed(e.to_string())
        }
    }
}

pub fn render_dashboard(state: &LoadState<Vec<League>>) -> String {
    let body = match state {
        LoadState::Loading => {
            r#"<div class="status loading">Loading Commissioner Data...</div>"#.to_string()
        }
        LoadState::NotFound | LoadState::Failed(_) => {
            r#"<div class="status error">Could not load league data. Please try again shortly.</div>"#
                .to_string()
        }
        LoadState::Loaded(leagues) => render_grid(leagues),
    };
    page("Moneyball Dynasty", &body)
}

fn render_grid(leagues: &[League]) -> String {
    let mut html = String::from(
        "<header>\n<h1>Moneyball Dynasty</h1>\n<p>League Operations Center</p>\n</header>\n",
    );

    if leagues.is_empty() {
        html.push_str(r#"<p class="empty">No leagues have been set up yet.</p>"#);
        return html;
    }

    html.push_str("<div class=\"grid\">\n");
    for league in leagues {
        html.push_str(&render_card(league));
    }
    html.push_str("</div>");
    html
}

fn render_card(league: &League) -> String {
    let short_id: String = league.id.chars().take(4).collect();
    let mut html = format!(
        "<section class=\"card\">\n<h2>{} <span class=\"league-id\">ID: {}...</span></h2>\n<h3>Teams</h3>\n",
        escape_html(&league.name),
        escape_html(&short_id)
    );

    if league.teams.is_empty() {
        html.push_str("<p class=\"empty\">No teams in this league yet.</p>\n");
    } else {
        html.push_str("<ul>\n");
        for team in &league.teams {
            html.push_str(&format!(
                "<li><span>{}</span> <a href=\"/roster/{}\">Manage &rarr;</a></li>\n",
                escape_html(&team.name),
                escape_html(&team.id)
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</section>\n");
    html
}
