//! Team roster view.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};

use super::{escape_html, page, ApiClient, LoadState, ViewHandle};
use crate::models::{Player, TeamDetail};
use crate::AppState;

/// GET /roster/:id - Render one team and its players.
pub async fn roster_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let api = state.api.clone();
    let mut view = ViewHandle::mount(async move { load_team(&api, &id).await });

    let current = view.settled().await;
    (current.status_code(), Html(render_roster(&current))).into_response()
}

async fn load_team(api: &ApiClient, id: &str) -> LoadState<TeamDetail> {
    // No team has a blank id.
    if id.trim().is_empty() {
        return LoadState::NotFound;
    }

    match api.fetch_team(id).await {
        Ok(Some(team)) => LoadState::Loaded(team),
        Ok(None) => LoadState::NotFound,
        Err(e) => {
            tracing::error!("Failed to load roster for team {}: {}", id, e);
            LoadState::Failed(e.to_string())
        }
    }
}

pub fn render_roster(state: &LoadState<TeamDetail>) -> String {
    match state {
        LoadState::Loading => page(
            "Roster",
            r#"<div class="status loading">Scouting Roster...</div>"#,
        ),
        LoadState::NotFound => page(
            "Team not found",
            r#"<div class="status error">Team not found.</div>"#,
        ),
        LoadState::Failed(_) => page(
            "Roster unavailable",
            r#"<div class="status error">Could not load this roster. Please try again shortly.</div>"#,
        ),
        LoadState::Loaded(team) => page(&team.name, &render_team(team)),
    }
}

fn render_team(team: &TeamDetail) -> String {
    let mut html = String::from("<a href=\"/\">&larr; Back to Dashboard</a>\n");

    html.push_str(&format!(
        "<section class=\"card\">\n<h1>{}</h1>\n<p>Owner: <strong>{}</strong></p>\n",
        escape_html(&team.name),
        escape_html(&team.owner)
    ));
    if !team.league_name.is_empty() {
        html.push_str(&format!("<p>League: {}</p>\n", escape_html(&team.league_name)));
    }
    html.push_str("</section>\n");

    html.push_str(
        "<section class=\"card\">\n<div class=\"card-header\">Active Roster</div>\n<table>\n\
         <thead><tr><th>Pos</th><th>Player</th><th>MLB Team</th><th>Status</th></tr></thead>\n<tbody>\n",
    );
    if team.players.is_empty() {
        html.push_str("<tr><td colspan=\"4\" class=\"empty\">No players on this roster.</td></tr>\n");
    } else {
        for player in &team.players {
            html.push_str(&render_player_row(player));
        }
    }
    html.push_str("</tbody>\n</table>\n</section>");
    html
}

fn render_player_row(player: &Player) -> String {
    format!(
        "<tr><td>{}</td><td>{} {}</td><td>{}</td><td><span class=\"status-pill\">{}</span></td></tr>\n",
        escape_html(&player.position),
        escape_html(&player.first_name),
        escape_html(&player.last_name),
        escape_html(&player.mlb_team),
        escape_html(&player.status)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(players: Vec<Player>) -> TeamDetail {
        TeamDetail {
            id: "t-1".to_string(),
            name: "Seattle Sluggers".to_string(),
            owner: "Dana".to_string(),
            league_id: "l-1".to_string(),
            league_name: "MLB".to_string(),
            players,
        }
    }

    #[tokio::test]
    async fn test_blank_id_is_not_found_without_a_request() {
        // Nothing listens here, so any request would fail the load.
        let api = ApiClient::new("http://127.0.0.1:9", std::time::Duration::from_secs(1)).unwrap();

        assert_eq!(load_team(&api, "").await, LoadState::NotFound);
        assert_eq!(load_team(&api, "  ").await, LoadState::NotFound);
    }

    #[test]
    fn test_players_render_as_rows() {
        let html = render_roster(&LoadState::Loaded(team(vec![Player {
            id: "p-1".to_string(),
            first_name: "Julio".to_string(),
            last_name: "Rodriguez".to_string(),
            position: "CF".to_string(),
            mlb_team: "SEA".to_string(),
            status: "Active (26-Man)".to_string(),
        }])));

        assert!(html.contains("Owner: <strong>Dana</strong>"));
        assert!(html.contains("<td>CF</td><td>Julio Rodriguez</td><td>SEA</td>"));
        assert!(html.contains("Active (26-Man)"));
        assert!(!html.contains("No players on this roster."));
    }

    #[test]
    fn test_empty_roster_has_single_message_row() {
        let html = render_roster(&LoadState::Loaded(team(Vec::new())));
        assert_eq!(html.matches("<tr>").count(), 2);
        assert!(html.contains("No players on this roster."));
    }

    #[test]
    fn test_not_found_and_failure_are_distinct() {
        let missing = render_roster(&LoadState::NotFound);
        let failed = render_roster(&LoadState::Failed("timeout".into()));

        assert!(missing.contains("Team not found."));
        assert!(failed.contains("Could not load this roster."));
        assert!(!failed.contains("Team not found."));
    }
}
