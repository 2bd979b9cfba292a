//! Import snapshot format.
//!
//! A snapshot is the JSON document loaded into the backing store on startup:
//! leagues own teams, teams own players, and `site_options` holds the raw
//! CMS field values by name.

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub leagues: Vec<LeagueSnapshot>,
    #[serde(default)]
    pub site_options: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueSnapshot {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub teams: Vec<TeamSnapshot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamSnapshot {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub players: Vec<PlayerSnapshot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerSnapshot {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub mlb_team: String,
    #[serde(default)]
    pub status_40_man: bool,
    #[serde(default)]
    pub status_26_man: bool,
    #[serde(default)]
    pub status_il: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_snapshot_defaults() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{
                "leagues": [{
                    "id": "l1",
                    "name": "MLB",
                    "teams": [{
                        "id": "t1",
                        "name": "Aces",
                        "players": [{"id": "p1", "first_name": "Sam", "last_name": "Ruiz"}]
                    }]
                }]
            }"#,
        )
        .unwrap();

        let player = &snapshot.leagues[0].teams[0].players[0];
        assert!(snapshot.site_options.is_empty());
        assert_eq!(snapshot.leagues[0].teams[0].owner, "");
        assert!(!player.status_26_man && !player.status_40_man);
        assert!(player.status_il.is_none());
    }
}
