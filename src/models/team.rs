//! Team detail and roster models.

use serde::{Deserialize, Serialize};

/// Status shown for players on the 26-man roster.
pub const STATUS_ACTIVE_26: &str = "Active (26-Man)";
/// Status shown for 40-man players not on the 26-man roster.
pub const STATUS_FORTY_MAN: &str = "40-Man (Minors)";
/// Status shown for players off the 40-man roster.
pub const STATUS_MINORS: &str = "Minors (Non-40)";

/// A player on a team roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub mlb_team: String,
    pub status: String,
}

/// A team with its owner and full roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDetail {
    pub id: String,
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub league_id: String,
    #[serde(default)]
    pub league_name: String,
    #[serde(default)]
    pub players: Vec<Player>,
}

/// Derive the display status from the stored roster designations.
///
/// An injured-list designation wins over roster membership.
pub fn roster_status(injured_list: Option<&str>, on_26_man: bool, on_40_man: bool) -> String {
    match injured_list.map(str::trim).filter(|il| !il.is_empty()) {
        Some(il) => il.to_string(),
        None if on_26_man => STATUS_ACTIVE_26.to_string(),
        None if on_40_man => STATUS_FORTY_MAN.to_string(),
        None => STATUS_MINORS.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injured_list_wins() {
        assert_eq!(roster_status(Some("60-Day IL"), true, true), "60-Day IL");
    }

    #[test]
    fn test_blank_injured_list_is_ignored() {
        assert_eq!(roster_status(Some("  "), true, true), STATUS_ACTIVE_26);
    }

    #[test]
    fn test_roster_levels() {
        assert_eq!(roster_status(None, true, true), STATUS_ACTIVE_26);
        assert_eq!(roster_status(None, false, true), STATUS_FORTY_MAN);
        assert_eq!(roster_status(None, false, false), STATUS_MINORS);
    }

    #[test]
    fn test_detail_deserializes_without_league_fields() {
        let team: TeamDetail =
            serde_json::from_str(r#"{"id":"t1","name":"Aces","owner":"Dana","players":[]}"#)
                .unwrap();
        assert_eq!(team.id, "t1");
        assert!(team.league_id.is_empty());
        assert!(team.players.is_empty());
    }
}
