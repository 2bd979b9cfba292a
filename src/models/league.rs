//! League directory models.

use serde::{Deserialize, Serialize};

/// A team as listed in the league directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub id: String,
    pub name: String,
}

/// A league together with its teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub teams: Vec<TeamSummary>,
}

/// Response body of the league directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueDirectory {
    #[serde(default)]
    pub leagues: Vec<League>,
}
