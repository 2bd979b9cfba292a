//! Database repository for league, roster and site option reads.
//!
//! Writes only happen through snapshot imports, which run in a single transaction.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{roster_status, League, Player, Snapshot, TeamDetail, TeamSummary};
use crate::settings::FieldSource;

/// Counts of rows written by a snapshot import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub leagues: usize,
    pub teams: usize,
    pub players: usize,
    pub options: usize,
}

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== LEAGUE DIRECTORY ====================

    /// List every league with its teams, in storage order.
    pub async fn list_leagues(&self) -> Result<Vec<League>, AppError> {
        let league_rows = sqlx::query("SELECT id, name FROM leagues ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;

        let mut leagues: Vec<League> = league_rows
            .iter()
            .map(|row| League {
                id: row.get("id"),
                name: row.get("name"),
                teams: Vec::new(),
            })
            .collect();

        let positions: HashMap<String, usize> = leagues
            .iter()
            .enumerate()
            .map(|(i, league)| (league.id.clone(), i))
            .collect();

        let team_rows = sqlx::query("SELECT id, league_id, name FROM teams ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;

        for row in &team_rows {
            let league_id: String = row.get("league_id");
            if let Some(&i) = positions.get(&league_id) {
                leagues[i].teams.push(TeamSummary {
                    id: row.get("id"),
                    name: row.get("name"),
                });
            }
        }

        Ok(leagues)
    }

    // ==================== ROSTER ====================

    /// Get a team with its owner and roster.
    pub async fn get_team(&self, id: &str) -> Result<Option<TeamDetail>, AppError> {
        let row = sqlx::query(
            r#"SELECT t.id, t.name, t.owner_name, t.league_id, l.name AS league_name
               FROM teams t
               JOIN leagues l ON t.league_id = l.id
               WHERE t.id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let player_rows = sqlx::query(
            r#"SELECT id, first_name, last_name, position, mlb_team,
                      status_40_man, status_26_man, status_il
               FROM players WHERE team_id = ? ORDER BY rowid"#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(TeamDetail {
            id: row.get("id"),
            name: row.get("name"),
            owner: row.get("owner_name"),
            league_id: row.get("league_id"),
            league_name: row.get("league_name"),
            players: player_rows.iter().map(player_from_row).collect(),
        }))
    }

    // ==================== SITE OPTIONS ====================

    /// Whether the `site_options` field store exists in this database.
    pub async fn site_options_installed(&self) -> Result<bool, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND name = 'site_options'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<i64, _>("n") > 0)
    }

    /// Read a stored option by name.
    ///
    /// Values that are not valid JSON are returned as JSON strings.
    pub async fn get_option(&self, name: &str) -> Result<Option<Value>, AppError> {
        let raw: Option<String> = sqlx::query_scalar("SELECT value FROM site_options WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(raw.map(|raw| serde_json::from_str(&raw).unwrap_or(Value::String(raw))))
    }

    // ==================== IMPORT ====================

    /// Upsert a snapshot. Existing rows keep their storage position.
    pub async fn import_snapshot(&self, snapshot: &Snapshot) -> Result<ImportSummary, AppError> {
        let mut summary = ImportSummary::default();
        let mut tx = self.pool.begin().await?;

        for league in &snapshot.leagues {
            sqlx::query(
                "INSERT INTO leagues (id, name) VALUES (?, ?) ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            )
            .bind(&league.id)
            .bind(&league.name)
            .execute(&mut *tx)
            .await?;
            summary.leagues += 1;

            for team in &league.teams {
                sqlx::query(
                    r#"INSERT INTO teams (id, league_id, name, owner_name) VALUES (?, ?, ?, ?)
                       ON CONFLICT(id) DO UPDATE SET
                           league_id = excluded.league_id,
                           name = excluded.name,
                           owner_name = excluded.owner_name"#,
                )
                .bind(&team.id)
                .bind(&league.id)
                .bind(&team.name)
                .bind(&team.owner)
                .execute(&mut *tx)
                .await?;
                summary.teams += 1;

                for player in &team.players {
                    sqlx::query(
                        r#"INSERT INTO players (
                               id, team_id, first_name, last_name, position, mlb_team,
                               status_40_man, status_26_man, status_il
                           ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                           ON CONFLICT(id) DO UPDATE SET
                               team_id = excluded.team_id,
                               first_name = excluded.first_name,
                               last_name = excluded.last_name,
                               position = excluded.position,
                               mlb_team = excluded.mlb_team,
                               status_40_man = excluded.status_40_man,
                               status_26_man = excluded.status_26_man,
                               status_il = excluded.status_il"#,
                    )
                    .bind(&player.id)
                    .bind(&team.id)
                    .bind(&player.first_name)
                    .bind(&player.last_name)
                    .bind(&player.position)
                    .bind(&player.mlb_team)
                    .bind(player.status_40_man as i32)
                    .bind(player.status_26_man as i32)
                    .bind(&player.status_il)
                    .execute(&mut *tx)
                    .await?;
                    summary.players += 1;
                }
            }
        }

        for (name, value) in &snapshot.site_options {
            sqlx::query(
                "INSERT INTO site_options (name, value) VALUES (?, ?) ON CONFLICT(name) DO UPDATE SET value = excluded.value",
            )
            .bind(name)
            .bind(serde_json::to_string(value)?)
            .execute(&mut *tx)
            .await?;
            summary.options += 1;
        }

        tx.commit().await?;
        Ok(summary)
    }

    /// Read a JSON snapshot file and import it.
    pub async fn import_snapshot_file(&self, path: &Path) -> Result<ImportSummary, AppError> {
        let bytes = tokio::fs::read(path).await?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
        self.import_snapshot(&snapshot).await
    }
}

#[async_trait]
impl FieldSource for Repository {
    async fn is_available(&self) -> Result<bool, AppError> {
        self.site_options_installed().await
    }

    async fn get_field(&self, name: &str) -> Result<Option<Value>, AppError> {
        self.get_option(name).await
    }
}

fn player_from_row(row: &SqliteRow) -> Player {
    let status_il: Option<String> = row.get("status_il");
    Player {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        position: row.get("position"),
        mlb_team: row.get("mlb_team"),
        status: roster_status(
            status_il.as_deref(),
            row.get::<bool, _>("status_26_man"),
            row.get::<bool, _>("status_40_man"),
        ),
    }
}
