use tracing::info;

use crate::{error::{LeagueError, LeagueResult}, logic::{division::Division, team::Team, types::{Db, DivisionId, SeasonId, TeamId}}};

impl Team {
    // Save a new team. The division must belong to the team's season.
    pub async fn add(&mut self, db: &Db) -> LeagueResult<()> {
        if self.name.is_empty() {
            return Err(LeagueError::InvalidInput("team name cannot be empty".to_string()));
        }
        if Division::fetch(db, self.season_id, self.division_id).await?.is_none() {
            return Err(LeagueError::InvalidInput(format!(
                "division {} is not part of season {}", self.division_id, self.season_id
            )));
        }

        self.id = sqlx::query_scalar(
            "INSERT INTO Team
            (full_name, short_name, color_hex, color_name, season_id, division_id, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id"
        ).bind(self.name.as_str())
        .bind(self.short_name.as_str())
        .bind(self.color_hex.as_str())
        .bind(self.color_name.as_str())
        .bind(self.season_id)
        .bind(self.division_id)
        .bind(self.is_active)
        .fetch_one(db).await?;

        info!(team_id = self.id, name = self.name.as_str(), division_id = self.division_id, "team added");
        Ok(())
    }

    // Remove a team from its division. Its past games stay.
    pub async fn deactivate(db: &Db, id: TeamId) -> LeagueResult<()> {
        let result = sqlx::query(
            "UPDATE Team SET is_active = 0 WHERE id = $1"
        ).bind(id)
        .execute(db).await?;

        if result.rows_affected() == 0 {
            return Err(LeagueError::not_found("team", id));
        }

        info!(team_id = id, "team deactivated");
        Ok(())
    }

    pub async fn fetch(db: &Db, id: TeamId) -> LeagueResult<Self> {
        let team: Option<Self> = sqlx::query_as(
            "SELECT * FROM Team WHERE id = $1"
        ).bind(id)
        .fetch_optional(db).await?;

        team.ok_or_else(|| LeagueError::not_found("team", id))
    }

    // Active teams of a division, ordered by name. This order is the schedule generator's input.
    pub async fn roster(db: &Db, season_id: SeasonId, division_id: DivisionId) -> LeagueResult<Vec<Self>> {
        let teams = sqlx::query_as(
            "SELECT * FROM Team
            WHERE season_id = $1 AND division_id = $2 AND is_active = 1
            ORDER BY full_name ASC, id ASC"
        ).bind(season_id)
        .bind(division_id)
        .fetch_all(db).await?;

        Ok(teams)
    }

    // Every active team of the season, division by division.
    pub async fn all_active(db: &Db, season_id: SeasonId) -> LeagueResult<Vec<Self>> {
        let teams = sqlx::query_as(
            "SELECT * FROM Team
            WHERE season_id = $1 AND is_active = 1
            ORDER BY division_id ASC, full_name ASC, id ASC"
        ).bind(season_id)
        .fetch_all(db).await?;

        Ok(teams)
    }

    // Every team the season has had, removed ones included. Old games still point at them.
    pub async fn all(db: &Db, season_id: SeasonId) -> LeagueResult<Vec<Self>> {
        let teams = sqlx::query_as(
            "SELECT * FROM Team
            WHERE season_id = $1
            ORDER BY id ASC"
        ).bind(season_id)
        .fetch_all(db).await?;

        Ok(teams)
    }

    // Find an active team whose name contains the given text.
    pub async fn find_by_name(db: &Db, season_id: SeasonId, name: &str) -> LeagueResult<Option<Self>> {
        let team = sqlx::query_as(
            "SELECT * FROM Team
            WHERE season_id = $1 AND is_active = 1 AND full_name LIKE $2
            ORDER BY full_name ASC, id ASC
            LIMIT 1"
        ).bind(season_id)
        .bind(format!("%{}%", name.trim()))
        .fetch_optional(db).await?;

        Ok(team)
    }
}
