use crate::{error::{LeagueError, LeagueResult}, logic::{division::Division, season::Season, types::{Db, DivisionId, SeasonId}}};

impl Division {
    // Add a division to an existing season.
    pub async fn create(db: &Db, season_id: SeasonId, name: &str) -> LeagueResult<Self> {
        if Season::fetch(db, season_id).await?.is_none() {
            return Err(LeagueError::not_found("season", season_id));
        }

        let mut division = Self::build(season_id, name);
        division.id = sqlx::query_scalar(
            "INSERT INTO Division
            (season_id, division_name)
            VALUES ($1, $2)
            RETURNING id"
        ).bind(division.season_id)
        .bind(division.name.as_str())
        .fetch_one(db).await?;

        return Ok(division);
    }

    // Get a division, but only if it belongs to the given season.
    pub async fn fetch(db: &Db, season_id: SeasonId, id: DivisionId) -> LeagueResult<Option<Self>> {
        let division = sqlx::query_as(
            "SELECT * FROM Division
            WHERE id = $1 AND season_id = $2"
        ).bind(id)
        .bind(season_id)
        .fetch_optional(db).await?;

        Ok(division)
    }

    pub async fn all(db: &Db, season_id: SeasonId) -> LeagueResult<Vec<Self>> {
        let divisions = sqlx::query_as(
            "SELECT * FROM Division
            WHERE season_id = $1
            ORDER BY id ASC"
        ).bind(season_id)
        .fetch_all(db).await?;

        Ok(divisions)
    }
}
