use time::Date;

use crate::{error::{LeagueError, LeagueResult}, logic::{blackout::BlackoutDate, season::Season, types::{BlackoutId, Db, SeasonId}}};

impl BlackoutDate {
    pub async fn add(db: &Db, season_id: SeasonId, date: Date, reason: Option<&str>) -> LeagueResult<Self> {
        if Season::fetch(db, season_id).await?.is_none() {
            return Err(LeagueError::not_found("season", season_id));
        }

        let blackout = sqlx::query_as(
            "INSERT INTO BlackoutDate
            (season_id, blackout_date, reason)
            VALUES ($1, $2, $3)
            RETURNING *"
        ).bind(season_id)
        .bind(date)
        .bind(reason)
        .fetch_one(db).await?;

        Ok(blackout)
    }

    pub async fn delete(db: &Db, id: BlackoutId) -> LeagueResult<()> {
        let result = sqlx::query(
            "DELETE FROM BlackoutDate WHERE id = $1"
        ).bind(id)
        .execute(db).await?;

        if result.rows_affected() == 0 {
            return Err(LeagueError::not_found("blackout date", id));
        }
        Ok(())
    }

    pub async fn for_season(db: &Db, season_id: SeasonId) -> LeagueResult<Vec<Self>> {
        let blackouts = sqlx::query_as(
            "SELECT * FROM BlackoutDate
            WHERE season_id = $1
            ORDER BY blackout_date ASC, id ASC"
        ).bind(season_id)
        .fetch_all(db).await?;

        Ok(blackouts)
    }
}
