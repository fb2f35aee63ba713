use futures::TryStreamExt as _;
use sqlx::{Decode, Encode, Sqlite, encode::IsNull, error::BoxDynError, sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef}};
use time::Date;
use tracing::info;

use crate::{error::{LeagueError, LeagueResult}, logic::{game::{Game, PlayoffStage}, types::{Conn, Db, DivisionId, GameId, Score, SeasonId, TeamId}}};

impl sqlx::Type<Sqlite> for PlayoffStage {
    fn type_info() -> SqliteTypeInfo {
        <String as sqlx::Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as sqlx::Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for PlayoffStage {
    fn encode_by_ref(&self, buf: &mut Vec<SqliteArgumentValue<'q>>) -> Result<IsNull, BoxDynError> {
        Encode::<Sqlite>::encode(self.tag().to_string(), buf)
    }
}

impl<'r> Decode<'r, Sqlite> for PlayoffStage {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let tag = <&str as Decode<Sqlite>>::decode(value)?;
        Ok(tag.parse()?)
    }
}

impl Game {
    // Insert the game and take the ID it was given.
    pub async fn save(&mut self, conn: &mut Conn) -> LeagueResult<()> {
        self.id = sqlx::query_scalar(
            "INSERT INTO Game
            (season_id, division_id, round, match_date, home_id, away_id,
            home_score, away_score, is_played, is_playoff, playoff_stage)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id"
        ).bind(self.season_id)
        .bind(self.division_id)
        .bind(self.round)
        .bind(self.date)
        .bind(self.home_id)
        .bind(self.away_id)
        .bind(self.home_score)
        .bind(self.away_score)
        .bind(self.is_played)
        .bind(self.is_playoff)
        .bind(self.playoff_stage)
        .fetch_one(conn).await?;

        Ok(())
    }

    // Remove every game of a division, played or not. Returns how many went.
    pub async fn delete_for_division(conn: &mut Conn, season_id: SeasonId, division_id: DivisionId) -> LeagueResult<u64> {
        let result = sqlx::query(
            "DELETE FROM Game
            WHERE season_id = $1 AND division_id = $2"
        ).bind(season_id)
        .bind(division_id)
        .execute(conn).await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_playoffs(conn: &mut Conn, season_id: SeasonId) -> LeagueResult<u64> {
        let result = sqlx::query(
            "DELETE FROM Game
            WHERE season_id = $1 AND is_playoff = 1"
        ).bind(season_id)
        .execute(conn).await?;

        Ok(result.rows_affected())
    }

    // Forget every result of the season.
    pub async fn reset_results(conn: &mut Conn, season_id: SeasonId) -> LeagueResult<u64> {
        let result = sqlx::query(
            "UPDATE Game SET home_score = NULL, away_score = NULL, is_played = 0
            WHERE season_id = $1"
        ).bind(season_id)
        .execute(conn).await?;

        Ok(result.rows_affected())
    }

    pub async fn fetch(db: &Db, id: GameId) -> LeagueResult<Self> {
        let game: Option<Self> = sqlx::query_as(
            "SELECT * FROM Game WHERE id = $1"
        ).bind(id)
        .fetch_optional(db).await?;

        game.ok_or_else(|| LeagueError::not_found("game", id))
    }

    // Save the result of a game and mark it played. Recording again overwrites the old result.
    pub async fn record_result(db: &Db, id: GameId, home_score: Score, away_score: Score) -> LeagueResult<Self> {
        let mut conn = db.acquire().await?;
        let game = Self::save_result(&mut *conn, id, home_score, away_score).await?;
        info!(game_id = id, home_score, away_score, "result recorded");
        return Ok(game);
    }

    // Write a result on the given connection, so that it can be part of a larger transaction.
    pub async fn save_result(conn: &mut Conn, id: GameId, home_score: Score, away_score: Score) -> LeagueResult<Self> {
        let game: Option<Self> = sqlx::query_as(
            "UPDATE Game SET home_score = $1, away_score = $2, is_played = 1
            WHERE id = $3
            RETURNING *"
        ).bind(home_score)
        .bind(away_score)
        .bind(id)
        .fetch_optional(conn).await?;

        game.ok_or_else(|| LeagueError::not_found("game", id))
    }

    // Played regular season games of a division.
    pub async fn regular_results(db: &Db, season_id: SeasonId, division_id: DivisionId) -> LeagueResult<Vec<Self>> {
        let mut rows = sqlx::query_as::<_, Self>(
            "SELECT * FROM Game
            WHERE season_id = $1 AND division_id = $2
            AND is_played = 1 AND is_playoff = 0
            ORDER BY id ASC"
        ).bind(season_id)
        .bind(division_id)
        .fetch(db);

        let mut games = Vec::new();
        while let Some(game) = rows.try_next().await? {
            games.push(game);
        }

        return Ok(games);
    }

    // Semifinals and final of a division, in the order they were created.
    pub async fn playoff_games(db: &Db, season_id: SeasonId, division_id: DivisionId) -> LeagueResult<Vec<Self>> {
        let games = sqlx::query_as(
            "SELECT * FROM Game
            WHERE season_id = $1 AND division_id = $2 AND is_playoff = 1
            ORDER BY round ASC, id ASC"
        ).bind(season_id)
        .bind(division_id)
        .fetch_all(db).await?;

        Ok(games)
    }

    // How many playoff games a division has, read on the given connection.
    pub async fn playoff_count(conn: &mut Conn, season_id: SeasonId, division_id: DivisionId) -> LeagueResult<u32> {
        let count = sqlx::query_scalar(
            "SELECT COUNT(*) FROM Game
            WHERE season_id = $1 AND division_id = $2 AND is_playoff = 1"
        ).bind(season_id)
        .bind(division_id)
        .fetch_one(conn).await?;

        Ok(count)
    }

    // Date of the last regular season game of a division.
    pub async fn latest_regular_date(db: &Db, season_id: SeasonId, division_id: DivisionId) -> LeagueResult<Option<Date>> {
        let date = sqlx::query_scalar(
            "SELECT match_date FROM Game
            WHERE season_id = $1 AND division_id = $2 AND is_playoff = 0
            ORDER BY match_date DESC LIMIT 1"
        ).bind(season_id)
        .bind(division_id)
        .fetch_optional(db).await?;

        Ok(date)
    }

    // Overwrite the teams of an unplayed final. Returns false if there was nothing to overwrite.
    pub async fn set_final_teams(db: &Db, id: GameId, home_id: TeamId, away_id: TeamId) -> LeagueResult<bool> {
        let result = sqlx::query(
            "UPDATE Game SET home_id = $1, away_id = $2
            WHERE id = $3 AND playoff_stage = $4 AND is_played = 0"
        ).bind(home_id)
        .bind(away_id)
        .bind(id)
        .bind(PlayoffStage::Final)
        .execute(db).await?;

        Ok(result.rows_affected() > 0)
    }

    // The season's schedule, optionally for one division, by date.
    pub async fn schedule(db: &Db, season_id: SeasonId, division_id: Option<DivisionId>) -> LeagueResult<Vec<Self>> {
        let games = sqlx::query_as(
            "SELECT * FROM Game
            WHERE season_id = $1 AND ($2 IS NULL OR division_id = $2)
            ORDER BY match_date ASC, division_id ASC, round ASC, id ASC"
        ).bind(season_id)
        .bind(division_id)
        .fetch_all(db).await?;

        Ok(games)
    }

    // Unplayed games from the given day onwards.
    pub async fn upcoming(db: &Db, season_id: SeasonId, today: Date, limit: u32) -> LeagueResult<Vec<Self>> {
        let games = sqlx::query_as(
            "SELECT * FROM Game
            WHERE season_id = $1 AND is_played = 0 AND match_date >= $2
            ORDER BY match_date ASC, division_id ASC, id ASC
            LIMIT $3"
        ).bind(season_id)
        .bind(today)
        .bind(limit)
        .fetch_all(db).await?;

        Ok(games)
    }

    // Latest results first.
    pub async fn recent_results(db: &Db, season_id: SeasonId, limit: u32) -> LeagueResult<Vec<Self>> {
        let games = sqlx::query_as(
            "SELECT * FROM Game
            WHERE season_id = $1 AND is_played = 1
            ORDER BY match_date DESC, id DESC
            LIMIT $2"
        ).bind(season_id)
        .bind(limit)
        .fetch_all(db).await?;

        Ok(games)
    }

    pub async fn next_for_team(db: &Db, season_id: SeasonId, team_id: TeamId, today: Date) -> LeagueResult<Option<Self>> {
        let game = sqlx::query_as(
            "SELECT * FROM Game
            WHERE season_id = $1 AND is_played = 0 AND match_date >= $2
            AND (home_id = $3 OR away_id = $3)
            ORDER BY match_date ASC, id ASC
            LIMIT 1"
        ).bind(season_id)
        .bind(today)
        .bind(team_id)
        .fetch_optional(db).await?;

        Ok(game)
    }
}
