use sqlx::{Decode, Encode, Sqlite, encode::IsNull, error::BoxDynError, sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef}};
use time::Date;
use tracing::info;

use crate::{error::LeagueResult, logic::{season::{Season, SeasonStats}, time::GameDay, types::{Conn, Db, SeasonId}}};

impl sqlx::Type<Sqlite> for GameDay {
    fn type_info() -> SqliteTypeInfo {
        <String as sqlx::Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as sqlx::Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for GameDay {
    fn encode_by_ref(&self, buf: &mut Vec<SqliteArgumentValue<'q>>) -> Result<IsNull, BoxDynError> {
        Encode::<Sqlite>::encode(self.name().to_string(), buf)
    }
}

impl<'r> Decode<'r, Sqlite> for GameDay {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let name = <&str as Decode<Sqlite>>::decode(value)?;
        Ok(name.parse()?)
    }
}

impl Season {
    // Save the season to the database for the first time.
    pub async fn save(&mut self, conn: &mut Conn) -> LeagueResult<()> {
        self.id = sqlx::query_scalar(
            "INSERT INTO Season
            (season_name, start_date, game_day, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING id"
        ).bind(self.name.as_str())
        .bind(self.start_date)
        .bind(self.game_day)
        .bind(self.is_active)
        .fetch_one(conn).await?;

        Ok(())
    }

    // Create a new active season. Every other season stops being active.
    pub async fn create(db: &Db, name: &str, start_date: Date, game_day: GameDay) -> LeagueResult<Self> {
        let mut season = Self::build(name, start_date, game_day);

        let mut tx = db.begin().await?;
        sqlx::query("UPDATE Season SET is_active = 0")
            .execute(&mut *tx).await?;
        season.save(&mut *tx).await?;
        tx.commit().await?;

        info!(season_id = season.id, name = season.name.as_str(), "season created");
        return Ok(season);
    }

    pub async fn fetch(db: &Db, id: SeasonId) -> LeagueResult<Option<Self>> {
        let season = sqlx::query_as(
            "SELECT * FROM Season WHERE id = $1"
        ).bind(id)
        .fetch_optional(db).await?;

        Ok(season)
    }

    // Get the latest active season, if any.
    pub async fn active(db: &Db) -> LeagueResult<Option<Self>> {
        let season = sqlx::query_as(
            "SELECT * FROM Season
            WHERE is_active = 1
            ORDER BY id DESC LIMIT 1"
        ).fetch_optional(db).await?;

        Ok(season)
    }

    // Count games, teams and divisions.
    pub async fn stats(db: &Db, id: SeasonId) -> LeagueResult<SeasonStats> {
        let (total_games, played_games): (u32, u32) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(is_played), 0) FROM Game
            WHERE season_id = $1"
        ).bind(id)
        .fetch_one(db).await?;

        let total_teams: u32 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM Team
            WHERE season_id = $1 AND is_active = 1"
        ).bind(id)
        .fetch_one(db).await?;

        let total_divisions: u32 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM Division WHERE season_id = $1"
        ).bind(id)
        .fetch_one(db).await?;

        Ok(SeasonStats {
            total_games,
            played_games,
            remaining_games: total_games.saturating_sub(played_games),
            total_teams,
            total_divisions,
        })
    }
}
