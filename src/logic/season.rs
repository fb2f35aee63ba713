// Seasons group divisions, teams and games. Only one season is active at a time.
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

use crate::logic::{time::{iso_date_format, GameDay}, types::SeasonId};

#[derive(Debug)]
#[derive(Clone, PartialEq)]
#[derive(Serialize, Deserialize)]
#[derive(FromRow)]
pub struct Season {
    pub id: SeasonId,
    #[sqlx(rename = "season_name")]
    pub name: String,
    #[serde(with = "iso_date_format")]
    pub start_date: Date,
    pub game_day: GameDay,
    pub is_active: bool,
}

impl Default for Season {
    fn default() -> Self {
        Self {
            id: SeasonId::default(),
            name: String::default(),
            start_date: Date::MIN,
            game_day: GameDay::default(),
            is_active: true,
        }
    }
}

impl Season {
    // Build an element. The ID is assigned when saved.
    pub fn build(name: &str, start_date: Date, game_day: GameDay) -> Self {
        Self {
            name: name.trim().to_string(),
            start_date,
            game_day,
            ..Default::default()
        }
    }

    // The date of the first regular season round, before blackouts are applied.
    pub fn first_game_date(&self) -> Date {
        self.game_day.first_on_or_after(self.start_date)
    }
}

// Aggregate numbers for a season.
#[derive(Debug, Serialize, Deserialize)]
#[derive(Default, Clone, PartialEq)]
pub struct SeasonStats {
    pub total_games: u32,
    pub played_games: u32,
    pub remaining_games: u32,
    pub total_teams: u32,
    pub total_divisions: u32,
}
