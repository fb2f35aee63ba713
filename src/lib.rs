pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod logic;

pub use error::{LeagueError, LeagueResult};
pub use logic::{
    playoffs::{create_playoff_games, playoff_status, update_final_teams, PlayoffStatus},
    schedule_generator::{generate_schedule, regenerate_all_schedules},
    simulation::simulate_season,
    standings::{get_standings, StandingsRow},
    types::Db,
};

use logic::{game::Game, types::{GameId, Score}};

// Record the score of a game and mark it played.
pub async fn record_result(db: &Db, game_id: GameId, home_score: Score, away_score: Score) -> LeagueResult<Game> {
    Game::record_result(db, game_id, home_score, away_score).await
}
