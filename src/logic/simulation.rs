// Play out a whole season with random results. Handy for demos and for checking the
// schedule, standings and playoffs against each other.
use rand::{seq::IndexedRandom, Rng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::LeagueResult,
    logic::{
        division::Division, game::{Game, PlayoffStage}, playoffs::{create_playoff_games, update_final_teams},
        types::{Db, DivisionId, Score, SeasonId, TeamId}
    }
};

// Low scores are common, four or five goals are rare.
const SCORE_WEIGHTS: [Score; 16] = [0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 2, 3, 3, 4, 5];

#[derive(Debug, Serialize, Deserialize)]
#[derive(Default, Clone, PartialEq)]
pub struct SimulationSummary {
    pub regular_games: usize,
    pub playoff_games: usize,
    pub champions: Vec<(DivisionId, TeamId)>,
}

// Draw a single score.
pub fn random_score<R: Rng + ?Sized>(rng: &mut R) -> Score {
    SCORE_WEIGHTS.choose(rng).copied().unwrap_or_default()
}

// Draw a score pair that has a winner.
pub fn random_decisive_scores<R: Rng + ?Sized>(rng: &mut R) -> (Score, Score) {
    loop {
        let (home, away) = (random_score(rng), random_score(rng));
        if home != away {
            return (home, away);
        }
    }
}

// Wipe every result of the season and play it again from the first round to the finals.
// The reset and the whole regular season are written in one transaction. The playoffs then go
// through the same triggers as live results, each of which is atomic on its own.
pub async fn simulate_season<R: Rng + ?Sized>(db: &Db, season_id: SeasonId, rng: &mut R) -> LeagueResult<SimulationSummary> {
    let mut summary = SimulationSummary::default();

    // Round by round, divisions interleaved.
    let mut games: Vec<Game> = Game::schedule(db, season_id, None).await?
        .into_iter()
        .filter(|g| !g.is_playoff)
        .collect();
    games.sort_by_key(|g| (g.round, g.division_id, g.id));

    let mut tx = db.begin().await?;
    Game::delete_playoffs(&mut *tx, season_id).await?;
    Game::reset_results(&mut *tx, season_id).await?;
    for game in games.iter() {
        Game::save_result(&mut *tx, game.id, random_score(rng), random_score(rng)).await?;
        summary.regular_games += 1;
    }
    tx.commit().await?;

    let divisions = Division::all(db, season_id).await?;
    for division in divisions.iter() {
        create_playoff_games(db, season_id, division.id).await?;
    }

    for stage in [PlayoffStage::Semifinal, PlayoffStage::Final] {
        for division in divisions.iter() {
            // The finalists are only known once both semifinals are in.
            if stage == PlayoffStage::Final {
                update_final_teams(db, season_id, division.id).await?;
            }

            let playoff_games = Game::playoff_games(db, season_id, division.id).await?;
            for game in playoff_games.iter().filter(|g| g.is_stage(stage)) {
                let (home, away) = random_decisive_scores(rng);
                let played = Game::record_result(db, game.id, home, away).await?;
                summary.playoff_games += 1;

                if stage == PlayoffStage::Final {
                    if let Some(champion) = played.winner() {
                        summary.champions.push((division.id, champion));
                    }
                }
            }
        }
    }

    info!(season_id, regular = summary.regular_games, playoff = summary.playoff_games, "season simulated");
    return Ok(summary);
}
