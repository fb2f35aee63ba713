// Division playoffs: the top four meet in semifinals, the winners meet in the final.
//
// Progress is never stored. It is read back from the playoff games every time, so every
// trigger below can be called again safely.

use serde::{Deserialize, Serialize};
use time::Date;
use tracing::{info, warn};

use crate::{
    error::LeagueResult,
    logic::{
        game::{Game, PlayoffStage}, standings::{get_standings, StandingsRow, PLAYOFF_SPOTS},
        time::ROUND_INTERVAL, types::{Db, DivisionId, GameId, SeasonId, TeamId}
    }
};

#[derive(Debug, Serialize, Deserialize)]
#[derive(Clone, Copy)]
#[derive(PartialEq, Eq)]
pub enum PlayoffStatus {
    NotStarted,
    SemifinalsScheduled,
    SemifinalsComplete,
    FinalTeamsResolved,
    FinalComplete,
}

// Semifinal pairings and the provisional final.
#[derive(Debug, Serialize, Deserialize)]
#[derive(Clone, Copy)]
#[derive(PartialEq, Eq)]
pub struct PlayoffSeeding {
    pub semifinals: [[TeamId; 2]; 2],
    pub final_placeholder: [TeamId; 2],
}

// What the played semifinals say about the final.
#[derive(Debug)]
#[derive(Clone, Copy)]
#[derive(PartialEq, Eq)]
pub enum FinalResolution {
    Resolved([TeamId; 2]),
    NotReady,

    // Level scores have no winner. Left for a human to sort out.
    Drawn(GameId),
}

// Seed the bracket from ranked standings: 1 v 4 and 2 v 3, with 1 v 2 pencilled in for the final.
pub fn seed(standings: &[StandingsRow]) -> Option<PlayoffSeeding> {
    if standings.len() < PLAYOFF_SPOTS {
        return None;
    }

    let seeds: Vec<TeamId> = standings.iter().take(PLAYOFF_SPOTS).map(|row| row.team_id).collect();
    Some(PlayoffSeeding {
        semifinals: [[seeds[0], seeds[3]], [seeds[1], seeds[2]]],
        final_placeholder: [seeds[0], seeds[1]],
    })
}

// Semifinals a week after the last regular season game, the final a week after that.
pub fn playoff_dates(last_regular_date: Date) -> Option<(Date, Date)> {
    let semifinal = last_regular_date.checked_add(ROUND_INTERVAL)?;
    let final_date = semifinal.checked_add(ROUND_INTERVAL)?;
    Some((semifinal, final_date))
}

// Work out the finalists. The winner of the first semifinal plays at home.
pub fn resolve_final(semifinals: &[Game]) -> FinalResolution {
    if semifinals.len() != 2 || semifinals.iter().any(|g| g.scores().is_none()) {
        return FinalResolution::NotReady;
    }

    let mut ordered: Vec<&Game> = semifinals.iter().collect();
    ordered.sort_by_key(|g| g.id);

    let mut winners = [TeamId::default(); 2];
    for (i, game) in ordered.iter().enumerate() {
        winners[i] = match game.winner() {
            Some(id) => id,
            None => return FinalResolution::Drawn(game.id),
        };
    }

    return FinalResolution::Resolved(winners);
}

impl PlayoffStatus {
    // Derive the status from a division's playoff games.
    pub fn from_games(games: &[Game]) -> Self {
        let semifinals: Vec<Game> = games.iter().filter(|g| g.is_stage(PlayoffStage::Semifinal)).cloned().collect();
        let final_game = games.iter().find(|g| g.is_stage(PlayoffStage::Final));

        if semifinals.is_empty() && final_game.is_none() {
            return PlayoffStatus::NotStarted;
        }
        if final_game.is_some_and(|g| g.is_played) {
            return PlayoffStatus::FinalComplete;
        }

        match resolve_final(&semifinals) {
            FinalResolution::NotReady => PlayoffStatus::SemifinalsScheduled,
            FinalResolution::Drawn(_) => PlayoffStatus::SemifinalsComplete,
            FinalResolution::Resolved(winners) => match final_game {
                Some(g) if [g.home_id, g.away_id] == winners => PlayoffStatus::FinalTeamsResolved,
                _ => PlayoffStatus::SemifinalsComplete,
            },
        }
    }
}

// Create the semifinals and the provisional final for a division.
// Returns false without writing anything if there are fewer than four teams, no regular season
// games, or playoff games already exist.
pub async fn create_playoff_games(db: &Db, season_id: SeasonId, division_id: DivisionId) -> LeagueResult<bool> {
    let standings = get_standings(db, season_id, division_id).await?;
    let seeding = match seed(&standings) {
        Some(s) => s,
        None => {
            warn!(season_id, division_id, teams = standings.len(), "not enough teams for playoffs");
            return Ok(false);
        }
    };

    let dates = match Game::latest_regular_date(db, season_id, division_id).await? {
        Some(last) => playoff_dates(last),
        None => None,
    };
    let (semifinal_date, final_date) = match dates {
        Some(d) => d,
        None => {
            warn!(season_id, division_id, "no regular season games to follow");
            return Ok(false);
        }
    };

    let mut games = Vec::with_capacity(3);
    for [home, away] in seeding.semifinals {
        games.push(Game::build_playoff(season_id, division_id, PlayoffStage::Semifinal, semifinal_date, home, away));
    }
    let [home, away] = seeding.final_placeholder;
    games.push(Game::build_playoff(season_id, division_id, PlayoffStage::Final, final_date, home, away));

    // The check and the inserts share one transaction, so two callers cannot both seed.
    let mut tx = db.begin().await?;
    if Game::playoff_count(&mut *tx, season_id, division_id).await? > 0 {
        warn!(season_id, division_id, "playoff games already exist");
        return Ok(false);
    }
    for game in games.iter_mut() {
        game.save(&mut *tx).await?;
    }
    tx.commit().await?;

    info!(season_id, division_id, %semifinal_date, %final_date, "playoff games created");
    return Ok(true);
}

// Put the semifinal winners into the final. Returns whether anything progressed.
// A final that has been played is never touched.
pub async fn update_final_teams(db: &Db, season_id: SeasonId, division_id: DivisionId) -> LeagueResult<bool> {
    let games = Game::playoff_games(db, season_id, division_id).await?;
    let semifinals: Vec<Game> = games.iter().filter(|g| g.is_stage(PlayoffStage::Semifinal)).cloned().collect();

    let winners = match resolve_final(&semifinals) {
        FinalResolution::Resolved(w) => w,
        FinalResolution::NotReady => return Ok(false),
        FinalResolution::Drawn(game_id) => {
            warn!(season_id, division_id, game_id, "semifinal ended level, final cannot be resolved");
            return Ok(false);
        }
    };

    let final_game = match games.iter().find(|g| g.is_stage(PlayoffStage::Final)) {
        Some(g) => g,
        None => {
            warn!(season_id, division_id, "semifinals played but there is no final");
            return Ok(false);
        }
    };

    if final_game.is_played {
        return Ok(false);
    }

    let updated = Game::set_final_teams(db, final_game.id, winners[0], winners[1]).await?;
    if updated {
        info!(season_id, division_id, home = winners[0], away = winners[1], "final teams resolved");
    }

    return Ok(updated);
}

// Where the division's playoffs stand.
pub async fn playoff_status(db: &Db, season_id: SeasonId, division_id: DivisionId) -> LeagueResult<PlayoffStatus> {
    let games = Game::playoff_games(db, season_id, division_id).await?;
    Ok(PlayoffStatus::from_games(&games))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::logic::types::Score;

    use super::*;

    fn rows(ids: &[TeamId]) -> Vec<StandingsRow> {
        ids.iter().enumerate().map(|(i, id)| StandingsRow {
            rank: i as u16 + 1,
            team_id: *id,
            ..Default::default()
        }).collect()
    }

    fn playoff(id: GameId, stage: PlayoffStage, home: TeamId, away: TeamId, score: Option<(Score, Score)>) -> Game {
        let mut game = Game::build_playoff(1, 1, stage, date!(2026-05-02), home, away);
        game.id = id;
        if let Some((h, a)) = score {
            game.home_score = Some(h);
            game.away_score = Some(a);
            game.is_played = true;
        }
        game
    }

    #[test]
    fn seeding_pairs_one_four_and_two_three() {
        let seeding = seed(&rows(&[11, 12, 13, 14, 15])).unwrap();
        assert_eq!(seeding.semifinals, [[11, 14], [12, 13]]);
        assert_eq!(seeding.final_placeholder, [11, 12]);

        assert!(seed(&rows(&[1, 2, 3])).is_none());
    }

    #[test]
    fn playoff_dates_follow_the_season() {
        assert_eq!(playoff_dates(date!(2026-04-11)), Some((date!(2026-04-18), date!(2026-04-25))));
    }

    #[test]
    fn final_resolution() {
        let one_played = vec![
            playoff(1, PlayoffStage::Semifinal, 11, 14, Some((2, 1))),
            playoff(2, PlayoffStage::Semifinal, 12, 13, None),
        ];
        assert_eq!(resolve_final(&one_played), FinalResolution::NotReady);
        assert_eq!(resolve_final(&one_played[..1]), FinalResolution::NotReady);

        // Listed out of order on purpose.
        let both_played = vec![
            playoff(2, PlayoffStage::Semifinal, 12, 13, Some((0, 3))),
            playoff(1, PlayoffStage::Semifinal, 11, 14, Some((1, 2))),
        ];
        assert_eq!(resolve_final(&both_played), FinalResolution::Resolved([14, 13]));

        let drawn = vec![
            playoff(1, PlayoffStage::Semifinal, 11, 14, Some((1, 1))),
            playoff(2, PlayoffStage::Semifinal, 12, 13, Some((2, 0))),
        ];
        assert_eq!(resolve_final(&drawn), FinalResolution::Drawn(1));
    }

    #[test]
    fn status_follows_the_games() {
        assert_eq!(PlayoffStatus::from_games(&[]), PlayoffStatus::NotStarted);

        let mut games = vec![
            playoff(1, PlayoffStage::Semifinal, 11, 14, None),
            playoff(2, PlayoffStage::Semifinal, 12, 13, None),
            playoff(3, PlayoffStage::Final, 11, 12, None),
        ];
        assert_eq!(PlayoffStatus::from_games(&games), PlayoffStatus::SemifinalsScheduled);

        games[0] = playoff(1, PlayoffStage::Semifinal, 11, 14, Some((0, 1)));
        games[1] = playoff(2, PlayoffStage::Semifinal, 12, 13, Some((4, 2)));
        assert_eq!(PlayoffStatus::from_games(&games), PlayoffStatus::SemifinalsComplete);

        games[2] = playoff(3, PlayoffStage::Final, 14, 12, None);
        assert_eq!(PlayoffStatus::from_games(&games), PlayoffStatus::FinalTeamsResolved);

        games[2] = playoff(3, PlayoffStage::Final, 14, 12, Some((1, 0)));
        assert_eq!(PlayoffStatus::from_games(&games), PlayoffStatus::FinalComplete);
    }
}
