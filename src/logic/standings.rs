// Division standings, derived from played regular season games on every call.
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::LeagueResult,
    logic::{game::Game, team::Team, types::{Db, DivisionId, Score, SeasonId, TeamId}}
};

// How many of the top teams go to the playoffs.
pub const PLAYOFF_SPOTS: usize = 4;

pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_DRAW: u32 = 1;

// Ranking criteria, applied in order until one separates the teams.
#[derive(Debug, Serialize, Deserialize)]
#[derive(Clone, Copy)]
#[derive(Eq, Hash, PartialEq)]
pub enum RankCriteria {
    Points,
    GoalDifference,
    GoalsScored,
    Name,   // Alphabetical.
    TeamId, // Lower is better. Always separates two different teams.
}

impl RankCriteria {
    // Points and goal difference first, then goals scored, then the name.
    pub const STANDARD: [RankCriteria; 5] = [
        RankCriteria::Points,
        RankCriteria::GoalDifference,
        RankCriteria::GoalsScored,
        RankCriteria::Name,
        RankCriteria::TeamId,
    ];

    // Less means a better position.
    pub fn compare(&self, a: &StandingsRow, b: &StandingsRow) -> Ordering {
        match self {
            RankCriteria::Points => b.points.cmp(&a.points),
            RankCriteria::GoalDifference => b.goal_diff.cmp(&a.goal_diff),
            RankCriteria::GoalsScored => b.goals_for.cmp(&a.goals_for),
            RankCriteria::Name => a.name.cmp(&b.name),
            RankCriteria::TeamId => a.team_id.cmp(&b.team_id),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[derive(Default, Clone, PartialEq)]
pub struct StandingsRow {
    pub rank: u16,
    pub team_id: TeamId,
    pub name: String,
    pub short_name: String,
    pub color_hex: String,
    pub played: u16,
    pub wins: u16,
    pub draws: u16,
    pub losses: u16,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_diff: i64,
    pub points: u32,
    pub qualifies_for_playoffs: bool,
}

// Basics.
impl StandingsRow {
    pub fn build(team: &Team) -> Self {
        Self {
            team_id: team.id,
            name: team.name.clone(),
            short_name: team.short_name.clone(),
            color_hex: team.color_hex.clone(),
            ..Default::default()
        }
    }
}

// Functional
impl StandingsRow {
    // Add one game from this team's point of view.
    pub fn record(&mut self, scored: Score, conceded: Score) {
        self.played += 1;
        match scored.cmp(&conceded) {
            Ordering::Greater => self.wins += 1,
            Ordering::Equal => self.draws += 1,
            Ordering::Less => self.losses += 1,
        }

        self.goals_for += u32::from(scored);
        self.goals_against += u32::from(conceded);
        self.goal_diff = i64::from(self.goals_for) - i64::from(self.goals_against);
        self.points = u32::from(self.wins) * POINTS_FOR_WIN + u32::from(self.draws) * POINTS_FOR_DRAW;
    }
}

// Sort rows by the criteria and number them from 1.
pub fn rank_rows(rows: &mut [StandingsRow], criteria: &[RankCriteria]) {
    rows.sort_by(|a, b| {
        for criterion in criteria {
            let ordering = criterion.compare(a, b);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });

    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = u16::try_from(i + 1).unwrap_or(u16::MAX);
        row.qualifies_for_playoffs = i < PLAYOFF_SPOTS;
    }
}

// Build the ranked table for a roster. Only played regular season games count;
// anything else in `games` is skipped. Teams outside the roster get no row.
pub fn standings(games: &[Game], roster: &[Team]) -> Vec<StandingsRow> {
    let mut rows: Vec<StandingsRow> = roster.iter().map(StandingsRow::build).collect();

    for game in games.iter().filter(|g| !g.is_playoff) {
        let Some((home_score, away_score)) = game.scores() else { continue };

        for row in rows.iter_mut() {
            if row.team_id == game.home_id {
                row.record(home_score, away_score);
            }
            else if row.team_id == game.away_id {
                row.record(away_score, home_score);
            }
        }
    }

    rank_rows(&mut rows, &RankCriteria::STANDARD);
    return rows;
}

// Get the current standings of a division. Reads only.
pub async fn get_standings(db: &Db, season_id: SeasonId, division_id: DivisionId) -> LeagueResult<Vec<StandingsRow>> {
    let roster = Team::roster(db, season_id, division_id).await?;
    let games = Game::regular_results(db, season_id, division_id).await?;

    debug!(season_id, division_id, teams = roster.len(), games = games.len(), "computing standings");
    return Ok(standings(&games, &roster));
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::logic::game::{Fixture, PlayoffStage};

    use super::*;

    fn team(id: TeamId, name: &str) -> Team {
        let mut team = Team::build(name, None, 1, 1);
        team.id = id;
        team
    }

    fn result(home_id: TeamId, away_id: TeamId, home_score: Score, away_score: Score) -> Game {
        let fixture = Fixture { round: 1, date: date!(2026-03-07), home_id, away_id };
        let mut game = Game::from_fixture(1, 1, &fixture);
        game.home_score = Some(home_score);
        game.away_score = Some(away_score);
        game.is_played = true;
        game
    }

    fn row<'a>(rows: &'a [StandingsRow], team_id: TeamId) -> &'a StandingsRow {
        rows.iter().find(|r| r.team_id == team_id).unwrap()
    }

    #[test]
    fn points_and_goal_difference() {
        let roster = vec![team(1, "Gooners"), team(2, "Monstars"), team(3, "YBNG")];
        let games = vec![
            result(1, 2, 2, 0),
            result(1, 3, 1, 0),
            result(2, 1, 1, 3),
            result(3, 1, 1, 1),
            result(1, 2, 0, 4),
        ];

        let rows = standings(&games, &roster);
        let gooners = row(&rows, 1);
        assert_eq!((gooners.played, gooners.wins, gooners.draws, gooners.losses), (5, 3, 1, 1));
        assert_eq!(gooners.points, 10);
        assert_eq!((gooners.goals_for, gooners.goals_against, gooners.goal_diff), (7, 6, 1));

        let monstars = row(&rows, 2);
        assert_eq!(monstars.points, 3);
        assert_eq!(monstars.goal_diff, 0);

        let ybng = row(&rows, 3);
        assert_eq!((ybng.points, ybng.goal_diff), (1, -1));

        assert_eq!(rows.iter().map(|r| r.team_id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn unplayed_and_playoff_games_do_not_count() {
        let roster = vec![team(1, "A"), team(2, "B")];
        let mut unplayed = result(1, 2, 5, 0);
        unplayed.is_played = false;
        let mut playoff = Game::build_playoff(1, 1, PlayoffStage::Semifinal, date!(2026-05-02), 2, 1);
        playoff.home_score = Some(9);
        playoff.away_score = Some(0);
        playoff.is_played = true;

        let rows = standings(&[unplayed, playoff], &roster);
        assert!(rows.iter().all(|r| r.played == 0 && r.points == 0));
    }

    #[test]
    fn goal_difference_breaks_points_ties() {
        let roster = vec![team(1, "A"), team(2, "B"), team(3, "C"), team(4, "D")];
        let games = vec![
            result(1, 3, 1, 0),
            result(2, 4, 4, 0),
        ];

        let rows = standings(&games, &roster);
        assert_eq!(rows[0].team_id, 2);
        assert_eq!(rows[1].team_id, 1);
    }

    #[test]
    fn tertiary_tie_break_is_goals_then_name() {
        let roster = vec![team(1, "Zulu"), team(2, "Alpha"), team(3, "Mike"), team(4, "Bravo")];
        let games = vec![
            // Zulu and Mike: same points and difference, Mike scored more.
            result(1, 2, 1, 0),
            result(3, 4, 3, 2),
        ];

        let rows = standings(&games, &roster);
        let order: Vec<TeamId> = rows.iter().map(|r| r.team_id).collect();
        // Bravo lost but scored twice, Alpha scored nothing.
        assert_eq!(order, vec![3, 1, 4, 2]);
    }

    #[test]
    fn identical_records_fall_back_to_name() {
        let roster = vec![team(7, "West Bridge FC"), team(3, "Ballcelona"), team(5, "Dura Mater")];
        let rows = standings(&[], &roster);
        assert_eq!(rows.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(), vec!["Ballcelona", "Dura Mater", "West Bridge FC"]);
    }

    #[test]
    fn top_four_qualify() {
        let roster: Vec<Team> = (1..=6).map(|id| team(id, &format!("Team {id}"))).collect();
        let rows = standings(&[], &roster);
        let flags: Vec<bool> = rows.iter().map(|r| r.qualifies_for_playoffs).collect();
        assert_eq!(flags, vec![true, true, true, true, false, false]);
    }

    #[test]
    fn repeated_calls_agree() {
        let roster = vec![team(1, "A"), team(2, "B"), team(3, "C"), team(4, "D")];
        let games = vec![result(1, 2, 1, 1), result(3, 4, 0, 0), result(2, 3, 2, 2)];
        assert_eq!(standings(&games, &roster), standings(&games, &roster));
    }
}
