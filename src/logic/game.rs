// Games between two teams of the same division.
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

use crate::{error::LeagueError, logic::{time::iso_date_format, types::{DivisionId, GameId, Round, Score, SeasonId, TeamId}}};

// Playoff rounds. Their round numbers are above any regular season round.
#[derive(Debug, Serialize, Deserialize)]
#[derive(Clone, Copy)]
#[derive(PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PlayoffStage {
    Semifinal,
    Final,
}

impl PlayoffStage {
    pub const SEMIFINAL_ROUND: Round = 100;
    pub const FINAL_ROUND: Round = 101;

    pub fn round(&self) -> Round {
        match self {
            PlayoffStage::Semifinal => Self::SEMIFINAL_ROUND,
            PlayoffStage::Final => Self::FINAL_ROUND,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            PlayoffStage::Semifinal => "semifinal",
            PlayoffStage::Final => "final",
        }
    }
}

impl Display for PlayoffStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for PlayoffStage {
    type Err = LeagueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "semifinal" => Ok(PlayoffStage::Semifinal),
            "final" => Ok(PlayoffStage::Final),
            _ => Err(LeagueError::InvalidInput(format!("unknown playoff stage '{s}'"))),
        }
    }
}

// An unplayed pairing produced by the schedule generator.
#[derive(Debug, Serialize, Deserialize)]
#[derive(Clone, Copy)]
#[derive(PartialEq, Eq, Hash)]
pub struct Fixture {
    pub round: Round,
    #[serde(with = "iso_date_format")]
    pub date: Date,
    pub home_id: TeamId,
    pub away_id: TeamId,
}

#[derive(Debug, Serialize, Deserialize)]
#[derive(Clone, PartialEq)]
#[derive(FromRow)]
pub struct Game {
    pub id: GameId,
    pub season_id: SeasonId,
    pub division_id: DivisionId,
    pub round: Round,
    #[sqlx(rename = "match_date")]
    #[serde(with = "iso_date_format")]
    pub date: Date,
    pub home_id: TeamId,
    pub away_id: TeamId,
    pub home_score: Option<Score>,
    pub away_score: Option<Score>,
    pub is_played: bool,
    pub is_playoff: bool,
    pub playoff_stage: Option<PlayoffStage>,
}

// Basics.
impl Game {
    // Build an unsaved regular season game from a fixture.
    pub fn from_fixture(season_id: SeasonId, division_id: DivisionId, fixture: &Fixture) -> Self {
        Self {
            id: GameId::default(),
            season_id,
            division_id,
            round: fixture.round,
            date: fixture.date,
            home_id: fixture.home_id,
            away_id: fixture.away_id,
            home_score: None,
            away_score: None,
            is_played: false,
            is_playoff: false,
            playoff_stage: None,
        }
    }

    // Build an unsaved playoff game.
    pub fn build_playoff(season_id: SeasonId, division_id: DivisionId, stage: PlayoffStage, date: Date, home_id: TeamId, away_id: TeamId) -> Self {
        Self {
            id: GameId::default(),
            season_id,
            division_id,
            round: stage.round(),
            date,
            home_id,
            away_id,
            home_score: None,
            away_score: None,
            is_played: false,
            is_playoff: true,
            playoff_stage: Some(stage),
        }
    }
}

// Functional
impl Game {
    pub fn involves(&self, team_id: TeamId) -> bool {
        self.home_id == team_id || self.away_id == team_id
    }

    pub fn is_stage(&self, stage: PlayoffStage) -> bool {
        self.playoff_stage == Some(stage)
    }

    // Scores of a played game as (home, away).
    pub fn scores(&self) -> Option<(Score, Score)> {
        if !self.is_played { return None; }
        match (self.home_score, self.away_score) {
            (Some(home), Some(away)) => Some((home, away)),
            _ => None,
        }
    }

    // The team with strictly more goals. None if unplayed or level.
    pub fn winner(&self) -> Option<TeamId> {
        let (home, away) = self.scores()?;
        if home > away {
            return Some(self.home_id);
        }
        if away > home {
            return Some(self.away_id);
        }

        return None;
    }
}
