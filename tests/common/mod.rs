#![allow(dead_code)]

use league_engine::{
    db,
    logic::{division::Division, season::Season, team::Team, time::GameDay, types::Db},
};
use time::{macros::date, Date};

// 2026-03-07 is a Saturday.
pub const START: Date = date!(2026-03-07);

pub struct League {
    pub db: Db,
    pub season: Season,
    pub division: Division,
    pub teams: Vec<Team>,
}

// A fresh in-memory league with one season and one division holding the given teams.
// Teams are added in the given order, so their IDs follow it.
pub async fn league(team_names: &[&str]) -> League {
    let db = db::connect_in_memory().await.unwrap();
    let season = Season::create(&db, "Test Season", START, GameDay::Saturday).await.unwrap();
    let division = Division::create(&db, season.id, "Division 1").await.unwrap();
    let teams = add_teams(&db, &season, &division, team_names).await;

    League { db, season, division, teams }
}

pub async fn add_teams(db: &Db, season: &Season, division: &Division, names: &[&str]) -> Vec<Team> {
    let mut teams = Vec::new();
    for name in names {
        let mut team = Team::build(name, None, season.id, division.id);
        team.add(db).await.unwrap();
        teams.push(team);
    }

    teams
}

pub const FOUR: [&str; 4] = ["Alpha", "Bravo", "Charlie", "Delta"];
