mod common;

use common::{league, FOUR};
use league_engine::{
    create_playoff_games, generate_schedule, get_standings, record_result,
    logic::{game::{Game, PlayoffStage}, types::{Db, SeasonId, TeamId}},
    LeagueError,
};

async fn game_between(db: &Db, season_id: SeasonId, home: TeamId, away: TeamId) -> Game {
    Game::schedule(db, season_id, None).await.unwrap()
        .into_iter()
        .find(|g| !g.is_playoff && g.home_id == home && g.away_id == away)
        .unwrap()
}

#[tokio::test]
async fn standings_follow_recorded_results() {
    let l = league(&FOUR).await;
    generate_schedule(&l.db, l.season.id, l.division.id).await.unwrap();
    let [a, b, c, d] = [l.teams[0].id, l.teams[1].id, l.teams[2].id, l.teams[3].id];

    for (home, away, hs, as_) in [(a, b, 3, 0), (c, d, 1, 1), (b, c, 2, 1), (d, a, 0, 2)] {
        let game = game_between(&l.db, l.season.id, home, away).await;
        record_result(&l.db, game.id, hs, as_).await.unwrap();
    }

    let rows = get_standings(&l.db, l.season.id, l.division.id).await.unwrap();
    let order: Vec<TeamId> = rows.iter().map(|r| r.team_id).collect();
    assert_eq!(order, vec![a, b, c, d]);

    let alpha = &rows[0];
    assert_eq!((alpha.played, alpha.wins, alpha.draws, alpha.losses), (2, 2, 0, 0));
    assert_eq!((alpha.goals_for, alpha.goals_against, alpha.goal_diff, alpha.points), (5, 0, 5, 6));

    let charlie = &rows[2];
    assert_eq!((charlie.played, charlie.draws, charlie.losses, charlie.points), (2, 1, 1, 1));
    assert_eq!(charlie.goal_diff, -1);
    assert_eq!(rows[3].goal_diff, -2);

    assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    assert!(rows.iter().all(|r| r.qualifies_for_playoffs));
}

#[tokio::test]
async fn teams_without_games_are_listed_by_name() {
    let l = league(&["Zulu", "Alpha", "Mike", "Kilo", "Echo"]).await;
    let rows = get_standings(&l.db, l.season.id, l.division.id).await.unwrap();

    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Echo", "Kilo", "Mike", "Zulu"]);
    assert!(rows.iter().all(|r| r.played == 0 && r.points == 0));

    // Only the top four qualify.
    assert_eq!(rows.iter().filter(|r| r.qualifies_for_playoffs).count(), 4);
    assert!(!rows[4].qualifies_for_playoffs);
}

#[tokio::test]
async fn playoff_results_leave_the_table_alone() {
    let l = league(&FOUR).await;
    generate_schedule(&l.db, l.season.id, l.division.id).await.unwrap();
    assert!(create_playoff_games(&l.db, l.season.id, l.division.id).await.unwrap());

    let before = get_standings(&l.db, l.season.id, l.division.id).await.unwrap();
    let semifinal = Game::playoff_games(&l.db, l.season.id, l.division.id).await.unwrap()
        .into_iter()
        .find(|g| g.is_stage(PlayoffStage::Semifinal))
        .unwrap();
    record_result(&l.db, semifinal.id, 5, 0).await.unwrap();

    let after = get_standings(&l.db, l.season.id, l.division.id).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn recording_again_overwrites_the_result() {
    let l = league(&FOUR).await;
    let games = generate_schedule(&l.db, l.season.id, l.division.id).await.unwrap();

    record_result(&l.db, games[0].id, 4, 0).await.unwrap();
    let game = record_result(&l.db, games[0].id, 0, 1).await.unwrap();
    assert_eq!(game.scores(), Some((0, 1)));
    assert_eq!(game.winner(), Some(games[0].away_id));

    let rows = get_standings(&l.db, l.season.id, l.division.id).await.unwrap();
    assert_eq!(rows[0].team_id, games[0].away_id);
    assert_eq!(rows.iter().map(|r| r.played).sum::<u16>(), 2);
}

#[tokio::test]
async fn unknown_games_and_divisions() {
    let l = league(&FOUR).await;

    let err = record_result(&l.db, 9999, 1, 0).await.unwrap_err();
    assert!(matches!(err, LeagueError::NotFound { entity: "game", id: 9999 }));

    assert!(get_standings(&l.db, l.season.id, 999).await.unwrap().is_empty());
    assert!(get_standings(&l.db, 999, l.division.id).await.unwrap().is_empty());
}
