mod common;

use common::{league, FOUR, START};
use league_engine::{
    db::{self, snapshot},
    generate_schedule, record_result,
    logic::{blackout::BlackoutDate, division::Division, game::Game, season::Season, team::Team, time::GameDay},
    LeagueError,
};
use time::macros::date;

#[tokio::test]
async fn only_the_newest_season_is_active() {
    let l = league(&FOUR).await;
    let next = Season::create(&l.db, "Fall 2026", date!(2026-09-01), GameDay::Sunday).await.unwrap();

    let active = Season::active(&l.db).await.unwrap().unwrap();
    assert_eq!(active, next);
    assert_eq!(active.game_day, GameDay::Sunday);
    assert_eq!(active.first_game_date(), date!(2026-09-06));

    let old = Season::fetch(&l.db, l.season.id).await.unwrap().unwrap();
    assert!(!old.is_active);
    assert!(Season::fetch(&l.db, 999).await.unwrap().is_none());
}

#[tokio::test]
async fn teams_must_join_a_division_of_their_season() {
    let l = league(&FOUR).await;
    let other = Season::create(&l.db, "Other", START, GameDay::Saturday).await.unwrap();

    let mut misplaced = Team::build("Wanderers", None, other.id, l.division.id);
    assert!(matches!(misplaced.add(&l.db).await, Err(LeagueError::InvalidInput(_))));

    let mut unnamed = Team::build("   ", None, l.season.id, l.division.id);
    assert!(matches!(unnamed.add(&l.db).await, Err(LeagueError::InvalidInput(_))));

    assert!(matches!(Division::create(&l.db, 999, "Nowhere").await, Err(LeagueError::NotFound { .. })));
}

#[tokio::test]
async fn removed_teams_keep_their_record_but_leave_the_roster() {
    let l = league(&FOUR).await;
    assert_eq!(l.teams[0].short_name, "ALP");

    Team::deactivate(&l.db, l.teams[0].id).await.unwrap();
    let roster = Team::roster(&l.db, l.season.id, l.division.id).await.unwrap();
    assert_eq!(roster.len(), 3);
    assert!(roster.iter().all(|t| t.id != l.teams[0].id));

    let removed = Team::fetch(&l.db, l.teams[0].id).await.unwrap();
    assert!(!removed.is_active);
    assert_eq!(Team::all(&l.db, l.season.id).await.unwrap().len(), 4);
    assert!(Team::find_by_name(&l.db, l.season.id, "alpha").await.unwrap().is_none());

    assert!(matches!(Team::deactivate(&l.db, 999).await, Err(LeagueError::NotFound { entity: "team", .. })));
}

#[tokio::test]
async fn blackout_dates_are_kept_in_date_order() {
    let l = league(&FOUR).await;
    let late = BlackoutDate::add(&l.db, l.season.id, date!(2026-04-04), Some("Easter")).await.unwrap();
    let early = BlackoutDate::add(&l.db, l.season.id, date!(2026-03-14), None).await.unwrap();

    let listed = BlackoutDate::for_season(&l.db, l.season.id).await.unwrap();
    assert_eq!(listed, vec![early.clone(), late.clone()]);
    assert_eq!(late.reason.as_deref(), Some("Easter"));

    BlackoutDate::delete(&l.db, early.id).await.unwrap();
    assert_eq!(BlackoutDate::for_season(&l.db, l.season.id).await.unwrap(), vec![late]);
    assert!(matches!(BlackoutDate::delete(&l.db, early.id).await, Err(LeagueError::NotFound { .. })));
    assert!(matches!(BlackoutDate::add(&l.db, 999, START, None).await, Err(LeagueError::NotFound { .. })));
}

#[tokio::test]
async fn schedule_queries() {
    let l = league(&FOUR).await;
    let games = generate_schedule(&l.db, l.season.id, l.division.id).await.unwrap();
    let first_round: Vec<&Game> = games.iter().filter(|g| g.round == 1).collect();
    record_result(&l.db, first_round[0].id, 1, 0).await.unwrap();
    record_result(&l.db, first_round[1].id, 2, 2).await.unwrap();

    let stats = Season::stats(&l.db, l.season.id).await.unwrap();
    assert_eq!((stats.total_games, stats.played_games, stats.remaining_games), (12, 2, 10));
    assert_eq!((stats.total_teams, stats.total_divisions), (4, 1));

    // Round one is done, so the next two unplayed games are round two.
    let upcoming = Game::upcoming(&l.db, l.season.id, START, 2).await.unwrap();
    assert_eq!(upcoming.len(), 2);
    assert!(upcoming.iter().all(|g| !g.is_played && g.round == 2));

    let recent = Game::recent_results(&l.db, l.season.id, 10).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert!(recent.iter().all(|g| g.is_played));

    let team = l.teams[0].id;
    let next = Game::next_for_team(&l.db, l.season.id, team, date!(2026-03-08)).await.unwrap().unwrap();
    assert!(next.involves(team));
    assert_eq!(next.date, date!(2026-03-14));
    assert!(Game::next_for_team(&l.db, l.season.id, team, date!(2027-01-01)).await.unwrap().is_none());

    assert!(matches!(Game::fetch(&l.db, 999).await, Err(LeagueError::NotFound { entity: "game", .. })));
}

#[tokio::test]
async fn snapshots_copy_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let l = league(&FOUR).await;
    generate_schedule(&l.db, l.season.id, l.division.id).await.unwrap();

    let first = snapshot::take(&l.db, dir.path(), "before regenerate").await.unwrap();
    let second = snapshot::take(&l.db, dir.path(), "before regenerate").await.unwrap();
    assert_ne!(first, second);
    assert!(first.file_name().unwrap().to_string_lossy().starts_with("league_"));
    assert!(first.to_string_lossy().contains("before_regenerate"));

    let listed = snapshot::list(dir.path()).unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.contains(&first) && listed.contains(&second));

    let copy = db::connect(&first).await.unwrap();
    let stats = Season::stats(&copy, l.season.id).await.unwrap();
    assert_eq!(stats.total_games, 12);

    assert!(snapshot::list(&dir.path().join("missing")).unwrap().is_empty());
}

#[tokio::test]
async fn file_databases_are_created_on_connect() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("league.db");

    let db = db::connect(&path).await.unwrap();
    Season::create(&db, "On disk", START, GameDay::Saturday).await.unwrap();
    db.close().await;

    assert!(path.exists());
    let reopened = db::connect(&path).await.unwrap();
    assert_eq!(Season::active(&reopened).await.unwrap().unwrap().name, "On disk");
}
