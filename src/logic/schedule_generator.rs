// Round robin schedule generation with the circle method.
// Every team meets every other team twice, once at home and once away.

use std::collections::BTreeSet;

use time::Date;
use tracing::{debug, info, warn};

use crate::{
    error::LeagueResult,
    logic::{
        blackout::BlackoutDate, division::Division, game::{Fixture, Game}, season::Season, team::Team,
        time::{GameDay, ROUND_INTERVAL}, types::{convert, Db, DivisionId, Round, SeasonId, TeamId}
    }
};

// Generate the full double round robin for a roster, with dates.
// Identical inputs always give identical output.
pub fn generate(roster: &[TeamId], start_date: Date, game_day: GameDay, blackouts: &BTreeSet<Date>) -> Vec<Fixture> {
    let matchdays = double_round_robin(roster);
    let dates = round_dates(matchdays.len(), start_date, game_day, blackouts);

    let mut fixtures = Vec::new();
    for (i, (matchday, date)) in matchdays.iter().zip(dates.iter()).enumerate() {
        let round: Round = convert::int_saturating(i + 1);
        for matchup in matchday {
            fixtures.push(Fixture {
                round,
                date: *date,
                home_id: matchup[0],
                away_id: matchup[1],
            });
        }
    }

    return fixtures;
}

// Generate matchdays where every team plays every other home and away.
// The second half mirrors the first with home and away swapped.
pub fn double_round_robin(roster: &[TeamId]) -> Vec<Vec<[TeamId; 2]>> {
    let mut matchdays = single_round_robin(roster);
    let mirrored: Vec<Vec<[TeamId; 2]>> = matchdays.iter()
        .map(|matchday| matchday.iter().map(|m| [m[1], m[0]]).collect())
        .collect();

    matchdays.extend(mirrored);
    return matchdays;
}

// Generate n-1 matchdays in which every pair of teams meets once.
// Odd rosters get a bye. Whoever draws the bye sits the round out.
pub fn single_round_robin(roster: &[TeamId]) -> Vec<Vec<[TeamId; 2]>> {
    let mut rotating: Vec<Option<TeamId>> = Vec::with_capacity(roster.len() + 1);
    for id in roster {
        if !rotating.contains(&Some(*id)) {
            rotating.push(Some(*id));
        }
    }

    if rotating.len() < 2 {
        return Vec::new();
    }

    if rotating.len() % 2 != 0 {
        rotating.push(None);
    }

    let n = rotating.len();
    let mut matchdays = Vec::with_capacity(n - 1);
    for _ in 0..n - 1 {
        let mut matchday = Vec::with_capacity(n / 2);
        for i in 0..n / 2 {
            if let (Some(home), Some(away)) = (rotating[i], rotating[n - 1 - i]) {
                matchday.push([home, away]);
            }
        }
        matchdays.push(matchday);

        // Keep the first entry fixed and move the last one in right behind it.
        if let Some(last) = rotating.pop() {
            rotating.insert(1, last);
        }
    }

    return matchdays;
}

// Give each round a date. The first round falls on the first game day on or after the start date,
// the rest a week apart. A blacked out date pushes that round and everything after it a week later.
pub fn round_dates(rounds: usize, start_date: Date, game_day: GameDay, blackouts: &BTreeSet<Date>) -> Vec<Date> {
    let mut dates = Vec::with_capacity(rounds);
    let mut date = game_day.first_on_or_after(start_date);

    for _ in 0..rounds {
        while blackouts.contains(&date) {
            debug!(%date, "skipping blackout date");
            date = match date.checked_add(ROUND_INTERVAL) {
                Some(d) => d,
                None => return dates,
            };
        }

        dates.push(date);
        date = match date.checked_add(ROUND_INTERVAL) {
            Some(d) => d,
            None => return dates,
        };
    }

    return dates;
}

// Replace every game of a division with a freshly generated schedule.
// Played games are removed as well. Nothing changes unless the whole replacement succeeds.
pub async fn generate_schedule(db: &Db, season_id: SeasonId, division_id: DivisionId) -> LeagueResult<Vec<Game>> {
    let season = match Season::fetch(db, season_id).await? {
        Some(s) => s,
        None => {
            warn!(season_id, "cannot generate schedule: season does not exist");
            return Ok(Vec::new());
        }
    };

    if Division::fetch(db, season_id, division_id).await?.is_none() {
        warn!(season_id, division_id, "cannot generate schedule: division does not exist");
        return Ok(Vec::new());
    }

    let roster: Vec<TeamId> = Team::roster(db, season_id, division_id).await?
        .iter()
        .map(|team| team.id)
        .collect();
    let blackouts = BlackoutDate::date_set(&BlackoutDate::for_season(db, season_id).await?);

    if roster.len() < 2 {
        warn!(season_id, division_id, teams = roster.len(), "not enough teams for a round robin");
    }

    let fixtures = generate(&roster, season.start_date, season.game_day, &blackouts);
    let mut games: Vec<Game> = fixtures.iter()
        .map(|fixture| Game::from_fixture(season_id, division_id, fixture))
        .collect();

    let mut tx = db.begin().await?;
    let removed = Game::delete_for_division(&mut *tx, season_id, division_id).await?;
    for game in games.iter_mut() {
        game.save(&mut *tx).await?;
    }
    tx.commit().await?;

    info!(season_id, division_id, removed, created = games.len(), "schedule generated");
    return Ok(games);
}

// Regenerate the schedules of every division in a season. Returns the number of games created.
pub async fn regenerate_all_schedules(db: &Db, season_id: SeasonId) -> LeagueResult<usize> {
    let mut total = 0;
    for division in Division::all(db, season_id).await? {
        total += generate_schedule(db, season_id, division.id).await?.len();
    }

    return Ok(total);
}
