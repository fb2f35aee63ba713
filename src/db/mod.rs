// The league database.
mod blackout;
mod division;
mod game;
mod season;
mod team;
pub mod snapshot;

use std::{collections::HashMap, fs, path::Path, str::FromStr};

use lazy_static::lazy_static;
use sqlx::{migrate::Migrator, sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}};
use time::macros::date;
use tracing::{info, warn};

use crate::{
    error::LeagueResult,
    logic::{division::Division, schedule_generator, season::Season, team::Team, time::GameDay, types::Db}
};

pub static MIGRATOR: Migrator = sqlx::migrate!("sql/migrations");

// Open the database file, creating it if needed, and bring the schema up to date.
// Writes go through a single connection.
pub async fn connect(path: &Path) -> LeagueResult<Db> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options).await?;

    MIGRATOR.run(&db).await?;
    return Ok(db);
}

// Fresh database that lives as long as the pool.
pub async fn connect_in_memory() -> LeagueResult<Db> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?
        .foreign_keys(true);

    // Every new connection would get its own empty database, so the one connection is never let go.
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options).await?;

    MIGRATOR.run(&db).await?;
    return Ok(db);
}

pub struct SeedDivision {
    pub name: &'static str,
    pub teams: [(&'static str, &'static str); 7],
}

pub const SEED_SEASON: &str = "Spring 2026";

pub const SEED_DIVISIONS: [SeedDivision; 3] = [
    SeedDivision {
        name: "Sunday Coed Division 1",
        teams: [
            ("Gooners", "GOO"),
            ("Whistle Pigs", "WHP"),
            ("Uptowners", "UPT"),
            ("YBNG", "YBN"),
            ("Petty Bandits", "PTB"),
            ("Monstars", "MON"),
            ("FC Tchoupitoulas", "FCT"),
        ],
    },
    SeedDivision {
        name: "Sunday Coed Division 2",
        teams: [
            ("Ponchartrain FC", "PFC"),
            ("Back That Pass Up", "BTP"),
            ("Ballcelona", "BAL"),
            ("Dura Mater", "DRM"),
            ("After Hours FC", "AHF"),
            ("West Bridge FC", "WBF"),
            ("Krewe de Goal", "KDG"),
        ],
    },
    SeedDivision {
        name: "Sunday Coed Division 3",
        teams: [
            ("Transplants", "TRP"),
            ("Banana Republic", "BNR"),
            ("Couch Potatoes", "CPC"),
            ("Sloppy Seconds", "SLS"),
            ("NOLA United", "NOU"),
            ("Satsuma's Revenge", "SAT"),
            ("Bayou Brawlers", "BBR"),
        ],
    },
];

lazy_static! {
    // Kit colours of the demo teams: hex code and spoken name.
    pub static ref TEAM_COLORS: HashMap<&'static str, (&'static str, &'static str)> = {
        HashMap::from([
            ("Gooners", ("#FF0000", "Red")),
            ("Whistle Pigs", ("#FFFFFF", "White")),
            ("Uptowners", ("#0066CC", "Royal Blue")),
            ("YBNG", ("#FFD700", "Gold")),
            ("Petty Bandits", ("#000000", "Black")),
            ("Monstars", ("#00CC66", "Green")),
            ("FC Tchoupitoulas", ("#FF8C00", "Orange")),

            ("Ponchartrain FC", ("#003366", "Navy")),
            ("Back That Pass Up", ("#FF69B4", "Hot Pink")),
            ("Ballcelona", ("#800000", "Maroon")),
            ("Dura Mater", ("#8B00FF", "Purple")),
            ("After Hours FC", ("#CC0000", "Scarlet")),
            ("West Bridge FC", ("#008080", "Teal")),
            ("Krewe de Goal", ("#FFFF00", "Yellow")),

            ("Transplants", ("#228B22", "Forest Green")),
            ("Banana Republic", ("#FFE135", "Banana Yellow")),
            ("Couch Potatoes", ("#8B4513", "Brown")),
            ("Sloppy Seconds", ("#FFB6C1", "Pink")),
            ("NOLA United", ("#4B0082", "Deep Purple")),
            ("Satsuma's Revenge", ("#FF6600", "Satsuma Orange")),
            ("Bayou Brawlers", ("#87CEEB", "Sky Blue")),
        ])
    };
}

// Fill an empty database with the demo season and schedule it.
// Returns false and leaves the data alone if any season exists already.
pub async fn seed_demo(db: &Db) -> LeagueResult<bool> {
    let seasons: u32 = sqlx::query_scalar("SELECT COUNT(*) FROM Season")
        .fetch_one(db).await?;
    if seasons > 0 {
        warn!(seasons, "database already has data, not seeding");
        return Ok(false);
    }

    let now = std::time::Instant::now();
    let season = Season::create(db, SEED_SEASON, date!(2026-03-07), GameDay::Saturday).await?;

    let mut team_count = 0;
    for seed in SEED_DIVISIONS.iter() {
        let division = Division::create(db, season.id, seed.name).await?;
        for (name, short_name) in seed.teams {
            let mut team = Team::build(name, Some(short_name), season.id, division.id);
            if let Some((hex, colour)) = TEAM_COLORS.get(name) {
                team = team.with_colors(hex, colour);
            }
            team.add(db).await?;
            team_count += 1;
        }
    }

    let games = schedule_generator::regenerate_all_schedules(db, season.id).await?;
    info!(
        season_id = season.id, divisions = SEED_DIVISIONS.len(), teams = team_count, games,
        "seeded demo data in {:.2?}", now.elapsed()
    );

    return Ok(true);
}
