// Runtime settings. Defaults, then the environment (and `.env`), then command line flags.
use std::{env, path::{Path, PathBuf}};

use serde::{Deserialize, Serialize};

pub const DEFAULT_DATABASE_PATH: &str = "./data/league.db";
pub const DEFAULT_LOG_LEVEL: &str = "info";
const SNAPSHOT_DIR_NAME: &str = "snapshots";

#[derive(Debug, Serialize, Deserialize)]
#[derive(Clone, PartialEq)]
pub struct LeagueConfig {
    pub database_path: PathBuf,
    pub snapshot_dir: PathBuf,
    pub log_level: String,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        let database_path = PathBuf::from(DEFAULT_DATABASE_PATH);
        Self {
            snapshot_dir: default_snapshot_dir(&database_path),
            database_path,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

// Snapshots live next to the database unless told otherwise.
fn default_snapshot_dir(database_path: &Path) -> PathBuf {
    match database_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(SNAPSHOT_DIR_NAME),
        _ => PathBuf::from(SNAPSHOT_DIR_NAME),
    }
}

impl LeagueConfig {
    // Read the environment, loading `.env` first if there is one.
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        Self::from_vars(|key| env::var(key).ok())
    }

    // Build from any variable lookup. Empty values count as unset.
    pub fn from_vars<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_path = var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));
        let snapshot_dir = var("SNAPSHOT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_snapshot_dir(&database_path));
        let log_level = var("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Self { database_path, snapshot_dir, log_level }
    }

    // Command line flags win over everything else.
    // A new database path moves the snapshots with it unless their directory was given too.
    pub fn with_overrides(mut self, database_path: Option<PathBuf>, snapshot_dir: Option<PathBuf>, log_level: Option<String>) -> Self {
        if let Some(path) = database_path {
            if snapshot_dir.is_none() && self.snapshot_dir == default_snapshot_dir(&self.database_path) {
                self.snapshot_dir = default_snapshot_dir(&path);
            }
            self.database_path = path;
        }
        if let Some(dir) = snapshot_dir {
            self.snapshot_dir = dir;
        }
        if let Some(level) = log_level {
            self.log_level = level;
        }

        return self;
    }
}
