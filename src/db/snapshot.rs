// Point-in-time copies of the league database.

use std::{fs, path::{Path, PathBuf}};

use time::{OffsetDateTime, macros::format_description};
use tracing::info;

use crate::{error::LeagueResult, logic::types::Db};

const PREFIX: &str = "league_";
const EXTENSION: &str = "db";

// Keep reasons usable in a file name.
fn sanitise(reason: &str) -> String {
    let tag: String = reason.trim().chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c.to_ascii_lowercase() } else { '_' })
        .collect();

    if tag.is_empty() { "manual".to_string() } else { tag }
}

fn file_name(timestamp: &str, reason: &str, attempt: u32) -> String {
    match attempt {
        0 => format!("{PREFIX}{timestamp}_{reason}.{EXTENSION}"),
        n => format!("{PREFIX}{timestamp}_{reason}_{n}.{EXTENSION}"),
    }
}

// Write a consistent copy of the database into the directory and return its path.
pub async fn take(db: &Db, dir: &Path, reason: &str) -> LeagueResult<PathBuf> {
    fs::create_dir_all(dir)?;

    let format = format_description!("[year][month][day]_[hour][minute][second]");
    let timestamp = OffsetDateTime::now_utc().format(&format)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let reason = sanitise(reason);

    let mut attempt = 0;
    let mut path = dir.join(file_name(&timestamp, &reason, attempt));
    while path.exists() {
        attempt += 1;
        path = dir.join(file_name(&timestamp, &reason, attempt));
    }

    sqlx::query("VACUUM INTO $1")
        .bind(path.to_string_lossy().into_owned())
        .execute(db).await?;

    info!(path = %path.display(), "snapshot taken");
    return Ok(path);
}

// Snapshots in the directory, newest first.
pub fn list(dir: &Path) -> LeagueResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut snapshots = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_snapshot = path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(PREFIX))
            && path.extension().is_some_and(|e| e == EXTENSION);

        if is_snapshot {
            snapshots.push(path);
        }
    }

    snapshots.sort_by(|a, b| b.cmp(a));
    return Ok(snapshots);
}
