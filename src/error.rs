// Errors surfaced by the league engine.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeagueError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u32 },

    #[error("Storage failure: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Migration failure: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LeagueError {
    pub fn not_found(entity: &'static str, id: u32) -> Self {
        LeagueError::NotFound { entity, id }
    }
}

pub type LeagueResult<T> = Result<T, LeagueError>;
