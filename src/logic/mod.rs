pub mod types;
pub mod time;

pub mod season;
pub mod division;
pub mod team;
pub mod blackout;
pub mod game;

pub mod schedule_generator;
pub mod standings;
pub mod playoffs;
pub mod simulation;
