// Dates on which no game may be scheduled.
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

use crate::logic::{time::iso_date_format, types::{BlackoutId, SeasonId}};

#[derive(Debug, Serialize, Deserialize)]
#[derive(Clone, PartialEq)]
#[derive(FromRow)]
pub struct BlackoutDate {
    pub id: BlackoutId,
    pub season_id: SeasonId,
    #[sqlx(rename = "blackout_date")]
    #[serde(with = "iso_date_format")]
    pub date: Date,
    pub reason: Option<String>,
}

impl BlackoutDate {
    // Collect the dates into an ordered set for the schedule generator.
    pub fn date_set(blackouts: &[BlackoutDate]) -> BTreeSet<Date> {
        blackouts.iter().map(|b| b.date).collect()
    }
}
