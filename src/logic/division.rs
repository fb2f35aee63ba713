// Divisions split a season's teams into separate round robins.
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::logic::types::{DivisionId, SeasonId};

#[derive(Debug, Serialize, Deserialize)]
#[derive(Default, Clone, PartialEq)]
#[derive(FromRow)]
pub struct Division {
    pub id: DivisionId,
    pub season_id: SeasonId,
    #[sqlx(rename = "division_name")]
    pub name: String,
}

impl Division {
    pub fn build(season_id: SeasonId, name: &str) -> Self {
        Self {
            season_id,
            name: name.trim().to_string(),
            ..Default::default()
        }
    }
}
