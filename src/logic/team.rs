// Teams belong to one season and one division for their whole life.
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::logic::types::{DivisionId, SeasonId, TeamId};

pub const DEFAULT_COLOR_HEX: &str = "#888888";
pub const DEFAULT_COLOR_NAME: &str = "Gray";

#[derive(Debug, Serialize, Deserialize)]
#[derive(Clone, PartialEq)]
#[derive(FromRow)]
pub struct Team {
    pub id: TeamId,
    #[sqlx(rename = "full_name")]
    pub name: String,
    pub short_name: String,
    pub color_hex: String,
    pub color_name: String,
    pub season_id: SeasonId,
    pub division_id: DivisionId,

    // Removed teams are only deactivated so that their old games keep their references.
    pub is_active: bool,
}

impl Default for Team {
    fn default() -> Self {
        Self {
            id: TeamId::default(),
            name: String::default(),
            short_name: String::default(),
            color_hex: DEFAULT_COLOR_HEX.to_string(),
            color_name: DEFAULT_COLOR_NAME.to_string(),
            season_id: SeasonId::default(),
            division_id: DivisionId::default(),
            is_active: true,
        }
    }
}

impl Team {
    // Build a team. Missing short names are derived from the full name.
    pub fn build(name: &str, short_name: Option<&str>, season_id: SeasonId, division_id: DivisionId) -> Self {
        let name = name.trim().to_string();
        let short_name = match short_name.map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => Self::default_short_name(&name),
        };

        Self {
            name,
            short_name,
            season_id,
            division_id,
            ..Default::default()
        }
    }

    // Give the team its colours.
    pub fn with_colors(mut self, color_hex: &str, color_name: &str) -> Self {
        self.color_hex = color_hex.to_string();
        self.color_name = color_name.to_string();
        return self;
    }

    // The first three characters of the name, uppercased.
    fn default_short_name(name: &str) -> String {
        name.chars().filter(|c| !c.is_whitespace()).take(3).collect::<String>().to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_falls_back_to_name() {
        let team = Team::build("Krewe de Goal", None, 1, 2);
        assert_eq!(team.short_name, "KRE");
        assert_eq!(team.color_hex, DEFAULT_COLOR_HEX);
        assert!(team.is_active);

        let team = Team::build("NOLA United", Some("  "), 1, 2);
        assert_eq!(team.short_name, "NOL");

        let team = Team::build(" Gooners ", Some("GOO"), 1, 2);
        assert_eq!(team.name, "Gooners");
        assert_eq!(team.short_name, "GOO");
    }
}
