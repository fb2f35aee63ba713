// Time-related operations.
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{format_description::BorrowedFormatItem, macros::format_description, Date, Duration, Weekday};

use crate::error::{LeagueError, LeagueResult};

// Use this format for formatting and parsing dates.
pub static ISO_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

// Rounds are played once a week.
pub const ROUND_INTERVAL: Duration = Duration::WEEK;

// JSON serialisation and deserialisation for ISO dates.
pub mod iso_date_format {
    use serde::{de::Error as _, ser::Error as _, Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::ISO_FORMAT;

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        let s = date.format(&ISO_FORMAT).map_err(S::Error::custom)?;
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where D: Deserializer<'de> {
        let s = String::deserialize(deserializer)?;
        Date::parse(s.as_str(), &ISO_FORMAT).map_err(D::Error::custom)
    }
}

// Parse a date given as YYYY-MM-DD.
pub fn parse_iso_date(s: &str) -> LeagueResult<Date> {
    Date::parse(s.trim(), &ISO_FORMAT)
        .map_err(|e| LeagueError::InvalidInput(format!("invalid date '{s}': {e}")))
}

// Format a date as YYYY-MM-DD.
pub fn iso_date_string(date: Date) -> String {
    // The format only has numeric components, so it cannot fail for a valid Date.
    date.format(&ISO_FORMAT).unwrap_or_default()
}

// The weekday on which a season's games are played.
#[derive(Debug, Serialize, Deserialize)]
#[derive(Default, Clone, Copy)]
#[derive(PartialEq, Eq, Hash)]
pub enum GameDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    #[default]
    Saturday,
    Sunday,
}

impl GameDay {
    pub const ALL: [GameDay; 7] = [
        GameDay::Monday,
        GameDay::Tuesday,
        GameDay::Wednesday,
        GameDay::Thursday,
        GameDay::Friday,
        GameDay::Saturday,
        GameDay::Sunday,
    ];

    pub fn weekday(&self) -> Weekday {
        match self {
            GameDay::Monday => Weekday::Monday,
            GameDay::Tuesday => Weekday::Tuesday,
            GameDay::Wednesday => Weekday::Wednesday,
            GameDay::Thursday => Weekday::Thursday,
            GameDay::Friday => Weekday::Friday,
            GameDay::Saturday => Weekday::Saturday,
            GameDay::Sunday => Weekday::Sunday,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameDay::Monday => "Monday",
            GameDay::Tuesday => "Tuesday",
            GameDay::Wednesday => "Wednesday",
            GameDay::Thursday => "Thursday",
            GameDay::Friday => "Friday",
            GameDay::Saturday => "Saturday",
            GameDay::Sunday => "Sunday",
        }
    }

    // Get the first date on or after the given date that falls on this weekday.
    pub fn first_on_or_after(&self, date: Date) -> Date {
        let target = self.weekday();
        let mut current = date;
        while current.weekday() != target {
            current = match current.next_day() {
                Some(d) => d,
                None => break,
            };
        }

        return current;
    }
}

impl From<Weekday> for GameDay {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Monday => GameDay::Monday,
            Weekday::Tuesday => GameDay::Tuesday,
            Weekday::Wednesday => GameDay::Wednesday,
            Weekday::Thursday => GameDay::Thursday,
            Weekday::Friday => GameDay::Friday,
            Weekday::Saturday => GameDay::Saturday,
            Weekday::Sunday => GameDay::Sunday,
        }
    }
}

impl Display for GameDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// Case-insensitive, accepts full names and three-letter abbreviations.
impl FromStr for GameDay {
    type Err = LeagueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        for day in GameDay::ALL {
            let name = day.name().to_ascii_lowercase();
            if lowered == name || (lowered.len() == 3 && name.starts_with(&lowered)) {
                return Ok(day);
            }
        }

        Err(LeagueError::InvalidInput(format!("unknown game day '{s}'")))
    }
}
