// Weekday Domain Model

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Day of week a maintenance window recurs on
///
/// Persisted and parsed in its three-letter form ("Sun".."Sat").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Sun => "Sun",
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainError::InvalidWeekday(s.to_string()))
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sun => Weekday::Sun,
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("mon".parse::<Weekday>().unwrap(), Weekday::Mon);
        assert_eq!(" SAT ".parse::<Weekday>().unwrap(), Weekday::Sat);
    }

    #[test]
    fn test_parse_rejects_unknown_day() {
        let err = "Monday".parse::<Weekday>().unwrap_err();
        assert!(err.to_string().contains("Monday"));
    }

    #[test]
    fn test_from_calendar_date() {
        // 2024-01-01 was a Monday
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(Weekday::from(chrono::Datelike::weekday(&date)), Weekday::Mon);
    }

    #[test]
    fn test_display_matches_storage_form() {
        for day in Weekday::ALL {
            assert_eq!(day.to_string().parse::<Weekday>().unwrap(), day);
        }
    }
}
