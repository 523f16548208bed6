//! Calendar vocabulary for the trip logs: the six covered months, weekday
//! names, and 12-hour clock labels.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::{Serialize, Serializer};

/// Months covered by the trip logs (January through June).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
}

impl Month {
    pub const ALL: [Month; 6] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];

    /// 1-based month number.
    pub fn number(self) -> u32 {
        self as u32
    }

    pub fn from_number(n: u32) -> Option<Self> {
        n.checked_sub(1)
            .and_then(|i| Self::ALL.get(i as usize))
            .copied()
    }

    /// Month of a timestamp, or `None` outside January–June.
    pub fn of(ts: &NaiveDateTime) -> Option<Self> {
        Self::from_number(ts.month())
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name of a weekday ("Monday").
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Serializes a weekday by its full name rather than chrono's abbreviation.
pub fn serialize_weekday<S: Serializer>(
    day: &Weekday,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(weekday_name(*day))
}

/// Serializes a 0–23 start hour as its [`HourLabel`].
pub fn serialize_hour<S: Serializer>(hour: &u32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&HourLabel(*hour))
}

/// Parses a full weekday name, ignoring case. Abbreviations are rejected.
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    let s = s.trim();
    WEEKDAYS
        .into_iter()
        .find(|d| weekday_name(*d).eq_ignore_ascii_case(s))
}

/// Hour of day rendered on a 12-hour clock.
///
/// | Hour  | Label         |
/// |-------|---------------|
/// | 0     | `12 midnight` |
/// | 1–11  | `<h> AM`      |
/// | 12    | `12 noon`     |
/// | 13–23 | `<h-12> PM`   |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourLabel(pub u32);

impl fmt::Display for HourLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => f.write_str("12 midnight"),
            h @ 1..=11 => write!(f, "{h} AM"),
            12 => f.write_str("12 noon"),
            h => write!(f, "{} PM", h - 12),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_numbers_round_trip() {
        for m in Month::ALL {
            assert_eq!(Month::from_number(m.number()), Some(m));
        }
        assert_eq!(Month::from_number(0), None);
        assert_eq!(Month::from_number(7), None);
    }

    #[test]
    fn test_month_parse_ignores_case() {
        assert_eq!("march".parse::<Month>(), Ok(Month::March));
        assert_eq!(" JUNE ".parse::<Month>(), Ok(Month::June));
        assert!("july".parse::<Month>().is_err());
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("monday"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("SUNDAY"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("mon"), None);
    }

    #[test]
    fn test_hour_labels() {
        assert_eq!(HourLabel(0).to_string(), "12 midnight");
        assert_eq!(HourLabel(8).to_string(), "8 AM");
        assert_eq!(HourLabel(11).to_string(), "11 AM");
        assert_eq!(HourLabel(12).to_string(), "12 noon");
        assert_eq!(HourLabel(13).to_string(), "1 PM");
        assert_eq!(HourLabel(23).to_string(), "11 PM");
    }
}
