//! Filter Engine: restricts a dataset to a month and/or weekday.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Serialize, Serializer};

use crate::calendar::{Month, parse_weekday, weekday_name};
use crate::config::City;
use crate::error::FilterParseError;
use crate::record::{Dataset, TripRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Only(Month),
}

impl MonthFilter {
    pub fn matches(self, record: &TripRecord) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Only(m) => record.month() == m,
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Only(m) => f.write_str(m.name()),
        }
    }
}

impl FromStr for MonthFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(MonthFilter::All);
        }
        s.parse::<Month>()
            .map(MonthFilter::Only)
            .map_err(|()| FilterParseError::Month(s.to_string()))
    }
}

impl Serialize for MonthFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayFilter {
    #[default]
    All,
    Only(Weekday),
}

impl DayFilter {
    pub fn matches(self, record: &TripRecord) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Only(d) => record.day_of_week() == d,
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("all"),
            DayFilter::Only(d) => f.write_str(weekday_name(*d)),
        }
    }
}

impl FromStr for DayFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(DayFilter::All);
        }
        parse_weekday(s)
            .map(DayFilter::Only)
            .ok_or_else(|| FilterParseError::Day(s.to_string()))
    }
}

impl Serialize for DayFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A city plus optional month and weekday restrictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl FilterSpec {
    pub fn new(city: City, month: MonthFilter, day: DayFilter) -> Self {
        Self { city, month, day }
    }

    /// No month or day restriction.
    pub fn unfiltered(city: City) -> Self {
        Self::new(city, MonthFilter::All, DayFilter::All)
    }

    pub fn matches(&self, record: &TripRecord) -> bool {
        self.month.matches(record) && self.day.matches(record)
    }
}

/// Returns the records of `dataset` that satisfy both the month and the day
/// filter of `spec`, in their original order. `dataset` is left untouched.
pub fn filter(dataset: &Dataset, spec: &FilterSpec) -> Dataset {
    dataset.retain_view(|r| spec.matches(r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::{dataset, trip};

    fn sample() -> Dataset {
        dataset(vec![
            // Mon 2 Jan, Tue 3 Jan, Mon 6 Feb, Mon 9 Jan, Sat 7 Jan
            trip("2017-01-02 08:00:00", "2017-01-02 08:10:00", "A", "B"),
            trip("2017-01-03 09:00:00", "2017-01-03 09:10:00", "B", "C"),
            trip("2017-02-06 10:00:00", "2017-02-06 10:10:00", "C", "D"),
            trip("2017-01-09 11:00:00", "2017-01-09 11:10:00", "D", "E"),
            trip("2017-01-07 12:00:00", "2017-01-07 12:10:00", "E", "F"),
        ])
    }

    fn spec(month: &str, day: &str) -> FilterSpec {
        FilterSpec::new(City::Chicago, month.parse().unwrap(), day.parse().unwrap())
    }

    #[test]
    fn test_all_all_is_identity() {
        let ds = sample();
        assert_eq!(filter(&ds, &spec("all", "all")), ds);
    }

    #[test]
    fn test_month_filter() {
        let out = filter(&sample(), &spec("january", "all"));
        assert_eq!(out.len(), 4);
        assert!(out.records().iter().all(|r| r.month() == Month::January));
    }

    #[test]
    fn test_day_filter_removes_exactly_other_days() {
        let ds = sample();
        let out = filter(&ds, &spec("january", "Monday"));
        let stations: Vec<_> = out.records().iter().map(|r| r.start_station()).collect();
        assert_eq!(stations, vec!["A", "D"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let s = spec("january", "monday");
        let once = filter(&sample(), &s);
        assert_eq!(filter(&once, &s), once);
    }

    #[test]
    fn test_month_and_day_commute() {
        let ds = sample();
        let month_then_day = filter(&filter(&ds, &spec("january", "all")), &spec("all", "monday"));
        let day_then_month = filter(&filter(&ds, &spec("all", "monday")), &spec("january", "all"));
        assert_eq!(month_then_day, day_then_month);
        assert_eq!(month_then_day, filter(&ds, &spec("january", "monday")));
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let out = filter(&sample(), &spec("june", "all"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("ALL".parse::<MonthFilter>(), Ok(MonthFilter::All));
        assert_eq!("May".parse::<MonthFilter>(), Ok(MonthFilter::Only(Month::May)));
        assert_eq!(
            "july".parse::<MonthFilter>(),
            Err(FilterParseError::Month("july".to_string()))
        );
        assert_eq!("friday".parse::<DayFilter>(), Ok(DayFilter::Only(Weekday::Fri)));
        assert!("fri".parse::<DayFilter>().is_err());
    }

    #[test]
    fn test_filter_display() {
        assert_eq!(MonthFilter::Only(Month::March).to_string(), "March");
        assert_eq!(DayFilter::Only(Weekday::Sun).to_string(), "Sunday");
        assert_eq!(DayFilter::All.to_string(), "all");
    }
}
