//! Trip records and the immutable per-city dataset built from them.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use crate::calendar::{Month, serialize_weekday};
use crate::config::City;

/// One bicycle rental.
///
/// `month`, `day_of_week` and `hour` are derived from `start_time` when the
/// record is built and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    start_station: String,
    end_station: String,
    trip_duration: f64,
    user_type: Option<String>,
    gender: Option<String>,
    birth_year: Option<i32>,

    month: Month,
    #[serde(serialize_with = "serialize_weekday")]
    day_of_week: Weekday,
    hour: u32,
}

impl TripRecord {
    /// Builds a record, deriving the calendar fields from `start_time`.
    ///
    /// Returns `None` if `start_time` falls outside January–June. The trip
    /// duration defaults to `end_time - start_time` until overridden with
    /// [`TripRecord::with_trip_duration`].
    pub fn new(
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
    ) -> Option<Self> {
        let month = Month::of(&start_time)?;
        Some(Self {
            start_time,
            end_time,
            start_station: start_station.into(),
            end_station: end_station.into(),
            trip_duration: elapsed(start_time, end_time),
            user_type: None,
            gender: None,
            birth_year: None,
            month,
            day_of_week: start_time.weekday(),
            hour: start_time.hour(),
        })
    }

    /// Set the duration reported by the source, in seconds.
    pub fn with_trip_duration(mut self, seconds: f64) -> Self {
        self.trip_duration = seconds;
        self
    }

    pub fn with_user_type(mut self, user_type: Option<String>) -> Self {
        self.user_type = user_type;
        self
    }

    pub fn with_gender(mut self, gender: Option<String>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_year(mut self, birth_year: Option<i32>) -> Self {
        self.birth_year = birth_year;
        self
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveDateTime {
        self.end_time
    }

    pub fn start_station(&self) -> &str {
        &self.start_station
    }

    pub fn end_station(&self) -> &str {
        &self.end_station
    }

    pub fn trip_duration(&self) -> f64 {
        self.trip_duration
    }

    pub fn user_type(&self) -> Option<&str> {
        self.user_type.as_deref()
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birth_year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn day_of_week(&self) -> Weekday {
        self.day_of_week
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// Elapsed seconds between start and end, to the millisecond. May be
    /// zero or negative for corrupt rows.
    pub fn elapsed_seconds(&self) -> f64 {
        elapsed(self.start_time, self.end_time)
    }
}

fn elapsed(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    (end - start).num_milliseconds() as f64 / 1000.0
}

/// Which optional columns the source file carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub user_type: bool,
    pub gender: bool,
    pub birth_year: bool,
}

impl Schema {
    /// Every optional column present.
    pub fn full() -> Self {
        Self {
            user_type: true,
            gender: true,
            birth_year: true,
        }
    }
}

/// Ordered trips for one city. Never modified after construction;
/// filtering builds a new `Dataset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    city: City,
    schema: Schema,
    records: Vec<TripRecord>,
}

impl Dataset {
    pub fn new(city: City, schema: Schema, records: Vec<TripRecord>) -> Self {
        Self {
            city,
            schema,
            records,
        }
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Builds a dataset with the same city and schema holding only the
    /// records accepted by `keep`, in their original order.
    pub fn retain_view(&self, mut keep: impl FnMut(&TripRecord) -> bool) -> Self {
        Self {
            city: self.city,
            schema: self.schema,
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Up to `count` records starting at `offset`. Offsets past the end
    /// yield an empty slice.
    pub fn page(&self, offset: usize, count: usize) -> &[TripRecord] {
        let start = offset.min(self.records.len());
        let end = start.saturating_add(count).min(self.records.len());
        &self.records[start..end]
    }
}
