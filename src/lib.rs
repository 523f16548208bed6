//! Descriptive statistics over per-city bike-share trip logs.
//!
//! Load a city's trips with [`load`], narrow them with [`filter`], then hand
//! the result to any of the `compute_*` functions.

pub mod calendar;
pub mod config;
pub mod error;
pub mod filter;
pub mod output;
pub mod record;
pub mod stats;
pub mod store;

pub use config::{City, CityRegistry};
pub use error::{DataSourceError, EmptyDatasetError, Error, ParseError, Result};
pub use filter::{DayFilter, FilterSpec, MonthFilter, filter};
pub use record::{Dataset, Schema, TripRecord};
pub use stats::{BirthYearSummary, DurationStats, StationStats, TimeStats, UserStats};
pub use store::RecordStore;

/// Loads every trip for `city` using the file registered in `registry`.
pub fn load(registry: &CityRegistry, city: City) -> Result<Dataset> {
    RecordStore::new(registry.clone()).load(city)
}

pub fn compute_time_stats(
    dataset: &Dataset,
    spec: &FilterSpec,
) -> std::result::Result<TimeStats, EmptyDatasetError> {
    stats::time::compute(dataset, spec)
}

pub fn compute_station_stats(
    dataset: &Dataset,
) -> std::result::Result<StationStats, EmptyDatasetError> {
    stats::station::compute(dataset)
}

pub fn compute_duration_stats(
    dataset: &Dataset,
) -> std::result::Result<DurationStats, EmptyDatasetError> {
    stats::duration::compute(dataset)
}

pub fn compute_user_stats(dataset: &Dataset) -> std::result::Result<UserStats, EmptyDatasetError> {
    stats::user::compute(dataset)
}

/// Up to `count` raw records from `offset`; short or empty near the end.
pub fn page(dataset: &Dataset, offset: usize, count: usize) -> &[TripRecord] {
    dataset.page(offset, count)
}
