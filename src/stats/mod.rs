//! Descriptive statistics over a filtered [`Dataset`](crate::record::Dataset).
//!
//! Each computation reads the dataset independently and fails with
//! [`EmptyDatasetError`](crate::error::EmptyDatasetError) when there is
//! nothing to summarize.

pub mod duration;
pub mod mode;
pub mod station;
pub mod time;
pub mod user;

pub use duration::DurationStats;
pub use station::StationStats;
pub use time::TimeStats;
pub use user::{BirthYearSummary, UserStats};
