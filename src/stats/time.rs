use chrono::Weekday;
use serde::Serialize;

use crate::calendar::{HourLabel, Month, serialize_hour, serialize_weekday, weekday_name};
use crate::error::EmptyDatasetError;
use crate::filter::FilterSpec;
use crate::record::Dataset;
use crate::stats::mode::mode;

/// Most frequent travel times within a filtered dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    /// Filters the dataset was built with; decides which figures are worth
    /// reporting.
    pub filter: FilterSpec,
    pub popular_month: Month,
    #[serde(serialize_with = "serialize_weekday")]
    pub popular_day: Weekday,
    /// Start hour, 0–23. Serialized as a 12-hour label.
    #[serde(serialize_with = "serialize_hour")]
    pub popular_hour: u32,
}

impl TimeStats {
    pub fn popular_day_name(&self) -> &'static str {
        weekday_name(self.popular_day)
    }

    pub fn popular_hour_label(&self) -> HourLabel {
        HourLabel(self.popular_hour)
    }
}

/// Computes the most common month, weekday and start hour.
pub fn compute(dataset: &Dataset, spec: &FilterSpec) -> Result<TimeStats, EmptyDatasetError> {
    let empty = EmptyDatasetError {
        statistic: "time statistics",
    };
    let records = dataset.records();

    let popular_month = mode(records.iter().map(|r| r.month())).ok_or(empty)?;
    let popular_day = mode(records.iter().map(|r| r.day_of_week())).ok_or(empty)?;
    let popular_hour = mode(records.iter().map(|r| r.hour())).ok_or(empty)?;

    Ok(TimeStats {
        filter: *spec,
        popular_month,
        popular_day,
        popular_hour,
    })
}
