use serde::Serialize;

use crate::error::EmptyDatasetError;
use crate::record::Dataset;
use crate::stats::mode::mode;

/// Most used stations and start/end combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub popular_start: String,
    pub popular_end: String,
    /// Most common `"<start> to <end>"` key.
    pub popular_trip: String,
}

pub fn compute(dataset: &Dataset) -> Result<StationStats, EmptyDatasetError> {
    let empty = EmptyDatasetError {
        statistic: "station statistics",
    };
    let records = dataset.records();

    let popular_start = mode(records.iter().map(|r| r.start_station())).ok_or(empty)?;
    let popular_end = mode(records.iter().map(|r| r.end_station())).ok_or(empty)?;
    // counted on the joined text, so names containing " to " can collide
    let popular_trip = mode(
        records
            .iter()
            .map(|r| format!("{} to {}", r.start_station(), r.end_station())),
    )
    .ok_or(empty)?;

    Ok(StationStats {
        popular_start: popular_start.to_string(),
        popular_end: popular_end.to_string(),
        popular_trip,
    })
}
