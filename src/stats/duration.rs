use serde::Serialize;

use crate::error::EmptyDatasetError;
use crate::record::Dataset;

/// Total and mean elapsed time between trip start and end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub total_seconds: f64,
    pub mean_seconds: f64,
    /// Trips whose end is not after their start. Still included in the
    /// total and mean.
    pub non_positive_trips: usize,
}

pub fn compute(dataset: &Dataset) -> Result<DurationStats, EmptyDatasetError> {
    if dataset.is_empty() {
        return Err(EmptyDatasetError {
            statistic: "trip duration statistics",
        });
    }

    let mut total_seconds = 0.0;
    let mut non_positive_trips = 0;
    for r in dataset.records() {
        let secs = r.elapsed_seconds();
        if secs <= 0.0 {
            non_positive_trips += 1;
        }
        total_seconds += secs;
    }

    Ok(DurationStats {
        total_seconds,
        mean_seconds: total_seconds / dataset.len() as f64,
        non_positive_trips,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::{dataset, trip};

    #[test]
    fn test_total_and_mean() {
        let ds = dataset(vec![
            trip("2017-01-02 08:00:00", "2017-01-02 08:10:00", "A", "B"),
            trip("2017-01-02 09:00:00", "2017-01-02 09:20:00", "A", "B"),
        ]);
        let stats = compute(&ds).unwrap();
        assert_eq!(stats.total_seconds, 1800.0);
        assert_eq!(stats.mean_seconds, 900.0);
        assert_eq!(stats.non_positive_trips, 0);
    }

    #[test]
    fn test_negative_durations_are_summed_and_flagged() {
        let ds = dataset(vec![
            trip("2017-01-02 08:00:00", "2017-01-02 08:10:00", "A", "B"),
            trip("2017-01-02 09:00:00", "2017-01-02 08:58:00", "A", "B"),
            trip("2017-01-02 10:00:00", "2017-01-02 10:00:00", "A", "B"),
        ]);
        let stats = compute(&ds).unwrap();
        assert_eq!(stats.total_seconds, 480.0);
        assert_eq!(stats.mean_seconds, 160.0);
        assert_eq!(stats.non_positive_trips, 2);
    }

    #[test]
    fn test_sub_second_parts_are_kept() {
        let ds = dataset(vec![
            trip("2017-01-02 08:00:00.000", "2017-01-02 08:00:00.200", "A", "B"),
            trip("2017-01-02 09:00:00.400", "2017-01-02 09:00:11.000", "A", "B"),
        ]);
        let stats = compute(&ds).unwrap();
        assert!((stats.total_seconds - 10.8).abs() < 1e-9);
        assert!((stats.mean_seconds - 5.4).abs() < 1e-9);
        assert_eq!(stats.non_positive_trips, 0);
    }

    #[test]
    fn test_empty_dataset_fails() {
        let err = compute(&dataset(vec![])).unwrap_err();
        assert_eq!(err.statistic, "trip duration statistics");
    }
}
