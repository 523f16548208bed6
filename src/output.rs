//! Output formatting and persistence for trip statistics.
//!
//! Supports plain-text sections, JSON serialization, and CSV append.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Result;
use csv::WriterBuilder;
use indexmap::IndexMap;
use serde::Serialize;

use crate::calendar::weekday_name;
use crate::error::EmptyDatasetError;
use crate::filter::{DayFilter, FilterSpec, MonthFilter};
use crate::record::{Dataset, Schema, TripRecord};
use crate::stats::{
    DurationStats, StationStats, TimeStats, UserStats, duration, station, time, user,
};

/// Every statistic for one filtered dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub filter: FilterSpec,
    pub records: usize,
    pub time: TimeStats,
    pub stations: StationStats,
    pub durations: DurationStats,
    pub users: UserStats,
}

impl Summary {
    pub fn compute(dataset: &Dataset, spec: &FilterSpec) -> Result<Self, EmptyDatasetError> {
        Ok(Self {
            filter: *spec,
            records: dataset.len(),
            time: time::compute(dataset, spec)?,
            stations: station::compute(dataset)?,
            durations: duration::compute(dataset)?,
            users: user::compute(dataset)?,
        })
    }

    /// Flattens the summary into a single CSV-friendly row.
    pub fn to_row(&self) -> SummaryRow {
        SummaryRow {
            city: self.filter.city.name(),
            month: self.filter.month.to_string(),
            day: self.filter.day.to_string(),
            records: self.records,
            popular_month: self.time.popular_month.name(),
            popular_day: self.time.popular_day_name(),
            popular_hour: self.time.popular_hour_label().to_string(),
            popular_start: self.stations.popular_start.clone(),
            popular_end: self.stations.popular_end.clone(),
            popular_trip: self.stations.popular_trip.clone(),
            total_seconds: self.durations.total_seconds,
            mean_seconds: self.durations.mean_seconds,
            non_positive_trips: self.durations.non_positive_trips,
        }
    }
}

/// One line of the summary export file.
#[derive(Debug, Serialize)]
pub struct SummaryRow {
    pub city: &'static str,
    pub month: String,
    pub day: String,
    pub records: usize,
    pub popular_month: &'static str,
    pub popular_day: &'static str,
    pub popular_hour: String,
    pub popular_start: String,
    pub popular_end: String,
    pub popular_trip: String,
    pub total_seconds: f64,
    pub mean_seconds: f64,
    pub non_positive_trips: usize,
}

/// Serializes a summary as pretty-printed JSON.
pub fn to_json(summary: &Summary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Appends a [`Summary`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_summary(path: impl AsRef<Path>, summary: &Summary) -> Result<()> {
    let path = path.as_ref();
    let file_exists = path.exists();

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(summary.to_row())?;
    writer.flush()?;

    Ok(())
}

/// Horizontal rule printed between sections.
pub const SEPARATOR: &str = "----------------------------------------";

/// All four sections of a summary as plain text.
pub fn render_summary(summary: &Summary) -> String {
    [
        render_time(&summary.time),
        render_stations(&summary.stations),
        render_durations(&summary.durations),
        render_users(&summary.users),
    ]
    .join(format!("\n{SEPARATOR}\n\n").as_str())
}

/// Popular-times section, phrased around whichever filters are active.
pub fn render_time(stats: &TimeStats) -> String {
    let city = stats.filter.city;
    let month = stats.popular_month.name();
    let day = stats.popular_day_name();
    let hour = stats.popular_hour_label();
    let mut lines = vec![format!(
        "Calculating The Most Frequent Times of Travel in {city}..."
    )];

    match (stats.filter.month, stats.filter.day) {
        (MonthFilter::All, DayFilter::All) => {
            lines.push(format!("The most popular month to travel is {month}."));
            lines.push(format!("The most popular day of the week to travel is {day}."));
            lines.push(format!("The most popular hour to travel is {hour}."));
        }
        (MonthFilter::All, DayFilter::Only(d)) => {
            let on = weekday_name(d);
            lines.push(format!("The most popular month to travel on a {on} is {month}."));
            lines.push(format!("The most popular hour to travel on a {on} is {hour}."));
        }
        (MonthFilter::Only(m), DayFilter::All) => {
            lines.push(format!(
                "The most popular day of the week to travel in {m} is {day}.",
                m = m.name()
            ));
            lines.push(format!(
                "The most popular hour to travel in {m} is {hour}.",
                m = m.name()
            ));
        }
        (MonthFilter::Only(m), DayFilter::Only(d)) => {
            lines.push(format!(
                "The most popular hour to travel in {m} on a {on} is {hour}.",
                m = m.name(),
                on = weekday_name(d)
            ));
        }
    }
    lines.join("\n")
}

pub fn render_stations(stats: &StationStats) -> String {
    [
        "Calculating The Most Popular Stations and Trip...".to_string(),
        format!("The most popular starting station is: {}", stats.popular_start),
        format!("The most popular ending station is:   {}", stats.popular_end),
        format!("The most popular trip is:             {}", stats.popular_trip),
    ]
    .join("\n")
}

pub fn render_durations(stats: &DurationStats) -> String {
    let mut lines = vec![
        "Calculating Trip Duration...".to_string(),
        format!(
            "Total travel time was:   {}",
            format_timedelta(stats.total_seconds)
        ),
        format!(
            "Average travel time was: {}",
            format_timedelta(stats.mean_seconds)
        ),
    ];
    if stats.non_positive_trips > 0 {
        lines.push(format!(
            "Note: {} trip(s) ended at or before their start time.",
            stats.non_positive_trips
        ));
    }
    lines.join("\n")
}

pub fn render_users(stats: &UserStats) -> String {
    let mut lines = vec!["Calculating User Stats...".to_string()];

    lines.push("By User Type:".to_string());
    match &stats.user_type_counts {
        Some(counts) => lines.extend(count_lines(counts)),
        None => lines.push("User type data is not available.".to_string()),
    }

    lines.push(String::new());
    lines.push("By Gender:".to_string());
    match &stats.gender_counts {
        Some(counts) => lines.extend(count_lines(counts)),
        None => lines.push("Gender data is not available.".to_string()),
    }

    lines.push(String::new());
    lines.push("By Birth Year:".to_string());
    match &stats.birth_year_summary {
        Some(b) => {
            lines.push(format!("The earliest user birth year was:    {}", b.min));
            lines.push(format!("The most recent user birth year was: {}", b.max));
            lines.push(format!("The most common user birth year was: {}", b.mode));
        }
        None => lines.push("Birth year data is not available.".to_string()),
    }

    lines.join("\n")
}

fn count_lines(counts: &IndexMap<String, usize>) -> Vec<String> {
    let width = counts.keys().map(String::len).max().unwrap_or(0);
    counts
        .iter()
        .map(|(label, n)| format!("{label:<width$}  {n}"))
        .collect()
}

/// Renders raw records as a table, numbering rows from `offset`. Only the
/// optional columns present in `schema` are shown.
pub fn render_rows(schema: Schema, offset: usize, rows: &[TripRecord]) -> String {
    const TIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

    let mut header = vec![
        "#",
        "Start Time",
        "End Time",
        "Trip Duration",
        "Start Station",
        "End Station",
    ];
    if schema.user_type {
        header.push("User Type");
    }
    if schema.gender {
        header.push("Gender");
    }
    if schema.birth_year {
        header.push("Birth Year");
    }

    let mut lines = vec![header.join(" | ")];
    for (i, r) in rows.iter().enumerate() {
        let mut cells = vec![
            (offset + i).to_string(),
            r.start_time().format(TIME_FMT).to_string(),
            r.end_time().format(TIME_FMT).to_string(),
            r.trip_duration().to_string(),
            r.start_station().to_string(),
            r.end_station().to_string(),
        ];
        if schema.user_type {
            cells.push(r.user_type().unwrap_or("-").to_string());
        }
        if schema.gender {
            cells.push(r.gender().unwrap_or("-").to_string());
        }
        if schema.birth_year {
            cells.push(r.birth_year().map_or_else(|| "-".to_string(), |y| y.to_string()));
        }
        lines.push(cells.join(" | "));
    }
    lines.join("\n")
}

/// Formats seconds as `D days HH:MM:SS[.ffffff]`, prefixed with `-` when
/// negative.
pub fn format_timedelta(seconds: f64) -> String {
    let sign = if seconds < 0.0 { "-" } else { "" };
    let micros = (seconds.abs() * 1_000_000.0).round() as u64;
    let whole = micros / 1_000_000;
    let frac = micros % 1_000_000;

    let days = whole / 86_400;
    let h = whole % 86_400 / 3_600;
    let m = whole % 3_600 / 60;
    let s = whole % 60;

    if frac == 0 {
        format!("{sign}{days} days {h:02}:{m:02}:{s:02}")
    } else {
        format!("{sign}{days} days {h:02}:{m:02}:{s:02}.{frac:06}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Month;
    use crate::config::City;
    use crate::record::tests::{dataset, trip};
    use chrono::Weekday;
    use std::fs;

    fn sample_summary(spec: FilterSpec) -> Summary {
        let ds = dataset(vec![
            trip("2017-01-02 08:00:00", "2017-01-02 08:10:00", "A", "B"),
            trip("2017-01-09 08:30:00", "2017-01-09 08:50:00", "A", "B"),
        ]);
        Summary::compute(&ds, &spec).unwrap()
    }

    #[test]
    fn test_format_timedelta() {
        assert_eq!(format_timedelta(0.0), "0 days 00:00:00");
        assert_eq!(format_timedelta(90_061.0), "1 days 01:01:01");
        assert_eq!(format_timedelta(930.5), "0 days 00:15:30.500000");
        assert_eq!(format_timedelta(-120.0), "-0 days 00:02:00");
    }

    #[test]
    fn test_render_time_unfiltered_mentions_everything() {
        let text = render_time(&sample_summary(FilterSpec::unfiltered(City::Chicago)).time);
        assert!(text.contains("The most popular month to travel is January."));
        assert!(text.contains("The most popular day of the week to travel is Monday."));
        assert!(text.contains("The most popular hour to travel is 8 AM."));
    }

    #[test]
    fn test_render_time_fully_filtered_only_reports_hour() {
        let spec = FilterSpec::new(
            City::Chicago,
            MonthFilter::Only(Month::January),
            DayFilter::Only(Weekday::Mon),
        );
        let text = render_time(&sample_summary(spec).time);
        assert!(!text.contains("popular month"));
        assert!(!text.contains("day of the week"));
        assert!(text.contains("The most popular hour to travel in January on a Monday is 8 AM."));
    }

    #[test]
    fn test_render_users_unavailable() {
        let stats = UserStats {
            user_type_counts: Some(IndexMap::from([("Subscriber".to_string(), 3)])),
            gender_counts: None,
            birth_year_summary: None,
        };
        let text = render_users(&stats);
        assert!(text.contains("Subscriber  3"));
        assert!(text.contains("Gender data is not available."));
        assert!(text.contains("Birth year data is not available."));
    }

    #[test]
    fn test_render_rows_numbering() {
        let ds = dataset(vec![trip("2017-01-02 08:00:00", "2017-01-02 08:10:00", "A", "B")]);
        let text = render_rows(ds.schema(), 5, ds.page(0, 5));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("# | Start Time"));
        assert!(lines[1].starts_with("5 | 2017-01-02 08:00:00"));
    }

    #[test]
    fn test_render_summary_has_every_section() {
        let text = render_summary(&sample_summary(FilterSpec::unfiltered(City::Chicago)));
        assert_eq!(text.matches(SEPARATOR).count(), 3);
        assert!(text.contains("The most popular trip is:             A to B"));
        assert!(text.contains("Total travel time was:   0 days 00:30:00"));
        assert!(text.contains("Average travel time was: 0 days 00:15:00"));
    }

    #[test]
    fn test_to_json_contains_sections() {
        let json = to_json(&sample_summary(FilterSpec::unfiltered(City::Chicago))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["records"], 2);
        assert_eq!(value["time"]["popular_hour"], "8 AM");
        assert_eq!(value["filter"]["month"], "all");
        assert_eq!(value["stations"]["popular_trip"], "A to B");
        assert_eq!(value["durations"]["total_seconds"], 1800.0);
    }

    #[test]
    fn test_append_summary_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summaries.csv");

        let summary = sample_summary(FilterSpec::unfiltered(City::Chicago));
        append_summary(&path, &summary).unwrap();
        append_summary(&path, &summary).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        // 1 header + 2 data rows
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("city,month,day,records"));
        assert!(lines[1].starts_with("Chicago,all,all,2,January,Monday,8 AM,"));
    }
}
