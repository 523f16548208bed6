//! Record Store: reads a city's trip log from CSV into a [`Dataset`].

use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;

use crate::config::{City, CityRegistry};
use crate::error::{DataSourceError, ParseError, Result};
use crate::record::{Dataset, Schema, TripRecord};

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const REQUIRED_COLUMNS: [&str; 5] = [
    START_TIME,
    END_TIME,
    START_STATION,
    END_STATION,
    TRIP_DURATION,
];

/// Accepted timestamp layouts, tried in order. `%.f` also matches no
/// fractional part.
const TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

/// A single row as it appears in the source file.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: String,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "Trip Duration", default)]
    trip_duration: Option<String>,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<String>,
}

/// Loads trip logs for the cities in a [`CityRegistry`].
#[derive(Debug, Clone)]
pub struct RecordStore {
    registry: CityRegistry,
}

impl RecordStore {
    pub fn new(registry: CityRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CityRegistry {
        &self.registry
    }

    /// Reads and parses every trip recorded for `city`.
    ///
    /// # Errors
    ///
    /// [`DataSourceError`] if the city has no registered file or the file
    /// cannot be read as CSV with the required columns; [`ParseError`] for
    /// the first row whose timestamps or numbers cannot be interpreted.
    pub fn load(&self, city: City) -> Result<Dataset> {
        let path = self.registry.source(city)?;
        let reader = ReaderBuilder::new()
            .trim(Trim::Headers)
            .from_path(path)
            .map_err(|source| DataSourceError::Unreadable {
                city,
                path: path.to_path_buf(),
                source,
            })?;
        read_dataset(city, path, reader)
    }
}

/// Parses a dataset from any CSV byte source. `origin` only labels errors.
pub fn load_from_reader<R: Read>(city: City, origin: &Path, rdr: R) -> Result<Dataset> {
    let reader = ReaderBuilder::new().trim(Trim::Headers).from_reader(rdr);
    read_dataset(city, origin, reader)
}

fn read_dataset<R: Read>(city: City, path: &Path, mut rdr: csv::Reader<R>) -> Result<Dataset> {
    let malformed = |source| DataSourceError::Malformed {
        city,
        path: path.to_path_buf(),
        source,
    };

    let headers = rdr.headers().map_err(malformed)?.clone();
    let schema = check_schema(city, &headers)?;

    let mut records = Vec::new();
    let mut row = StringRecord::new();
    loop {
        match rdr.read_record(&mut row) {
            Ok(true) => {}
            Ok(false) => break,
            Err(source) => return Err(malformed(source).into()),
        }
        let line = row.position().map_or(0, |p| p.line());
        let raw: RawTrip = row.deserialize(Some(&headers)).map_err(malformed)?;
        records.push(parse_row(line, raw)?);
    }

    Ok(Dataset::new(city, schema, records))
}

fn check_schema(
    city: City,
    headers: &StringRecord,
) -> std::result::Result<Schema, DataSourceError> {
    let has = |name: &str| headers.iter().any(|h| h == name);

    if let Some(column) = REQUIRED_COLUMNS.into_iter().find(|c| !has(*c)) {
        return Err(DataSourceError::MissingColumn { city, column });
    }

    Ok(Schema {
        user_type: has(USER_TYPE),
        gender: has(GENDER),
        birth_year: has(BIRTH_YEAR),
    })
}

fn parse_row(line: u64, raw: RawTrip) -> std::result::Result<TripRecord, ParseError> {
    let start_time = parse_timestamp(line, START_TIME, &raw.start_time)?;
    let end_time = parse_timestamp(line, END_TIME, &raw.end_time)?;

    let record = TripRecord::new(start_time, end_time, raw.start_station, raw.end_station)
        .ok_or_else(|| ParseError {
            line,
            field: START_TIME,
            value: raw.start_time.clone(),
            reason: "trip starts outside January through June".to_string(),
        })?;

    let record = match non_blank(raw.trip_duration) {
        Some(text) => record.with_trip_duration(parse_number(line, TRIP_DURATION, &text)?),
        None => record,
    };

    let birth_year = non_blank(raw.birth_year)
        .map(|text| parse_birth_year(line, &text))
        .transpose()?;

    Ok(record
        .with_user_type(non_blank(raw.user_type))
        .with_gender(non_blank(raw.gender))
        .with_birth_year(birth_year))
}

fn parse_timestamp(
    line: u64,
    field: &'static str,
    text: &str,
) -> std::result::Result<NaiveDateTime, ParseError> {
    let text = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .ok_or_else(|| ParseError {
            line,
            field,
            value: text.to_string(),
            reason: "not a recognised date-time".to_string(),
        })
}

fn parse_number(
    line: u64,
    field: &'static str,
    text: &str,
) -> std::result::Result<f64, ParseError> {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError {
            line,
            field,
            value: text.to_string(),
            reason: "not a number".to_string(),
        })
}

/// Years are stored as floats in some exports (`1990.0`).
fn parse_birth_year(line: u64, text: &str) -> std::result::Result<i32, ParseError> {
    let year = parse_number(line, BIRTH_YEAR, text)?.trunc();
    if !(f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&year) {
        return Err(ParseError {
            line,
            field: BIRTH_YEAR,
            value: text.to_string(),
            reason: "year out of range".to_string(),
        });
    }
    Ok(year as i32)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
