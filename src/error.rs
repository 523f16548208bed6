//! Error taxonomy for loading and summarizing trip data.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::City;

/// The requested city's data could not be located or read.
#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("unknown city: {0:?}")]
    UnknownCity(String),

    #[error("no data source registered for {0}")]
    NotRegistered(City),

    #[error("failed to open trip data for {city}: {path}")]
    Unreadable {
        city: City,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed trip data for {city} in {path}")]
    Malformed {
        city: City,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("trip data for {city} is missing required column `{column}`")]
    MissingColumn { city: City, column: &'static str },

    #[error("failed to read city registry: {path}")]
    RegistryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid city registry: {path}")]
    RegistryFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A field of one source row could not be interpreted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: invalid {field} {value:?}: {reason}")]
pub struct ParseError {
    pub line: u64,
    pub field: &'static str,
    pub value: String,
    pub reason: String,
}

/// A statistic was requested over zero records.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot compute {statistic} over an empty dataset")]
pub struct EmptyDatasetError {
    pub statistic: &'static str,
}

/// Invalid month or day text supplied for a filter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterParseError {
    #[error("{0:?} is not a month from January to June or 'all'")]
    Month(String),

    #[error("{0:?} is not a day of the week or 'all'")]
    Day(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    EmptyDataset(#[from] EmptyDatasetError),
}

pub type Result<T> = std::result::Result<T, Error>;
