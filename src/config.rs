//! Supported cities and the registry mapping each one to its trip CSV.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::error::DataSourceError;

/// Cities with published trip logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Display name, e.g. "New York City".
    pub fn name(self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        }
    }

    /// File name of the city's trip log inside a data directory.
    pub fn default_file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = DataSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        City::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DataSourceError::UnknownCity(s.to_string()))
    }
}

/// Maps each city to the CSV file holding its trips.
///
/// Stored as a plain JSON object on disk:
/// ```json
/// {
///   "chicago": "data/chicago.csv",
///   "new york city": "/srv/bikeshare/new_york_city.csv"
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CityRegistry {
    entries: HashMap<City, PathBuf>,
}

impl CityRegistry {
    /// Registers every city under its conventional file name in `data_dir`.
    pub fn with_defaults(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        let entries = City::ALL
            .into_iter()
            .map(|c| (c, data_dir.join(c.default_file_name())))
            .collect();
        Self { entries }
    }

    /// Loads the registry from a JSON file at `path`.
    ///
    /// Relative CSV paths are resolved against the directory holding the
    /// registry file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataSourceError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| DataSourceError::RegistryUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
        let raw: HashMap<String, PathBuf> =
            serde_json::from_str(&content).map_err(|source| DataSourceError::RegistryFormat {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path.parent().unwrap_or(Path::new(""));
        let mut entries = HashMap::with_capacity(raw.len());
        for (name, csv_path) in raw {
            let city: City = name.parse()?;
            let csv_path = if csv_path.is_relative() {
                base.join(csv_path)
            } else {
                csv_path
            };
            entries.insert(city, csv_path);
        }
        Ok(Self { entries })
    }

    pub fn insert(&mut self, city: City, path: impl Into<PathBuf>) {
        self.entries.insert(city, path.into());
    }

    /// Returns the CSV path registered for `city`.
    pub fn source(&self, city: City) -> Result<&Path, DataSourceError> {
        self.entries
            .get(&city)
            .map(PathBuf::as_path)
            .ok_or(DataSourceError::NotRegistered(city))
    }

    /// Iterates over registered cities in their canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (City, &Path)> {
        City::ALL
            .into_iter()
            .filter_map(|c| self.entries.get(&c).map(|p| (c, p.as_path())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_city_parse_is_case_insensitive() {
        assert_eq!("new york city".parse::<City>().unwrap(), City::NewYorkCity);
        assert_eq!("CHICAGO".parse::<City>().unwrap(), City::Chicago);
        assert!(matches!(
            "boston".parse::<City>(),
            Err(DataSourceError::UnknownCity(name)) if name == "boston"
        ));
    }

    #[test]
    fn test_defaults_cover_every_city() {
        let registry = CityRegistry::with_defaults("data");
        assert_eq!(
            registry.source(City::Washington).unwrap(),
            Path::new("data/washington.csv")
        );
        assert_eq!(registry.iter().count(), 3);
    }

    #[test]
    fn test_missing_entry_is_not_registered() {
        let registry = CityRegistry::default();
        assert!(matches!(
            registry.source(City::Chicago),
            Err(DataSourceError::NotRegistered(City::Chicago))
        ));
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.json");
        fs::write(
            &path,
            r#"{"chicago": "trips/chicago.csv", "washington": "/abs/washington.csv"}"#,
        )
        .unwrap();

        let registry = CityRegistry::load(&path).unwrap();
        assert_eq!(
            registry.source(City::Chicago).unwrap(),
            dir.path().join("trips/chicago.csv")
        );
        assert_eq!(
            registry.source(City::Washington).unwrap(),
            Path::new("/abs/washington.csv")
        );
        assert!(registry.source(City::NewYorkCity).is_err());
    }

    #[test]
    fn test_load_rejects_unknown_city() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.json");
        fs::write(&path, r#"{"gotham": "gotham.csv"}"#).unwrap();

        assert!(matches!(
            CityRegistry::load(&path),
            Err(DataSourceError::UnknownCity(_))
        ));
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            CityRegistry::load(&path),
            Err(DataSourceError::RegistryFormat { .. })
        ));
    }
}
