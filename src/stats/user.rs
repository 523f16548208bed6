use indexmap::IndexMap;
use serde::Serialize;

use crate::error::EmptyDatasetError;
use crate::record::Dataset;
use crate::stats::mode::{mode, value_counts};

/// Earliest, most recent and most common birth year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearSummary {
    pub min: i32,
    pub max: i32,
    pub mode: i32,
}

/// Rider demographics. A field is `None` when the city's data does not
/// carry the corresponding column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub user_type_counts: Option<IndexMap<String, usize>>,
    pub gender_counts: Option<IndexMap<String, usize>>,
    pub birth_year_summary: Option<BirthYearSummary>,
}

pub fn compute(dataset: &Dataset) -> Result<UserStats, EmptyDatasetError> {
    if dataset.is_empty() {
        return Err(EmptyDatasetError {
            statistic: "user statistics",
        });
    }
    let schema = dataset.schema();
    let records = dataset.records();

    let counts = |values: Vec<&str>| -> IndexMap<String, usize> {
        value_counts(values)
            .into_iter()
            .map(|(k, n)| (k.to_string(), n))
            .collect()
    };

    let user_type_counts = schema
        .user_type
        .then(|| counts(records.iter().filter_map(|r| r.user_type()).collect()));
    let gender_counts = schema
        .gender
        .then(|| counts(records.iter().filter_map(|r| r.gender()).collect()));
    let birth_year_summary = if schema.birth_year {
        summarize_birth_years(records.iter().filter_map(|r| r.birth_year()).collect())
    } else {
        None
    };

    Ok(UserStats {
        user_type_counts,
        gender_counts,
        birth_year_summary,
    })
}

fn summarize_birth_years(years: Vec<i32>) -> Option<BirthYearSummary> {
    Some(BirthYearSummary {
        min: *years.iter().min()?,
        max: *years.iter().max()?,
        mode: mode(years.iter().copied())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::City;
    use crate::record::tests::{dataset, trip};
    use crate::record::{Schema, TripRecord};

    fn rider(user_type: &str, gender: &str, birth_year: Option<i32>) -> TripRecord {
        trip("2017-04-03 08:00:00", "2017-04-03 08:10:00", "A", "B")
            .with_user_type(Some(user_type.to_string()))
            .with_gender((!gender.is_empty()).then(|| gender.to_string()))
            .with_birth_year(birth_year)
    }

    #[test]
    fn test_birth_year_scenario() {
        let ds = dataset(vec![
            rider("Subscriber", "Male", Some(1990)),
            rider("Subscriber", "Female", Some(1990)),
            rider("Customer", "", Some(1985)),
        ]);
        let stats = compute(&ds).unwrap();
        assert_eq!(
            stats.birth_year_summary,
            Some(BirthYearSummary {
                min: 1985,
                max: 1990,
                mode: 1990
            })
        );

        let user_types = stats.user_type_counts.unwrap();
        assert_eq!(user_types["Subscriber"], 2);
        assert_eq!(user_types["Customer"], 1);

        // blank genders are not counted
        let genders = stats.gender_counts.unwrap();
        assert_eq!(genders.len(), 2);
        assert_eq!(genders.values().sum::<usize>(), 2);
    }

    #[test]
    fn test_missing_columns_are_absent_not_errors() {
        let schema = Schema {
            user_type: true,
            gender: false,
            birth_year: false,
        };
        let ds = Dataset::new(
            City::Washington,
            schema,
            vec![rider("Subscriber", "", None)],
        );
        let stats = compute(&ds).unwrap();
        assert!(stats.user_type_counts.is_some());
        assert_eq!(stats.gender_counts, None);
        assert_eq!(stats.birth_year_summary, None);
    }

    #[test]
    fn test_birth_year_column_without_values() {
        let ds = dataset(vec![rider("Customer", "", None)]);
        let stats = compute(&ds).unwrap();
        assert_eq!(stats.birth_year_summary, None);
    }

    #[test]
    fn test_empty_dataset_fails() {
        assert!(compute(&dataset(vec![])).is_err());
    }
}
