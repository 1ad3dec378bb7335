use serde::Serialize;

use crate::dataset::Dataset;
use crate::stats::mode::{most_frequent, value_counts};

/// Earliest, most recent and most common rider birth year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

/// Rider demographics.
///
/// `genders` and `birth_years` are `None` when the city's data does not carry
/// that column; `birth_years` is also `None` when the column holds no values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user_types: Vec<(String, usize)>,
    pub genders: Option<Vec<(String, usize)>>,
    pub birth_years: Option<BirthYearStats>,
}

impl UserStats {
    pub fn compute(dataset: &Dataset) -> Self {
        let user_types = value_counts(dataset.iter().filter_map(|t| t.user_type.clone()));

        let genders = dataset
            .schema
            .has_gender
            .then(|| value_counts(dataset.iter().filter_map(|t| t.gender.clone())));

        let birth_years = if dataset.schema.has_birth_year {
            birth_year_stats(dataset.iter().filter_map(|t| t.birth_year).collect())
        } else {
            None
        };

        UserStats {
            user_types,
            genders,
            birth_years,
        }
    }
}

fn birth_year_stats(years: Vec<i32>) -> Option<BirthYearStats> {
    let earliest = *years.iter().min()?;
    let most_recent = *years.iter().max()?;
    let most_common = most_frequent(years, "birth year").found().copied()?;

    Some(BirthYearStats {
        earliest,
        most_recent,
        most_common,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Schema, TripRecord};
    use chrono::NaiveDate;

    fn trip(row: usize, user_type: &str) -> TripRecord {
        let start = NaiveDate::from_ymd_opt(2017, 3, 1)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        TripRecord::new(row, start, 60.0, "A", "B").with_user_type(user_type)
    }

    #[test]
    fn test_without_demographic_columns() {
        let dataset = Dataset::new(
            "washington",
            Schema::default(),
            vec![trip(0, "Subscriber"), trip(1, "Customer"), trip(2, "Subscriber")],
        );

        let stats = UserStats::compute(&dataset);
        assert_eq!(
            stats.user_types,
            vec![("Subscriber".to_string(), 2), ("Customer".to_string(), 1)]
        );
        assert_eq!(stats.genders, None);
        assert_eq!(stats.birth_years, None);
    }

    #[test]
    fn test_with_demographic_columns() {
        let schema = Schema {
            has_end_time: false,
            has_gender: true,
            has_birth_year: true,
        };
        let dataset = Dataset::new(
            "chicago",
            schema,
            vec![
                trip(0, "Subscriber").with_gender("Female").with_birth_year(1989),
                trip(1, "Subscriber").with_gender("Male").with_birth_year(1992),
                trip(2, "Customer").with_birth_year(1950),
                trip(3, "Subscriber").with_gender("Male").with_birth_year(1992),
                trip(4, "Dependent").with_gender("Male").with_birth_year(2001),
            ],
        );

        let stats = UserStats::compute(&dataset);
        assert_eq!(
            stats.genders,
            Some(vec![("Male".to_string(), 3), ("Female".to_string(), 1)])
        );
        assert_eq!(
            stats.birth_years,
            Some(BirthYearStats {
                earliest: 1950,
                most_recent: 2001,
                most_common: 1992,
            })
        );
        assert_eq!(stats.user_types[2], ("Dependent".to_string(), 1));
    }

    #[test]
    fn test_birth_year_column_present_but_blank() {
        let schema = Schema {
            has_gender: true,
            has_birth_year: true,
            ..Schema::default()
        };
        let dataset = Dataset::new("chicago", schema, vec![trip(0, "Customer")]);

        let stats = UserStats::compute(&dataset);
        assert_eq!(stats.genders, Some(vec![]));
        assert_eq!(stats.birth_years, None);
    }
}
