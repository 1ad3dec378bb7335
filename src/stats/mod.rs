//! Descriptive statistics over a filtered dataset.
//!
//! Each calculator is a stateless `compute(&Dataset)` returning a small
//! serializable record; [`Report`] bundles all four.

pub mod duration;
pub mod mode;
pub mod station;
pub mod time;
pub mod users;

pub use duration::{DurationStats, Hms, format_duration};
pub use mode::{Mode, most_frequent, value_counts};
pub use station::StationStats;
pub use time::TimeStats;
pub use users::{BirthYearStats, UserStats};

use serde::Serialize;

use crate::dataset::Dataset;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub city: String,
    pub trips: usize,
    pub time: TimeStats,
    pub stations: StationStats,
    pub durations: DurationStats,
    pub users: UserStats,
}

impl Report {
    pub fn compute(dataset: &Dataset) -> Self {
        Report {
            city: dataset.city.clone(),
            trips: dataset.len(),
            time: TimeStats::compute(dataset),
            stations: StationStats::compute(dataset),
            durations: DurationStats::compute(dataset),
            users: UserStats::compute(dataset),
        }
    }
}
