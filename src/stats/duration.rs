use serde::Serialize;
use std::fmt;

use crate::dataset::Dataset;

/// Total and mean trip duration in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub total_seconds: f64,
    /// `None` when there were no trips.
    pub mean_seconds: Option<f64>,
}

impl DurationStats {
    pub fn compute(dataset: &Dataset) -> Self {
        let total_seconds: f64 = dataset.iter().map(|t| t.trip_duration).sum();
        let mean_seconds = if dataset.is_empty() {
            None
        } else {
            Some(total_seconds / dataset.len() as f64)
        };

        DurationStats {
            total_seconds,
            mean_seconds,
        }
    }
}

/// A duration split into whole hours, whole minutes and seconds rounded to 2 decimals.
///
/// Hours are floored, so a negative total gives negative hours while minutes
/// and seconds stay in `0..60`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hms {
    pub hours: i64,
    pub minutes: u64,
    pub seconds: f64,
}

pub fn format_duration(total_seconds: f64) -> Hms {
    let hours = (total_seconds / 3600.0).floor() as i64;
    let minutes = (total_seconds.rem_euclid(3600.0) / 60.0).floor() as u64;
    let seconds = (total_seconds.rem_euclid(60.0) * 100.0).round() / 100.0;
    Hms {
        hours,
        minutes,
        seconds,
    }
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // {:?} keeps the decimal point on whole values (0.0, 12.0)
        write!(
            f,
            "{} hours {} minutes {:?} seconds",
            self.hours, self.minutes, self.seconds
        )
    }
}
