use serde::Serialize;

use crate::calendar::{month_name, weekday_name};
use crate::dataset::Dataset;
use crate::stats::mode::{Mode, most_frequent};

/// Most frequent month, weekday and start hour of travel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    pub common_month: Mode<&'static str>,
    pub common_weekday: Mode<&'static str>,
    pub common_hour: Mode<u32>,
}

impl TimeStats {
    pub fn compute(dataset: &Dataset) -> Self {
        TimeStats {
            common_month: most_frequent(dataset.iter().map(|t| t.month()), "month")
                .map(month_name),
            common_weekday: most_frequent(dataset.iter().map(|t| t.weekday()), "weekday")
                .map(weekday_name),
            common_hour: most_frequent(dataset.iter().map(|t| t.hour()), "hour"),
        }
    }
}
