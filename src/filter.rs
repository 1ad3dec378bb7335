//! Month and weekday filtering of a loaded dataset.

use chrono::{Month, Weekday};
use std::fmt;

use crate::calendar::{month_name, parse_month, parse_weekday, weekday_name};
use crate::dataset::{Dataset, TripRecord};

pub const ALL: &str = "all";

/// Either no restriction on an axis, or equality with one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

impl Selection<Month> {
    /// Parses `"all"` or a full month name, case-insensitively.
    pub fn parse_month(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case(ALL) {
            Some(Selection::All)
        } else {
            parse_month(s).map(Selection::Only)
        }
    }
}

impl Selection<Weekday> {
    /// Parses `"all"` or a full day name, case-insensitively.
    pub fn parse_weekday(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case(ALL) {
            Some(Selection::All)
        } else {
            parse_weekday(s).map(Selection::Only)
        }
    }
}

impl fmt::Display for Selection<Month> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL),
            Selection::Only(m) => f.write_str(month_name(*m)),
        }
    }
}

impl fmt::Display for Selection<Weekday> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL),
            Selection::Only(d) => f.write_str(weekday_name(*d)),
        }
    }
}

/// The (city, month, weekday) triple narrowing which trips are analyzed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub city: String,
    pub month: Selection<Month>,
    pub weekday: Selection<Weekday>,
}

impl FilterCriteria {
    /// Criteria for `city` with no month or weekday restriction.
    pub fn for_city(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            month: Selection::All,
            weekday: Selection::All,
        }
    }

    pub fn with_month(mut self, month: Month) -> Self {
        self.month = Selection::Only(month);
        self
    }

    pub fn with_weekday(mut self, weekday: Weekday) -> Self {
        self.weekday = Selection::Only(weekday);
        self
    }

    pub fn matches(&self, trip: &TripRecord) -> bool {
        self.month.accepts(&trip.month()) && self.weekday.accepts(&trip.weekday())
    }
}

/// Returns the trips of `dataset` that satisfy `criteria`, in their original order.
///
/// The result may be empty; that is a valid outcome, not an error.
pub fn apply_filters(dataset: &Dataset, criteria: &FilterCriteria) -> Dataset {
    let records = dataset
        .iter()
        .filter(|trip| criteria.matches(trip))
        .cloned()
        .collect();

    Dataset {
        city: dataset.city.clone(),
        schema: dataset.schema,
        records,
        skipped_rows: dataset.skipped_rows,
    }
}
