//! Output formatting and persistence for trip statistics.
//!
//! Renders report blocks as text lines, serializes reports as JSON, and
//! appends flat summary rows to a CSV file.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

use crate::dataset::{Schema, TripRecord};
use crate::filter::FilterCriteria;
use crate::stats::{
    DurationStats, Report, StationStats, TimeStats, UserStats, format_duration,
};

pub const TIME_TITLE: &str = "Calculating the most frequent times of travel...";
pub const STATION_TITLE: &str = "Calculating the most popular stations and trip...";
pub const DURATION_TITLE: &str = "Calculating trip duration...";
pub const USER_TITLE: &str = "Calculating user stats...";

pub fn rule() -> String {
    "-".repeat(40)
}

pub fn time_lines(stats: &TimeStats) -> Vec<String> {
    vec![
        format!("Most common month: {}", stats.common_month),
        format!("Most common day of week: {}", stats.common_weekday),
        format!("Most common start hour: {}", stats.common_hour),
    ]
}

pub fn station_lines(stats: &StationStats) -> Vec<String> {
    vec![
        format!("Most commonly used start station: {}", stats.common_start_station),
        format!("Most commonly used end station: {}", stats.common_end_station),
        format!("Most frequent trip: {}", stats.common_route),
    ]
}

pub fn duration_lines(stats: &DurationStats) -> Vec<String> {
    let mean = stats
        .mean_seconds
        .map(|m| format_duration(m).to_string())
        .unwrap_or_else(|| "no trip duration data found".to_string());
    vec![
        format!("Total travel time: {}", format_duration(stats.total_seconds)),
        format!("Mean travel time: {}", mean),
    ]
}

fn count_lines(title: &str, counts: &[(String, usize)], lines: &mut Vec<String>) {
    lines.push(format!("{title}:"));
    for (value, count) in counts {
        lines.push(format!("  {value}: {count}"));
    }
    lines.push(String::new());
}

pub fn user_lines(stats: &UserStats) -> Vec<String> {
    let mut lines = Vec::new();
    count_lines("User types", &stats.user_types, &mut lines);

    match &stats.genders {
        Some(genders) => count_lines("Gender", genders, &mut lines),
        None => {
            lines.push("No gender data to share.".to_string());
            lines.push(String::new());
        }
    }

    match &stats.birth_years {
        Some(years) => {
            lines.push(format!("Earliest birth year: {}", years.earliest));
            lines.push(format!("Most recent birth year: {}", years.most_recent));
            lines.push(format!("Most common birth year: {}", years.most_common));
        }
        None => lines.push("No birth year data to share.".to_string()),
    }

    lines
}

/// All four statistics blocks with their titles, as printed at the end of a run.
pub fn report_lines(report: &Report) -> Vec<String> {
    let blocks = [
        (TIME_TITLE, time_lines(&report.time)),
        (STATION_TITLE, station_lines(&report.stations)),
        (DURATION_TITLE, duration_lines(&report.durations)),
        (USER_TITLE, user_lines(&report.users)),
    ];

    let mut lines = vec![format!("{} trips for {}", report.trips, report.city)];
    for (title, block) in blocks {
        lines.push(String::new());
        lines.push(title.to_string());
        lines.push(String::new());
        lines.extend(block);
        lines.push(rule());
    }
    lines
}

const TIMESTAMP_DISPLAY: &str = "%Y-%m-%d %H:%M:%S";

/// Column header for [`row_line`], matching the columns `schema` carries.
pub fn row_header(schema: &Schema) -> String {
    let mut header = format!("{:>8}  {:<19}", "row", "start time");
    if schema.has_end_time {
        header.push_str(&format!("  {:<19}", "end time"));
    }
    header.push_str(&format!("  {:>13}  {}", "duration (s)", "route"));
    header.push_str("  | user type");
    if schema.has_gender {
        header.push_str(" | gender");
    }
    if schema.has_birth_year {
        header.push_str(" | birth year");
    }
    header
}

/// One raw trip, laid out under [`row_header`].
pub fn row_line(trip: &TripRecord, schema: &Schema) -> String {
    let blank = |v: Option<&str>| v.unwrap_or("-").to_string();

    let mut line = format!(
        "{:>8}  {:<19}",
        trip.row,
        trip.start_time().format(TIMESTAMP_DISPLAY)
    );
    if schema.has_end_time {
        let end = trip.end_time.map(|t| t.format(TIMESTAMP_DISPLAY).to_string());
        line.push_str(&format!("  {:<19}", blank(end.as_deref())));
    }
    line.push_str(&format!(
        "  {:>13}  {} -> {}",
        trip.trip_duration, trip.start_station, trip.end_station
    ));
    line.push_str(&format!("  | {}", blank(trip.user_type.as_deref())));
    if schema.has_gender {
        line.push_str(&format!(" | {}", blank(trip.gender.as_deref())));
    }
    if schema.has_birth_year {
        let year = trip.birth_year.map(|y| y.to_string());
        line.push_str(&format!(" | {}", blank(year.as_deref())));
    }
    line
}

/// Serializes a report as pretty-printed JSON.
pub fn to_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// One flat CSV row summarising a report and the filters that produced it.
#[derive(Debug, Serialize)]
pub struct ReportRow {
    pub timestamp: DateTime<Utc>,
    pub city: String,
    pub month: String,
    pub day: String,
    pub trips: usize,
    pub common_month: String,
    pub common_weekday: String,
    pub common_hour: String,
    pub common_start_station: String,
    pub common_end_station: String,
    pub common_route: String,
    pub total_seconds: f64,
    pub mean_seconds: Option<f64>,
    pub earliest_birth_year: Option<i32>,
    pub most_recent_birth_year: Option<i32>,
    pub most_common_birth_year: Option<i32>,
}

impl ReportRow {
    pub fn new(criteria: &FilterCriteria, report: &Report) -> Self {
        let years = report.users.birth_years;
        ReportRow {
            timestamp: Utc::now(),
            city: criteria.city.clone(),
            month: criteria.month.to_string(),
            day: criteria.weekday.to_string(),
            trips: report.trips,
            common_month: report.time.common_month.to_string(),
            common_weekday: report.time.common_weekday.to_string(),
            common_hour: report.time.common_hour.to_string(),
            common_start_station: report.stations.common_start_station.to_string(),
            common_end_station: report.stations.common_end_station.to_string(),
            common_route: report.stations.common_route.to_string(),
            total_seconds: report.durations.total_seconds,
            mean_seconds: report.durations.mean_seconds,
            earliest_birth_year: years.map(|y| y.earliest),
            most_recent_birth_year: years.map(|y| y.most_recent),
            most_common_birth_year: years.map(|y| y.most_common),
        }
    }
}

/// Appends a [`ReportRow`] to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &Path, row: &ReportRow) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // headers only on a fresh file
        .from_writer(file);

    writer.serialize(row)?;
    writer.flush()?;

    Ok(())
}
