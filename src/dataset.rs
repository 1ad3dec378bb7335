//! Trip records, the per-city schema descriptor and the CSV loader.

use chrono::{Month, NaiveDateTime, Timelike, Weekday};
use csv::StringRecord;
use serde::Serialize;
use std::fs::File;
use std::io;
use tracing::{debug, info, warn};

use crate::calendar::{month_of, weekday_of};
use crate::config::CityConfig;
use crate::error::LoadError;

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A single bicycle rental.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    /// 0-based position of the row in the source file.
    pub row: usize,
    start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub trip_duration: f64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    #[serde(skip)]
    month: Month,
    #[serde(skip)]
    weekday: Weekday,
}

impl TripRecord {
    pub fn new(
        row: usize,
        start_time: NaiveDateTime,
        trip_duration: f64,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
    ) -> Self {
        Self {
            row,
            start_time,
            end_time: None,
            trip_duration,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: None,
            gender: None,
            birth_year: None,
            month: month_of(&start_time),
            weekday: weekday_of(&start_time),
        }
    }

    pub fn with_user_type(mut self, user_type: impl Into<String>) -> Self {
        self.user_type = Some(user_type.into());
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_birth_year(mut self, birth_year: i32) -> Self {
        self.birth_year = Some(birth_year);
        self
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }
}

/// Which optional columns the source file carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub has_end_time: bool,
    pub has_gender: bool,
    pub has_birth_year: bool,
}

/// What to do with a row whose timestamp or numeric fields do not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedRowPolicy {
    /// Fail the whole load on the first bad row.
    #[default]
    Abort,
    /// Drop the row and keep going.
    Skip,
}

/// All trip records loaded for one city.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub city: String,
    pub schema: Schema,
    pub records: Vec<TripRecord>,
    pub skipped_rows: usize,
}

impl Dataset {
    pub fn new(city: impl Into<String>, schema: Schema, records: Vec<TripRecord>) -> Self {
        Self {
            city: city.into(),
            schema,
            records,
            skipped_rows: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TripRecord> {
        self.records.iter()
    }
}

/// Header positions resolved once per file.
struct Columns {
    start_time: usize,
    end_time: Option<usize>,
    trip_duration: usize,
    start_station: usize,
    end_station: usize,
    user_type: usize,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &'static str| find(name).ok_or(LoadError::MissingColumn(name));

        Ok(Self {
            start_time: require(START_TIME)?,
            end_time: find(END_TIME),
            trip_duration: require(TRIP_DURATION)?,
            start_station: require(START_STATION)?,
            end_station: require(END_STATION)?,
            user_type: require(USER_TYPE)?,
            gender: find(GENDER),
            birth_year: find(BIRTH_YEAR),
        })
    }

    fn schema(&self) -> Schema {
        Schema {
            has_end_time: self.end_time.is_some(),
            has_gender: self.gender.is_some(),
            has_birth_year: self.birth_year.is_some(),
        }
    }

    fn parse(&self, row: usize, record: &StringRecord) -> Result<TripRecord, LoadError> {
        let raw = |idx: usize| record.get(idx).unwrap_or("").trim();
        let optional = |idx: Option<usize>| idx.map(raw).filter(|s| !s.is_empty());
        let malformed = |column: &'static str, value: &str| LoadError::MalformedRecord {
            row,
            column,
            value: value.to_string(),
        };

        let start_raw = raw(self.start_time);
        let start_time =
            parse_timestamp(start_raw).ok_or_else(|| malformed(START_TIME, start_raw))?;

        let duration_raw = raw(self.trip_duration);
        let trip_duration = duration_raw
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite())
            .ok_or_else(|| malformed(TRIP_DURATION, duration_raw))?;

        let mut trip = TripRecord::new(
            row,
            start_time,
            trip_duration,
            raw(self.start_station),
            raw(self.end_station),
        );

        // An unparseable end time only loses the column value, it is not used by any statistic.
        trip.end_time = optional(self.end_time).and_then(parse_timestamp);
        trip.user_type = optional(Some(self.user_type)).map(str::to_string);
        trip.gender = optional(self.gender).map(str::to_string);
        trip.birth_year = optional(self.birth_year)
            .map(|s| {
                s.parse::<f64>()
                    .ok()
                    .map(f64::trunc)
                    .filter(|y| (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(y))
                    .map(|y| y as i32)
                    .ok_or_else(|| malformed(BIRTH_YEAR, s))
            })
            .transpose()?;

        Ok(trip)
    }
}

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Reads trip records for `city` from CSV data with a header row.
///
/// # Errors
///
/// Returns [`LoadError::MissingColumn`] when a required header is absent and
/// [`LoadError::MalformedRecord`] for an unparseable row under
/// [`MalformedRowPolicy::Abort`].
pub fn read_trips<R: io::Read>(
    city: &str,
    reader: R,
    policy: MalformedRowPolicy,
) -> Result<Dataset, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::resolve(rdr.headers()?)?;

    let mut records = Vec::new();
    let mut skipped_rows = 0;

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        match columns.parse(row, &record) {
            Ok(trip) => records.push(trip),
            Err(e) if policy == MalformedRowPolicy::Skip => {
                warn!(city, row, error = %e, "Skipping malformed row");
                skipped_rows += 1;
            }
            Err(e) => return Err(e),
        }
    }

    let mut dataset = Dataset::new(city, columns.schema(), records);
    dataset.skipped_rows = skipped_rows;
    Ok(dataset)
}

/// Loads city datasets from the files registered in a [`CityConfig`].
pub struct Loader {
    config: CityConfig,
    policy: MalformedRowPolicy,
}

impl Loader {
    pub fn new(config: CityConfig) -> Self {
        Self {
            config,
            policy: MalformedRowPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MalformedRowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &CityConfig {
        &self.config
    }

    /// Loads every trip record of `city`, deriving month and weekday per row.
    #[tracing::instrument(skip(self))]
    pub fn load(&self, city: &str) -> Result<Dataset, LoadError> {
        let path = self
            .config
            .path_for(city)
            .ok_or_else(|| LoadError::UnregisteredCity(city.to_string()))?;
        debug!(path = %path.display(), "Opening city data");

        let file = File::open(path).map_err(|source| LoadError::DataNotFound {
            city: city.to_string(),
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = read_trips(city, file, self.policy)?;
        info!(
            rows = dataset.len(),
            skipped = dataset.skipped_rows,
            "City data loaded"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHICAGO: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1423854,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0
955915,2017-05-25 18:19:03,2017-05-25 18:45:53,1610,Theater on the Lake,Sheffield Ave & Waveland Ave,Subscriber,,
";

    const WASHINGTON: &str = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
";

    #[test]
    fn test_read_trips_with_demographics() {
        let dataset = read_trips("chicago", CHICAGO.as_bytes(), MalformedRowPolicy::Abort).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.schema,
            Schema {
                has_end_time: true,
                has_gender: true,
                has_birth_year: true
            }
        );

        let first = &dataset.records[0];
        assert_eq!(first.row, 0);
        assert_eq!(first.trip_duration, 321.0);
        assert_eq!(first.month(), Month::June);
        assert_eq!(first.weekday(), Weekday::Fri);
        assert_eq!(first.hour(), 15);
        assert_eq!(first.gender.as_deref(), Some("Male"));
        assert_eq!(first.birth_year, Some(1992));
        assert!(first.end_time.is_some());

        let second = &dataset.records[1];
        assert_eq!(second.gender, None);
        assert_eq!(second.birth_year, None);
    }

    #[test]
    fn test_read_trips_without_demographics() {
        let dataset =
            read_trips("washington", WASHINGTON.as_bytes(), MalformedRowPolicy::Abort).unwrap();

        assert_eq!(dataset.len(), 1);
        assert!(!dataset.schema.has_gender);
        assert!(!dataset.schema.has_birth_year);
        assert_eq!(dataset.records[0].trip_duration, 489.066);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Start Time,Trip Duration,Start Station,End Station\n";
        let err = read_trips("x", csv.as_bytes(), MalformedRowPolicy::Abort).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(USER_TYPE)));
    }

    #[test]
    fn test_malformed_timestamp_aborts() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-01-01 00:07:57,100,A,B,Customer
yesterday,100,A,B,Customer
";
        let err = read_trips("x", csv.as_bytes(), MalformedRowPolicy::Abort).unwrap_err();
        match err {
            LoadError::MalformedRecord { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, START_TIME);
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-01-01 00:07:57,100,A,B,Customer
yesterday,100,A,B,Customer
2017-01-02 10:00:00,abc,A,B,Customer
2017-01-03 10:00:00,60,B,A,
";
        let dataset = read_trips("x", csv.as_bytes(), MalformedRowPolicy::Skip).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.skipped_rows, 2);
        assert_eq!(dataset.records[1].row, 3);
        assert_eq!(dataset.records[1].user_type, None);
    }

    #[test]
    fn test_birth_year_truncates_and_rejects_out_of_range() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type,Birth Year
2017-01-01 00:07:57,100,A,B,Customer,1992.5
2017-01-01 08:00:00,100,A,B,Customer,1e12
";
        let err = read_trips("x", csv.as_bytes(), MalformedRowPolicy::Abort).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MalformedRecord { row: 1, column: BIRTH_YEAR, .. }
        ));

        let dataset = read_trips("x", csv.as_bytes(), MalformedRowPolicy::Skip).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records[0].birth_year, Some(1992));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2017-01-01 00:07:57").is_some());
        assert!(parse_timestamp("2017-01-01T00:07:57").is_some());
        assert!(parse_timestamp("2017-01-01 00:07:57.250").is_some());
        assert!(parse_timestamp("2017-01-01 00:07").is_some());
        assert!(parse_timestamp("01/01/2017").is_none());
    }

    #[test]
    fn test_loader_unregistered_city() {
        let loader = Loader::new(CityConfig::from_entries([("chicago", "chicago.csv")]));
        let err = loader.load("boston").unwrap_err();
        assert!(matches!(err, LoadError::UnregisteredCity(_)));
        assert!(err.is_data_not_found());
    }

    #[test]
    fn test_loader_missing_file() {
        let loader = Loader::new(CityConfig::from_entries([(
            "chicago",
            "/nonexistent/bikeshare/chicago.csv",
        )]));
        let err = loader.load("chicago").unwrap_err();
        assert!(matches!(err, LoadError::DataNotFound { .. }));
        assert!(err.is_data_not_found());
    }
}
