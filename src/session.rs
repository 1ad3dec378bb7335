//! The interactive explore loop: gather filters, load, filter, page, report.

use anyhow::{Context, Result};
use std::io;
use tracing::{debug, info};

use crate::calendar::{MONTH_NAMES, WEEKDAY_NAMES};
use crate::config::CityConfig;
use crate::console::{Console, prompt_for_choice};
use crate::dataset::{Dataset, Loader};
use crate::filter::{ALL, FilterCriteria, Selection, apply_filters};
use crate::output;
use crate::stats::{DurationStats, Report, StationStats, TimeStats, UserStats};

pub const GREETING: &str = "Hello! Let's explore some US bikeshare data!";
pub const NO_MATCHING_DATA: &str = "No data matches the selected filters.";
pub const END_OF_DATA: &str = "No more data to display.";
pub const FAREWELL: &str = "Exiting the program. Thank you!";
pub const PAGE_SIZE: usize = 5;

const YES: &str = "yes";
const NO: &str = "no";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Ended,
}

/// What a single run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The filters matched no trips; no statistics were computed.
    NoMatchingData,
    Reported(Report),
}

fn with_all(names: &[&'static str]) -> Vec<&'static str> {
    std::iter::once(ALL).chain(names.iter().copied()).collect()
}

/// Asks for city, month and day, each validated against its allowed values.
pub fn gather_filters<C: Console + ?Sized>(
    console: &mut C,
    config: &CityConfig,
) -> Result<FilterCriteria> {
    console.say(GREETING)?;

    let city = prompt_for_choice(
        console,
        "Which city would you like to analyze?",
        &config.city_names(),
    )?;
    let month = prompt_for_choice(
        console,
        "Which month would you like to filter by?",
        &with_all(&MONTH_NAMES),
    )?;
    let day = prompt_for_choice(
        console,
        "Which day of the week would you like to filter by?",
        &with_all(&WEEKDAY_NAMES),
    )?;

    console.say(&format!(
        "\nSelected - city: '{city}', month: '{month}', day: '{day}'"
    ))?;
    console.say(&output::rule())?;

    // Both answers come from the allowed lists, so these parses cannot miss.
    let month = Selection::<chrono::Month>::parse_month(&month)
        .with_context(|| format!("unrecognised month '{month}'"))?;
    let weekday = Selection::<chrono::Weekday>::parse_weekday(&day)
        .with_context(|| format!("unrecognised day '{day}'"))?;

    Ok(FilterCriteria {
        city,
        month,
        weekday,
    })
}

/// Shows raw trips five at a time for as long as the user answers "yes".
pub fn page_raw_rows<C: Console + ?Sized>(dataset: &Dataset, console: &mut C) -> Result<()> {
    let mut cursor = 0;

    loop {
        let answer = prompt_for_choice(
            console,
            "\nWould you like to see 5 more rows of raw data?",
            &[YES, NO],
        )?;
        if answer == NO {
            return Ok(());
        }

        let end = (cursor + PAGE_SIZE).min(dataset.len());
        console.say(&output::row_header(&dataset.schema))?;
        for trip in &dataset.records[cursor..end] {
            console.say(&output::row_line(trip, &dataset.schema))?;
        }
        cursor += PAGE_SIZE;

        if cursor >= dataset.len() {
            console.say(END_OF_DATA)?;
            return Ok(());
        }
    }
}

fn announce<C: Console + ?Sized>(console: &mut C, title: &str) -> io::Result<()> {
    console.say("")?;
    console.say(title)?;
    console.say("")
}

fn print_block<C: Console + ?Sized>(console: &mut C, lines: Vec<String>) -> io::Result<()> {
    for line in lines {
        console.say(&line)?;
    }
    console.say(&output::rule())
}

/// Runs the four calculators in order, printing each block as soon as it is ready.
pub fn report<C: Console + ?Sized>(dataset: &Dataset, console: &mut C) -> Result<Report> {
    announce(console, output::TIME_TITLE)?;
    let time = TimeStats::compute(dataset);
    print_block(console, output::time_lines(&time))?;

    announce(console, output::STATION_TITLE)?;
    let stations = StationStats::compute(dataset);
    print_block(console, output::station_lines(&stations))?;

    announce(console, output::DURATION_TITLE)?;
    let durations = DurationStats::compute(dataset);
    print_block(console, output::duration_lines(&durations))?;

    announce(console, output::USER_TITLE)?;
    let users = UserStats::compute(dataset);
    print_block(console, output::user_lines(&users))?;

    Ok(Report {
        city: dataset.city.clone(),
        trips: dataset.len(),
        time,
        stations,
        durations,
        users,
    })
}

/// One pass of the session: filters, load, filter, then paging and statistics.
#[tracing::instrument(skip_all)]
pub fn run_once<C: Console + ?Sized>(console: &mut C, loader: &Loader) -> Result<RunOutcome> {
    let criteria = gather_filters(console, loader.config())?;
    info!(
        city = %criteria.city,
        month = %criteria.month,
        day = %criteria.weekday,
        "Filters selected"
    );

    let dataset = loader.load(&criteria.city)?;
    let filtered = apply_filters(&dataset, &criteria);
    debug!(loaded = dataset.len(), matched = filtered.len(), "Filters applied");

    if filtered.is_empty() {
        console.say(NO_MATCHING_DATA)?;
        return Ok(RunOutcome::NoMatchingData);
    }

    page_raw_rows(&filtered, console)?;
    Ok(RunOutcome::Reported(report(&filtered, console)?))
}

/// Loops [`run_once`] until the user declines to run again.
pub fn run<C: Console + ?Sized>(console: &mut C, loader: &Loader) -> Result<()> {
    let mut state = SessionState::Running;
    let mut runs = 0usize;

    while state == SessionState::Running {
        run_once(console, loader)?;
        runs += 1;

        let again = console
            .read_line("\nWould you like to run again? [yes, no]: ")?
            .unwrap_or_default();
        if again.trim().to_lowercase() != YES {
            state = SessionState::Ended;
        }
    }

    info!(runs, "Session ended");
    console.say(FAREWELL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{ScriptedConsole, Terminal};
    use crate::dataset::{Schema, TripRecord};
    use chrono::{Month, NaiveDate, Weekday};
    use std::path::Path;

    fn dataset(n: usize) -> Dataset {
        let start = NaiveDate::from_ymd_opt(2017, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let records = (0..n)
            .map(|i| TripRecord::new(i, start, 60.0, format!("S{i}"), "E"))
            .collect();
        Dataset::new("chicago", Schema::default(), records)
    }

    fn shown_rows(console: &ScriptedConsole) -> usize {
        console
            .messages()
            .iter()
            .filter(|m| m.contains(" -> E"))
            .count()
    }

    #[test]
    fn test_gather_filters() {
        let mut console = ScriptedConsole::new(["Boston", "New York City", "JUNE", "friday"]);
        let config = CityConfig::builtin(Path::new("."));

        let criteria = gather_filters(&mut console, &config).unwrap();
        assert_eq!(criteria.city, "new york city");
        assert_eq!(criteria.month, Selection::Only(Month::June));
        assert_eq!(criteria.weekday, Selection::Only(Weekday::Fri));

        let prompts = console.prompts();
        assert_eq!(prompts.len(), 4);
        assert!(prompts[0].ends_with("[chicago, new york city, washington]: "));
        assert!(prompts[2].contains("[all, january, february,"));
        assert!(prompts[3].ends_with("saturday, sunday]: "));
        assert!(
            console
                .output()
                .contains("Selected - city: 'new york city', month: 'june', day: 'friday'")
        );
    }

    #[test]
    fn test_gather_filters_all() {
        let mut console = ScriptedConsole::new(["washington", "all", "ALL"]);
        let config = CityConfig::builtin(Path::new("."));

        let criteria = gather_filters(&mut console, &config).unwrap();
        assert_eq!(criteria, FilterCriteria::for_city("washington"));
    }

    #[test]
    fn test_pager_no_shows_nothing() {
        let mut console = ScriptedConsole::new(["no"]);
        page_raw_rows(&dataset(12), &mut console).unwrap();
        assert_eq!(shown_rows(&console), 0);
    }

    #[test]
    fn test_pager_pages_by_five_until_end() {
        let mut console = ScriptedConsole::new(["yes", "maybe", "YES", "yes"]);
        page_raw_rows(&dataset(12), &mut console).unwrap();

        assert_eq!(shown_rows(&console), 12);
        assert!(console.messages().contains(&END_OF_DATA));
        assert_eq!(console.remaining(), 0);
    }

    #[test]
    fn test_pager_stops_at_exact_end() {
        let mut console = ScriptedConsole::new(["yes", "yes", "extra"]);
        page_raw_rows(&dataset(10), &mut console).unwrap();

        assert_eq!(shown_rows(&console), 10);
        assert!(console.messages().contains(&END_OF_DATA));
        assert_eq!(console.remaining(), 1);
    }

    #[test]
    fn test_report_prints_blocks_in_order() {
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let report = report(&dataset(3), &mut console).unwrap();

        assert_eq!(report.trips, 3);
        let text = console.output();
        let positions: Vec<usize> = [
            output::TIME_TITLE,
            output::STATION_TITLE,
            output::DURATION_TITLE,
            output::USER_TITLE,
        ]
        .iter()
        .map(|t| text.find(t).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    struct ClosedOutput;

    impl io::Write for ClosedOutput {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_output_failure_ends_the_run() {
        let mut terminal = Terminal::with_io("chicago\nall\nall\n".as_bytes(), ClosedOutput);
        let config = CityConfig::builtin(Path::new("."));

        assert!(gather_filters(&mut terminal, &config).is_err());
        assert!(report(&dataset(2), &mut terminal).is_err());
    }
}
