use serde::Serialize;

use crate::dataset::{Dataset, TripRecord};
use crate::stats::mode::{Mode, most_frequent};

pub const ROUTE_SEPARATOR: &str = " -> ";

/// Most popular start station, end station and directed route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub common_start_station: Mode<String>,
    pub common_end_station: Mode<String>,
    pub common_route: Mode<String>,
}

/// Route key of a trip. `A -> B` and `B -> A` are different routes.
pub fn route_of(trip: &TripRecord) -> String {
    format!("{}{}{}", trip.start_station, ROUTE_SEPARATOR, trip.end_station)
}

impl StationStats {
    pub fn compute(dataset: &Dataset) -> Self {
        StationStats {
            common_start_station: most_frequent(
                dataset.iter().map(|t| t.start_station.clone()),
                "start station",
            ),
            common_end_station: most_frequent(
                dataset.iter().map(|t| t.end_station.clone()),
                "end station",
            ),
            common_route: most_frequent(dataset.iter().map(route_of), "route"),
        }
    }
}
