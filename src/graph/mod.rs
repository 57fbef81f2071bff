//! Node and travel graph construction.
//!
//! - input records ([`StartRecord`], [`ClientRecord`], [`AppointmentRecord`])
//!   as handed over by the data-ingestion collaborator
//! - [`TravelTable`] — city-pair distances and rendering paths
//! - [`UniverseBuilder`] / [`RoutingUniverse`] — the assembled routing
//!   universe: node list, per-node attributes, travel-time matrix

mod builder;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::travel::great_circle_miles;

pub use builder::{RoutingUniverse, UniverseBuilder};

/// A start location: the base (first record) or an overnight hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartRecord {
    /// Territory id.
    pub label: String,
    /// City key into the travel tables.
    pub city: String,
    /// Configured hub→base travel time, overriding the distance model.
    pub to_base: Option<i64>,
    /// Configured base→hub travel time, overriding the distance model.
    pub from_base: Option<i64>,
    /// Whether the hub is reached by air from the base.
    pub air_reachable: bool,
}

impl StartRecord {
    /// A start with no overrides.
    pub fn new(label: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            city: city.into(),
            to_base: None,
            from_base: None,
            air_reachable: false,
        }
    }
}

/// An eligible client location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Account id.
    pub label: String,
    /// City key into the travel tables.
    pub city: String,
    /// Non-negative client priority; higher is more important to serve.
    pub priority: i64,
    /// Visit length in quarter-hour units.
    pub service_time: i64,
}

impl ClientRecord {
    /// Creates a client record.
    pub fn new(
        label: impl Into<String>,
        city: impl Into<String>,
        priority: i64,
        service_time: i64,
    ) -> Self {
        Self {
            label: label.into(),
            city: city.into(),
            priority,
            service_time,
        }
    }
}

/// A prior appointment: an exact instant on a specific day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    /// Account id of the client.
    pub client: String,
    /// Appointment instant in quarter-hour units.
    pub time: i64,
    /// Day index the appointment is fixed on.
    pub day: usize,
}

impl AppointmentRecord {
    /// Creates an appointment record.
    pub fn new(client: impl Into<String>, time: i64, day: usize) -> Self {
        Self {
            client: client.into(),
            time,
            day,
        }
    }
}

/// City-pair distances and rendering paths.
///
/// The builder requires an entry for every ordered pair of cities in the
/// universe; a missing entry is a fatal lookup error, never a silent
/// zero. [`TravelTable::from_coordinates`] derives a complete table from
/// geocoded cities (haversine distances, direct two-city paths).
///
/// # Examples
///
/// ```
/// use weekplan::graph::TravelTable;
///
/// let table = TravelTable::from_coordinates(vec![
///     ("Athens".to_string(), (37.98, 23.73)),
///     ("Patras".to_string(), (38.25, 21.73)),
/// ]);
/// assert!(table.distance("Athens", "Patras").is_some());
/// assert_eq!(table.path("Athens", "Patras"), Some(&["Athens".to_string(), "Patras".to_string()][..]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TravelTable {
    distances: HashMap<(String, String), f64>,
    paths: HashMap<(String, String), Vec<String>>,
}

impl TravelTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives a complete table from geocoded cities: haversine miles
    /// for every ordered pair, direct two-city rendering paths.
    pub fn from_coordinates(coords: impl IntoIterator<Item = (String, (f64, f64))>) -> Self {
        let coords: Vec<(String, (f64, f64))> = coords.into_iter().collect();
        let mut table = Self::new();
        for (from, p_from) in &coords {
            for (to, p_to) in &coords {
                table.insert_distance(from, to, great_circle_miles(*p_from, *p_to));
                if from == to {
                    table.insert_path(from, to, vec![from.clone()]);
                } else {
                    table.insert_path(from, to, vec![from.clone(), to.clone()]);
                }
            }
        }
        table
    }

    /// Records the distance in miles from `from` to `to`.
    pub fn insert_distance(&mut self, from: &str, to: &str, miles: f64) {
        self.distances.insert((from.to_string(), to.to_string()), miles);
    }

    /// Records the rendering path from `from` to `to`.
    pub fn insert_path(&mut self, from: &str, to: &str, waypoints: Vec<String>) {
        self.paths.insert((from.to_string(), to.to_string()), waypoints);
    }

    /// Distance in miles from `from` to `to`, if recorded.
    pub fn distance(&self, from: &str, to: &str) -> Option<f64> {
        self.distances
            .get(&(from.to_string(), to.to_string()))
            .copied()
    }

    /// Rendering path from `from` to `to`, if recorded.
    pub fn path(&self, from: &str, to: &str) -> Option<&[String]> {
        self.paths
            .get(&(from.to_string(), to.to_string()))
            .map(|p| p.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_coordinates_complete() {
        let table = TravelTable::from_coordinates(vec![
            ("A".to_string(), (38.0, 23.7)),
            ("B".to_string(), (40.6, 22.9)),
        ]);
        assert_eq!(table.distance("A", "A"), Some(0.0));
        let ab = table.distance("A", "B").expect("entry");
        let ba = table.distance("B", "A").expect("entry");
        assert!((ab - ba).abs() < 1e-9);
        assert!(ab > 100.0);
        assert_eq!(table.path("A", "A"), Some(&["A".to_string()][..]));
    }

    #[test]
    fn test_missing_entries_are_none() {
        let table = TravelTable::new();
        assert!(table.distance("A", "B").is_none());
        assert!(table.path("A", "B").is_none());
    }
}
