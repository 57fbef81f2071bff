//! Per-day route and stop types.

/// A single stop on a day's route.
///
/// `service_start` is the cumulative time at which service begins; the
/// visit occupies `[service_start, service_start + service_time]` on the
/// route's time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stop {
    /// Node visited (may be a client or its appointment duplicate).
    pub node: usize,
    /// Cumulative time at which service begins, quarter-hour units.
    pub service_start: i64,
}

/// One day's route: the ordered interior stops plus route-level timing.
///
/// The base (node 0) is the implicit first and last visit of every route
/// and is not stored in `stops`; `start` and `end` are the cumulative
/// times at the base on departure and return.
///
/// # Examples
///
/// ```
/// use weekplan::models::{DayRoute, Stop};
///
/// let route = DayRoute::new(0, 1, 12, vec![Stop { node: 3, service_start: 4 }], Some((8, 10)));
/// assert_eq!(route.len(), 1);
/// assert_eq!(route.duration(), 11);
/// assert_eq!(route.node_ids(), vec![3]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRoute {
    day: usize,
    start: i64,
    end: i64,
    stops: Vec<Stop>,
    brk: Option<(i64, i64)>,
}

impl DayRoute {
    /// Creates a route from computed timing.
    pub fn new(day: usize, start: i64, end: i64, stops: Vec<Stop>, brk: Option<(i64, i64)>) -> Self {
        Self {
            day,
            start,
            end,
            stops,
            brk,
        }
    }

    /// The day this route belongs to.
    pub fn day(&self) -> usize {
        self.day
    }

    /// Cumulative time when the route leaves the base.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Cumulative time when the route returns to the base.
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Elapsed route time.
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    /// The ordered interior stops (base excluded).
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// The break interval `(start, end)` taken on this route, if any.
    pub fn break_interval(&self) -> Option<(i64, i64)> {
        self.brk
    }

    /// Number of interior stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if the route visits nothing but the base.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// The visited node indices in stop order.
    pub fn node_ids(&self) -> Vec<usize> {
        self.stops.iter().map(|s| s.node).collect()
    }
}
