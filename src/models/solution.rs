//! Solution and route violation types.

use std::fmt;

use super::DayRoute;

/// Why a fixed visit sequence cannot be scheduled on its day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteViolation {
    /// The route cannot start late enough within the day's start window.
    StartWindow {
        /// Day index.
        day: usize,
        /// Start the timing would have needed.
        needed: i64,
    },
    /// An appointment instant lies before the earliest possible arrival.
    AppointmentUnreachable {
        /// The duplicate node.
        node: usize,
        /// The pinned instant.
        instant: i64,
        /// Earliest cumulative time the stop can be reached.
        earliest: i64,
    },
    /// Idle time before a stop exceeds the waiting allowance.
    ExcessWaiting {
        /// The stop's node.
        node: usize,
        /// Waiting the sequence would require.
        waiting: i64,
        /// Configured allowance.
        allowed: i64,
    },
    /// The break cannot start within its window.
    BreakWindowMissed {
        /// Day index.
        day: usize,
    },
    /// The route ends past the day's cap or the global time limit.
    DayOverrun {
        /// Day index.
        day: usize,
        /// Cumulative time at route end.
        end: i64,
        /// The violated limit.
        limit: i64,
    },
    /// An appointment duplicate was placed on a day other than its own.
    WrongDay {
        /// The duplicate node.
        node: usize,
        /// Day the sequence placed it on.
        day: usize,
        /// Day it is pinned to.
        allowed: usize,
    },
}

impl fmt::Display for RouteViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteViolation::StartWindow { day, needed } => {
                write!(f, "day {day} would need to start at {needed}, outside its start window")
            }
            RouteViolation::AppointmentUnreachable {
                node,
                instant,
                earliest,
            } => write!(
                f,
                "appointment node {node} is pinned to {instant} but reachable earliest at {earliest}"
            ),
            RouteViolation::ExcessWaiting {
                node,
                waiting,
                allowed,
            } => write!(
                f,
                "stop {node} would wait {waiting} units, more than the allowed {allowed}"
            ),
            RouteViolation::BreakWindowMissed { day } => {
                write!(f, "day {day} cannot fit its break inside the break window")
            }
            RouteViolation::DayOverrun { day, end, limit } => {
                write!(f, "day {day} ends at {end}, past the limit {limit}")
            }
            RouteViolation::WrongDay { node, day, allowed } => {
                write!(f, "appointment node {node} placed on day {day} but pinned to day {allowed}")
            }
        }
    }
}

/// A complete weekly schedule.
///
/// One [`DayRoute`] per day (index = day), plus the derived sets of
/// clients never visited and appointment duplicates never visited, and
/// the objective value of the underlying assignment.
///
/// # Examples
///
/// ```
/// use weekplan::models::{DayRoute, Solution};
///
/// let sol = Solution::new(vec![DayRoute::new(0, 0, 6, vec![], None)], vec![2], vec![], 9);
/// assert_eq!(sol.num_days(), 1);
/// assert_eq!(sol.dropped(), &[2]);
/// assert_eq!(sol.objective(), 9);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    routes: Vec<DayRoute>,
    dropped: Vec<usize>,
    missed: Vec<usize>,
    objective: i64,
}

impl Solution {
    /// Assembles a solution from extracted routes and derived sets.
    pub fn new(routes: Vec<DayRoute>, dropped: Vec<usize>, missed: Vec<usize>, objective: i64) -> Self {
        Self {
            routes,
            dropped,
            missed,
            objective,
        }
    }

    /// All day routes, in day order.
    pub fn routes(&self) -> &[DayRoute] {
        &self.routes
    }

    /// The route of one day.
    pub fn route(&self, day: usize) -> &DayRoute {
        &self.routes[day]
    }

    /// Number of days planned.
    pub fn num_days(&self) -> usize {
        self.routes.len()
    }

    /// Primary client nodes never visited, ascending.
    pub fn dropped(&self) -> &[usize] {
        &self.dropped
    }

    /// Appointment duplicates never visited, ascending.
    pub fn missed(&self) -> &[usize] {
        &self.missed
    }

    /// Objective value of the underlying assignment.
    pub fn objective(&self) -> i64 {
        self.objective
    }

    /// Total number of interior stops across all days.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    /// Returns the day a node is visited on, if any.
    pub fn day_of(&self, node: usize) -> Option<usize> {
        self.routes
            .iter()
            .find(|r| r.stops().iter().any(|s| s.node == node))
            .map(|r| r.day())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stop;

    #[test]
    fn test_solution_accessors() {
        let routes = vec![
            DayRoute::new(
                0,
                0,
                8,
                vec![Stop {
                    node: 3,
                    service_start: 2,
                }],
                None,
            ),
            DayRoute::new(1, 0, 0, vec![], None),
        ];
        let sol = Solution::new(routes, vec![4], vec![5], 17);
        assert_eq!(sol.num_days(), 2);
        assert_eq!(sol.num_served(), 1);
        assert_eq!(sol.day_of(3), Some(0));
        assert_eq!(sol.day_of(4), None);
        assert_eq!(sol.missed(), &[5]);
        assert_eq!(sol.objective(), 17);
    }

    #[test]
    fn test_violation_display() {
        let v = RouteViolation::DayOverrun {
            day: 1,
            end: 44,
            limit: 40,
        };
        assert_eq!(v.to_string(), "day 1 ends at 44, past the limit 40");
    }
}
