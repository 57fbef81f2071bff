//! Domain model types for the weekly visit planner.
//!
//! Provides the core abstractions: nodes of the routing universe with
//! their appointment time windows, workdays with start/end limits and
//! break rules, per-day routes of timed stops, and the assembled weekly
//! solution.

mod day;
mod node;
mod route;
mod solution;

pub use day::{BreakRule, Day};
pub use node::{Node, NodeKind, TimeWindow};
pub use route::{DayRoute, Stop};
pub use solution::{RouteViolation, Solution};
