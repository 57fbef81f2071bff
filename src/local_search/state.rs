//! Incrementally maintained search state.

use crate::formulation::{Assignment, RouteTiming, ScheduleModel};
use crate::models::RouteViolation;

/// An assignment together with everything the search needs to price its
/// neighbors: per-day timing and arc cost, the visited bitmap, and the
/// decomposed objective.
#[derive(Debug, Clone)]
pub struct SearchState {
    pub(crate) assignment: Assignment,
    pub(crate) timings: Vec<RouteTiming>,
    pub(crate) day_arcs: Vec<i64>,
    pub(crate) arc_total: i64,
    pub(crate) visited: Vec<bool>,
    pub(crate) penalty: i64,
    pub(crate) objective: i64,
}

impl SearchState {
    /// Evaluates an assignment into a search state.
    pub fn from_assignment(
        model: &ScheduleModel,
        assignment: Assignment,
    ) -> Result<Self, RouteViolation> {
        let eval = model.evaluate(&assignment)?;
        let day_arcs: Vec<i64> = assignment
            .days()
            .iter()
            .map(|seq| model.route_arc_cost(seq))
            .collect();
        let arc_total = day_arcs.iter().sum();
        let visited = model.visited(&assignment);
        Ok(Self {
            assignment,
            timings: eval.timings,
            day_arcs,
            arc_total,
            visited,
            penalty: eval.penalty,
            objective: eval.objective,
        })
    }

    /// The underlying assignment.
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Objective of the assignment.
    pub fn objective(&self) -> i64 {
        self.objective
    }

    /// Per-day timing, in day order.
    pub fn timings(&self) -> &[RouteTiming] {
        &self.timings
    }

    /// Whether a node is scheduled.
    pub fn is_visited(&self, node: usize) -> bool {
        self.visited[node]
    }

    pub(crate) fn span(&self) -> i64 {
        let max_end = self.timings.iter().map(|t| t.end).max().unwrap_or(0);
        let min_start = self.timings.iter().map(|t| t.start).min().unwrap_or(0);
        max_end - min_start
    }
}
