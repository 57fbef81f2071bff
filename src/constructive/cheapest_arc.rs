//! Greedy cheapest-arc insertion.
//!
//! # Algorithm
//!
//! Builds an initial assignment by inserting nodes one at a time at the
//! position of least arc-cost increase among timing-feasible positions.
//! Appointment duplicates go first (most constrained: one fixed day),
//! ordered by day and instant; plain clients follow by descending
//! priority. A node is inserted only when the cheapest feasible increase
//! does not exceed the penalty its omission would cost, so nodes whose
//! detour cannot pay for itself stay dropped.
//!
//! # Complexity
//!
//! O(n² × s²) where n = nodes and s = stops per day, dominated by the
//! per-position timing check.

use std::cmp::Reverse;

use crate::formulation::{schedule_route, Assignment, ScheduleModel};
use crate::models::NodeKind;

/// Constructs an initial feasible assignment.
///
/// Every returned assignment is structurally valid and every day's
/// sequence schedulable; nodes with no affordable feasible position are
/// left unvisited.
pub fn cheapest_arc_insertion(model: &ScheduleModel) -> Assignment {
    let u = model.universe();
    let mut assignment = Assignment::empty(model.n_days());
    let mut visited = vec![false; u.num_nodes()];
    visited[0] = true;

    let mut windows: Vec<_> = u.time_windows().to_vec();
    windows.sort_by_key(|tw| (tw.day(), tw.instant()));
    for tw in &windows {
        let stake = insertion_stake(model, tw.node(), &visited);
        try_insert(model, &mut assignment, &mut visited, tw.node(), stake);
    }

    let mut clients: Vec<usize> = (u.n_starts()..u.n_primary()).collect();
    clients.sort_by_key(|&c| Reverse(u.priority_of(c)));
    for c in clients {
        if let Some(dup) = u.duplicate_of(c) {
            if visited[dup] {
                continue; // the exact appointment is already kept
            }
        }
        let stake = insertion_stake(model, c, &visited);
        try_insert(model, &mut assignment, &mut visited, c, stake);
    }

    assignment
}

/// Penalty avoided by serving `node`, given the current visited set.
fn insertion_stake(model: &ScheduleModel, node: usize, visited: &[bool]) -> i64 {
    let u = model.universe();
    match u.node(node).kind() {
        NodeKind::Start => 0,
        NodeKind::Client => {
            let mut stake = u.priority_of(node);
            if let Some(dup) = u.duplicate_of(node) {
                if !visited[dup] {
                    stake += 2 * u.priority_of(node);
                }
            }
            stake
        }
        NodeKind::ApptDuplicate => {
            let client = u.primary(node);
            let mut stake = u.priority_of(client) + model.params().miss_appointment_penalty;
            if !visited[client] {
                stake += 2 * u.priority_of(client);
            }
            stake
        }
    }
}

fn try_insert(
    model: &ScheduleModel,
    assignment: &mut Assignment,
    visited: &mut [bool],
    node: usize,
    stake: i64,
) -> bool {
    let days: Vec<usize> = match model.allowed_day(node) {
        Some(d) => vec![d],
        None => (0..model.n_days()).collect(),
    };

    let mut best: Option<(i64, usize, usize)> = None;
    for day in days {
        let seq = assignment.day(day);
        for pos in 0..=seq.len() {
            let prev = if pos == 0 { 0 } else { seq[pos - 1] };
            let next = if pos == seq.len() { 0 } else { seq[pos] };
            let delta =
                model.arc_cost(prev, node) + model.arc_cost(node, next) - model.arc_cost(prev, next);
            if best.map_or(true, |(b, _, _)| delta < b) {
                let mut candidate = seq.to_vec();
                candidate.insert(pos, node);
                if schedule_route(model, day, &candidate).is_ok() {
                    best = Some((delta, day, pos));
                }
            }
        }
    }

    if let Some((delta, day, pos)) = best {
        if delta <= stake {
            assignment.day_mut(day).insert(pos, node);
            visited[node] = true;
            return true;
        }
    }
    false
}
