//! Neighborhood moves over assignments.
//!
//! Ordering moves (relocate, exchange, segment reversal) keep the
//! visited set fixed; selection moves (drop, add, toggle) trade arc cost
//! against omission penalties — the optional-visit economics expressed
//! as neighborhood steps. The appointment toggle swaps a client between
//! its exact-appointment duplicate and its freely-schedulable plain
//! node in one step.

use crate::formulation::{schedule_route, Assignment, ScheduleModel};

use super::state::SearchState;

/// One candidate step from the current assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Move {
    /// Move the stop at `(day, pos)` to `(to_day, to_pos)`; `to_pos`
    /// indexes the source day after removal when the days coincide.
    Relocate {
        day: usize,
        pos: usize,
        to_day: usize,
        to_pos: usize,
    },
    /// Swap the stops at two positions.
    Exchange {
        day_a: usize,
        pos_a: usize,
        day_b: usize,
        pos_b: usize,
    },
    /// Reverse the segment `[from..=to]` within a day (2-opt).
    Reverse { day: usize, from: usize, to: usize },
    /// Unschedule the stop at `(day, pos)`.
    Drop { day: usize, pos: usize },
    /// Schedule `node` at `(day, pos)`.
    Add { node: usize, day: usize, pos: usize },
    /// Replace the stop at `(day, pos)` by its appointment counterpart
    /// `node`, inserted at `(to_day, to_pos)` (post-removal indexing
    /// when the days coincide).
    Toggle {
        day: usize,
        pos: usize,
        node: usize,
        to_day: usize,
        to_pos: usize,
    },
}

/// The one or two nodes a move touches, for the tabu list.
pub(crate) fn affected_nodes(assignment: &Assignment, mv: Move) -> (usize, Option<usize>) {
    match mv {
        Move::Relocate { day, pos, .. } | Move::Drop { day, pos } => {
            (assignment.day(day)[pos], None)
        }
        Move::Exchange {
            day_a,
            pos_a,
            day_b,
            pos_b,
        } => (
            assignment.day(day_a)[pos_a],
            Some(assignment.day(day_b)[pos_b]),
        ),
        Move::Reverse { day, from, to } => {
            (assignment.day(day)[from], Some(assignment.day(day)[to]))
        }
        Move::Add { node, .. } => (node, None),
        Move::Toggle { day, pos, node, .. } => (assignment.day(day)[pos], Some(node)),
    }
}

/// The modified day sequences and visited-set changes a move produces.
fn materialize(
    assignment: &Assignment,
    mv: Move,
) -> (Vec<(usize, Vec<usize>)>, Vec<(usize, bool)>) {
    match mv {
        Move::Relocate {
            day,
            pos,
            to_day,
            to_pos,
        } => {
            if day == to_day {
                let mut seq = assignment.day(day).to_vec();
                let node = seq.remove(pos);
                seq.insert(to_pos, node);
                (vec![(day, seq)], vec![])
            } else {
                let mut from_seq = assignment.day(day).to_vec();
                let node = from_seq.remove(pos);
                let mut to_seq = assignment.day(to_day).to_vec();
                to_seq.insert(to_pos, node);
                (vec![(day, from_seq), (to_day, to_seq)], vec![])
            }
        }
        Move::Exchange {
            day_a,
            pos_a,
            day_b,
            pos_b,
        } => {
            if day_a == day_b {
                let mut seq = assignment.day(day_a).to_vec();
                seq.swap(pos_a, pos_b);
                (vec![(day_a, seq)], vec![])
            } else {
                let mut seq_a = assignment.day(day_a).to_vec();
                let mut seq_b = assignment.day(day_b).to_vec();
                std::mem::swap(&mut seq_a[pos_a], &mut seq_b[pos_b]);
                (vec![(day_a, seq_a), (day_b, seq_b)], vec![])
            }
        }
        Move::Reverse { day, from, to } => {
            let mut seq = assignment.day(day).to_vec();
            seq[from..=to].reverse();
            (vec![(day, seq)], vec![])
        }
        Move::Drop { day, pos } => {
            let mut seq = assignment.day(day).to_vec();
            let node = seq.remove(pos);
            (vec![(day, seq)], vec![(node, false)])
        }
        Move::Add { node, day, pos } => {
            let mut seq = assignment.day(day).to_vec();
            seq.insert(pos, node);
            (vec![(day, seq)], vec![(node, true)])
        }
        Move::Toggle {
            day,
            pos,
            node,
            to_day,
            to_pos,
        } => {
            if day == to_day {
                let mut seq = assignment.day(day).to_vec();
                let removed = seq.remove(pos);
                seq.insert(to_pos, node);
                (vec![(day, seq)], vec![(removed, false), (node, true)])
            } else {
                let mut from_seq = assignment.day(day).to_vec();
                let removed = from_seq.remove(pos);
                let mut to_seq = assignment.day(to_day).to_vec();
                to_seq.insert(to_pos, node);
                (
                    vec![(day, from_seq), (to_day, to_seq)],
                    vec![(removed, false), (node, true)],
                )
            }
        }
    }
}

/// Objective of the neighbor a move leads to; `None` when any touched
/// day cannot be scheduled.
pub(crate) fn evaluate_move(model: &ScheduleModel, state: &SearchState, mv: Move) -> Option<i64> {
    let (changes, vis_changes) = materialize(&state.assignment, mv);

    let mut arc_total = state.arc_total;
    let mut ends: Vec<i64> = state.timings.iter().map(|t| t.end).collect();
    let mut starts: Vec<i64> = state.timings.iter().map(|t| t.start).collect();
    for (day, seq) in &changes {
        let timing = schedule_route(model, *day, seq).ok()?;
        arc_total += model.route_arc_cost(seq) - state.day_arcs[*day];
        ends[*day] = timing.end;
        starts[*day] = timing.start;
    }

    let penalty = if vis_changes.is_empty() {
        state.penalty
    } else {
        let mut visited = state.visited.clone();
        for (node, v) in &vis_changes {
            visited[*node] = *v;
        }
        model.omission_penalties(&visited)
    };

    let max_end = ends.iter().copied().max().unwrap_or(0);
    let min_start = starts.iter().copied().min().unwrap_or(0);
    let span = max_end - min_start;
    Some(arc_total + model.params().global_span_cost * span + penalty)
}

/// Applies a move to the state; `false` leaves the state untouched.
pub(crate) fn apply_move(model: &ScheduleModel, state: &mut SearchState, mv: Move) -> bool {
    let (changes, vis_changes) = materialize(&state.assignment, mv);

    let mut scheduled = Vec::with_capacity(changes.len());
    for (day, seq) in &changes {
        match schedule_route(model, *day, seq) {
            Ok(t) => scheduled.push(t),
            Err(_) => return false,
        }
    }

    for ((day, seq), timing) in changes.into_iter().zip(scheduled) {
        let arc = model.route_arc_cost(&seq);
        state.arc_total += arc - state.day_arcs[day];
        state.day_arcs[day] = arc;
        state.timings[day] = timing;
        *state.assignment.day_mut(day) = seq;
    }
    for (node, v) in vis_changes {
        state.visited[node] = v;
    }
    state.penalty = model.omission_penalties(&state.visited);
    state.objective =
        state.arc_total + model.params().global_span_cost * state.span() + state.penalty;
    true
}

/// Enumerates every candidate move from the current state.
pub(crate) fn enumerate_moves(model: &ScheduleModel, state: &SearchState) -> Vec<Move> {
    let a = &state.assignment;
    let u = model.universe();
    let n_days = a.n_days();
    let mut moves = Vec::new();

    // Relocate.
    for day in 0..n_days {
        for pos in 0..a.day(day).len() {
            let node = a.day(day)[pos];
            let targets: Vec<usize> = match model.allowed_day(node) {
                Some(d) => vec![d],
                None => (0..n_days).collect(),
            };
            for to_day in targets {
                let upper = if to_day == day {
                    a.day(day).len() - 1
                } else {
                    a.day(to_day).len()
                };
                for to_pos in 0..=upper {
                    if to_day == day && to_pos == pos {
                        continue;
                    }
                    moves.push(Move::Relocate {
                        day,
                        pos,
                        to_day,
                        to_pos,
                    });
                }
            }
        }
    }

    // Exchange.
    for day_a in 0..n_days {
        for pos_a in 0..a.day(day_a).len() {
            for day_b in day_a..n_days {
                let start_b = if day_b == day_a { pos_a + 1 } else { 0 };
                for pos_b in start_b..a.day(day_b).len() {
                    let na = a.day(day_a)[pos_a];
                    let nb = a.day(day_b)[pos_b];
                    if model.allowed_day(na).is_some_and(|d| d != day_b) {
                        continue;
                    }
                    if model.allowed_day(nb).is_some_and(|d| d != day_a) {
                        continue;
                    }
                    moves.push(Move::Exchange {
                        day_a,
                        pos_a,
                        day_b,
                        pos_b,
                    });
                }
            }
        }
    }

    // Segment reversal.
    for day in 0..n_days {
        let len = a.day(day).len();
        for from in 0..len {
            for to in (from + 1)..len {
                moves.push(Move::Reverse { day, from, to });
            }
        }
    }

    // Drop.
    for day in 0..n_days {
        for pos in 0..a.day(day).len() {
            moves.push(Move::Drop { day, pos });
        }
    }

    // Add.
    for node in 1..u.num_nodes() {
        if state.visited[node] {
            continue;
        }
        if counterpart_visited(model, state, node) {
            continue;
        }
        let targets: Vec<usize> = match model.allowed_day(node) {
            Some(d) => vec![d],
            None => (0..n_days).collect(),
        };
        for day in targets {
            for pos in 0..=a.day(day).len() {
                moves.push(Move::Add { node, day, pos });
            }
        }
    }

    // Appointment toggle.
    for tw in u.time_windows() {
        let dup = tw.node();
        let client = u.primary(dup);
        if state.visited[dup] && !state.visited[client] {
            if let Some((day, pos)) = locate(a, dup) {
                for to_day in 0..n_days {
                    let upper = if to_day == day {
                        a.day(day).len() - 1
                    } else {
                        a.day(to_day).len()
                    };
                    for to_pos in 0..=upper {
                        moves.push(Move::Toggle {
                            day,
                            pos,
                            node: client,
                            to_day,
                            to_pos,
                        });
                    }
                }
            }
        } else if state.visited[client] && !state.visited[dup] {
            if let Some((day, pos)) = locate(a, client) {
                let to_day = tw.day();
                let upper = if to_day == day {
                    a.day(day).len() - 1
                } else {
                    a.day(to_day).len()
                };
                for to_pos in 0..=upper {
                    moves.push(Move::Toggle {
                        day,
                        pos,
                        node: dup,
                        to_day,
                        to_pos,
                    });
                }
            }
        }
    }

    moves
}

/// Whether the mutually-exclusive partner of `node` is scheduled.
fn counterpart_visited(model: &ScheduleModel, state: &SearchState, node: usize) -> bool {
    let u = model.universe();
    if u.node(node).is_duplicate() {
        return state.visited[u.primary(node)];
    }
    u.duplicate_of(node).is_some_and(|dup| state.visited[dup])
}

fn locate(assignment: &Assignment, node: usize) -> Option<(usize, usize)> {
    for (day, seq) in assignment.days().iter().enumerate() {
        if let Some(pos) = seq.iter().position(|&v| v == node) {
            return Some((day, pos));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelParams;
    use crate::formulation::test_fixtures::model_with;
    use crate::graph::{AppointmentRecord, ClientRecord};
    use crate::models::Day;

    fn simple_model() -> ScheduleModel {
        model_with(
            vec![
                ClientRecord::new("A", "CityA", 8, 0),
                ClientRecord::new("B", "CityB", 3, 0),
            ],
            vec![],
            vec![Day::new(0, 4, 40), Day::new(0, 4, 40)],
            ModelParams {
                global_span_cost: 0,
                ..ModelParams::default()
            },
            &[("Base", "CityA", 2), ("Base", "CityB", 5), ("CityA", "CityB", 3)],
        )
    }

    #[test]
    fn test_evaluate_matches_apply() {
        let model = simple_model();
        let state =
            SearchState::from_assignment(&model, Assignment::from_days(vec![vec![1], vec![2]]))
                .expect("feasible");
        for mv in enumerate_moves(&model, &state) {
            if let Some(predicted) = evaluate_move(&model, &state, mv) {
                let mut applied = state.clone();
                assert!(apply_move(&model, &mut applied, mv));
                assert_eq!(applied.objective(), predicted, "move {mv:?}");
                // Rebuilding from scratch agrees with the incremental state.
                let rebuilt =
                    SearchState::from_assignment(&model, applied.assignment().clone())
                        .expect("feasible");
                assert_eq!(rebuilt.objective(), applied.objective(), "move {mv:?}");
            }
        }
    }

    #[test]
    fn test_drop_move_trades_arc_for_penalty() {
        let model = simple_model();
        let state =
            SearchState::from_assignment(&model, Assignment::from_days(vec![vec![1], vec![2]]))
                .expect("feasible");
        // Dropping B saves 10 arc units and incurs its priority 3.
        let obj = evaluate_move(&model, &state, Move::Drop { day: 1, pos: 0 }).expect("feasible");
        assert_eq!(obj, state.objective() - 10 + 3);
    }

    #[test]
    fn test_add_respects_pair_exclusivity() {
        let model = model_with(
            vec![ClientRecord::new("C", "CityC", 5, 0)],
            vec![AppointmentRecord::new("C", 6, 0)],
            vec![Day::new(0, 4, 40)],
            ModelParams::default(),
            &[("Base", "CityC", 2)],
        );
        let dup = model.universe().duplicate_of(1).expect("duplicate");
        let state = SearchState::from_assignment(&model, Assignment::from_days(vec![vec![dup]]))
            .expect("feasible");
        let moves = enumerate_moves(&model, &state);
        // The plain client may never be added next to its duplicate.
        assert!(!moves
            .iter()
            .any(|m| matches!(m, Move::Add { node: 1, .. })));
        // The toggle to the plain node is offered instead.
        assert!(moves
            .iter()
            .any(|m| matches!(m, Move::Toggle { node: 1, .. })));
    }

    #[test]
    fn test_toggle_swaps_duplicate_for_client() {
        let model = model_with(
            vec![ClientRecord::new("C", "CityC", 5, 0)],
            vec![AppointmentRecord::new("C", 6, 0)],
            vec![Day::new(0, 4, 40)],
            ModelParams::default(),
            &[("Base", "CityC", 2)],
        );
        let dup = model.universe().duplicate_of(1).expect("duplicate");
        let mut state =
            SearchState::from_assignment(&model, Assignment::from_days(vec![vec![dup]]))
                .expect("feasible");
        assert!(apply_move(
            &model,
            &mut state,
            Move::Toggle {
                day: 0,
                pos: 0,
                node: 1,
                to_day: 0,
                to_pos: 0,
            }
        ));
        assert!(state.is_visited(1));
        assert!(!state.is_visited(dup));
        assert_eq!(state.assignment().day(0), &[1]);
    }
}
