//! Time-boxed tabu improvement.
//!
//! # Algorithm
//!
//! Best-move tabu search: every iteration prices the whole neighborhood,
//! applies the best admissible move (non-tabu, or tabu but better than
//! the best known — aspiration), and marks the touched nodes tabu for a
//! fixed tenure. Sideways and uphill moves are allowed, which is what
//! lets the search leave local minima. On stagnation the incumbent is
//! perturbed by dropping a few random stops and the tabu list is reset.
//!
//! The loop is bounded by wall-clock time only and always returns the
//! best feasible state seen (anytime behavior).

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SearchOptions;
use crate::formulation::ScheduleModel;

use super::moves::{affected_nodes, apply_move, enumerate_moves, evaluate_move, Move};
use super::state::SearchState;

/// Attempts per perturbation before giving up.
const PERTURB_ATTEMPTS: usize = 6;
/// Stops removed per perturbation.
const PERTURB_DROPS: usize = 3;

/// Improves an initial state until the wall-clock budget expires.
pub fn tabu_search(
    model: &ScheduleModel,
    initial: SearchState,
    options: &SearchOptions,
) -> SearchState {
    let deadline = Instant::now() + options.time_limit;
    let mut rng = match options.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut tabu_until = vec![0usize; model.universe().num_nodes()];
    let mut current = initial.clone();
    let mut best = initial;
    let mut iteration = 0usize;
    let mut stagnation = 0usize;

    while Instant::now() < deadline {
        iteration += 1;

        let moves = enumerate_moves(model, &current);
        if moves.is_empty() {
            break;
        }

        let mut chosen: Option<(Move, i64)> = None;
        let mut ties = 0u32;
        for mv in moves {
            let Some(obj) = evaluate_move(model, &current, mv) else {
                continue;
            };
            let (first, second) = affected_nodes(current.assignment(), mv);
            let tabu = tabu_until[first] > iteration
                || second.is_some_and(|s| tabu_until[s] > iteration);
            if tabu && obj >= best.objective() {
                continue;
            }
            match chosen {
                Some((_, incumbent)) if obj > incumbent => {}
                Some((_, incumbent)) if obj == incumbent => {
                    ties += 1;
                    if rng.random_range(0..ties) == 0 {
                        chosen = Some((mv, obj));
                    }
                }
                _ => {
                    chosen = Some((mv, obj));
                    ties = 1;
                }
            }
        }

        match chosen {
            Some((mv, _)) => {
                let (first, second) = affected_nodes(current.assignment(), mv);
                if apply_move(model, &mut current, mv) {
                    tabu_until[first] = iteration + options.tabu_tenure;
                    if let Some(s) = second {
                        tabu_until[s] = iteration + options.tabu_tenure;
                    }
                    if current.objective() < best.objective() {
                        best = current.clone();
                        stagnation = 0;
                    } else {
                        stagnation += 1;
                    }
                } else {
                    stagnation += 1;
                }
            }
            None => {
                // Everything admissible is tabu; let the list expire.
                tabu_until.fill(0);
                stagnation += 1;
            }
        }

        if stagnation >= options.stagnation_limit {
            perturb(model, &mut current, &mut rng);
            tabu_until.fill(0);
            stagnation = 0;
        }
    }

    tracing::debug!(
        iterations = iteration,
        objective = best.objective(),
        "tabu search finished"
    );
    best
}

/// Kicks the incumbent by unscheduling a few random stops.
fn perturb(model: &ScheduleModel, state: &mut SearchState, rng: &mut StdRng) {
    let mut dropped = 0;
    for _ in 0..PERTURB_ATTEMPTS {
        if dropped >= PERTURB_DROPS {
            break;
        }
        let days_with_stops: Vec<usize> = state
            .assignment()
            .days()
            .iter()
            .enumerate()
            .filter(|(_, seq)| !seq.is_empty())
            .map(|(day, _)| day)
            .collect();
        if days_with_stops.is_empty() {
            break;
        }
        let day = days_with_stops[rng.random_range(0..days_with_stops.len())];
        let pos = rng.random_range(0..state.assignment().day(day).len());
        if apply_move(model, state, Move::Drop { day, pos }) {
            dropped += 1;
        }
    }
}
