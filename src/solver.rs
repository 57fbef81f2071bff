//! The search driver.
//!
//! Orchestrates one optimization run: warm start or cheapest-arc cold
//! start, time-boxed tabu improvement, seed persistence, and assembly of
//! the raw best assignment into a [`Solution`]. Anytime behavior: when
//! the wall-clock budget expires the best feasible assignment found so
//! far is returned. Infeasibility is terminal; there are no retries.

use crate::config::SearchOptions;
use crate::constructive::cheapest_arc_insertion;
use crate::error::ScheduleError;
use crate::formulation::{schedule_route, Assignment, ScheduleModel};
use crate::local_search::{tabu_search, SearchState};
use crate::models::{DayRoute, Solution, Stop};
use crate::warmstart;

/// Runs one optimization and extracts the schedule.
///
/// Fatal outcomes: a structurally inconsistent warm start, and a problem
/// where even the all-dropped assignment cannot be scheduled ("no
/// solution found"). An absent warm-start file falls back to the cold
/// start; a result identical to its seed is only warned about.
pub fn solve(model: &ScheduleModel, options: &SearchOptions) -> Result<Solution, ScheduleError> {
    // The all-dropped assignment is the weakest candidate; when even it
    // cannot be scheduled the day limits are contradictory.
    if let Err(v) = model.evaluate(&Assignment::empty(model.n_days())) {
        return Err(ScheduleError::NoSolution(v.to_string()));
    }

    let seed = load_seed(model, options)?;
    let initial_assignment = match &seed {
        Some(assignment) => repair(model, assignment.clone()),
        None => cheapest_arc_insertion(model),
    };
    let initial = match SearchState::from_assignment(model, initial_assignment) {
        Ok(state) => state,
        Err(v) => return Err(ScheduleError::NoSolution(v.to_string())),
    };

    tracing::info!(objective = initial.objective(), "initial assignment ready");
    let best = tabu_search(model, initial, options);
    tracing::info!(objective = best.objective(), "search finished");

    if let Some(seed) = &seed {
        if best.assignment() == seed {
            tracing::warn!("optimized result is identical to the warm start");
        }
    }

    if let Some(path) = &options.save_to {
        warmstart::save(path, best.assignment().days())?;
    }

    Ok(assemble(model, &best))
}

fn load_seed(
    model: &ScheduleModel,
    options: &SearchOptions,
) -> Result<Option<Assignment>, ScheduleError> {
    let Some(path) = &options.warm_start else {
        return Ok(None);
    };
    match warmstart::load(path)? {
        Some(routes) => {
            let assignment = Assignment::from_days(routes);
            model.validate_assignment(&assignment)?;
            tracing::info!(path = %path.display(), "seeding search from warm start");
            Ok(Some(assignment))
        }
        None => {
            tracing::info!(path = %path.display(), "no warm start; building a cold start");
            Ok(None)
        }
    }
}

/// Drops unschedulable stops from a structurally valid seed.
///
/// Structure mismatches are fatal before this point; timing trouble is
/// not, so the seed is thinned until every day schedules again.
fn repair(model: &ScheduleModel, mut assignment: Assignment) -> Assignment {
    for day in 0..assignment.n_days() {
        loop {
            if assignment.day(day).is_empty()
                || schedule_route(model, day, assignment.day(day)).is_ok()
            {
                break;
            }
            let seq = assignment.day(day).to_vec();
            let mut removal = seq.len() - 1;
            for pos in 0..seq.len() {
                let mut candidate = seq.clone();
                candidate.remove(pos);
                if schedule_route(model, day, &candidate).is_ok() {
                    removal = pos;
                    break;
                }
            }
            let node = assignment.day_mut(day).remove(removal);
            tracing::warn!(node, day, "dropping unschedulable stop from warm start");
        }
    }
    assignment
}

fn assemble(model: &ScheduleModel, best: &SearchState) -> Solution {
    let u = model.universe();
    let mut routes = Vec::with_capacity(model.n_days());
    for (day, (seq, timing)) in best
        .assignment()
        .days()
        .iter()
        .zip(best.timings())
        .enumerate()
    {
        let stops = seq
            .iter()
            .zip(&timing.service_starts)
            .map(|(&node, &service_start)| Stop {
                node,
                service_start,
            })
            .collect();
        routes.push(DayRoute::new(
            day,
            timing.start,
            timing.end,
            stops,
            timing.brk,
        ));
    }

    let mut dropped = Vec::new();
    for client in u.n_starts()..u.n_primary() {
        let via_duplicate = u
            .duplicate_of(client)
            .map_or(false, |dup| best.is_visited(dup));
        if !best.is_visited(client) && !via_duplicate {
            dropped.push(client);
        }
    }
    let missed: Vec<usize> = u
        .time_windows()
        .iter()
        .map(|tw| tw.node())
        .filter(|&dup| !best.is_visited(dup))
        .collect();

    Solution::new(routes, dropped, missed, best.objective())
}
