//! Per-route timing: the time dimension for a fixed visit sequence.

use crate::models::RouteViolation;

use super::model::ScheduleModel;

/// Start shifts tried before a sequence is declared unschedulable.
const MAX_START_SHIFTS: usize = 8;

/// Computed timing for one day's fixed visit sequence.
///
/// All values are cumulative quarter-hours. The times are the earliest
/// feasible ones for the sequence — the finalization pass that tightens
/// timestamps once the discrete assignment is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTiming {
    /// Cumulative time leaving the base.
    pub start: i64,
    /// Cumulative time back at the base.
    pub end: i64,
    /// Service start per interior stop, in sequence order.
    pub service_starts: Vec<i64>,
    /// Break interval `(start, end)`, when one is taken.
    pub brk: Option<(i64, i64)>,
}

enum Outcome {
    /// The route must leave the base this much later.
    ShiftStart(i64),
    Violation(RouteViolation),
}

/// Schedules a fixed interior sequence on a day.
///
/// Enforces the day's start window and end cap, the global per-day time
/// cap, exact appointment instants (waiting up to the allowance), and
/// the break rule. Every break position along the route is tried; the
/// placement with the earliest route end wins. With mandatory breaks the
/// break must be taken; otherwise skipping it is one more candidate.
///
/// Returns the first violation encountered when no placement works.
pub fn schedule_route(
    model: &ScheduleModel,
    day_idx: usize,
    seq: &[usize],
) -> Result<RouteTiming, RouteViolation> {
    for &v in seq {
        if let Some(allowed) = model.allowed_day(v) {
            if allowed != day_idx {
                return Err(RouteViolation::WrongDay {
                    node: v,
                    day: day_idx,
                    allowed,
                });
            }
        }
    }

    let day = model.day(day_idx);
    let mut placements: Vec<Option<usize>> = Vec::new();
    match day.break_rule() {
        Some(_) => {
            placements.extend((0..=seq.len()).map(Some));
            if !model.params().mandatory_breaks {
                placements.push(None);
            }
        }
        None => placements.push(None),
    }

    let mut best: Option<RouteTiming> = None;
    let mut first_err: Option<RouteViolation> = None;
    for placement in placements {
        match settle(model, day_idx, seq, placement) {
            Ok(t) => {
                if best.as_ref().map_or(true, |b| t.end < b.end) {
                    best = Some(t);
                }
            }
            Err(v) => {
                if first_err.is_none() {
                    first_err = Some(v);
                }
            }
        }
    }

    match best {
        Some(t) => Ok(t),
        None => Err(first_err.unwrap_or(RouteViolation::BreakWindowMissed { day: day_idx })),
    }
}

/// Finds the earliest feasible start for one break placement.
///
/// The forward pass asks for a later departure whenever waiting before
/// the first pinned stop exceeds the allowance; the start is raised
/// until the pass settles or leaves the day's start window.
fn settle(
    model: &ScheduleModel,
    day_idx: usize,
    seq: &[usize],
    break_gap: Option<usize>,
) -> Result<RouteTiming, RouteViolation> {
    let day = model.day(day_idx);
    let mut start = day.start_min();
    for _ in 0..MAX_START_SHIFTS {
        match forward(model, day_idx, seq, break_gap, start) {
            Ok(t) => return Ok(t),
            Err(Outcome::ShiftStart(delta)) => {
                start += delta;
                if start > day.start_max() {
                    return Err(RouteViolation::StartWindow {
                        day: day_idx,
                        needed: start,
                    });
                }
            }
            Err(Outcome::Violation(v)) => return Err(v),
        }
    }
    Err(RouteViolation::StartWindow {
        day: day_idx,
        needed: start,
    })
}

fn forward(
    model: &ScheduleModel,
    day_idx: usize,
    seq: &[usize],
    break_gap: Option<usize>,
    start: i64,
) -> Result<RouteTiming, Outcome> {
    let day = model.day(day_idx);
    let params = model.params();
    let uni = model.universe();
    let rule = day.break_rule();

    let mut t = start;
    let mut prev = 0usize;
    let mut service_starts = Vec::with_capacity(seq.len());
    let mut brk = None;
    let mut anchored = false;

    for (i, &v) in seq.iter().enumerate() {
        let mut earliest = t + model.arc_cost(prev, v);
        if break_gap == Some(i) {
            if let Some(rule) = rule {
                let bs = rule.start_min().max(t + uni.service_time_of(prev));
                if bs > rule.start_max() {
                    return Err(Outcome::Violation(RouteViolation::BreakWindowMissed {
                        day: day_idx,
                    }));
                }
                earliest = (earliest + rule.duration()).max(bs + rule.duration());
                brk = Some((bs, bs + rule.duration()));
            }
        }

        let service_start = match uni.appointment_for(v) {
            Some(tw) => {
                let instant = tw.instant();
                if earliest > instant {
                    return Err(Outcome::Violation(RouteViolation::AppointmentUnreachable {
                        node: v,
                        instant,
                        earliest,
                    }));
                }
                let waiting = instant - earliest;
                if waiting > params.allow_waiting_time {
                    if !anchored {
                        return Err(Outcome::ShiftStart(waiting - params.allow_waiting_time));
                    }
                    return Err(Outcome::Violation(RouteViolation::ExcessWaiting {
                        node: v,
                        waiting,
                        allowed: params.allow_waiting_time,
                    }));
                }
                anchored = true;
                instant
            }
            None => earliest,
        };

        service_starts.push(service_start);
        t = service_start;
        prev = v;
    }

    let mut end = t + model.arc_cost(prev, 0);
    if break_gap == Some(seq.len()) {
        if let Some(rule) = rule {
            let bs = rule.start_min().max(t + uni.service_time_of(prev));
            if bs > rule.start_max() {
                return Err(Outcome::Violation(RouteViolation::BreakWindowMissed {
                    day: day_idx,
                }));
            }
            end = (end + rule.duration()).max(bs + rule.duration());
            brk = Some((bs, bs + rule.duration()));
        }
    }

    let limit = day.end_max().min(params.max_time_units_per_day);
    if end > limit {
        return Err(Outcome::Violation(RouteViolation::DayOverrun {
            day: day_idx,
            end,
            limit,
        }));
    }

    Ok(RouteTiming {
        start,
        end,
        service_starts,
        brk,
    })
}
