//! The multi-day routing model.

use crate::config::ModelParams;
use crate::error::ScheduleError;
use crate::graph::RoutingUniverse;
use crate::models::{Day, RouteViolation};

use super::assignment::Assignment;
use super::timing::{schedule_route, RouteTiming};

/// Full evaluation of an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Objective = arc cost + span cost + omission penalties.
    pub objective: i64,
    /// Sum of arc costs over all routes.
    pub arc_cost: i64,
    /// Largest minus smallest cumulative endpoint value across routes.
    pub span: i64,
    /// Total omission penalty of unvisited optional nodes.
    pub penalty: i64,
    /// Per-day timing, in day order.
    pub timings: Vec<RouteTiming>,
}

/// The multi-day VRPTW formulation: one route per day, every route
/// anchored at node 0, optional visits priced by the disjunction
/// economics, appointments pinned to their instant and day.
///
/// The model is immutable per optimization run; it owns the universe,
/// the day limits, and the parameters.
#[derive(Debug)]
pub struct ScheduleModel {
    universe: RoutingUniverse,
    days: Vec<Day>,
    params: ModelParams,
}

impl ScheduleModel {
    /// Creates the model, validating appointments against the day list.
    pub fn new(
        universe: RoutingUniverse,
        days: Vec<Day>,
        params: ModelParams,
    ) -> Result<Self, ScheduleError> {
        if days.is_empty() {
            return Err(ScheduleError::NoDays);
        }
        for tw in universe.time_windows() {
            if tw.day() >= days.len() {
                return Err(ScheduleError::AppointmentDayOutOfRange {
                    client: universe.label(tw.node()).to_string(),
                    day: tw.day(),
                    n_days: days.len(),
                });
            }
        }
        Ok(Self {
            universe,
            days,
            params,
        })
    }

    /// The routing universe.
    pub fn universe(&self) -> &RoutingUniverse {
        &self.universe
    }

    /// All day limits, in day order.
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    /// One day's limits.
    pub fn day(&self, day: usize) -> &Day {
        &self.days[day]
    }

    /// Number of days (= routes).
    pub fn n_days(&self) -> usize {
        self.days.len()
    }

    /// Model parameters.
    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    /// Cost of traversing `from -> to`: service at the origin, then travel.
    pub fn arc_cost(&self, from: usize, to: usize) -> i64 {
        self.universe.service_time_of(from) + self.universe.travel_time(from, to)
    }

    /// The only day a node may be served on, when restricted.
    ///
    /// Appointment duplicates are pinned to their day; every other node
    /// is free.
    pub fn allowed_day(&self, node: usize) -> Option<usize> {
        self.universe.appointment_for(node).map(|tw| tw.day())
    }

    /// Arc cost of one route: base through the sequence and back.
    pub fn route_arc_cost(&self, seq: &[usize]) -> i64 {
        let mut prev = 0usize;
        let mut total = 0;
        for &v in seq {
            total += self.arc_cost(prev, v);
            prev = v;
        }
        total + self.arc_cost(prev, 0)
    }

    /// Visited bitmap over all nodes; the base is always visited.
    pub fn visited(&self, assignment: &Assignment) -> Vec<bool> {
        let mut visited = vec![false; self.universe.num_nodes()];
        visited[0] = true;
        for seq in assignment.days() {
            for &v in seq {
                visited[v] = true;
            }
        }
        visited
    }

    /// Total omission penalty for a visited bitmap.
    ///
    /// Three disjunction families: every non-base start and plain client
    /// pays its priority when unvisited (0 for starts); a client and its
    /// duplicate pay `2 × priority` when both are unvisited; an unvisited
    /// duplicate additionally pays `priority + miss_appointment_penalty`.
    /// Keeping the appointment is therefore always cheaper than
    /// rescheduling, which is always cheaper than dropping the pair.
    pub fn omission_penalties(&self, visited: &[bool]) -> i64 {
        let u = &self.universe;
        let mut total = 0;
        for node in 1..u.n_primary() {
            if !visited[node] {
                total += u.priority_of(node);
            }
        }
        for tw in u.time_windows() {
            let dup = tw.node();
            let client = u.primary(dup);
            let priority = u.priority_of(client);
            if !visited[dup] && !visited[client] {
                total += 2 * priority;
            }
            if !visited[dup] {
                total += priority + self.params.miss_appointment_penalty;
            }
        }
        total
    }

    /// Checks an assignment's structure against the model.
    ///
    /// Used on warm-start seeds, where any mismatch with the current
    /// node universe is fatal.
    pub fn validate_assignment(&self, assignment: &Assignment) -> Result<(), ScheduleError> {
        if assignment.n_days() != self.n_days() {
            return Err(ScheduleError::WarmStartShape {
                found: assignment.n_days(),
                expected: self.n_days(),
            });
        }
        let n = self.universe.num_nodes();
        let mut seen = vec![false; n];
        for (day, seq) in assignment.days().iter().enumerate() {
            for &v in seq {
                if v >= n {
                    return Err(ScheduleError::WarmStartInconsistent {
                        reason: format!("node {v} outside the {n}-node universe"),
                    });
                }
                if v == 0 {
                    return Err(ScheduleError::WarmStartInconsistent {
                        reason: format!("route {day} contains the base node"),
                    });
                }
                if seen[v] {
                    return Err(ScheduleError::WarmStartInconsistent {
                        reason: format!("node {v} scheduled more than once"),
                    });
                }
                seen[v] = true;
                if let Some(allowed) = self.allowed_day(v) {
                    if allowed != day {
                        return Err(ScheduleError::WarmStartInconsistent {
                            reason: format!(
                                "appointment node {v} scheduled on day {day}, pinned to day {allowed}"
                            ),
                        });
                    }
                }
            }
        }
        for tw in self.universe.time_windows() {
            if seen[tw.node()] && seen[self.universe.primary(tw.node())] {
                return Err(ScheduleError::WarmStartInconsistent {
                    reason: format!(
                        "client {:?} and its appointment duplicate are both scheduled",
                        self.universe.label(tw.node())
                    ),
                });
            }
        }
        Ok(())
    }

    /// Evaluates an assignment: per-day timing plus the objective.
    ///
    /// Fails with the first route violation when any day cannot be
    /// scheduled.
    pub fn evaluate(&self, assignment: &Assignment) -> Result<Evaluation, RouteViolation> {
        let timings = assignment
            .days()
            .iter()
            .enumerate()
            .map(|(day, seq)| schedule_route(self, day, seq))
            .collect::<Result<Vec<_>, _>>()?;

        let arc_cost: i64 = assignment
            .days()
            .iter()
            .map(|seq| self.route_arc_cost(seq))
            .sum();
        let max_end = timings.iter().map(|t| t.end).max().unwrap_or(0);
        let min_start = timings.iter().map(|t| t.start).min().unwrap_or(0);
        let span = max_end - min_start;
        let penalty = self.omission_penalties(&self.visited(assignment));
        let objective = arc_cost + self.params.global_span_cost * span + penalty;

        Ok(Evaluation {
            objective,
            arc_cost,
            span,
            penalty,
            timings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::test_fixtures::model_with;
    use crate::graph::{AppointmentRecord, ClientRecord};
    use crate::models::Day;

    fn two_client_model() -> ScheduleModel {
        model_with(
            vec![
                ClientRecord::new("A", "CityA", 8, 0),
                ClientRecord::new("B", "CityB", 3, 0),
            ],
            vec![],
            vec![Day::new(0, 4, 40)],
            ModelParams {
                global_span_cost: 0,
                ..ModelParams::default()
            },
            &[("Base", "CityA", 2), ("Base", "CityB", 5), ("CityA", "CityB", 3)],
        )
    }

    #[test]
    fn test_arc_cost_charges_service_at_origin() {
        let model = model_with(
            vec![ClientRecord::new("A", "CityA", 5, 3)],
            vec![],
            vec![Day::new(0, 4, 40)],
            ModelParams::default(),
            &[("Base", "CityA", 2)],
        );
        assert_eq!(model.arc_cost(0, 1), 2); // base has no service time
        assert_eq!(model.arc_cost(1, 0), 5); // 3 service + 2 travel
        assert_eq!(model.route_arc_cost(&[1]), 7);
        assert_eq!(model.route_arc_cost(&[]), 0);
    }

    #[test]
    fn test_omission_penalties_ordering() {
        let model = model_with(
            vec![ClientRecord::new("C", "CityC", 5, 0)],
            vec![AppointmentRecord::new("C", 8, 0)],
            vec![Day::new(0, 4, 40)],
            ModelParams::default(),
            &[("Base", "CityC", 2)],
        );
        let client = 1;
        let dup = model.universe().duplicate_of(client).expect("duplicate");
        let n = model.universe().num_nodes();

        let mut keep = vec![false; n];
        keep[0] = true;
        keep[dup] = true;
        let mut reschedule = vec![false; n];
        reschedule[0] = true;
        reschedule[client] = true;
        let mut drop_both = vec![false; n];
        drop_both[0] = true;

        let keep_cost = model.omission_penalties(&keep);
        let reschedule_cost = model.omission_penalties(&reschedule);
        let drop_cost = model.omission_penalties(&drop_both);

        // keep < reschedule < drop, exactly as the disjunctions price it.
        assert_eq!(keep_cost, 5);
        assert_eq!(reschedule_cost, 5 + 1);
        assert_eq!(drop_cost, 5 + 2 * 5 + 5 + 1);
        assert!(keep_cost < reschedule_cost && reschedule_cost < drop_cost);
    }

    #[test]
    fn test_evaluate_objective() {
        let model = two_client_model();
        let a = Assignment::from_days(vec![vec![1]]);
        let eval = model.evaluate(&a).expect("feasible");
        // Serve A: arcs 2 + 2, penalty 3 for dropping B, span cost off.
        assert_eq!(eval.arc_cost, 4);
        assert_eq!(eval.penalty, 3);
        assert_eq!(eval.objective, 7);
        assert_eq!(eval.span, 4);
    }

    #[test]
    fn test_evaluate_span_across_days() {
        let model = model_with(
            vec![ClientRecord::new("A", "CityA", 8, 0)],
            vec![],
            vec![Day::new(0, 4, 40), Day::new(0, 4, 40)],
            ModelParams::default(),
            &[("Base", "CityA", 2)],
        );
        let a = Assignment::from_days(vec![vec![1], vec![]]);
        let eval = model.evaluate(&a).expect("feasible");
        // Day 0 runs 0..4, day 1 is empty at 0..0.
        assert_eq!(eval.span, 4);
        assert_eq!(eval.objective, eval.arc_cost + eval.span + eval.penalty);
    }

    #[test]
    fn test_validate_assignment_structure() {
        let model = two_client_model();
        assert!(model
            .validate_assignment(&Assignment::from_days(vec![vec![1, 2]]))
            .is_ok());
        assert!(matches!(
            model.validate_assignment(&Assignment::from_days(vec![vec![1], vec![2]])),
            Err(ScheduleError::WarmStartShape { found: 2, expected: 1 })
        ));
        assert!(matches!(
            model.validate_assignment(&Assignment::from_days(vec![vec![9]])),
            Err(ScheduleError::WarmStartInconsistent { .. })
        ));
        assert!(matches!(
            model.validate_assignment(&Assignment::from_days(vec![vec![0, 1]])),
            Err(ScheduleError::WarmStartInconsistent { .. })
        ));
        assert!(matches!(
            model.validate_assignment(&Assignment::from_days(vec![vec![1, 1]])),
            Err(ScheduleError::WarmStartInconsistent { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_pair_conflict_and_wrong_day() {
        let model = model_with(
            vec![ClientRecord::new("C", "CityC", 5, 0)],
            vec![AppointmentRecord::new("C", 8, 1)],
            vec![Day::new(0, 4, 40), Day::new(0, 4, 40)],
            ModelParams::default(),
            &[("Base", "CityC", 2)],
        );
        let dup = model.universe().duplicate_of(1).expect("duplicate");
        // Duplicate off its pinned day.
        assert!(matches!(
            model.validate_assignment(&Assignment::from_days(vec![vec![dup], vec![]])),
            Err(ScheduleError::WarmStartInconsistent { .. })
        ));
        // Client and duplicate both scheduled.
        assert!(matches!(
            model.validate_assignment(&Assignment::from_days(vec![vec![1], vec![dup]])),
            Err(ScheduleError::WarmStartInconsistent { .. })
        ));
    }

    #[test]
    fn test_appointment_day_out_of_range_is_fatal() {
        use crate::formulation::test_fixtures::universe_with;
        let universe = universe_with(
            vec![ClientRecord::new("C", "CityC", 5, 0)],
            vec![AppointmentRecord::new("C", 8, 5)],
            &[("Base", "CityC", 2)],
        );
        let err = ScheduleModel::new(universe, vec![Day::new(0, 4, 40)], ModelParams::default())
            .expect_err("day 5 of 1");
        assert!(matches!(
            err,
            ScheduleError::AppointmentDayOutOfRange { day: 5, n_days: 1, .. }
        ));
    }
}
