//! Solution extraction: stop tables, statistics, and the client roster.
//!
//! Turns a raw [`Solution`] back into operational structures: per-day
//! stop rows with clock times, appointment adherence counts, hour
//! totals, and a roster of every client sorted for review. Persisting
//! any of it (CSV, console, maps) is the reporting collaborator's job;
//! this module only exposes the ordered in-memory structures and a
//! human-readable summary.

use std::collections::BTreeSet;
use std::fmt;

use crate::formulation::ScheduleModel;
use crate::models::Solution;

/// Workday display names, in day order.
const WORKDAY_NAMES: [&str; 7] = [
    "1.Monday",
    "2.Tuesday",
    "3.Wednesday",
    "4.Thursday",
    "5.Friday",
    "6.Saturday",
    "7.Sunday",
];

/// Display name of a day index.
pub fn day_name(day: usize) -> String {
    match WORKDAY_NAMES.get(day) {
        Some(name) => (*name).to_string(),
        None => format!("{}.Day", day + 1),
    }
}

/// Renders minutes (plus a clock offset) as `HH:MM`.
pub fn time_string(total_minutes: i64, offset_minutes: i64) -> String {
    let m = total_minutes + offset_minutes;
    format!("{:02}:{:02}", m.div_euclid(60), m.rem_euclid(60))
}

/// One row of the per-day stop table.
///
/// Break rows carry no node id; the two base rows of each day bracket
/// the interior stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopRecord {
    pub label: String,
    pub node: Option<usize>,
    pub day: usize,
    pub day_name: String,
    pub time_in: String,
    pub time_out: String,
    pub pre_scheduled: bool,
    pub priority: i64,
    pub city: String,
}

/// Appointment adherence counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApptStats {
    pub total: usize,
    pub kept: usize,
    pub missed: usize,
    /// Missed appointments whose client was still visited.
    pub rescheduled: usize,
    /// Missed appointments whose client was dropped entirely.
    pub dropped: usize,
}

/// Aggregate totals over the whole week.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleStats {
    pub total_hours: f64,
    pub travel_hours: f64,
    pub service_hours: f64,
    pub total_calls: usize,
    pub appointments: ApptStats,
}

/// One row of the client roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub label: String,
    /// Day the client is visited on; `None` means dropped.
    pub call_day: Option<usize>,
    pub call_day_name: String,
    pub priority: i64,
    /// Day the client's appointment was originally scheduled for.
    pub sched_day: Option<usize>,
    pub sched_day_name: String,
    pub time_from_base: String,
    pub minutes_from_base: i64,
}

/// Everything the reporting collaborators consume.
#[derive(Debug, Clone)]
pub struct Report {
    pub stops: Vec<StopRecord>,
    pub stats: ScheduleStats,
    pub roster: Vec<RosterEntry>,
}

/// Running totals threaded through the per-day fold.
struct Tally {
    dropped: BTreeSet<usize>,
    missed: BTreeSet<usize>,
    elapsed_units: i64,
    service_units: i64,
    calls: usize,
}

/// Extracts the reporting structures from a solution.
pub fn extract(model: &ScheduleModel, solution: &Solution) -> Report {
    let u = model.universe();
    let params = model.params();
    let t2m = params.timeunits2minutes;
    let offset = params.day_start_minutes;

    let init = Tally {
        dropped: (u.n_starts()..u.n_primary()).collect(),
        missed: u.time_windows().iter().map(|tw| tw.node()).collect(),
        elapsed_units: 0,
        service_units: 0,
        calls: 0,
    };

    let base_row = |day: usize, name: &str, at: i64| StopRecord {
        label: u.label(0).to_string(),
        node: Some(0),
        day,
        day_name: name.to_string(),
        time_in: time_string(at * t2m, offset),
        time_out: time_string(at * t2m, offset),
        pre_scheduled: false,
        priority: 0,
        city: u.city_of(0).to_string(),
    };

    let (stops, tally) = solution.routes().iter().fold(
        (Vec::new(), init),
        |(mut rows, mut tally), route| {
            let day = route.day();
            let name = day_name(day);

            rows.push(base_row(day, &name, route.start()));
            for stop in route.stops() {
                let primary = u.primary(stop.node);
                let pre_scheduled = u.node(stop.node).is_duplicate();
                tally.dropped.remove(&primary);
                if pre_scheduled {
                    tally.missed.remove(&stop.node);
                }
                if primary >= u.n_starts() {
                    tally.calls += 1;
                }
                let service = u.service_time_of(stop.node);
                tally.service_units += service;
                rows.push(StopRecord {
                    label: u.label(stop.node).to_string(),
                    node: Some(stop.node),
                    day,
                    day_name: name.clone(),
                    time_in: time_string(stop.service_start * t2m, offset),
                    time_out: time_string((stop.service_start + service) * t2m, offset),
                    pre_scheduled,
                    priority: u.priority_of(stop.node),
                    city: u.city_of(stop.node).to_string(),
                });
            }
            rows.push(match route.break_interval() {
                Some((bs, be)) => StopRecord {
                    label: "Break-Time".to_string(),
                    node: None,
                    day,
                    day_name: name.clone(),
                    time_in: time_string(bs * t2m, offset),
                    time_out: time_string(be * t2m, offset),
                    pre_scheduled: false,
                    priority: 0,
                    city: "-".to_string(),
                },
                None => StopRecord {
                    label: "Break-Skip".to_string(),
                    node: None,
                    day,
                    day_name: name.clone(),
                    time_in: "--:--".to_string(),
                    time_out: "--:--".to_string(),
                    pre_scheduled: false,
                    priority: 0,
                    city: "-".to_string(),
                },
            });
            rows.push(base_row(day, &name, route.end()));

            tally.elapsed_units += route.duration();
            (rows, tally)
        },
    );

    let rescheduled = tally
        .missed
        .iter()
        .filter(|&&dup| !tally.dropped.contains(&u.primary(dup)))
        .count();
    let appointments = ApptStats {
        total: u.n_appts(),
        kept: u.n_appts() - tally.missed.len(),
        missed: tally.missed.len(),
        rescheduled,
        dropped: tally.missed.len() - rescheduled,
    };

    let to_hours = |units: i64| units as f64 * t2m as f64 / 60.0;
    let total_hours = to_hours(tally.elapsed_units);
    let service_hours = to_hours(tally.service_units);
    let stats = ScheduleStats {
        total_hours,
        travel_hours: total_hours - service_hours,
        service_hours,
        total_calls: tally.calls,
        appointments,
    };

    let mut roster: Vec<RosterEntry> = (u.n_starts()..u.n_primary())
        .map(|client| {
            let call_day = solution
                .day_of(client)
                .or_else(|| u.duplicate_of(client).and_then(|dup| solution.day_of(dup)));
            let sched_day = u
                .duplicate_of(client)
                .and_then(|dup| u.appointment_for(dup))
                .map(|tw| tw.day());
            let minutes_from_base = u.time_from_base(client) * t2m;
            RosterEntry {
                label: u.label(client).to_string(),
                call_day,
                call_day_name: call_day.map(day_name).unwrap_or_else(|| "Dropped".to_string()),
                priority: u.priority_of(client),
                sched_day,
                sched_day_name: sched_day.map(day_name).unwrap_or_else(|| "None".to_string()),
                time_from_base: time_string(minutes_from_base, 0),
                minutes_from_base,
            }
        })
        .collect();
    roster.sort_by_key(|e| {
        (
            e.call_day.unwrap_or(usize::MAX),
            std::cmp::Reverse(e.priority),
            e.sched_day.unwrap_or(usize::MAX),
            std::cmp::Reverse(e.minutes_from_base),
        )
    });

    Report {
        stops,
        stats,
        roster,
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Schedule Plan:")?;
        let mut last_day = usize::MAX;
        for row in &self.stops {
            if row.day != last_day {
                writeln!(f)?;
                writeln!(f, "{}", row.day_name)?;
                writeln!(f, "{}", "-".repeat(row.day_name.len()))?;
                last_day = row.day;
            }
            let marker = if row.pre_scheduled { " (Prior Appt)" } else { "" };
            writeln!(
                f,
                "{} - {}  {}{}",
                row.time_in, row.time_out, row.label, marker
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Schedule Summary")?;
        writeln!(f, "----------------")?;
        writeln!(f, "Total Work Time:    {:.1} hours", self.stats.total_hours)?;
        writeln!(f, "Total Travel Time:  {:.1} hours", self.stats.travel_hours)?;
        writeln!(f, "Total Service Time: {:.1} hours", self.stats.service_hours)?;
        writeln!(f, "Total Client Calls: {}", self.stats.total_calls)?;

        let a = &self.stats.appointments;
        writeln!(f)?;
        writeln!(f, "Appointment Stats")?;
        writeln!(f, "  Total Appointments:       {}", a.total)?;
        writeln!(f, "  Appointments Kept:        {}", a.kept)?;
        writeln!(f, "  Missed Appointments:      {}", a.missed)?;
        writeln!(f, "  Rescheduled Appointments: {}", a.rescheduled)?;
        writeln!(f, "  Dropped Appointments:     {}", a.dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelParams;
    use crate::formulation::test_fixtures::model_with;
    use crate::graph::{AppointmentRecord, ClientRecord};
    use crate::models::{Day, DayRoute, Solution, Stop};

    #[test]
    fn test_time_string() {
        assert_eq!(time_string(0, 480), "08:00");
        assert_eq!(time_string(75, 480), "09:15");
        assert_eq!(time_string(30, 0), "00:30");
    }

    #[test]
    fn test_day_name_known_and_fallback() {
        assert_eq!(day_name(0), "1.Monday");
        assert_eq!(day_name(4), "5.Friday");
        assert_eq!(day_name(9), "10.Day");
    }

    fn kept_appointment_fixture() -> (ScheduleModel, Solution, usize) {
        let model = model_with(
            vec![ClientRecord::new("C", "CityC", 5, 1)],
            vec![AppointmentRecord::new("C", 6, 0)],
            vec![Day::new(0, 4, 40)],
            ModelParams::default(),
            &[("Base", "CityC", 2)],
        );
        let dup = model.universe().duplicate_of(1).expect("duplicate");
        let routes = vec![DayRoute::new(
            0,
            0,
            9,
            vec![Stop {
                node: dup,
                service_start: 6,
            }],
            None,
        )];
        let solution = Solution::new(routes, vec![], vec![], 0);
        (model, solution, dup)
    }

    #[test]
    fn test_stop_table_for_kept_appointment() {
        let (model, solution, dup) = kept_appointment_fixture();
        let report = extract(&model, &solution);
        // Base out, the visit, the skipped break, base back.
        assert_eq!(report.stops.len(), 4);
        let visit = &report.stops[1];
        assert_eq!(visit.node, Some(dup));
        assert!(visit.pre_scheduled);
        assert_eq!(visit.time_in, "09:30");
        assert_eq!(visit.time_out, "09:45");
        assert_eq!(visit.city, "CityC");
        assert_eq!(report.stops[2].label, "Break-Skip");
        assert_eq!(report.stops[3].time_in, "10:15");
    }

    #[test]
    fn test_stats_for_kept_appointment() {
        let (model, solution, _) = kept_appointment_fixture();
        let report = extract(&model, &solution);
        let s = &report.stats;
        // 9 units elapsed, 1 unit service.
        assert!((s.total_hours - 2.25).abs() < 1e-9);
        assert!((s.service_hours - 0.25).abs() < 1e-9);
        assert!((s.travel_hours - 2.0).abs() < 1e-9);
        assert_eq!(s.total_calls, 1);
        assert_eq!(
            s.appointments,
            ApptStats {
                total: 1,
                kept: 1,
                missed: 0,
                rescheduled: 0,
                dropped: 0,
            }
        );
    }

    #[test]
    fn test_rescheduled_appointment_counts() {
        let model = model_with(
            vec![ClientRecord::new("C", "CityC", 5, 1)],
            vec![AppointmentRecord::new("C", 30, 1)],
            vec![Day::new(0, 4, 40), Day::new(0, 4, 20)],
            ModelParams::default(),
            &[("Base", "CityC", 2)],
        );
        let dup = model.universe().duplicate_of(1).expect("duplicate");
        // Served via the plain node on day 0; the appointment is missed.
        let routes = vec![
            DayRoute::new(
                0,
                0,
                5,
                vec![Stop {
                    node: 1,
                    service_start: 2,
                }],
                None,
            ),
            DayRoute::new(1, 0, 0, vec![], None),
        ];
        let solution = Solution::new(routes, vec![], vec![dup], 0);
        let report = extract(&model, &solution);
        assert_eq!(
            report.stats.appointments,
            ApptStats {
                total: 1,
                kept: 0,
                missed: 1,
                rescheduled: 1,
                dropped: 0,
            }
        );
        // The roster remembers the originally scheduled day.
        assert_eq!(report.roster[0].sched_day_name, "2.Tuesday");
        assert_eq!(report.roster[0].call_day_name, "1.Monday");
    }

    #[test]
    fn test_roster_ordering() {
        let model = model_with(
            vec![
                ClientRecord::new("P", "CityP", 9, 0),
                ClientRecord::new("Q", "CityQ", 5, 0),
                ClientRecord::new("R", "CityR", 7, 0),
            ],
            vec![],
            vec![Day::new(0, 4, 40)],
            ModelParams::default(),
            &[
                ("Base", "CityP", 2),
                ("Base", "CityQ", 3),
                ("Base", "CityR", 4),
                ("CityP", "CityQ", 2),
                ("CityP", "CityR", 2),
                ("CityQ", "CityR", 2),
            ],
        );
        // P and Q visited, R dropped.
        let routes = vec![DayRoute::new(
            0,
            0,
            10,
            vec![
                Stop {
                    node: 1,
                    service_start: 2,
                },
                Stop {
                    node: 2,
                    service_start: 4,
                },
            ],
            None,
        )];
        let solution = Solution::new(routes, vec![3], vec![], 0);
        let report = extract(&model, &solution);
        let order: Vec<&str> = report.roster.iter().map(|e| e.label.as_str()).collect();
        // Visited days first (priority descending), dropped last.
        assert_eq!(order, vec!["P", "Q", "R"]);
        assert_eq!(report.roster[2].call_day_name, "Dropped");
    }

    #[test]
    fn test_summary_renders() {
        let (model, solution, _) = kept_appointment_fixture();
        let text = extract(&model, &solution).to_string();
        assert!(text.contains("Schedule Plan:"));
        assert!(text.contains("1.Monday"));
        assert!(text.contains("(Prior Appt)"));
        assert!(text.contains("Total Appointments:       1"));
    }
}
