//! The routing formulator: the multi-day VRPTW model.
//!
//! - [`Assignment`] — raw per-day visit sequences, the search's state
//! - [`ScheduleModel`] — arc costs, day restrictions, disjunction
//!   penalties, and the objective
//! - [`schedule_route`] / [`RouteTiming`] — the time dimension for a
//!   fixed sequence: appointment pinning, waiting allowance, breaks,
//!   day limits

mod assignment;
mod model;
mod timing;

pub use assignment::Assignment;
pub use model::{Evaluation, ScheduleModel};
pub use timing::{schedule_route, RouteTiming};

#[cfg(test)]
pub(crate) mod test_fixtures {
    use crate::config::ModelParams;
    use crate::graph::{
        AppointmentRecord, ClientRecord, RoutingUniverse, StartRecord, TravelTable,
        UniverseBuilder,
    };
    use crate::models::Day;

    use super::ScheduleModel;

    /// Distance whose default-model travel time is exactly `t`.
    pub(crate) fn dist_for_time(t: i64) -> f64 {
        match t {
            0 => 0.0,
            1 => 1.0,
            2 => 4.0,
            _ => 10.0 * (t - 1) as f64,
        }
    }

    /// A universe with one base ("Base") plus the given clients, where
    /// `links` lists symmetric city-pair travel times in quarter-hours.
    pub(crate) fn universe_with(
        clients: Vec<ClientRecord>,
        appointments: Vec<AppointmentRecord>,
        links: &[(&str, &str, i64)],
    ) -> RoutingUniverse {
        let mut cities: Vec<String> = vec!["Base".to_string()];
        for c in &clients {
            if !cities.contains(&c.city) {
                cities.push(c.city.clone());
            }
        }
        let mut travel = TravelTable::new();
        for (a, b, t) in links {
            let d = dist_for_time(*t);
            travel.insert_distance(a, b, d);
            travel.insert_distance(b, a, d);
        }
        for a in &cities {
            for b in &cities {
                if a != b {
                    travel.insert_path(a, b, vec![a.clone(), b.clone()]);
                }
            }
        }
        UniverseBuilder::new(
            vec![StartRecord::new("Base", "Base")],
            clients,
            appointments,
            travel,
        )
        .build()
        .expect("fixture universe builds")
    }

    pub(crate) fn model_with(
        clients: Vec<ClientRecord>,
        appointments: Vec<AppointmentRecord>,
        days: Vec<Day>,
        params: ModelParams,
        links: &[(&str, &str, i64)],
    ) -> ScheduleModel {
        let universe = universe_with(clients, appointments, links);
        ScheduleModel::new(universe, days, params).expect("fixture model builds")
    }
}
