//! Model and search parameters.
//!
//! Plain-data parameter structs with the defaults the system was tuned
//! with. They derive [`serde::Serialize`]/[`serde::Deserialize`] so an
//! external configuration loader can fill them; the library itself never
//! touches configuration files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Parameters of the routing formulation.
///
/// All time quantities are in quarter-hour units unless noted otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// Maximum idle time permitted before any single stop.
    pub allow_waiting_time: i64,
    /// Cap on every cumulative time value along a route.
    pub max_time_units_per_day: i64,
    /// Weight of the cross-route span term in the objective.
    pub global_span_cost: i64,
    /// Extra penalty for leaving an appointment duplicate unserved,
    /// stacked on top of the client's priority.
    pub miss_appointment_penalty: i64,
    /// Whether every day with a break rule must actually take the break.
    pub mandatory_breaks: bool,
    /// Minutes per time unit, used when rendering clock times.
    pub timeunits2minutes: i64,
    /// Clock offset of cumulative time zero, in minutes since midnight.
    pub day_start_minutes: i64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            allow_waiting_time: 4,
            max_time_units_per_day: 52,
            global_span_cost: 1,
            miss_appointment_penalty: 1,
            mandatory_breaks: true,
            timeunits2minutes: 15,
            day_start_minutes: 8 * 60,
        }
    }
}

/// Parameters of the search driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Wall-clock budget for the improvement phase.
    pub time_limit: Duration,
    /// Iterations a moved node stays tabu.
    pub tabu_tenure: usize,
    /// Non-improving iterations before the search perturbs.
    pub stagnation_limit: usize,
    /// Seed for the perturbation RNG; `None` draws a fresh one.
    pub rng_seed: Option<u64>,
    /// Seed file from a prior run; absent file falls back to a cold start.
    pub warm_start: Option<PathBuf>,
    /// Where to persist the result as the next run's seed.
    pub save_to: Option<PathBuf>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(2),
            tabu_tenure: 9,
            stagnation_limit: 40,
            rng_seed: None,
            warm_start: None,
            save_to: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_params_defaults() {
        let p = ModelParams::default();
        assert_eq!(p.allow_waiting_time, 4);
        assert_eq!(p.max_time_units_per_day, 52);
        assert_eq!(p.global_span_cost, 1);
        assert_eq!(p.miss_appointment_penalty, 1);
        assert!(p.mandatory_breaks);
        assert_eq!(p.timeunits2minutes, 15);
        assert_eq!(p.day_start_minutes, 480);
    }

    #[test]
    fn test_search_options_defaults() {
        let o = SearchOptions::default();
        assert_eq!(o.time_limit, Duration::from_secs(2));
        assert!(o.warm_start.is_none());
        assert!(o.save_to.is_none());
    }
}
