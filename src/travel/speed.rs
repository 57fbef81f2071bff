//! Distance-to-time conversion.

use serde::{Deserialize, Serialize};

/// Distances below this are treated as zero travel.
const NEGLIGIBLE_DIST: f64 = 1e-6;

/// Converts straight-line miles into integer travel time (quarter-hours)
/// with route-type-dependent speeds.
///
/// Three regimes, selected by distance alone: backroads up to
/// `high_speed_dist`, highway up to `very_high_speed_dist`, air beyond.
/// Each regime computes `⌊distance / speed⌋ + 1`, so any non-negligible
/// distance costs at least one time unit. Both thresholds are strict:
/// a distance exactly at a threshold uses the slower regime. The result
/// is monotone within each regime but deliberately drops at the regime
/// boundaries (a mode switch, not a smoothed curve).
///
/// Speeds are miles per quarter-hour.
///
/// # Examples
///
/// ```
/// use weekplan::travel::SpeedModel;
///
/// let m = SpeedModel::default();
/// assert_eq!(m.travel_time(0.0), 0);
/// assert_eq!(m.travel_time(10.0), 3); // backroads: 10/4 + 1
/// assert_eq!(m.travel_time(30.0), 4); // highway: 30/10 + 1
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedModel {
    /// Backroads speed.
    pub speed: f64,
    /// Highway speed.
    pub high_speed: f64,
    /// Distances strictly above this use the highway speed.
    pub high_speed_dist: f64,
    /// Air speed.
    pub very_high_speed: f64,
    /// Distances strictly above this use the air speed.
    pub very_high_speed_dist: f64,
}

impl Default for SpeedModel {
    fn default() -> Self {
        Self {
            speed: 4.0,
            high_speed: 10.0,
            high_speed_dist: 10.0,
            very_high_speed: 15.0,
            very_high_speed_dist: 300.0,
        }
    }
}

impl SpeedModel {
    /// Travel time in quarter-hours for a distance in miles.
    pub fn travel_time(&self, distance: f64) -> i64 {
        if distance < NEGLIGIBLE_DIST {
            return 0;
        }
        if distance > self.very_high_speed_dist {
            (distance / self.very_high_speed) as i64 + 1
        } else if distance > self.high_speed_dist {
            (distance / self.high_speed) as i64 + 1
        } else {
            (distance / self.speed) as i64 + 1
        }
    }
}
