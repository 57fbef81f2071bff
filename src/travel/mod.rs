//! Distance and travel-time model.
//!
//! - [`SpeedModel`] — distance-to-time conversion with backroads,
//!   highway, and air regimes
//! - [`great_circle_miles`] — haversine distance between geocoded points
//! - [`TravelTimeMatrix`] — dense, possibly asymmetric city-pair times

mod geo;
mod matrix;
mod speed;

pub use geo::great_circle_miles;
pub use matrix::TravelTimeMatrix;
pub use speed::SpeedModel;
