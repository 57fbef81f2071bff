//! Local search for improving assignments.
//!
//! - [`SearchState`] — an assignment with incrementally maintained
//!   timing, visited set, and objective
//! - [`tabu_search`] — best-move tabu search under a wall-clock budget

mod moves;
mod state;
mod tabu;

pub use state::SearchState;
pub use tabu::tabu_search;
