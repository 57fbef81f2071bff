//! Crate error type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that terminate a scheduling run.
///
/// Every variant corresponds to a condition that makes the run unusable:
/// an incomplete travel table, a malformed warm start, or a problem with
/// no feasible schedule at all. Recoverable situations (an absent warm
/// start file, a seed that needs repair) are handled in place and logged.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("no travel distance for city pair {from:?} -> {to:?}")]
    MissingTravelEntry { from: String, to: String },

    #[error("no rendering path for city pair {from:?} -> {to:?}")]
    MissingPathEntry { from: String, to: String },

    #[error("no start locations: node 0 must be the base")]
    NoBase,

    #[error("no days to plan")]
    NoDays,

    #[error("appointment for {client:?} is on day {day}, but only {n_days} days are planned")]
    AppointmentDayOutOfRange {
        client: String,
        day: usize,
        n_days: usize,
    },

    #[error("failed to read warm start {path:?}")]
    WarmStartIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("warm start line {line}: invalid node index {token:?}")]
    WarmStartParse { line: usize, token: String },

    #[error("warm start has {found} routes, expected {expected}")]
    WarmStartShape { found: usize, expected: usize },

    #[error("warm start is inconsistent with the node universe: {reason}")]
    WarmStartInconsistent { reason: String },

    #[error("failed to write solution file {path:?}")]
    SaveSolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no solution found: {0}")]
    NoSolution(String),
}
