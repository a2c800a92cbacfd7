//! Error types for the population simulator
//!
//! Every variant here is raised before the population is touched: a run that
//! passes validation always completes all requested years.

use thiserror::Error;

/// Result alias used across the crate
pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    /// Initial population must split evenly into males and females
    #[error("initial population must be even, got {0}")]
    OddPopulation(usize),

    #[error("number of simulated years must be positive")]
    NoYears,

    /// Per-year education impact series does not cover the run
    #[error("education impact series has {actual} values but the run lasts {expected} years")]
    EducationSeriesLength { expected: usize, actual: usize },

    #[error("event '{name}' ends (year {end}) before it starts (year {start})")]
    InvalidEventWindow { name: String, start: u32, end: u32 },

    /// A parameter outside its documented range
    #[error("parameter '{name}' = {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("parameter '{0}' is not a finite number")]
    NonFinite(String),

    #[error("unknown parameter name '{0}'")]
    UnknownParameter(String),

    /// Malformed event description on the command line
    #[error("invalid event description '{0}'")]
    InvalidEventSpec(String),

    #[error("invalid education curve: {0}")]
    InvalidCurve(String),

    #[error("sampler construction failed: {0}")]
    Distribution(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
