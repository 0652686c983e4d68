use std::collections::TryReserveError;
use thiserror::Error;

/// Everything that can stop a clustering run or its surrounding I/O
#[derive(Debug, Error)]
pub enum KmError {
    #[error("unable to allocate membership storage: {0}")]
    ResourceExhausted(#[from] TryReserveError),

    #[error("no observations to cluster")]
    EmptyInput,

    #[error("observations must have at least one dimension")]
    ZeroDimension,

    #[error("k={k} must be between 1 and the number of observations ({n})")]
    InvalidK { k: usize, n: usize },

    #[error("seed index {seed} is outside of [0, {n})")]
    SeedOutOfRange { seed: usize, n: usize },

    #[error("seed index {0} was given more than once")]
    DuplicateSeed(usize),

    #[error("row {row} has {found} values, expected {expected}")]
    DimensionMismatch {
        expected: usize,
        found: usize,
        row: usize,
    },

    #[error("{n} x {d} observations do not fit in memory")]
    TooLarge { n: usize, d: usize },

    #[error("{0} values left over after the last observation")]
    TrailingValues(usize),

    #[error("blob spread {0} must be a finite value > 0")]
    InvalidSpread(f64),

    #[error("bad value '{value}' at row {row}, column {col}")]
    BadValue {
        row: usize,
        col: usize,
        value: String,
    },

    #[error("cluster {cluster} lost all of its members on iteration {iteration}")]
    DegenerateCluster { cluster: usize, iteration: usize },

    #[error("labelings differ in length ({0} != {1})")]
    LengthMismatch(usize, usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KmError>;
