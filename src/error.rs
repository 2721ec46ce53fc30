//! Error types for catalog loading and simulation.
//!
//! Configuration problems are fatal and surface before any round runs.
//! Floating-point clamps during renormalization are not errors; they are
//! counted on the catalog instead.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimError>;

/// Invalid catalog template or simulation parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("catalog has no slots")]
    EmptyCatalog,

    #[error("catalog has {count} slots, at most {max} are supported")]
    TooManySlots { count: usize, max: usize },

    #[error("slot probabilities sum to {sum}, expected 1.0")]
    ProbabilitySum { sum: f64 },

    #[error("slot {slot} ({label}) has probability {value}, expected a value in (0, 1]")]
    InvalidProbability {
        slot: usize,
        label: String,
        value: f64,
    },

    #[error("slot {slot} ({label}) has a non-positive purchase limit")]
    NonPositiveQuantity { slot: usize, label: String },

    #[error("unknown quantity {0:?}, expected an integer or \"unlimited\"")]
    UnknownQuantity(String),

    #[error("purchase limit {0} is negative")]
    NegativeQuantity(i64),

    #[error("agent count must be at least 1")]
    InvalidAgentCount,

    #[error("turn cap must be at least 1")]
    InvalidTurnCap,

    #[error("round count must be at least 1")]
    InvalidRoundCount,
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The depleted slot carried (almost) all remaining probability mass
    /// while other slots were still eligible.
    #[error("cannot renormalize after depleting slot {slot}: remaining mass {remaining_mass}")]
    DegenerateRenormalization { slot: usize, remaining_mass: f64 },

    #[error("random source failure: {0}")]
    RandomSource(String),

    #[error("worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl From<rand::Error> for SimError {
    fn from(err: rand::Error) -> Self {
        Self::RandomSource(err.to_string())
    }
}
