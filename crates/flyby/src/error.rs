//! Error types for flyby diffusion runs.

use std::fmt;

use nbody::{ElementsError, IntegrationError, SolveError};
use thiserror::Error;

/// Result type alias for flyby operations.
pub type Result<T> = std::result::Result<T, FlybyError>;

/// Pipeline stage in which a per-encounter failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Sampling,
    Classification,
    AnalyticKick,
    SimulatedKick,
    Driver,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Sampling => "sampling",
            Stage::Classification => "classification",
            Stage::AnalyticKick => "analytic kick",
            Stage::SimulatedKick => "simulated kick",
            Stage::Driver => "driver",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum FlybyError {
    // ===== Configuration Errors =====
    /// Invalid physical or numerical parameter.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The encounter table cannot cover the requested run.
    #[error(
        "encounter table holds {available} rows but {required} are needed \
         ({realizations} realizations × {per_realization} encounters)"
    )]
    InsufficientEncounters {
        required: usize,
        available: usize,
        realizations: usize,
        per_realization: usize,
    },

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ===== Numerical Errors =====
    /// Encounter geometry the kick models cannot handle.
    #[error("degenerate encounter geometry: {0}")]
    DegenerateGeometry(String),

    #[error("root solve failed: {0}")]
    Solve(#[from] SolveError),

    #[error("invalid orbit: {0}")]
    Elements(#[from] ElementsError),

    #[error("three-body integration failed: {0}")]
    Integration(#[from] IntegrationError),

    /// Any of the above, tagged with where in the run it happened.
    #[error("{stage} failed at realization {realization}, encounter {encounter}: {source}")]
    Encounter {
        stage: Stage,
        realization: usize,
        encounter: usize,
        source: Box<FlybyError>,
    },

    // ===== I/O Errors =====
    #[error("malformed table at line {line}: {message}")]
    Table { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FlybyError {
    /// Create a configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Attach the stage and run indices to an error.
    pub fn at(self, stage: Stage, realization: usize, encounter: usize) -> Self {
        Self::Encounter {
            stage,
            realization,
            encounter,
            source: Box::new(self),
        }
    }

    /// Stage recorded on a contextual error, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Encounter { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
