//! Evolution error types

use thiserror::Error;

use crate::sim::SimulatorError;

/// Errors surfaced by the search engine.
///
/// Precondition violations (empty catalog, arity mismatches, malformed
/// target distributions) are configuration bugs and abort the run.
/// Transient simulator failures are retried inside the optimizer layer
/// and only surface here once the retry budget is exhausted.
#[derive(Error, Debug)]
pub enum EvolutionError {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("gate set is empty, cannot sample a random gate")]
    EmptyGateSet,

    #[error("gate '{gate}' requires at least {required} qubits but the gate set holds {qubit_num}")]
    ArityViolation {
        gate: String,
        required: usize,
        qubit_num: usize,
    },

    #[error("case {case}: produced distribution has length {produced}, target has length {target}")]
    DistributionMismatch {
        case: usize,
        produced: usize,
        target: usize,
    },

    #[error("case {case}: target distribution holds no entry with probability 1.0")]
    MissingTargetState { case: usize },

    #[error(
        "gate '{gate}' covers {available} evaluation cases but {requested} target distributions were supplied"
    )]
    CaseOutOfRange {
        gate: String,
        requested: usize,
        available: usize,
    },

    #[error("case {case}: simulator retries exhausted after {retries} attempts: {message}")]
    RetriesExhausted {
        case: usize,
        retries: usize,
        message: String,
    },

    #[error("simulator failure: {0}")]
    Simulator(#[from] SimulatorError),

    #[error("no completed generation, run the algorithm before querying results")]
    NoCompletedGeneration,

    #[error("numerical optimization failed: {message}")]
    OptimizationFailed { message: String },
}

/// Result alias used throughout the crate.
pub type EvolutionResult<T> = Result<T, EvolutionError>;
