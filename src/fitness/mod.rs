//! Fitness strategies.
//!
//! A [`FitnessFunction`] scores a batch of (produced, target)
//! distribution pairs for one chromosome; lower is better. Fitness is a
//! pure function of the provided distributions — the optimizer layer
//! owns the target distributions and the simulator. Length mismatches
//! between a produced and a target distribution indicate a wiring bug
//! and abort evaluation.

mod bounded_error;
mod constrained;
mod distance;
mod match_count;
pub mod validity;
#[cfg(test)]
mod tests;

pub use bounded_error::BoundedErrorFitness;
pub use constrained::{induces_superposition, is_entangling, ConstrainedBoundedErrorFitness};
pub use distance::{jensen_shannon_distance, JensenShannonFitness};
pub use match_count::MatchCountFitness;

use std::fmt;
use std::sync::Arc;

use crate::chromosome::Chromosome;
use crate::error::{EvolutionError, EvolutionResult};

/// Penalty added once when any validity check fails. Large enough to
/// dominate every distance-based score component.
pub const VALIDITY_PENALTY: f64 = 100.0;

/// Scores one chromosome against all evaluation cases.
pub trait FitnessFunction: Send + Sync {
    fn evaluate(
        &self,
        state_distributions: &[Vec<f64>],
        target_distributions: &[Vec<f64>],
        chromosome: &Chromosome,
    ) -> EvolutionResult<f64>;
}

/// A named boolean predicate over a chromosome. Failing checks worsen
/// the fitness monotonically; they are steering signals, not errors.
#[derive(Clone)]
pub struct ValidityCheck {
    name: &'static str,
    predicate: Arc<dyn Fn(&Chromosome) -> bool + Send + Sync>,
}

impl ValidityCheck {
    pub fn new<F>(name: &'static str, predicate: F) -> Self
    where
        F: Fn(&Chromosome) -> bool + Send + Sync + 'static,
    {
        Self {
            name,
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn passes(&self, chromosome: &Chromosome) -> bool {
        (self.predicate)(chromosome)
    }
}

impl fmt::Debug for ValidityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidityCheck")
            .field("name", &self.name)
            .finish()
    }
}

/// Shared configuration of fitness strategies.
#[derive(Debug, Clone, Default)]
pub struct FitnessParams {
    /// Checks identifying invalid chromosomes; each strategy adds
    /// [`VALIDITY_PENALTY`] once if any check fails.
    pub validity_checks: Vec<ValidityCheck>,
}

impl FitnessParams {
    pub fn with_checks(validity_checks: Vec<ValidityCheck>) -> Self {
        Self { validity_checks }
    }
}

/// Add the flat penalty once if any registered check fails.
pub(crate) fn apply_validity_penalty(
    score: f64,
    checks: &[ValidityCheck],
    chromosome: &Chromosome,
) -> f64 {
    for check in checks {
        if !check.passes(chromosome) {
            tracing::trace!(check = check.name(), "validity check failed");
            return score + VALIDITY_PENALTY;
        }
    }
    score
}

/// Verify a (produced, target) pair is comparable.
pub(crate) fn check_pair_lengths(
    case: usize,
    produced: &[f64],
    target: &[f64],
) -> EvolutionResult<()> {
    if produced.len() != target.len() {
        return Err(EvolutionError::DistributionMismatch {
            case,
            produced: produced.len(),
            target: target.len(),
        });
    }
    Ok(())
}

/// Index of the canonical correct answer: the entry holding probability
/// 1 in a one-hot target distribution.
pub(crate) fn match_index(case: usize, target: &[f64]) -> EvolutionResult<usize> {
    target
        .iter()
        .position(|p| *p == 1.0)
        .ok_or(EvolutionError::MissingTargetState { case })
}
