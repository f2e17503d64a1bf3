//! Constraint-augmented fitness biasing toward feature-rich circuits.

use crate::chromosome::Chromosome;
use crate::error::EvolutionResult;
use crate::fitness::bounded_error::{hits_and_errors, score_from_hits};
use crate::fitness::{apply_validity_penalty, FitnessFunction, FitnessParams};
use crate::gates::Gate;

/// Whether a gate can move population off a computational basis state.
pub fn induces_superposition(gate: &Gate) -> bool {
    use crate::gates::{ControlledKind, ControlledRotationAxis, LayerKind, RotationAxis, SingleKind};
    match gate {
        Gate::Single {
            kind: SingleKind::H,
            ..
        } => true,
        Gate::Layer {
            kind: LayerKind::H, ..
        } => true,
        Gate::Controlled {
            kind: ControlledKind::Ch,
            ..
        } => true,
        Gate::Rotation { axis, .. } => matches!(axis, RotationAxis::Rx | RotationAxis::Ry),
        Gate::ControlledRotation { axis, .. } => {
            matches!(axis, ControlledRotationAxis::Crx | ControlledRotationAxis::Cry)
        }
        Gate::Combined(children) => children.iter().any(induces_superposition),
        _ => false,
    }
}

/// Whether a gate can entangle qubits.
pub fn is_entangling(gate: &Gate) -> bool {
    match gate {
        Gate::Controlled { .. }
        | Gate::DoublyControlled { .. }
        | Gate::ControlledRotation { .. }
        | Gate::Oracle(_) => true,
        Gate::Combined(children) => children.iter().any(is_entangling),
        _ => false,
    }
}

/// Bounded-error scoring plus a separate penalty term per missing
/// structural category (oracle present, superposition-capable gate,
/// entangling gate). Each missing category adds `case_count + 1`, so a
/// structurally deficient chromosome can never outrank one that merely
/// misses every case.
#[derive(Debug, Clone, Default)]
pub struct ConstrainedBoundedErrorFitness {
    params: FitnessParams,
    require_oracle: bool,
}

impl ConstrainedBoundedErrorFitness {
    pub fn new(params: FitnessParams) -> Self {
        Self {
            params,
            require_oracle: true,
        }
    }

    /// Disable the oracle-presence constraint for problems without an
    /// oracle gate type.
    pub fn without_oracle_constraint(mut self) -> Self {
        self.require_oracle = false;
        self
    }
}

impl FitnessFunction for ConstrainedBoundedErrorFitness {
    fn evaluate(
        &self,
        state_distributions: &[Vec<f64>],
        target_distributions: &[Vec<f64>],
        chromosome: &Chromosome,
    ) -> EvolutionResult<f64> {
        let (hits, errors) = hits_and_errors(state_distributions, target_distributions)?;
        let mut score = score_from_hits(hits, &errors, chromosome);

        let category_penalty = target_distributions.len() as f64 + 1.0;
        if self.require_oracle && !chromosome.genes().iter().any(|g| g.contains_oracle()) {
            score += category_penalty;
        }
        if !chromosome.genes().iter().any(induces_superposition) {
            score += category_penalty;
        }
        if !chromosome.genes().iter().any(is_entangling) {
            score += category_penalty;
        }

        Ok(apply_validity_penalty(
            score,
            &self.params.validity_checks,
            chromosome,
        ))
    }
}
