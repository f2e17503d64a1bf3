//! Distributional-distance fitness.

use crate::chromosome::Chromosome;
use crate::error::EvolutionResult;
use crate::fitness::{
    apply_validity_penalty, check_pair_lengths, FitnessFunction, FitnessParams,
};

/// Jensen-Shannon distance between two probability vectors, base 2, so
/// the result lies in [0, 1]. Symmetric, and zero exactly when the
/// distributions coincide.
pub fn jensen_shannon_distance(p: &[f64], q: &[f64]) -> f64 {
    debug_assert_eq!(p.len(), q.len());

    let mut divergence = 0.0;
    for (pi, qi) in p.iter().zip(q.iter()) {
        let mi = 0.5 * (pi + qi);
        if *pi > 0.0 {
            divergence += 0.5 * pi * (pi / mi).log2();
        }
        if *qi > 0.0 {
            divergence += 0.5 * qi * (qi / mi).log2();
        }
    }
    // Floating point can push the divergence a hair below zero.
    divergence.max(0.0).sqrt()
}

/// Mean Jensen-Shannon distance over all evaluation cases.
#[derive(Debug, Clone, Default)]
pub struct JensenShannonFitness {
    params: FitnessParams,
}

impl JensenShannonFitness {
    pub fn new(params: FitnessParams) -> Self {
        Self { params }
    }
}

impl FitnessFunction for JensenShannonFitness {
    fn evaluate(
        &self,
        state_distributions: &[Vec<f64>],
        target_distributions: &[Vec<f64>],
        chromosome: &Chromosome,
    ) -> EvolutionResult<f64> {
        let mut total = 0.0;
        for (case, (produced, target)) in state_distributions
            .iter()
            .zip(target_distributions.iter())
            .enumerate()
        {
            check_pair_lengths(case, produced, target)?;
            total += jensen_shannon_distance(produced, target);
        }

        let error = total / state_distributions.len().max(1) as f64;
        Ok(apply_validity_penalty(
            error,
            &self.params.validity_checks,
            chromosome,
        ))
    }
}
