//! Threshold/match-count fitness.

use crate::chromosome::Chromosome;
use crate::error::EvolutionResult;
use crate::fitness::{
    apply_validity_penalty, check_pair_lengths, match_index, FitnessFunction, FitnessParams,
};

/// Probability the correct answer must exceed for a case to count as a
/// hit.
const HIT_THRESHOLD: f64 = 0.5;

/// Fraction of missed cases: `(case_count - hits) / case_count`. A case
/// is a hit when the produced probability at the target's one-hot index
/// exceeds 0.5.
#[derive(Debug, Clone, Default)]
pub struct MatchCountFitness {
    params: FitnessParams,
}

impl MatchCountFitness {
    pub fn new(params: FitnessParams) -> Self {
        Self { params }
    }
}

impl FitnessFunction for MatchCountFitness {
    fn evaluate(
        &self,
        state_distributions: &[Vec<f64>],
        target_distributions: &[Vec<f64>],
        chromosome: &Chromosome,
    ) -> EvolutionResult<f64> {
        let case_count = target_distributions.len();
        let mut hits = 0usize;

        for (case, (produced, target)) in state_distributions
            .iter()
            .zip(target_distributions.iter())
            .enumerate()
        {
            check_pair_lengths(case, produced, target)?;
            let index = match_index(case, target)?;
            if produced[index] > HIT_THRESHOLD {
                hits += 1;
            }
        }

        let error = (case_count - hits) as f64 / case_count.max(1) as f64;
        Ok(apply_validity_penalty(
            error,
            &self.params.validity_checks,
            chromosome,
        ))
    }
}
