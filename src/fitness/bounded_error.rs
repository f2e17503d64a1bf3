//! Hits-with-residual-error hybrid fitness.

use crate::chromosome::Chromosome;
use crate::error::EvolutionResult;
use crate::fitness::{
    apply_validity_penalty, check_pair_lengths, jensen_shannon_distance, match_index,
    FitnessFunction, FitnessParams,
};

/// Classical bounded-error acceptance threshold (BPP-style 2/3).
pub(crate) const SUCCESS_THRESHOLD: f64 = 2.0 / 3.0;

/// Divisor turning the gate count into a tiny tie-break between perfect
/// scorers.
pub(crate) const SIZE_TIE_BREAK_SCALE: f64 = 100_000.0;

/// Hybrid strategy: cases whose correctness probability reaches the
/// bounded-error threshold drop out of error accounting; the remaining
/// cases each contribute a Jensen-Shannon error. With any errors left
/// the score is `hits + sum(errors) / max(hits, 1)`; otherwise a tiny
/// structural-size term prefers smaller circuits among perfect scorers.
#[derive(Debug, Clone, Default)]
pub struct BoundedErrorFitness {
    params: FitnessParams,
}

impl BoundedErrorFitness {
    pub fn new(params: FitnessParams) -> Self {
        Self { params }
    }
}

/// Shared hits/errors accumulation, also used by the constrained
/// variant.
pub(crate) fn hits_and_errors(
    state_distributions: &[Vec<f64>],
    target_distributions: &[Vec<f64>],
) -> EvolutionResult<(usize, Vec<f64>)> {
    let mut hits = target_distributions.len();
    let mut errors = Vec::new();

    for (case, (produced, target)) in state_distributions
        .iter()
        .zip(target_distributions.iter())
        .enumerate()
    {
        check_pair_lengths(case, produced, target)?;
        let index = match_index(case, target)?;
        if produced[index] >= SUCCESS_THRESHOLD {
            hits -= 1;
        } else {
            errors.push(jensen_shannon_distance(produced, target));
        }
    }
    Ok((hits, errors))
}

pub(crate) fn score_from_hits(hits: usize, errors: &[f64], chromosome: &Chromosome) -> f64 {
    if errors.is_empty() {
        chromosome.gate_count() as f64 / SIZE_TIE_BREAK_SCALE
    } else {
        hits as f64 + errors.iter().sum::<f64>() / hits.max(1) as f64
    }
}

impl FitnessFunction for BoundedErrorFitness {
    fn evaluate(
        &self,
        state_distributions: &[Vec<f64>],
        target_distributions: &[Vec<f64>],
        chromosome: &Chromosome,
    ) -> EvolutionResult<f64> {
        let (hits, errors) = hits_and_errors(state_distributions, target_distributions)?;
        let score = score_from_hits(hits, &errors, chromosome);
        Ok(apply_validity_penalty(
            score,
            &self.params.validity_checks,
            chromosome,
        ))
    }
}
