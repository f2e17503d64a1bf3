//! Structural simplification before scoring.

use std::sync::Arc;

use crate::chromosome::Chromosome;
use crate::error::EvolutionResult;
use crate::fitness::FitnessFunction;
use crate::gates::Gate;
use crate::optimizer::{evaluate_once, Optimizer, OptimizerParams};
use crate::sim::Simulator;

/// Replaces adjacent structurally equal, non-identity gate pairs with
/// identities before evaluation. Deliberately a single left-to-right
/// pass, not iterated to a fixed point: a pair only revealed by an
/// earlier replacement survives until a later generation simplifies it.
pub struct RedundancyRemovalOptimizer {
    simulator: Arc<dyn Simulator>,
    target_distributions: Vec<Vec<f64>>,
    params: OptimizerParams,
}

impl RedundancyRemovalOptimizer {
    pub fn new(
        simulator: Arc<dyn Simulator>,
        target_distributions: Vec<Vec<f64>>,
        params: OptimizerParams,
    ) -> EvolutionResult<Self> {
        params.validate()?;
        Ok(Self {
            simulator,
            target_distributions,
            params,
        })
    }
}

pub(crate) fn remove_adjacent_duplicates(chromosome: &mut Chromosome) {
    for i in 0..chromosome.len().saturating_sub(1) {
        let genes = chromosome.genes();
        if genes[i] != Gate::Identity && genes[i] == genes[i + 1] {
            chromosome.replace_gene(i, Gate::Identity);
            chromosome.replace_gene(i + 1, Gate::Identity);
        }
    }
}

impl Optimizer for RedundancyRemovalOptimizer {
    fn optimize(
        &self,
        mut chromosome: Chromosome,
        fitness: &dyn FitnessFunction,
    ) -> EvolutionResult<(Chromosome, f64)> {
        remove_adjacent_duplicates(&mut chromosome);
        let score = evaluate_once(
            self.simulator.as_ref(),
            &mut chromosome,
            fitness,
            &self.target_distributions,
            &self.params,
        )?;
        chromosome.set_fitness(score);
        Ok((chromosome, score))
    }
}
