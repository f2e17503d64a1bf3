//! Pass-through optimizer: simulate, score, done.

use std::sync::Arc;

use crate::chromosome::Chromosome;
use crate::error::EvolutionResult;
use crate::fitness::FitnessFunction;
use crate::optimizer::{evaluate_once, Optimizer, OptimizerParams};
use crate::sim::Simulator;

pub struct PassThroughOptimizer {
    simulator: Arc<dyn Simulator>,
    target_distributions: Vec<Vec<f64>>,
    params: OptimizerParams,
}

impl PassThroughOptimizer {
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

impl Optimizer for PassThroughOptimizer {
    fn optimize(
        &self,
        mut chromosome: Chromosome,
        fitness: &dyn FitnessFunction,
    ) -> EvolutionResult<(Chromosome, f64)> {
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
