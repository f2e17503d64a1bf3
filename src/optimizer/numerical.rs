//! Nested continuous-parameter search.

use std::sync::Arc;

use crate::chromosome::Chromosome;
use crate::error::EvolutionResult;
use crate::fitness::FitnessFunction;
use crate::optimizer::nelder_mead;
use crate::optimizer::{evaluate_once, Optimizer, OptimizerParams};
use crate::sim::Simulator;

/// Tunes the concatenated parameter vector of all parametrized gates
/// with a bounded Nelder-Mead search before scoring. Chromosomes
/// without parametrized gates fall back to a single evaluation.
///
/// The trial objective installs each candidate vector into the owned
/// chromosome in place; the chromosome handed back carries the
/// best-found parameters.
pub struct NumericalOptimizer {
    simulator: Arc<dyn Simulator>,
    target_distributions: Vec<Vec<f64>>,
    params: OptimizerParams,
}

impl NumericalOptimizer {
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

impl Optimizer for NumericalOptimizer {
    fn optimize(
        &self,
        mut chromosome: Chromosome,
        fitness: &dyn FitnessFunction,
    ) -> EvolutionResult<(Chromosome, f64)> {
        if !chromosome.has_parametrized_gates() {
            let score = evaluate_once(
                self.simulator.as_ref(),
                &mut chromosome,
                fitness,
                &self.target_distributions,
                &self.params,
            )?;
            chromosome.set_fitness(score);
            return Ok((chromosome, score));
        }

        let initial = chromosome.param_vector();
        let bounds = chromosome.param_bounds();
        let simulator = self.simulator.as_ref();

        let result = nelder_mead::minimize(
            |trial| {
                chromosome.set_param_vector(trial);
                evaluate_once(
                    simulator,
                    &mut chromosome,
                    fitness,
                    &self.target_distributions,
                    &self.params,
                )
            },
            &initial,
            &bounds,
            self.params.tolerance,
            self.params.max_iter,
        )?;

        tracing::debug!(
            iterations = result.iterations,
            fitness = result.fun,
            "parameter search finished"
        );
        chromosome.set_param_vector(&result.x);
        chromosome.set_fitness(result.fun);
        Ok((chromosome, result.fun))
    }
}
