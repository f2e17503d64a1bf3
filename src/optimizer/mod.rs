//! Optimizer layer.
//!
//! An [`Optimizer`] wraps a [`FitnessFunction`]: it runs the chromosome
//! through the simulator once per evaluation case, optionally performing
//! structural simplification or a nested continuous-parameter search
//! first, and returns the chromosome with its best score installed. The
//! optimizer owns the target distributions and the simulator handle.

mod nelder_mead;
mod numerical;
mod pass_through;
mod simplify;

pub use numerical::NumericalOptimizer;
pub use pass_through::PassThroughOptimizer;
pub use simplify::RedundancyRemovalOptimizer;

use serde::{Deserialize, Serialize};

use crate::chromosome::Chromosome;
use crate::circuit::Circuit;
use crate::error::{EvolutionError, EvolutionResult};
use crate::fitness::FitnessFunction;
use crate::sim::{aggregate_distribution, Simulator, SimulatorError};

/// Expansion depth handed to the simulator on the first attempt.
const INITIAL_EXPANSION_DEPTH: usize = 5;

/// Retry budget for transient simulator failures on one case.
const MAX_SIM_RETRIES: usize = 10;

/// Configuration shared by all optimizer variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerParams {
    /// Total register size circuits are built over.
    pub qubit_num: usize,
    /// Leading qubits that are measured; the rest are ancillary and
    /// summed out of every produced distribution.
    pub measurement_qubit_num: usize,
    /// Convergence tolerance of the numerical parameter search; values
    /// `<= 0` select the solver default.
    pub tolerance: f64,
    /// Iteration cap of the numerical parameter search.
    pub max_iter: usize,
}

impl Default for OptimizerParams {
    fn default() -> Self {
        Self {
            qubit_num: 2,
            measurement_qubit_num: 2,
            tolerance: 0.0,
            max_iter: 10,
        }
    }
}

impl OptimizerParams {
    pub fn validate(&self) -> EvolutionResult<()> {
        if self.qubit_num == 0 {
            return Err(EvolutionError::InvalidConfiguration {
                message: "qubit_num must be greater than 0".to_string(),
            });
        }
        if self.measurement_qubit_num == 0 || self.measurement_qubit_num > self.qubit_num {
            return Err(EvolutionError::InvalidConfiguration {
                message: format!(
                    "measurement_qubit_num must lie in 1..={}, got {}",
                    self.qubit_num, self.measurement_qubit_num
                ),
            });
        }
        Ok(())
    }
}

/// Evaluates one chromosome, possibly tuning it first, and returns it
/// with the best-found score.
pub trait Optimizer: Send + Sync {
    fn optimize(
        &self,
        chromosome: Chromosome,
        fitness: &dyn FitnessFunction,
    ) -> EvolutionResult<(Chromosome, f64)>;
}

/// Execute one circuit, retrying transient failures with a growing
/// expansion depth. Retries stay silent at debug level unless the
/// budget runs out.
pub(crate) fn run_case(
    simulator: &dyn Simulator,
    circuit: &Circuit,
    case: usize,
) -> EvolutionResult<Vec<f64>> {
    let mut last_message = String::new();
    for attempt in 0..MAX_SIM_RETRIES {
        let depth = INITIAL_EXPANSION_DEPTH + attempt;
        match simulator.run(circuit, depth) {
            Ok(distribution) => return Ok(distribution),
            Err(SimulatorError::Transient { message }) => {
                tracing::debug!(
                    case,
                    attempt,
                    depth,
                    message = %message,
                    "transient simulator failure, retrying"
                );
                last_message = message;
            }
            Err(fatal @ SimulatorError::Fatal { .. }) => return Err(fatal.into()),
        }
    }
    Err(EvolutionError::RetriesExhausted {
        case,
        retries: MAX_SIM_RETRIES,
        message: last_message,
    })
}

/// Produce one aggregated distribution per evaluation case.
///
/// Every multi-case gene must cover at least `case_count` cases; a gene
/// with a shorter case table is a wiring bug and aborts the run.
pub(crate) fn state_distributions(
    simulator: &dyn Simulator,
    chromosome: &mut Chromosome,
    params: &OptimizerParams,
    case_count: usize,
) -> EvolutionResult<Vec<Vec<f64>>> {
    for gene in chromosome.genes() {
        if let Some(available) = gene.case_count() {
            if available < case_count {
                return Err(EvolutionError::CaseOutOfRange {
                    gate: gene.type_name(),
                    requested: case_count,
                    available,
                });
            }
        }
    }
    let ancillary_num = params.qubit_num - params.measurement_qubit_num;
    let mut distributions = Vec::with_capacity(case_count);
    for case in 0..case_count {
        let circuit = chromosome.build_circuit(params.qubit_num, case);
        let raw = run_case(simulator, &circuit, case)?;
        distributions.push(aggregate_distribution(
            &raw,
            params.measurement_qubit_num,
            ancillary_num,
        ));
    }
    Ok(distributions)
}

/// One simulate-and-score pass shared by the optimizer variants.
pub(crate) fn evaluate_once(
    simulator: &dyn Simulator,
    chromosome: &mut Chromosome,
    fitness: &dyn FitnessFunction,
    target_distributions: &[Vec<f64>],
    params: &OptimizerParams,
) -> EvolutionResult<f64> {
    let produced = state_distributions(simulator, chromosome, params, target_distributions.len())?;
    fitness.evaluate(&produced, target_distributions, chromosome)
}
