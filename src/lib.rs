//! Evolutionary search for quantum gate sequences.
//!
//! The engine evolves fixed-length sequences of gates (chromosomes)
//! until the measured output distributions of the resulting circuits
//! match a set of target distributions, one per evaluation case.
//! Execution is delegated to a [`sim::Simulator`]; a reference
//! statevector implementation is included. Fitness strategies compare
//! produced and target distributions, the optimizer layer optionally
//! simplifies circuits or tunes continuous gate parameters, and the
//! [`ga::Ga`] driver runs the generational loop. Generation callbacks
//! can grow the gate catalog mid-run, see [`adaptive`].

pub mod adaptive;
pub mod chromosome;
pub mod circuit;
pub mod config;
pub mod error;
pub mod fitness;
pub mod ga;
pub mod gates;
pub mod metrics;
pub mod optimizer;
pub mod sim;

pub use chromosome::Chromosome;
pub use circuit::{Circuit, CircuitOp};
pub use config::GaParams;
pub use error::{EvolutionError, EvolutionResult};
pub use fitness::{
    BoundedErrorFitness, ConstrainedBoundedErrorFitness, FitnessFunction, FitnessParams,
    JensenShannonFitness, MatchCountFitness,
};
pub use ga::{Ga, GaContext, GenerationCallback, RunState};
pub use gates::{Gate, GateProto, GateSet};
pub use metrics::GaMetrics;
pub use optimizer::{
    NumericalOptimizer, Optimizer, OptimizerParams, PassThroughOptimizer,
    RedundancyRemovalOptimizer,
};
pub use sim::{state_to_distribution, Simulator, SimulatorError, StatevectorSimulator};
