//! External simulator collaborator interface.
//!
//! The search engine never simulates circuits itself; it hands a built
//! [`Circuit`] to a [`Simulator`] and receives a probability vector of
//! length `2^qubit_num` back. A reference statevector backend lives in
//! [`statevector`] so the crate is runnable out of the box, but any
//! backend honoring the contract plugs in.

mod statevector;

pub use statevector::StatevectorSimulator;

use thiserror::Error;

use crate::circuit::Circuit;

/// Failures a backend may report for one (circuit, case) execution.
#[derive(Error, Debug, Clone)]
pub enum SimulatorError {
    /// Retryable execution failure; the evaluation pipeline retries with
    /// a deeper circuit expansion a bounded number of times.
    #[error("transient execution failure: {message}")]
    Transient { message: String },

    /// Unsupported construct or broken wiring; not retryable.
    #[error("fatal simulator failure: {message}")]
    Fatal { message: String },
}

/// A synchronous, blocking circuit executor.
///
/// `expansion_depth` hints how aggressively composite sub-programs
/// should be lowered before execution; backends without a lowering stage
/// may ignore it. The returned vector holds one probability per basis
/// state, qubit 0 being the most significant index bit.
pub trait Simulator: Send + Sync {
    fn run(&self, circuit: &Circuit, expansion_depth: usize) -> Result<Vec<f64>, SimulatorError>;
}

/// Sum ancillary-qubit probabilities out of a raw distribution.
///
/// Ancillary qubits are assumed ordered after the measured qubits, i.e.
/// they occupy the least significant index bits.
pub fn aggregate_distribution(
    state_distribution: &[f64],
    measurement_qubit_num: usize,
    ancillary_num: usize,
) -> Vec<f64> {
    let measured_states = 1 << measurement_qubit_num;
    let ancilla_states = 1 << ancillary_num;

    let mut aggregated = vec![0.0; measured_states];
    for (i, slot) in aggregated.iter_mut().enumerate() {
        for j in 0..ancilla_states {
            *slot += state_distribution[i * ancilla_states + j];
        }
    }
    aggregated
}

/// Turn a computational-basis state (one bit per qubit) into the
/// corresponding one-hot probability vector, qubit 0 most significant.
pub fn state_to_distribution(target_state: &[u8]) -> Vec<f64> {
    let mut index = 0usize;
    for bit in target_state {
        index = (index << 1) | (*bit as usize & 1);
    }
    let mut distribution = vec![0.0; 1 << target_state.len()];
    distribution[index] = 1.0;
    distribution
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_sums_ancilla_pairs() {
        let raw = [0.1, 0.1, 0.2, 0.2, 0.1, 0.1, 0.1, 0.1];
        let aggregated = aggregate_distribution(&raw, 2, 1);
        let expected = [0.2, 0.4, 0.2, 0.2];
        for (got, want) in aggregated.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_aggregate_without_ancillas_is_identity() {
        let raw = [0.25, 0.25, 0.25, 0.25];
        assert_eq!(aggregate_distribution(&raw, 2, 0), raw.to_vec());
    }

    #[test]
    fn test_state_to_distribution_one_hot() {
        let distribution = state_to_distribution(&[1, 0]);
        assert_eq!(distribution, vec![0.0, 0.0, 1.0, 0.0]);
        assert_eq!(state_to_distribution(&[1, 1]), vec![0.0, 0.0, 0.0, 1.0]);
    }
}
