//! Multi-case input-encoding gates.
//!
//! An input encoding prepares the register according to the value of the
//! current evaluation case. The per-case sub-programs are built once at
//! spec construction and shared immutably; operands are the full
//! contiguous register and are never resampled.

use std::sync::Arc;

use crate::circuit::CircuitOp;
use crate::circuit::Circuit;
use crate::error::{EvolutionError, EvolutionResult};

/// Shared, immutable per-case programs of an input-encoding gate type.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSpec {
    name: &'static str,
    case_programs: Vec<Vec<CircuitOp>>,
    qubit_num: usize,
}

impl InputSpec {
    /// Binary encoding: an X on every qubit whose input bit is 1.
    pub fn binary(input_values: &[Vec<u8>], qubit_num: usize) -> EvolutionResult<Arc<Self>> {
        let mut case_programs = Vec::with_capacity(input_values.len());
        for (case, values) in input_values.iter().enumerate() {
            let mut ops = Vec::new();
            for (i, bit) in values.iter().enumerate() {
                match bit {
                    0 => {}
                    1 => ops.push(CircuitOp::X(i)),
                    other => {
                        return Err(EvolutionError::InvalidConfiguration {
                            message: format!(
                                "binary input for case {case} holds non-bit value {other} at qubit {i}"
                            ),
                        })
                    }
                }
            }
            case_programs.push(ops);
        }
        Ok(Arc::new(Self {
            name: "x_input",
            case_programs,
            qubit_num,
        }))
    }

    /// RY angle encoding: one RY(theta) per qubit.
    pub fn ry(input_values: &[Vec<f64>], qubit_num: usize) -> Arc<Self> {
        Self::angle_encoding("ry_input", input_values, qubit_num, CircuitOp::Ry)
    }

    /// RZ angle encoding: one RZ(theta) per qubit.
    pub fn rz(input_values: &[Vec<f64>], qubit_num: usize) -> Arc<Self> {
        Self::angle_encoding("rz_input", input_values, qubit_num, CircuitOp::Rz)
    }

    /// Phase encoding: one phase shift per qubit.
    pub fn phase(input_values: &[Vec<f64>], qubit_num: usize) -> Arc<Self> {
        Self::angle_encoding("phase_input", input_values, qubit_num, CircuitOp::Phase)
    }

    fn angle_encoding(
        name: &'static str,
        input_values: &[Vec<f64>],
        qubit_num: usize,
        op: fn(usize, f64) -> CircuitOp,
    ) -> Arc<Self> {
        let case_programs = input_values
            .iter()
            .map(|values| {
                values
                    .iter()
                    .enumerate()
                    .map(|(i, theta)| op(i, *theta))
                    .collect()
            })
            .collect();
        Arc::new(Self {
            name,
            case_programs,
            qubit_num,
        })
    }

    /// Encoding name, e.g. `x_input`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of evaluation cases covered.
    pub fn case_count(&self) -> usize {
        self.case_programs.len()
    }

    /// Qubits the encoding spans.
    pub fn qubit_num(&self) -> usize {
        self.qubit_num
    }

    pub(crate) fn program(&self, case_index: usize) -> &[CircuitOp] {
        &self.case_programs[case_index]
    }
}

/// An input-encoding gene inside a chromosome.
#[derive(Debug, Clone, PartialEq)]
pub struct InputGate {
    spec: Arc<InputSpec>,
    case_index: usize,
}

impl InputGate {
    pub fn new(spec: Arc<InputSpec>) -> Self {
        Self {
            spec,
            case_index: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec.name()
    }

    pub fn set_case_index(&mut self, index: usize) {
        self.case_index = index;
    }

    pub fn apply(&self, circuit: &mut Circuit) {
        circuit.extend_from_slice(self.spec.program(self.case_index));
    }

    pub fn spec(&self) -> &Arc<InputSpec> {
        &self.spec
    }
}
