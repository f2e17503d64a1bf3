//! Multi-case oracle gates.
//!
//! An oracle carries one pre-built sub-program per evaluation case
//! (one per oracle instance the chromosome is judged against). The case
//! tables are built once, shared immutably between workers, and never
//! mutated after construction.

use std::sync::Arc;

use crate::circuit::{Circuit, CircuitOp};

/// Shared, immutable per-case sub-programs of an oracle gate type.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleSpec {
    case_programs: Vec<Arc<Vec<CircuitOp>>>,
    oracle_qubit_num: usize,
}

impl OracleSpec {
    /// Build a spec from one circuit per evaluation case. All circuits
    /// must span the same qubit count, which becomes the oracle arity.
    pub fn new(case_circuits: Vec<Circuit>) -> Self {
        let oracle_qubit_num = case_circuits.first().map_or(0, |c| c.qubit_num());
        let case_programs = case_circuits
            .into_iter()
            .map(|c| Arc::new(c.ops().to_vec()))
            .collect();
        Self {
            case_programs,
            oracle_qubit_num,
        }
    }

    /// Number of qubits the oracle sub-programs span.
    pub fn oracle_qubit_num(&self) -> usize {
        self.oracle_qubit_num
    }

    /// Number of evaluation cases covered.
    pub fn case_count(&self) -> usize {
        self.case_programs.len()
    }

    pub(crate) fn program(&self, case_index: usize) -> &Arc<Vec<CircuitOp>> {
        &self.case_programs[case_index]
    }
}

/// An oracle gene inside a chromosome.
///
/// Targets span the contiguous range `0..oracle_qubit_num` and are not
/// resampled on mutation; the oracle's identity lies entirely in its
/// case table.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleGate {
    spec: Arc<OracleSpec>,
    targets: Vec<usize>,
    case_index: usize,
}

impl OracleGate {
    pub fn new(spec: Arc<OracleSpec>) -> Self {
        let targets = (0..spec.oracle_qubit_num()).collect();
        Self {
            spec,
            targets,
            case_index: 0,
        }
    }

    /// Qubits the oracle sub-program is applied over.
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    pub fn set_case_index(&mut self, index: usize) {
        self.case_index = index;
    }

    pub fn apply(&self, circuit: &mut Circuit) {
        circuit.push(CircuitOp::Sub {
            ops: Arc::clone(self.spec.program(self.case_index)),
            targets: self.targets.clone(),
        });
    }

    pub fn spec(&self) -> &Arc<OracleSpec> {
        &self.spec
    }
}
