//! Circuit builder that gates append their effect to.
//!
//! A [`Circuit`] is an ordered list of [`CircuitOp`]s over a fixed qubit
//! count. It carries no simulation logic; backends consume the op list.
//! Qubit 0 is the most significant bit of a basis-state index.

use std::sync::Arc;

/// One primitive operation in a circuit.
///
/// Rotation angles are in radians. `Sub` applies a pre-built sub-program
/// over a list of target qubits: index `i` inside the sub-program maps to
/// `targets[i]` in the enclosing circuit.
#[derive(Debug, Clone, PartialEq)]
pub enum CircuitOp {
    H(usize),
    X(usize),
    Y(usize),
    Z(usize),
    Swap(usize, usize),
    /// Controlled Hadamard: (control, target).
    Ch(usize, usize),
    Cx(usize, usize),
    Cy(usize, usize),
    Cz(usize, usize),
    /// Toffoli: (control1, control2, target).
    Ccx(usize, usize, usize),
    Ccz(usize, usize, usize),
    Rx(usize, f64),
    Ry(usize, f64),
    Rz(usize, f64),
    /// Phase shift diag(1, e^{i theta}).
    Phase(usize, f64),
    Crx(usize, usize, f64),
    Cry(usize, usize, f64),
    Crz(usize, usize, f64),
    /// Opaque sub-program applied over `targets`.
    Sub {
        ops: Arc<Vec<CircuitOp>>,
        targets: Vec<usize>,
    },
}

/// A quantum circuit under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    qubit_num: usize,
    ops: Vec<CircuitOp>,
}

impl Circuit {
    /// Create an empty circuit over `qubit_num` qubits.
    pub fn new(qubit_num: usize) -> Self {
        Self {
            qubit_num,
            ops: Vec::new(),
        }
    }

    /// Append an operation.
    pub fn push(&mut self, op: CircuitOp) {
        self.ops.push(op);
    }

    /// Append every operation of a slice in order.
    pub fn extend_from_slice(&mut self, ops: &[CircuitOp]) {
        self.ops.extend_from_slice(ops);
    }

    /// Operations in application order.
    pub fn ops(&self) -> &[CircuitOp] {
        &self.ops
    }

    /// Number of qubits the circuit operates on.
    pub fn qubit_num(&self) -> usize {
        self.qubit_num
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circuit_collects_ops_in_order() {
        let mut circuit = Circuit::new(2);
        circuit.push(CircuitOp::H(0));
        circuit.push(CircuitOp::Cx(0, 1));

        assert_eq!(circuit.qubit_num(), 2);
        assert_eq!(circuit.ops(), &[CircuitOp::H(0), CircuitOp::Cx(0, 1)]);
    }

    #[test]
    fn test_sub_op_equality_is_structural() {
        let ops = Arc::new(vec![CircuitOp::X(0)]);
        let a = CircuitOp::Sub {
            ops: ops.clone(),
            targets: vec![1],
        };
        let b = CircuitOp::Sub {
            ops: Arc::new(vec![CircuitOp::X(0)]),
            targets: vec![1],
        };
        assert_eq!(a, b);
    }
}
