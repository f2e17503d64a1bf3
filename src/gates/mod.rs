//! Polymorphic gate model.
//!
//! Gates are represented as a closed enum with capability queries rather
//! than open-ended trait objects: every variant a chromosome can hold is
//! known up front, and composites hold child gates recursively. A gate
//! knows how to resample its structural operands, how to append its
//! effect to a [`Circuit`], and how to report a parameter-free type name
//! that is stable across instances.

mod catalog;
mod input;
mod oracle;
#[cfg(test)]
mod tests;

pub use catalog::{GateProto, GateSet};
pub use input::{InputGate, InputSpec};
pub use oracle::{OracleGate, OracleSpec};

use rand::seq::index::sample;
use rand::Rng;
use std::f64::consts::PI;

use crate::circuit::{Circuit, CircuitOp};

/// Single-qubit gate kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleKind {
    H,
    X,
    Y,
    Z,
}

/// Controlled two-qubit gate kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlledKind {
    Ch,
    Cx,
    Cy,
    Cz,
}

/// Doubly controlled three-qubit gate kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoublyControlledKind {
    Ccx,
    Ccz,
}

/// Whole-register layer kinds. Layers act on every qubit and have no
/// mutable operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    H,
    X,
    Y,
    Z,
    Swap,
}

/// Parametrized single-qubit rotation axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationAxis {
    Rx,
    Ry,
    Rz,
    Phase,
}

/// Parametrized controlled rotation axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlledRotationAxis {
    Crx,
    Cry,
    Crz,
}

/// One gene of a chromosome: a primitive or composite operation.
///
/// Equality is structural: two gates compare equal iff their type and
/// current operand/parameter values match.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    /// No-op placeholder, produced by structural simplification.
    Identity,
    Single {
        kind: SingleKind,
        target: usize,
    },
    Controlled {
        kind: ControlledKind,
        control: usize,
        target: usize,
    },
    DoublyControlled {
        kind: DoublyControlledKind,
        control1: usize,
        control2: usize,
        target: usize,
    },
    Swap {
        target1: usize,
        target2: usize,
    },
    Layer {
        kind: LayerKind,
        qubit_num: usize,
    },
    Rotation {
        axis: RotationAxis,
        target: usize,
        theta: f64,
    },
    ControlledRotation {
        axis: ControlledRotationAxis,
        control: usize,
        target: usize,
        theta: f64,
    },
    /// Multi-case black-box sub-program (one per evaluation case).
    Oracle(OracleGate),
    /// Multi-case input encoding (one sub-program per input value).
    Input(InputGate),
    /// Ordered group of child gates acting as one gene.
    Combined(Vec<Gate>),
}

/// Bounds applied to every rotation parameter.
pub const PARAM_BOUNDS: (f64, f64) = (-PI, PI);

/// Draw a rotation angle uniformly from (-pi, pi). Zero is often a
/// stationary point that stalls the numerical optimizer, so fresh gates
/// never start there deterministically.
pub(crate) fn random_theta<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>() * 2.0 * PI - PI
}

impl Gate {
    /// Resample the structural operands of this gate in place.
    ///
    /// Stateless gates (identity, layers) and multi-case gates with
    /// shared contiguous targets are left untouched. Rotation angles are
    /// parameters, not operands, and survive operand mutation.
    pub fn mutate_operands<R: Rng + ?Sized>(&mut self, qubit_num: usize, rng: &mut R) {
        match self {
            Gate::Identity | Gate::Layer { .. } | Gate::Oracle(_) | Gate::Input(_) => {}
            Gate::Single { target, .. } | Gate::Rotation { target, .. } => {
                *target = rng.gen_range(0..qubit_num);
            }
            Gate::Controlled {
                control, target, ..
            }
            | Gate::ControlledRotation {
                control, target, ..
            } => {
                let picks = sample(rng, qubit_num, 2);
                *control = picks.index(0);
                *target = picks.index(1);
            }
            Gate::Swap { target1, target2 } => {
                let picks = sample(rng, qubit_num, 2);
                *target1 = picks.index(0);
                *target2 = picks.index(1);
            }
            Gate::DoublyControlled {
                control1,
                control2,
                target,
                ..
            } => {
                let picks = sample(rng, qubit_num, 3);
                *control1 = picks.index(0);
                *control2 = picks.index(1);
                *target = picks.index(2);
            }
            Gate::Combined(children) => {
                for child in children {
                    child.mutate_operands(qubit_num, rng);
                }
            }
        }
    }

    /// Append this gate's effect to the circuit builder.
    pub fn apply(&self, circuit: &mut Circuit) {
        match self {
            Gate::Identity => {}
            Gate::Single { kind, target } => {
                let op = match kind {
                    SingleKind::H => CircuitOp::H(*target),
                    SingleKind::X => CircuitOp::X(*target),
                    SingleKind::Y => CircuitOp::Y(*target),
                    SingleKind::Z => CircuitOp::Z(*target),
                };
                circuit.push(op);
            }
            Gate::Controlled {
                kind,
                control,
                target,
            } => {
                let op = match kind {
                    ControlledKind::Ch => CircuitOp::Ch(*control, *target),
                    ControlledKind::Cx => CircuitOp::Cx(*control, *target),
                    ControlledKind::Cy => CircuitOp::Cy(*control, *target),
                    ControlledKind::Cz => CircuitOp::Cz(*control, *target),
                };
                circuit.push(op);
            }
            Gate::DoublyControlled {
                kind,
                control1,
                control2,
                target,
            } => {
                let op = match kind {
                    DoublyControlledKind::Ccx => CircuitOp::Ccx(*control1, *control2, *target),
                    DoublyControlledKind::Ccz => CircuitOp::Ccz(*control1, *control2, *target),
                };
                circuit.push(op);
            }
            Gate::Swap { target1, target2 } => {
                circuit.push(CircuitOp::Swap(*target1, *target2));
            }
            Gate::Layer { kind, qubit_num } => match kind {
                LayerKind::H => {
                    for i in 0..*qubit_num {
                        circuit.push(CircuitOp::H(i));
                    }
                }
                LayerKind::X => {
                    for i in 0..*qubit_num {
                        circuit.push(CircuitOp::X(i));
                    }
                }
                LayerKind::Y => {
                    for i in 0..*qubit_num {
                        circuit.push(CircuitOp::Y(i));
                    }
                }
                LayerKind::Z => {
                    for i in 0..*qubit_num {
                        circuit.push(CircuitOp::Z(i));
                    }
                }
                LayerKind::Swap => {
                    for i in 0..qubit_num / 2 {
                        circuit.push(CircuitOp::Swap(i, qubit_num - 1 - i));
                    }
                }
            },
            Gate::Rotation {
                axis,
                target,
                theta,
            } => {
                let op = match axis {
                    RotationAxis::Rx => CircuitOp::Rx(*target, *theta),
                    RotationAxis::Ry => CircuitOp::Ry(*target, *theta),
                    RotationAxis::Rz => CircuitOp::Rz(*target, *theta),
                    RotationAxis::Phase => CircuitOp::Phase(*target, *theta),
                };
                circuit.push(op);
            }
            Gate::ControlledRotation {
                axis,
                control,
                target,
                theta,
            } => {
                let op = match axis {
                    ControlledRotationAxis::Crx => CircuitOp::Crx(*control, *target, *theta),
                    ControlledRotationAxis::Cry => CircuitOp::Cry(*control, *target, *theta),
                    ControlledRotationAxis::Crz => CircuitOp::Crz(*control, *target, *theta),
                };
                circuit.push(op);
            }
            Gate::Oracle(oracle) => oracle.apply(circuit),
            Gate::Input(input) => input.apply(circuit),
            Gate::Combined(children) => {
                for child in children {
                    child.apply(circuit);
                }
            }
        }
    }

    /// Select the sub-program used by `apply` on every multi-case gate
    /// in this gate, recursing into composites.
    pub fn set_case_index(&mut self, index: usize) {
        match self {
            Gate::Oracle(oracle) => oracle.set_case_index(index),
            Gate::Input(input) => input.set_case_index(index),
            Gate::Combined(children) => {
                for child in children {
                    child.set_case_index(index);
                }
            }
            _ => {}
        }
    }

    /// Parameter-free type name, stable across instances.
    ///
    /// Composite names concatenate children's names in order, so
    /// structurally identical composites compare equal regardless of how
    /// they were instantiated.
    pub fn type_name(&self) -> String {
        match self {
            Gate::Identity => "identity".to_string(),
            Gate::Single { kind, .. } => match kind {
                SingleKind::H => "h",
                SingleKind::X => "x",
                SingleKind::Y => "y",
                SingleKind::Z => "z",
            }
            .to_string(),
            Gate::Controlled { kind, .. } => match kind {
                ControlledKind::Ch => "ch",
                ControlledKind::Cx => "cx",
                ControlledKind::Cy => "cy",
                ControlledKind::Cz => "cz",
            }
            .to_string(),
            Gate::DoublyControlled { kind, .. } => match kind {
                DoublyControlledKind::Ccx => "ccx",
                DoublyControlledKind::Ccz => "ccz",
            }
            .to_string(),
            Gate::Swap { .. } => "swap".to_string(),
            Gate::Layer { kind, .. } => match kind {
                LayerKind::H => "h_layer",
                LayerKind::X => "x_layer",
                LayerKind::Y => "y_layer",
                LayerKind::Z => "z_layer",
                LayerKind::Swap => "swap_layer",
            }
            .to_string(),
            Gate::Rotation { axis, .. } => match axis {
                RotationAxis::Rx => "rx",
                RotationAxis::Ry => "ry",
                RotationAxis::Rz => "rz",
                RotationAxis::Phase => "phase_shift",
            }
            .to_string(),
            Gate::ControlledRotation { axis, .. } => match axis {
                ControlledRotationAxis::Crx => "crx",
                ControlledRotationAxis::Cry => "cry",
                ControlledRotationAxis::Crz => "crz",
            }
            .to_string(),
            Gate::Oracle(_) => "oracle".to_string(),
            Gate::Input(input) => input.name().to_string(),
            Gate::Combined(children) => children
                .iter()
                .map(|g| g.type_name())
                .collect::<Vec<_>>()
                .join("_"),
        }
    }

    /// Number of primitive gates this gene contributes to a circuit.
    /// Used as a size-minimizing tie-breaker between perfect scorers.
    pub fn gate_count(&self) -> usize {
        match self {
            Gate::Identity => 0,
            Gate::Layer { kind, qubit_num } => match kind {
                LayerKind::Swap => qubit_num / 2,
                _ => *qubit_num,
            },
            Gate::Combined(children) => children.iter().map(|g| g.gate_count()).sum(),
            _ => 1,
        }
    }

    /// Whether this gate carries continuous parameters.
    pub fn is_parametrized(&self) -> bool {
        match self {
            Gate::Rotation { .. } | Gate::ControlledRotation { .. } => true,
            Gate::Combined(children) => children.iter().any(|g| g.is_parametrized()),
            _ => false,
        }
    }

    /// Whether this gate selects a sub-program per evaluation case.
    pub fn is_multicase(&self) -> bool {
        match self {
            Gate::Oracle(_) | Gate::Input(_) => true,
            Gate::Combined(children) => children.iter().any(|g| g.is_multicase()),
            _ => false,
        }
    }

    /// Evaluation cases the multi-case sub-programs of this gate cover,
    /// taking the minimum over composite children. `None` for gates
    /// that do not depend on the case index.
    pub fn case_count(&self) -> Option<usize> {
        match self {
            Gate::Oracle(oracle) => Some(oracle.spec().case_count()),
            Gate::Input(input) => Some(input.spec().case_count()),
            Gate::Combined(children) => children.iter().filter_map(|g| g.case_count()).min(),
            _ => None,
        }
    }

    /// Whether this gate is a composite of child gates.
    pub fn is_composite(&self) -> bool {
        matches!(self, Gate::Combined(_))
    }

    /// Whether operand mutation can change this gate.
    pub fn has_mutable_operands(&self) -> bool {
        match self {
            Gate::Identity | Gate::Layer { .. } | Gate::Oracle(_) | Gate::Input(_) => false,
            Gate::Combined(children) => children.iter().any(|g| g.has_mutable_operands()),
            _ => true,
        }
    }

    /// Whether this gate is an oracle or contains one.
    pub fn contains_oracle(&self) -> bool {
        match self {
            Gate::Oracle(_) => true,
            Gate::Combined(children) => children.iter().any(|g| g.contains_oracle()),
            _ => false,
        }
    }

    /// Whether this gate is an input encoding or contains one.
    pub fn contains_input(&self) -> bool {
        match self {
            Gate::Input(_) => true,
            Gate::Combined(children) => children.iter().any(|g| g.contains_input()),
            _ => false,
        }
    }

    /// Current parameter vector, children concatenated in order.
    pub fn params(&self) -> Vec<f64> {
        match self {
            Gate::Rotation { theta, .. } | Gate::ControlledRotation { theta, .. } => vec![*theta],
            Gate::Combined(children) => children.iter().flat_map(|g| g.params()).collect(),
            _ => Vec::new(),
        }
    }

    /// Closed box bounds, one pair per parameter.
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        match self {
            Gate::Rotation { .. } | Gate::ControlledRotation { .. } => vec![PARAM_BOUNDS],
            Gate::Combined(children) => children.iter().flat_map(|g| g.bounds()).collect(),
            _ => Vec::new(),
        }
    }

    /// Number of continuous parameters.
    pub fn param_count(&self) -> usize {
        match self {
            Gate::Rotation { .. } | Gate::ControlledRotation { .. } => 1,
            Gate::Combined(children) => children.iter().map(|g| g.param_count()).sum(),
            _ => 0,
        }
    }

    /// Install a parameter vector. `params` must hold exactly
    /// `param_count()` values, children consume their slice in order.
    pub fn set_params(&mut self, params: &[f64]) {
        debug_assert_eq!(params.len(), self.param_count());
        match self {
            Gate::Rotation { theta, .. } | Gate::ControlledRotation { theta, .. } => {
                if let Some(value) = params.first() {
                    *theta = *value;
                }
            }
            Gate::Combined(children) => {
                let mut rest = params;
                for child in children {
                    let count = child.param_count();
                    let (head, tail) = rest.split_at(count);
                    child.set_params(head);
                    rest = tail;
                }
            }
            _ => {}
        }
    }
}
