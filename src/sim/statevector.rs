//! Dense statevector backend.
//!
//! Reference implementation of the [`Simulator`] contract: exact
//! amplitude evolution over `2^qubit_num` complex entries. Sub-programs
//! are inlined by remapping their qubit indices, so the expansion-depth
//! hint is not needed here.

use num_complex::Complex64;

use crate::circuit::{Circuit, CircuitOp};
use crate::sim::{Simulator, SimulatorError};

type Matrix2 = [[Complex64; 2]; 2];

/// Exact dense statevector simulator. Stateless and shareable between
/// worker threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatevectorSimulator;

impl StatevectorSimulator {
    pub fn new() -> Self {
        Self
    }
}

impl Simulator for StatevectorSimulator {
    fn run(&self, circuit: &Circuit, _expansion_depth: usize) -> Result<Vec<f64>, SimulatorError> {
        let qubit_num = circuit.qubit_num();
        let dim = 1usize << qubit_num;

        let mut state = vec![Complex64::new(0.0, 0.0); dim];
        state[0] = Complex64::new(1.0, 0.0);

        for op in circuit.ops() {
            apply_op(&mut state, qubit_num, op)?;
        }

        Ok(state.iter().map(|amp| amp.norm_sqr()).collect())
    }
}

fn check_qubit(qubit: usize, qubit_num: usize) -> Result<(), SimulatorError> {
    if qubit >= qubit_num {
        return Err(SimulatorError::Fatal {
            message: format!("qubit index {qubit} out of range for {qubit_num} qubits"),
        });
    }
    Ok(())
}

/// Bit mask of a qubit inside a basis-state index; qubit 0 is the most
/// significant bit.
fn qubit_mask(qubit: usize, qubit_num: usize) -> usize {
    1 << (qubit_num - 1 - qubit)
}

fn apply_op(
    state: &mut [Complex64],
    qubit_num: usize,
    op: &CircuitOp,
) -> Result<(), SimulatorError> {
    match op {
        CircuitOp::H(t) => apply_single(state, qubit_num, *t, h_matrix()),
        CircuitOp::X(t) => apply_single(state, qubit_num, *t, x_matrix()),
        CircuitOp::Y(t) => apply_single(state, qubit_num, *t, y_matrix()),
        CircuitOp::Z(t) => apply_single(state, qubit_num, *t, z_matrix()),
        CircuitOp::Rx(t, theta) => apply_single(state, qubit_num, *t, rx_matrix(*theta)),
        CircuitOp::Ry(t, theta) => apply_single(state, qubit_num, *t, ry_matrix(*theta)),
        CircuitOp::Rz(t, theta) => apply_single(state, qubit_num, *t, rz_matrix(*theta)),
        CircuitOp::Phase(t, theta) => apply_single(state, qubit_num, *t, phase_matrix(*theta)),
        CircuitOp::Swap(a, b) => apply_swap(state, qubit_num, *a, *b),
        CircuitOp::Ch(c, t) => apply_controlled(state, qubit_num, &[*c], *t, h_matrix()),
        CircuitOp::Cx(c, t) => apply_controlled(state, qubit_num, &[*c], *t, x_matrix()),
        CircuitOp::Cy(c, t) => apply_controlled(state, qubit_num, &[*c], *t, y_matrix()),
        CircuitOp::Cz(c, t) => apply_controlled(state, qubit_num, &[*c], *t, z_matrix()),
        CircuitOp::Ccx(c1, c2, t) => apply_controlled(state, qubit_num, &[*c1, *c2], *t, x_matrix()),
        CircuitOp::Ccz(c1, c2, t) => apply_controlled(state, qubit_num, &[*c1, *c2], *t, z_matrix()),
        CircuitOp::Crx(c, t, theta) => {
            apply_controlled(state, qubit_num, &[*c], *t, rx_matrix(*theta))
        }
        CircuitOp::Cry(c, t, theta) => {
            apply_controlled(state, qubit_num, &[*c], *t, ry_matrix(*theta))
        }
        CircuitOp::Crz(c, t, theta) => {
            apply_controlled(state, qubit_num, &[*c], *t, rz_matrix(*theta))
        }
        CircuitOp::Sub { ops, targets } => {
            for sub_op in ops.iter() {
                let remapped = remap_op(sub_op, targets)?;
                apply_op(state, qubit_num, &remapped)?;
            }
            Ok(())
        }
    }
}

/// Rewrite a sub-program op so its local qubit indices point at the
/// enclosing circuit's target qubits.
fn remap_op(op: &CircuitOp, targets: &[usize]) -> Result<CircuitOp, SimulatorError> {
    let map = |q: usize| -> Result<usize, SimulatorError> {
        targets.get(q).copied().ok_or_else(|| SimulatorError::Fatal {
            message: format!(
                "sub-program references local qubit {q} but only {} targets are bound",
                targets.len()
            ),
        })
    };

    Ok(match op {
        CircuitOp::H(t) => CircuitOp::H(map(*t)?),
        CircuitOp::X(t) => CircuitOp::X(map(*t)?),
        CircuitOp::Y(t) => CircuitOp::Y(map(*t)?),
        CircuitOp::Z(t) => CircuitOp::Z(map(*t)?),
        CircuitOp::Swap(a, b) => CircuitOp::Swap(map(*a)?, map(*b)?),
        CircuitOp::Ch(c, t) => CircuitOp::Ch(map(*c)?, map(*t)?),
        CircuitOp::Cx(c, t) => CircuitOp::Cx(map(*c)?, map(*t)?),
        CircuitOp::Cy(c, t) => CircuitOp::Cy(map(*c)?, map(*t)?),
        CircuitOp::Cz(c, t) => CircuitOp::Cz(map(*c)?, map(*t)?),
        CircuitOp::Ccx(c1, c2, t) => CircuitOp::Ccx(map(*c1)?, map(*c2)?, map(*t)?),
        CircuitOp::Ccz(c1, c2, t) => CircuitOp::Ccz(map(*c1)?, map(*c2)?, map(*t)?),
        CircuitOp::Rx(t, theta) => CircuitOp::Rx(map(*t)?, *theta),
        CircuitOp::Ry(t, theta) => CircuitOp::Ry(map(*t)?, *theta),
        CircuitOp::Rz(t, theta) => CircuitOp::Rz(map(*t)?, *theta),
        CircuitOp::Phase(t, theta) => CircuitOp::Phase(map(*t)?, *theta),
        CircuitOp::Crx(c, t, theta) => CircuitOp::Crx(map(*c)?, map(*t)?, *theta),
        CircuitOp::Cry(c, t, theta) => CircuitOp::Cry(map(*c)?, map(*t)?, *theta),
        CircuitOp::Crz(c, t, theta) => CircuitOp::Crz(map(*c)?, map(*t)?, *theta),
        CircuitOp::Sub {
            ops,
            targets: inner_targets,
        } => {
            let mapped = inner_targets
                .iter()
                .map(|q| map(*q))
                .collect::<Result<Vec<_>, _>>()?;
            CircuitOp::Sub {
                ops: ops.clone(),
                targets: mapped,
            }
        }
    })
}

fn apply_single(
    state: &mut [Complex64],
    qubit_num: usize,
    target: usize,
    m: Matrix2,
) -> Result<(), SimulatorError> {
    check_qubit(target, qubit_num)?;
    let mask = qubit_mask(target, qubit_num);

    for index in 0..state.len() {
        if index & mask != 0 {
            continue;
        }
        let paired = index | mask;
        let a0 = state[index];
        let a1 = state[paired];
        state[index] = m[0][0] * a0 + m[0][1] * a1;
        state[paired] = m[1][0] * a0 + m[1][1] * a1;
    }
    Ok(())
}

fn apply_controlled(
    state: &mut [Complex64],
    qubit_num: usize,
    controls: &[usize],
    target: usize,
    m: Matrix2,
) -> Result<(), SimulatorError> {
    check_qubit(target, qubit_num)?;
    let mut control_mask = 0usize;
    for control in controls {
        check_qubit(*control, qubit_num)?;
        if *control == target {
            return Err(SimulatorError::Fatal {
                message: format!("control and target coincide on qubit {target}"),
            });
        }
        control_mask |= qubit_mask(*control, qubit_num);
    }
    let target_mask = qubit_mask(target, qubit_num);

    for index in 0..state.len() {
        if index & target_mask != 0 || index & control_mask != control_mask {
            continue;
        }
        let paired = index | target_mask;
        let a0 = state[index];
        let a1 = state[paired];
        state[index] = m[0][0] * a0 + m[0][1] * a1;
        state[paired] = m[1][0] * a0 + m[1][1] * a1;
    }
    Ok(())
}

fn apply_swap(
    state: &mut [Complex64],
    qubit_num: usize,
    a: usize,
    b: usize,
) -> Result<(), SimulatorError> {
    check_qubit(a, qubit_num)?;
    check_qubit(b, qubit_num)?;
    if a == b {
        return Ok(());
    }
    let mask_a = qubit_mask(a, qubit_num);
    let mask_b = qubit_mask(b, qubit_num);

    for index in 0..state.len() {
        if index & mask_a != 0 && index & mask_b == 0 {
            let paired = (index & !mask_a) | mask_b;
            state.swap(index, paired);
        }
    }
    Ok(())
}

fn h_matrix() -> Matrix2 {
    let s = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
    [[s, s], [s, -s]]
}

fn x_matrix() -> Matrix2 {
    let zero = Complex64::new(0.0, 0.0);
    let one = Complex64::new(1.0, 0.0);
    [[zero, one], [one, zero]]
}

fn y_matrix() -> Matrix2 {
    let zero = Complex64::new(0.0, 0.0);
    let i = Complex64::new(0.0, 1.0);
    [[zero, -i], [i, zero]]
}

fn z_matrix() -> Matrix2 {
    let zero = Complex64::new(0.0, 0.0);
    let one = Complex64::new(1.0, 0.0);
    [[one, zero], [zero, -one]]
}

fn rx_matrix(theta: f64) -> Matrix2 {
    let cos = Complex64::new((theta / 2.0).cos(), 0.0);
    let isin = Complex64::new(0.0, -(theta / 2.0).sin());
    [[cos, isin], [isin, cos]]
}

fn ry_matrix(theta: f64) -> Matrix2 {
    let cos = Complex64::new((theta / 2.0).cos(), 0.0);
    let sin = Complex64::new((theta / 2.0).sin(), 0.0);
    [[cos, -sin], [sin, cos]]
}

fn phase_matrix(theta: f64) -> Matrix2 {
    let zero = Complex64::new(0.0, 0.0);
    let one = Complex64::new(1.0, 0.0);
    [[one, zero], [zero, Complex64::new(0.0, theta).exp()]]
}

fn rz_matrix(theta: f64) -> Matrix2 {
    let zero = Complex64::new(0.0, 0.0);
    [
        [(Complex64::new(0.0, -theta / 2.0)).exp(), zero],
        [zero, (Complex64::new(0.0, theta / 2.0)).exp()],
    ]
}
