//! Gate catalog: constructors and random sampling.
//!
//! A [`GateProto`] maps a qubit count to a freshly initialized [`Gate`];
//! the [`GateSet`] holds the protos available to the search. The catalog
//! only ever grows. Appending a proto whose canonical name already
//! exists is a no-op, so composite types discovered twice collapse into
//! one entry.

use rand::seq::index::sample;
use rand::Rng;
use std::sync::Arc;

use crate::error::{EvolutionError, EvolutionResult};
use crate::gates::{
    random_theta, ControlledKind, ControlledRotationAxis, DoublyControlledKind, Gate, InputGate,
    InputSpec, LayerKind, OracleGate, OracleSpec, RotationAxis, SingleKind,
};

/// A gate constructor: instantiating it draws fresh random operands
/// (and parameters) for the configured qubit count.
#[derive(Debug, Clone, PartialEq)]
pub enum GateProto {
    Identity,
    H,
    X,
    Y,
    Z,
    Swap,
    Ch,
    Cx,
    Cy,
    Cz,
    Ccx,
    Ccz,
    HLayer,
    XLayer,
    YLayer,
    ZLayer,
    SwapLayer,
    Rx,
    Ry,
    Rz,
    Phase,
    Crx,
    Cry,
    Crz,
    Oracle(Arc<OracleSpec>),
    Input(Arc<InputSpec>),
    Combined(Vec<GateProto>),
}

impl GateProto {
    /// Canonical name of the constructed gate type. Composite names are
    /// the children's names joined in order.
    pub fn name(&self) -> String {
        match self {
            GateProto::Identity => "identity".to_string(),
            GateProto::H => "h".to_string(),
            GateProto::X => "x".to_string(),
            GateProto::Y => "y".to_string(),
            GateProto::Z => "z".to_string(),
            GateProto::Swap => "swap".to_string(),
            GateProto::Ch => "ch".to_string(),
            GateProto::Cx => "cx".to_string(),
            GateProto::Cy => "cy".to_string(),
            GateProto::Cz => "cz".to_string(),
            GateProto::Ccx => "ccx".to_string(),
            GateProto::Ccz => "ccz".to_string(),
            GateProto::HLayer => "h_layer".to_string(),
            GateProto::XLayer => "x_layer".to_string(),
            GateProto::YLayer => "y_layer".to_string(),
            GateProto::ZLayer => "z_layer".to_string(),
            GateProto::SwapLayer => "swap_layer".to_string(),
            GateProto::Rx => "rx".to_string(),
            GateProto::Ry => "ry".to_string(),
            GateProto::Rz => "rz".to_string(),
            GateProto::Phase => "phase_shift".to_string(),
            GateProto::Crx => "crx".to_string(),
            GateProto::Cry => "cry".to_string(),
            GateProto::Crz => "crz".to_string(),
            GateProto::Oracle(_) => "oracle".to_string(),
            GateProto::Input(spec) => spec.name().to_string(),
            GateProto::Combined(children) => children
                .iter()
                .map(|p| p.name())
                .collect::<Vec<_>>()
                .join("_"),
        }
    }

    /// Minimum register size this gate type can act on.
    pub fn min_qubit_num(&self) -> usize {
        match self {
            GateProto::Swap
            | GateProto::Ch
            | GateProto::Cx
            | GateProto::Cy
            | GateProto::Cz
            | GateProto::Crx
            | GateProto::Cry
            | GateProto::Crz => 2,
            GateProto::Ccx | GateProto::Ccz => 3,
            GateProto::Oracle(spec) => spec.oracle_qubit_num(),
            GateProto::Input(spec) => spec.qubit_num(),
            GateProto::Combined(children) => children
                .iter()
                .map(|p| p.min_qubit_num())
                .max()
                .unwrap_or(1),
            _ => 1,
        }
    }

    /// Flatten nested composite protos into their primitive children.
    pub fn flattened(&self) -> Vec<GateProto> {
        match self {
            GateProto::Combined(children) => {
                children.iter().flat_map(|p| p.flattened()).collect()
            }
            other => vec![other.clone()],
        }
    }

    /// Construct a gate with fresh random operands and parameters.
    ///
    /// The caller guarantees `qubit_num >= self.min_qubit_num()`; the
    /// [`GateSet`] enforces this at catalog construction.
    pub fn instantiate<R: Rng + ?Sized>(&self, qubit_num: usize, rng: &mut R) -> Gate {
        match self {
            GateProto::Identity => Gate::Identity,
            GateProto::H => single(SingleKind::H, qubit_num, rng),
            GateProto::X => single(SingleKind::X, qubit_num, rng),
            GateProto::Y => single(SingleKind::Y, qubit_num, rng),
            GateProto::Z => single(SingleKind::Z, qubit_num, rng),
            GateProto::Swap => {
                let picks = sample(rng, qubit_num, 2);
                Gate::Swap {
                    target1: picks.index(0),
                    target2: picks.index(1),
                }
            }
            GateProto::Ch => controlled(ControlledKind::Ch, qubit_num, rng),
            GateProto::Cx => controlled(ControlledKind::Cx, qubit_num, rng),
            GateProto::Cy => controlled(ControlledKind::Cy, qubit_num, rng),
            GateProto::Cz => controlled(ControlledKind::Cz, qubit_num, rng),
            GateProto::Ccx => doubly(DoublyControlledKind::Ccx, qubit_num, rng),
            GateProto::Ccz => doubly(DoublyControlledKind::Ccz, qubit_num, rng),
            GateProto::HLayer => layer(LayerKind::H, qubit_num),
            GateProto::XLayer => layer(LayerKind::X, qubit_num),
            GateProto::YLayer => layer(LayerKind::Y, qubit_num),
            GateProto::ZLayer => layer(LayerKind::Z, qubit_num),
            GateProto::SwapLayer => layer(LayerKind::Swap, qubit_num),
            GateProto::Rx => rotation(RotationAxis::Rx, qubit_num, rng),
            GateProto::Ry => rotation(RotationAxis::Ry, qubit_num, rng),
            GateProto::Rz => rotation(RotationAxis::Rz, qubit_num, rng),
            GateProto::Phase => rotation(RotationAxis::Phase, qubit_num, rng),
            GateProto::Crx => controlled_rotation(ControlledRotationAxis::Crx, qubit_num, rng),
            GateProto::Cry => controlled_rotation(ControlledRotationAxis::Cry, qubit_num, rng),
            GateProto::Crz => controlled_rotation(ControlledRotationAxis::Crz, qubit_num, rng),
            GateProto::Oracle(spec) => Gate::Oracle(OracleGate::new(Arc::clone(spec))),
            GateProto::Input(spec) => Gate::Input(InputGate::new(Arc::clone(spec))),
            GateProto::Combined(children) => Gate::Combined(
                children
                    .iter()
                    .map(|p| p.instantiate(qubit_num, rng))
                    .collect(),
            ),
        }
    }
}

fn single<R: Rng + ?Sized>(kind: SingleKind, qubit_num: usize, rng: &mut R) -> Gate {
    Gate::Single {
        kind,
        target: rng.gen_range(0..qubit_num),
    }
}

fn controlled<R: Rng + ?Sized>(kind: ControlledKind, qubit_num: usize, rng: &mut R) -> Gate {
    let picks = sample(rng, qubit_num, 2);
    Gate::Controlled {
        kind,
        control: picks.index(0),
        target: picks.index(1),
    }
}

fn doubly<R: Rng + ?Sized>(kind: DoublyControlledKind, qubit_num: usize, rng: &mut R) -> Gate {
    let picks = sample(rng, qubit_num, 3);
    Gate::DoublyControlled {
        kind,
        control1: picks.index(0),
        control2: picks.index(1),
        target: picks.index(2),
    }
}

fn layer(kind: LayerKind, qubit_num: usize) -> Gate {
    Gate::Layer { kind, qubit_num }
}

fn rotation<R: Rng + ?Sized>(axis: RotationAxis, qubit_num: usize, rng: &mut R) -> Gate {
    Gate::Rotation {
        axis,
        target: rng.gen_range(0..qubit_num),
        theta: random_theta(rng),
    }
}

fn controlled_rotation<R: Rng + ?Sized>(
    axis: ControlledRotationAxis,
    qubit_num: usize,
    rng: &mut R,
) -> Gate {
    let picks = sample(rng, qubit_num, 2);
    Gate::ControlledRotation {
        axis,
        control: picks.index(0),
        target: picks.index(1),
        theta: random_theta(rng),
    }
}

/// The catalog of gate constructors available to a run.
///
/// Built once per run; it only grows, entries are never removed.
#[derive(Debug, Clone)]
pub struct GateSet {
    protos: Vec<GateProto>,
    qubit_num: usize,
}

impl GateSet {
    /// Build a catalog over `qubit_num` qubits.
    ///
    /// Fails if any proto needs more qubits than the register holds.
    pub fn new(protos: Vec<GateProto>, qubit_num: usize) -> EvolutionResult<Self> {
        for proto in &protos {
            let required = proto.min_qubit_num();
            if required > qubit_num {
                return Err(EvolutionError::ArityViolation {
                    gate: proto.name(),
                    required,
                    qubit_num,
                });
            }
        }
        Ok(Self { protos, qubit_num })
    }

    /// Select a proto uniformly at random and instantiate it.
    pub fn random_gate<R: Rng + ?Sized>(&self, rng: &mut R) -> EvolutionResult<Gate> {
        if self.protos.is_empty() {
            return Err(EvolutionError::EmptyGateSet);
        }
        let proto = &self.protos[rng.gen_range(0..self.protos.len())];
        Ok(proto.instantiate(self.qubit_num, rng))
    }

    /// Append a proto unless one with the same canonical name exists.
    /// Returns whether the catalog grew.
    pub fn append(&mut self, proto: GateProto) -> EvolutionResult<bool> {
        let required = proto.min_qubit_num();
        if required > self.qubit_num {
            return Err(EvolutionError::ArityViolation {
                gate: proto.name(),
                required,
                qubit_num: self.qubit_num,
            });
        }
        if self.contains(&proto) {
            return Ok(false);
        }
        self.protos.push(proto);
        Ok(true)
    }

    /// Whether a proto with the same canonical name is registered.
    pub fn contains(&self, proto: &GateProto) -> bool {
        let name = proto.name();
        self.protos.iter().any(|p| p.name() == name)
    }

    /// Registered protos.
    pub fn protos(&self) -> &[GateProto] {
        &self.protos
    }

    /// Register size the catalog was built for.
    pub fn qubit_num(&self) -> usize {
        self.qubit_num
    }

    /// Number of registered protos.
    pub fn len(&self) -> usize {
        self.protos.len()
    }

    /// Whether the catalog holds no protos.
    pub fn is_empty(&self) -> bool {
        self.protos.is_empty()
    }
}
