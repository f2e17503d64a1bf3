use super::*;
use crate::circuit::Circuit;
use crate::gates::catalog::{GateProto, GateSet};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn test_operand_mutation_keeps_operands_distinct() {
    let mut rng = rng();
    for _ in 0..50 {
        let mut gate = GateProto::Ccx.instantiate(3, &mut rng);
        gate.mutate_operands(3, &mut rng);
        if let Gate::DoublyControlled {
            control1,
            control2,
            target,
            ..
        } = gate
        {
            assert_ne!(control1, control2);
            assert_ne!(control1, target);
            assert_ne!(control2, target);
        } else {
            panic!("ccx proto produced unexpected variant");
        }
    }
}

#[test]
fn test_operand_mutation_preserves_capability_set() {
    let mut rng = rng();
    let protos = [
        GateProto::H,
        GateProto::Cx,
        GateProto::Crx,
        GateProto::HLayer,
        GateProto::Identity,
    ];
    for proto in protos {
        let mut gate = proto.instantiate(3, &mut rng);
        let caps = (
            gate.is_parametrized(),
            gate.is_multicase(),
            gate.is_composite(),
            gate.has_mutable_operands(),
        );
        gate.mutate_operands(3, &mut rng);
        let caps_after = (
            gate.is_parametrized(),
            gate.is_multicase(),
            gate.is_composite(),
            gate.has_mutable_operands(),
        );
        assert_eq!(caps, caps_after);
    }
}

#[test]
fn test_rotation_keeps_theta_across_operand_mutation() {
    let mut rng = rng();
    let mut gate = GateProto::Rx.instantiate(3, &mut rng);
    let theta_before = gate.params()[0];
    for _ in 0..10 {
        gate.mutate_operands(3, &mut rng);
    }
    assert_eq!(gate.params(), vec![theta_before]);
}

#[test]
fn test_combined_name_concatenates_children() {
    let proto = GateProto::Combined(vec![GateProto::H, GateProto::Cx]);
    assert_eq!(proto.name(), "h_cx");

    let mut rng = rng();
    let gate = proto.instantiate(2, &mut rng);
    assert_eq!(gate.type_name(), "h_cx");
}

#[test]
fn test_nested_combined_protos_flatten() {
    let inner = GateProto::Combined(vec![GateProto::H, GateProto::Cx]);
    let outer = GateProto::Combined(vec![inner, GateProto::Z]);
    let flat = outer.flattened();
    assert_eq!(flat, vec![GateProto::H, GateProto::Cx, GateProto::Z]);
    assert_eq!(outer.name(), "h_cx_z");
}

#[test]
fn test_combined_param_vector_concatenates_in_order() {
    let mut rng = rng();
    let proto = GateProto::Combined(vec![GateProto::Rx, GateProto::Cx, GateProto::Cry]);
    let mut gate = proto.instantiate(3, &mut rng);

    assert_eq!(gate.param_count(), 2);
    assert_eq!(gate.bounds(), vec![PARAM_BOUNDS, PARAM_BOUNDS]);

    gate.set_params(&[0.5, -1.25]);
    assert_eq!(gate.params(), vec![0.5, -1.25]);
}

#[test]
fn test_case_index_propagates_to_multicase_children() {
    let spec = InputSpec::binary(&[vec![0, 0], vec![1, 1]], 2).unwrap();
    let mut gate = Gate::Combined(vec![
        Gate::Input(InputGate::new(spec)),
        Gate::Single {
            kind: SingleKind::H,
            target: 0,
        },
    ]);
    assert!(gate.is_multicase());

    let mut case0 = Circuit::new(2);
    gate.set_case_index(0);
    gate.apply(&mut case0);
    let mut case1 = Circuit::new(2);
    gate.set_case_index(1);
    gate.apply(&mut case1);

    // Case 0 encodes |00> (no X ops), case 1 encodes |11>.
    assert_eq!(case0.ops().len(), 1);
    assert_eq!(case1.ops().len(), 3);
}

#[test]
fn test_oracle_targets_are_contiguous_and_stable() {
    let mut oracle_circuit = Circuit::new(2);
    oracle_circuit.push(crate::circuit::CircuitOp::Z(1));
    let spec = Arc::new(OracleSpec::new(vec![oracle_circuit]));
    let mut gate = Gate::Oracle(OracleGate::new(spec));

    let before = gate.clone();
    let mut rng = rng();
    gate.mutate_operands(3, &mut rng);
    assert_eq!(gate, before);
}

#[test]
fn test_gate_count_layers_and_composites() {
    let layer = Gate::Layer {
        kind: LayerKind::H,
        qubit_num: 4,
    };
    assert_eq!(layer.gate_count(), 4);
    assert_eq!(Gate::Identity.gate_count(), 0);

    let combined = Gate::Combined(vec![
        layer,
        Gate::Single {
            kind: SingleKind::X,
            target: 0,
        },
    ]);
    assert_eq!(combined.gate_count(), 5);
}

#[test]
fn test_gate_set_append_is_idempotent() {
    let mut gate_set = GateSet::new(vec![GateProto::H, GateProto::Cx], 2).unwrap();
    let combined = GateProto::Combined(vec![GateProto::H, GateProto::Cx]);

    assert!(gate_set.append(combined.clone()).unwrap());
    assert_eq!(gate_set.len(), 3);
    assert!(!gate_set.append(combined.clone()).unwrap());
    assert_eq!(gate_set.len(), 3);
    assert!(gate_set.contains(&combined));
}

#[test]
fn test_gate_set_rejects_arity_violation() {
    let result = GateSet::new(vec![GateProto::Ccx], 2);
    assert!(matches!(
        result,
        Err(crate::error::EvolutionError::ArityViolation { .. })
    ));
}

#[test]
fn test_empty_gate_set_cannot_sample() {
    let gate_set = GateSet::new(Vec::new(), 2).unwrap();
    let mut rng = rng();
    assert!(matches!(
        gate_set.random_gate(&mut rng),
        Err(crate::error::EvolutionError::EmptyGateSet)
    ));
}

#[test]
fn test_structural_equality_covers_operands_and_params() {
    let a = Gate::Rotation {
        axis: RotationAxis::Ry,
        target: 1,
        theta: 0.3,
    };
    let mut b = a.clone();
    assert_eq!(a, b);

    b.set_params(&[0.4]);
    assert_ne!(a, b);
}
