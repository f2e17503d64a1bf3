//! End-to-end searches over the full engine stack.

use std::sync::Arc;

use qevo::adaptive::adaptive_gate_discovery;
use qevo::{
    FitnessParams, Ga, GaParams, GateProto, GateSet, JensenShannonFitness, NumericalOptimizer,
    OptimizerParams, PassThroughOptimizer, RunState, StatevectorSimulator,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Evolve a Bell-state preparation circuit on two qubits. The target
/// distribution [0.5, 0, 0, 0.5] needs a Hadamard followed by an
/// entangling gate with matching operands.
#[test]
fn test_evolves_bell_state_circuit() {
    init_tracing();
    let gate_set = GateSet::new(
        vec![
            GateProto::Identity,
            GateProto::H,
            GateProto::X,
            GateProto::Z,
            GateProto::Cx,
            GateProto::Cz,
        ],
        2,
    )
    .unwrap();

    let optimizer = PassThroughOptimizer::new(
        Arc::new(StatevectorSimulator::new()),
        vec![vec![0.5, 0.0, 0.0, 0.5]],
        OptimizerParams {
            qubit_num: 2,
            measurement_qubit_num: 2,
            ..OptimizerParams::default()
        },
    )
    .unwrap();

    let params = GaParams::builder()
        .population_size(100)
        .generations(50)
        .crossover_prob(0.5)
        .swap_gate_mutation_prob(0.3)
        .operand_mutation_prob(0.4)
        .chromosome_length(4)
        .fitness_threshold(0.01)
        .elitism_percentage(0.1)
        .seed(7)
        .log_average_fitness(false)
        .build()
        .unwrap();

    let mut ga = Ga::new(
        gate_set,
        JensenShannonFitness::new(FitnessParams::default()),
        optimizer,
        params,
    );
    ga.run().unwrap();

    assert_eq!(ga.state(), RunState::Completed);
    let (best, fitness) = ga.get_best_chromosomes(1).unwrap()[0].clone();
    assert!(
        fitness < 0.1,
        "expected a near-Bell circuit, best fitness was {fitness}"
    );
    assert!(best.gate_count() >= 2);
}

/// A single tunable rotation suffices for a deterministic bit flip;
/// the nested parameter search must find the correct angle.
#[test]
fn test_numerical_search_tunes_rotation() {
    init_tracing();
    let gate_set = GateSet::new(vec![GateProto::Identity, GateProto::Ry], 1).unwrap();

    let optimizer = NumericalOptimizer::new(
        Arc::new(StatevectorSimulator::new()),
        vec![vec![0.0, 1.0]],
        OptimizerParams {
            qubit_num: 1,
            measurement_qubit_num: 1,
            tolerance: 1e-6,
            max_iter: 60,
        },
    )
    .unwrap();

    let params = GaParams::builder()
        .population_size(20)
        .generations(10)
        .crossover_prob(0.5)
        .swap_gate_mutation_prob(0.2)
        .chromosome_length(3)
        .fitness_threshold(0.01)
        .seed(3)
        .log_average_fitness(false)
        .build()
        .unwrap();

    let mut ga = Ga::new(
        gate_set,
        JensenShannonFitness::new(FitnessParams::default()),
        optimizer,
        params,
    );
    ga.run().unwrap();

    let (_, fitness) = ga.get_best_chromosomes(1).unwrap()[0].clone();
    assert!(
        fitness < 0.01,
        "rotation angle was not tuned, best fitness was {fitness}"
    );
}

/// The discovery callback may only ever grow the catalog, and the run
/// must finish normally with it attached.
#[test]
fn test_run_with_adaptive_discovery() {
    init_tracing();
    let gate_set = GateSet::new(
        vec![GateProto::Identity, GateProto::H, GateProto::X],
        1,
    )
    .unwrap();
    let initial_len = gate_set.len();

    let optimizer = PassThroughOptimizer::new(
        Arc::new(StatevectorSimulator::new()),
        vec![vec![0.5, 0.5]],
        OptimizerParams {
            qubit_num: 1,
            measurement_qubit_num: 1,
            ..OptimizerParams::default()
        },
    )
    .unwrap();

    let params = GaParams::builder()
        .population_size(30)
        .generations(8)
        .crossover_prob(0.5)
        .swap_gate_mutation_prob(0.2)
        .chromosome_length(3)
        .fitness_threshold(-1.0)
        .seed(11)
        .log_average_fitness(false)
        .build()
        .unwrap();

    let mut ga = Ga::new(
        gate_set,
        JensenShannonFitness::new(FitnessParams::default()),
        optimizer,
        params,
    );
    ga.on_after_generation(adaptive_gate_discovery());
    ga.run().unwrap();

    assert_eq!(ga.state(), RunState::Completed);
    assert!(ga.gate_set().len() >= initial_len);
}
