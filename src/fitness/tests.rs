use super::*;
use crate::chromosome::Chromosome;
use crate::error::EvolutionError;
use crate::gates::{ControlledKind, Gate, SingleKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn h(target: usize) -> Gate {
    Gate::Single {
        kind: SingleKind::H,
        target,
    }
}

fn cx(control: usize, target: usize) -> Gate {
    Gate::Controlled {
        kind: ControlledKind::Cx,
        control,
        target,
    }
}

fn chromosome() -> Chromosome {
    Chromosome::new(vec![h(0), cx(0, 1)])
}

fn random_distribution(rng: &mut StdRng, len: usize) -> Vec<f64> {
    let mut values: Vec<f64> = (0..len).map(|_| rng.gen::<f64>()).collect();
    let total: f64 = values.iter().sum();
    for v in &mut values {
        *v /= total;
    }
    values
}

#[test]
fn test_jensen_shannon_symmetric_and_zero_on_equal() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..100 {
        let p = random_distribution(&mut rng, 8);
        let q = random_distribution(&mut rng, 8);

        let pq = jensen_shannon_distance(&p, &q);
        let qp = jensen_shannon_distance(&q, &p);
        assert!((pq - qp).abs() < 1e-12);
        assert!((0.0..=1.0 + 1e-12).contains(&pq));

        assert!(jensen_shannon_distance(&p, &p) < 1e-9);
    }
}

#[test]
fn test_jensen_shannon_maximal_on_disjoint_support() {
    let p = [1.0, 0.0];
    let q = [0.0, 1.0];
    assert!((jensen_shannon_distance(&p, &q) - 1.0).abs() < 1e-12);
}

#[test]
fn test_jensen_shannon_fitness_averages_cases() {
    let fitness = JensenShannonFitness::new(FitnessParams::default());
    let produced = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
    let targets = vec![vec![1.0, 0.0], vec![1.0, 0.0]];

    let score = fitness
        .evaluate(&produced, &targets, &chromosome())
        .unwrap();
    // One perfect case, one maximally wrong case.
    assert!((score - 0.5).abs() < 1e-9);
}

#[test]
fn test_length_mismatch_is_fatal() {
    let fitness = JensenShannonFitness::new(FitnessParams::default());
    let produced = vec![vec![0.5, 0.5]];
    let targets = vec![vec![0.25, 0.25, 0.25, 0.25]];

    let result = fitness.evaluate(&produced, &targets, &chromosome());
    assert!(matches!(
        result,
        Err(EvolutionError::DistributionMismatch {
            case: 0,
            produced: 2,
            target: 4,
        })
    ));
}

#[test]
fn test_match_count_requires_threshold_exceeded() {
    let fitness = MatchCountFitness::new(FitnessParams::default());
    let produced = vec![vec![0.6, 0.4], vec![0.5, 0.5], vec![0.2, 0.8]];
    let targets = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];

    // 0.6 > 0.5 hits, 0.5 does not, 0.8 hits: one miss out of three.
    let score = fitness
        .evaluate(&produced, &targets, &chromosome())
        .unwrap();
    assert!((score - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_match_count_missing_one_hot_is_fatal() {
    let fitness = MatchCountFitness::new(FitnessParams::default());
    let produced = vec![vec![0.5, 0.5]];
    let targets = vec![vec![0.5, 0.5]];

    assert!(matches!(
        fitness.evaluate(&produced, &targets, &chromosome()),
        Err(EvolutionError::MissingTargetState { case: 0 })
    ));
}

#[test]
fn test_bounded_error_mixes_hits_and_residuals() {
    let fitness = BoundedErrorFitness::new(FitnessParams::default());
    let produced = vec![vec![0.7, 0.3], vec![0.5, 0.5]];
    let targets = vec![vec![1.0, 0.0], vec![1.0, 0.0]];

    let score = fitness
        .evaluate(&produced, &targets, &chromosome())
        .unwrap();
    // One case clears 2/3, one contributes a residual error; hits = 1.
    let residual = jensen_shannon_distance(&[0.5, 0.5], &[1.0, 0.0]);
    assert!((score - (1.0 + residual)).abs() < 1e-9);
}

#[test]
fn test_bounded_error_perfect_score_breaks_ties_by_size() {
    let fitness = BoundedErrorFitness::new(FitnessParams::default());
    let produced = vec![vec![0.9, 0.1]];
    let targets = vec![vec![1.0, 0.0]];

    let small = Chromosome::new(vec![h(0), Gate::Identity]);
    let large = Chromosome::new(vec![h(0), cx(0, 1), h(1)]);

    let small_score = fitness.evaluate(&produced, &targets, &small).unwrap();
    let large_score = fitness.evaluate(&produced, &targets, &large).unwrap();
    assert!(small_score < large_score);
    assert!(large_score < 1e-3);
}

#[test]
fn test_validity_penalty_is_monotone() {
    let always_fail = ValidityCheck::new("always_fail", |_| false);
    let clean = JensenShannonFitness::new(FitnessParams::default());
    let penalized = JensenShannonFitness::new(FitnessParams::with_checks(vec![always_fail]));

    let produced = vec![vec![0.5, 0.5]];
    let targets = vec![vec![1.0, 0.0]];
    let subject = chromosome();

    let base = clean.evaluate(&produced, &targets, &subject).unwrap();
    let with_penalty = penalized.evaluate(&produced, &targets, &subject).unwrap();
    assert!(with_penalty >= base);
    assert!((with_penalty - base - VALIDITY_PENALTY).abs() < 1e-9);
}

#[test]
fn test_validity_penalty_applied_once() {
    let fail_a = ValidityCheck::new("fail_a", |_| false);
    let fail_b = ValidityCheck::new("fail_b", |_| false);
    let fitness =
        JensenShannonFitness::new(FitnessParams::with_checks(vec![fail_a, fail_b]));

    let produced = vec![vec![1.0, 0.0]];
    let targets = vec![vec![1.0, 0.0]];
    let score = fitness
        .evaluate(&produced, &targets, &chromosome())
        .unwrap();
    assert!((score - VALIDITY_PENALTY).abs() < 1e-9);
}

#[test]
fn test_constrained_fitness_penalizes_missing_categories() {
    let fitness =
        ConstrainedBoundedErrorFitness::new(FitnessParams::default()).without_oracle_constraint();
    let produced = vec![vec![0.9, 0.1]];
    let targets = vec![vec![1.0, 0.0]];

    // H + CX covers superposition and entanglement.
    let rich = chromosome();
    // X alone covers neither category.
    let poor = Chromosome::new(vec![Gate::Single {
        kind: SingleKind::X,
        target: 0,
    }]);

    let rich_score = fitness.evaluate(&produced, &targets, &rich).unwrap();
    let poor_score = fitness.evaluate(&produced, &targets, &poor).unwrap();

    // Two missing categories at (case_count + 1) each. The rich
    // chromosome carries one more gate, so allow for the gate-count
    // tie-break term.
    assert!(poor_score - rich_score >= 2.0 * 2.0 - 2.0 / 100_000.0);
}

#[test]
fn test_category_predicates() {
    assert!(induces_superposition(&h(0)));
    assert!(!induces_superposition(&cx(0, 1)));
    assert!(is_entangling(&cx(0, 1)));
    assert!(!is_entangling(&h(0)));

    let combined = Gate::Combined(vec![h(0), cx(0, 1)]);
    assert!(induces_superposition(&combined));
    assert!(is_entangling(&combined));
}

#[test]
fn test_standard_validity_checks() {
    let subject = Chromosome::new(vec![h(0), cx(0, 1)]);
    assert!(validity::uses_superposition_gate().passes(&subject));
    assert!(!validity::has_exactly_one_oracle().passes(&subject));
    assert!(!validity::has_input_at_first_position().passes(&subject));
}
