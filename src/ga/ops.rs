//! Variation and selection operators.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::chromosome::Chromosome;
use crate::error::EvolutionResult;
use crate::gates::GateSet;

/// One-point crossover: split both chromosomes at the same random cut
/// and exchange tails. Lengths are preserved. Chromosomes shorter than
/// two genes are left untouched.
pub(crate) fn one_point_crossover<R: Rng + ?Sized>(
    first: &mut Chromosome,
    second: &mut Chromosome,
    rng: &mut R,
) {
    let len = first.len().min(second.len());
    if len < 2 {
        return;
    }
    let cut = rng.gen_range(1..len);
    first.swap_tail(second, cut);
}

/// Per position, with probability `prob`, replace the gene with a
/// fresh draw from the catalog.
pub(crate) fn swap_gate_mutation<R: Rng + ?Sized>(
    chromosome: &mut Chromosome,
    gate_set: &GateSet,
    prob: f64,
    rng: &mut R,
) -> EvolutionResult<()> {
    for index in 0..chromosome.len() {
        if rng.gen::<f64>() < prob {
            let gate = gate_set.random_gate(rng)?;
            chromosome.replace_gene(index, gate);
        }
    }
    Ok(())
}

/// Per position, with probability `prob`, resample the gene's operands
/// in place. Genes with fixed operands pass through unchanged.
pub(crate) fn operand_mutation<R: Rng + ?Sized>(
    chromosome: &mut Chromosome,
    qubit_num: usize,
    prob: f64,
    rng: &mut R,
) {
    for index in 0..chromosome.len() {
        if rng.gen::<f64>() < prob {
            chromosome.gene_mut(index).mutate_operands(qubit_num, rng);
        }
    }
}

/// Per position, with probability `prob`, exchange the gene with the
/// one at another uniformly random position.
pub(crate) fn order_swap_mutation<R: Rng + ?Sized>(
    chromosome: &mut Chromosome,
    prob: f64,
    rng: &mut R,
) {
    if chromosome.len() < 2 {
        return;
    }
    for index in 0..chromosome.len() {
        if rng.gen::<f64>() < prob {
            let other = rng.gen_range(0..chromosome.len());
            chromosome.swap_genes(index, other);
        }
    }
}

/// Scored-fitness accessor; evaluation fills every cache before
/// selection runs, so a missing score is a driver bug.
fn scored(chromosome: &Chromosome) -> f64 {
    chromosome.fitness().unwrap_or(f64::INFINITY)
}

/// Tournament selection with replacement: `count` winners, each the
/// best of `tournament_size` uniform draws.
pub(crate) fn tournament_select<R: Rng + ?Sized>(
    offspring: &[Chromosome],
    count: usize,
    tournament_size: usize,
    rng: &mut R,
) -> Vec<Chromosome> {
    let mut selected = Vec::with_capacity(count);
    for _ in 0..count {
        let winner = (0..tournament_size)
            .map(|_| &offspring[rng.gen_range(0..offspring.len())])
            .min_by(|a, b| scored(a).total_cmp(&scored(b)))
            .cloned();
        if let Some(winner) = winner {
            selected.push(winner);
        }
    }
    selected
}

/// Deep-copy the `count` best chromosomes by cached fitness.
pub(crate) fn select_best(population: &[Chromosome], count: usize) -> Vec<Chromosome> {
    let mut ranked: Vec<&Chromosome> = population.iter().collect();
    ranked.sort_by(|a, b| scored(a).total_cmp(&scored(b)));
    ranked.into_iter().take(count).cloned().collect()
}

/// Shuffle in place; pairs adjacent chromosomes for crossover.
pub(crate) fn shuffle<R: Rng + ?Sized>(offspring: &mut [Chromosome], rng: &mut R) {
    offspring.shuffle(rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::{Gate, GateProto, SingleKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gate(kind: SingleKind) -> Gate {
        Gate::Single { kind, target: 0 }
    }

    fn chromosome(kinds: &[SingleKind]) -> Chromosome {
        Chromosome::new(kinds.iter().map(|k| gate(*k)).collect())
    }

    #[test]
    fn test_crossover_preserves_lengths_and_genes() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut first = chromosome(&[SingleKind::H, SingleKind::H, SingleKind::H, SingleKind::H]);
        let mut second = chromosome(&[SingleKind::X, SingleKind::X, SingleKind::X, SingleKind::X]);

        one_point_crossover(&mut first, &mut second, &mut rng);

        assert_eq!(first.len(), 4);
        assert_eq!(second.len(), 4);
        // Heads keep their origin, tails are exchanged.
        assert_eq!(first.genes()[0], gate(SingleKind::H));
        assert_eq!(second.genes()[0], gate(SingleKind::X));
        assert_eq!(first.genes()[3], gate(SingleKind::X));
        assert_eq!(second.genes()[3], gate(SingleKind::H));
        assert_eq!(first.fitness(), None);
    }

    #[test]
    fn test_swap_gate_mutation_is_per_position() {
        let mut rng = StdRng::seed_from_u64(3);
        let gate_set = GateSet::new(vec![GateProto::Z], 1).unwrap();
        let mut mutated = chromosome(&[SingleKind::H, SingleKind::H, SingleKind::H]);
        swap_gate_mutation(&mut mutated, &gate_set, 1.0, &mut rng).unwrap();
        assert!(mutated.genes().iter().all(|g| *g == gate(SingleKind::Z)));

        let mut untouched = chromosome(&[SingleKind::H, SingleKind::H]);
        untouched.set_fitness(0.3);
        swap_gate_mutation(&mut untouched, &gate_set, 0.0, &mut rng).unwrap();
        assert_eq!(untouched.genes()[0], gate(SingleKind::H));
        assert_eq!(untouched.fitness(), Some(0.3));
    }

    #[test]
    fn test_tournament_prefers_lower_fitness() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut good = chromosome(&[SingleKind::H]);
        good.set_fitness(0.1);
        let mut bad = chromosome(&[SingleKind::X]);
        bad.set_fitness(5.0);

        // Tournament over the whole pool always finds the best.
        let selected = tournament_select(&[good.clone(), bad], 10, 2, &mut rng);
        assert_eq!(selected.len(), 10);
        assert!(selected.iter().filter(|c| **c == good).count() > 5);
    }

    #[test]
    fn test_select_best_orders_by_fitness() {
        let mut a = chromosome(&[SingleKind::H]);
        a.set_fitness(0.9);
        let mut b = chromosome(&[SingleKind::X]);
        b.set_fitness(0.2);
        let mut c = chromosome(&[SingleKind::Y]);
        c.set_fitness(0.5);

        let best = select_best(&[a, b.clone(), c.clone()], 2);
        assert_eq!(best, vec![b, c]);
    }
}
