//! Chromosome: one candidate solution.
//!
//! A chromosome is an ordered, fixed-length sequence of [`Gate`]s plus a
//! cached scalar fitness (lower is better). The cache is invalid until
//! the optimizer layer computes it and is dropped by any structural
//! modification.

use crate::circuit::Circuit;
use crate::gates::Gate;

#[derive(Debug, Clone, PartialEq)]
pub struct Chromosome {
    genes: Vec<Gate>,
    fitness: Option<f64>,
}

impl Chromosome {
    pub fn new(genes: Vec<Gate>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    /// Number of genes; invariant for the lifetime of a run.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[Gate] {
        &self.genes
    }

    /// Cached fitness, `None` until (re)computed.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Drop the cached fitness after a structural change.
    pub fn invalidate_fitness(&mut self) {
        self.fitness = None;
    }

    /// Replace the gene at `index`, invalidating the cache.
    pub fn replace_gene(&mut self, index: usize, gate: Gate) {
        self.genes[index] = gate;
        self.fitness = None;
    }

    /// Exchange two genes, invalidating the cache.
    pub fn swap_genes(&mut self, a: usize, b: usize) {
        if a != b {
            self.genes.swap(a, b);
            self.fitness = None;
        }
    }

    /// Mutable access for in-place gene mutation; invalidates the cache.
    pub fn gene_mut(&mut self, index: usize) -> &mut Gate {
        self.fitness = None;
        &mut self.genes[index]
    }

    /// Swap same-length tails with another chromosome at `cut`,
    /// invalidating both caches. Total gene count is preserved.
    pub fn swap_tail(&mut self, other: &mut Chromosome, cut: usize) {
        for i in cut..self.genes.len() {
            std::mem::swap(&mut self.genes[i], &mut other.genes[i]);
        }
        self.fitness = None;
        other.fitness = None;
    }

    /// Total primitive gate count, the size-minimizing tie-breaker.
    pub fn gate_count(&self) -> usize {
        self.genes.iter().map(|g| g.gate_count()).sum()
    }

    /// Select the sub-program of every multi-case gene.
    pub fn set_case_index(&mut self, index: usize) {
        for gene in &mut self.genes {
            gene.set_case_index(index);
        }
    }

    /// Append every gene's effect to a fresh circuit for one case.
    pub fn build_circuit(&mut self, qubit_num: usize, case_index: usize) -> Circuit {
        self.set_case_index(case_index);
        let mut circuit = Circuit::new(qubit_num);
        for gene in &self.genes {
            gene.apply(&mut circuit);
        }
        circuit
    }

    /// Whether any gene carries continuous parameters.
    pub fn has_parametrized_gates(&self) -> bool {
        self.genes.iter().any(|g| g.is_parametrized())
    }

    /// Concatenated parameter vector of all parametrized genes in
    /// chromosome order, recursing into composites.
    pub fn param_vector(&self) -> Vec<f64> {
        self.genes.iter().flat_map(|g| g.params()).collect()
    }

    /// Bounds matching [`Self::param_vector`] element-wise.
    pub fn param_bounds(&self) -> Vec<(f64, f64)> {
        self.genes.iter().flat_map(|g| g.bounds()).collect()
    }

    /// Install a concatenated parameter vector, invalidating the cache.
    pub fn set_param_vector(&mut self, params: &[f64]) {
        let mut rest = params;
        for gene in &mut self.genes {
            let count = gene.param_count();
            let (head, tail) = rest.split_at(count);
            gene.set_params(head);
            rest = tail;
        }
        self.fitness = None;
    }

    /// Parameter-free structural signature: gene type names joined in
    /// order. Used to deduplicate structurally equal chromosomes.
    pub fn type_signature(&self) -> String {
        self.genes
            .iter()
            .map(|g| g.type_name())
            .collect::<Vec<_>>()
            .join("_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::{Gate, RotationAxis, SingleKind};

    fn h(target: usize) -> Gate {
        Gate::Single {
            kind: SingleKind::H,
            target,
        }
    }

    fn ry(target: usize, theta: f64) -> Gate {
        Gate::Rotation {
            axis: RotationAxis::Ry,
            target,
            theta,
        }
    }

    #[test]
    fn test_fitness_cache_invalidation() {
        let mut chromosome = Chromosome::new(vec![h(0), h(1)]);
        assert_eq!(chromosome.fitness(), None);

        chromosome.set_fitness(0.25);
        assert_eq!(chromosome.fitness(), Some(0.25));

        chromosome.replace_gene(0, h(1));
        assert_eq!(chromosome.fitness(), None);
    }

    #[test]
    fn test_swap_tail_preserves_lengths() {
        let mut a = Chromosome::new(vec![h(0), h(1), ry(0, 0.1), h(0)]);
        let mut b = Chromosome::new(vec![ry(1, 0.2), h(0), h(1), h(1)]);
        a.set_fitness(1.0);
        b.set_fitness(2.0);

        a.swap_tail(&mut b, 2);

        assert_eq!(a.len(), 4);
        assert_eq!(b.len(), 4);
        assert_eq!(a.genes()[2], h(1));
        assert_eq!(b.genes()[2], ry(0, 0.1));
        assert_eq!(a.fitness(), None);
        assert_eq!(b.fitness(), None);
    }

    #[test]
    fn test_param_vector_round_trip() {
        let mut chromosome = Chromosome::new(vec![ry(0, 0.5), h(0), ry(1, -0.5)]);
        assert!(chromosome.has_parametrized_gates());
        assert_eq!(chromosome.param_vector(), vec![0.5, -0.5]);
        assert_eq!(chromosome.param_bounds().len(), 2);

        chromosome.set_param_vector(&[1.0, 2.0]);
        assert_eq!(chromosome.param_vector(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_type_signature_ignores_operands_and_params() {
        let a = Chromosome::new(vec![h(0), ry(0, 0.1)]);
        let b = Chromosome::new(vec![h(1), ry(1, 2.71)]);
        assert_eq!(a.type_signature(), b.type_signature());
        assert_eq!(a.type_signature(), "h_ry");
    }
}
