//! Adaptive gate discovery.
//!
//! After each generation, gate pairs (bigrams) that occur adjacently in
//! the population and correlate with good fitness are promoted to
//! composite catalog entries, so later mutations can insert the whole
//! pair at once. Statistics run over the deduplicated population:
//! selection floods the pool with copies of strong chromosomes, which
//! would otherwise distort the correlation.

use std::collections::HashMap;

use crate::chromosome::Chromosome;
use crate::ga::GenerationCallback;
use crate::gates::{GateProto, GateSet};

/// Minimum fraction of unique chromosomes a bigram must occur in.
const SUPPORT_THRESHOLD: f64 = 0.05;

/// Fitness is minimized, so useful bigrams correlate negatively.
const CORRELATION_THRESHOLD: f64 = -0.25;

/// Ready-to-register callback running [`discover_composite_gates`]
/// after every generation.
pub fn adaptive_gate_discovery() -> GenerationCallback {
    Box::new(|ctx| {
        discover_composite_gates(ctx.gate_set, ctx.population);
    })
}

/// Scan the population for promising adjacent gate pairs and append
/// them to the catalog as composite gates. Returns the number of
/// catalog entries added.
pub fn discover_composite_gates(gate_set: &mut GateSet, population: &[Chromosome]) -> usize {
    let unique = unique_chromosomes(population);
    if unique.is_empty() {
        return 0;
    }
    let fitness_values: Vec<f64> = unique
        .iter()
        .map(|c| c.fitness().unwrap_or(f64::INFINITY))
        .collect();

    // Candidate bigrams are ordered proto pairs, identity excluded.
    // Composites already in the catalog take part, so discovery can
    // chain pairs into longer sequences over multiple generations.
    let mut candidates: Vec<(String, GateProto, GateProto)> = Vec::new();
    for first in gate_set.protos() {
        if *first == GateProto::Identity {
            continue;
        }
        for second in gate_set.protos() {
            if *second == GateProto::Identity {
                continue;
            }
            let name = format!("{}_{}", first.name(), second.name());
            candidates.push((name, first.clone(), second.clone()));
        }
    }

    // One presence indicator per chromosome per bigram; adjacency is
    // directed and pairs touching an identity gene do not count.
    let mut occurrences: HashMap<&str, Vec<f64>> = candidates
        .iter()
        .map(|(name, _, _)| (name.as_str(), Vec::with_capacity(unique.len())))
        .collect();
    for chromosome in &unique {
        let mut present: Vec<String> = Vec::new();
        for pair in chromosome.genes().windows(2) {
            if pair[0].type_name() == "identity" || pair[1].type_name() == "identity" {
                continue;
            }
            present.push(format!("{}_{}", pair[0].type_name(), pair[1].type_name()));
        }
        for (name, indicator) in occurrences.iter_mut() {
            indicator.push(if present.iter().any(|p| p == name) {
                1.0
            } else {
                0.0
            });
        }
    }

    let mut added = 0;
    for (name, first, second) in &candidates {
        let indicator = &occurrences[name.as_str()];
        let support: f64 = indicator.iter().sum();
        if support < unique.len() as f64 * SUPPORT_THRESHOLD {
            continue;
        }

        let saturated = indicator.iter().all(|v| *v == 1.0);
        let correlation = pearson_correlation(indicator, &fitness_values);
        // NaN (e.g. from infinite fitness values) never promotes.
        let correlated = correlation < CORRELATION_THRESHOLD;
        if !saturated && !correlated {
            continue;
        }

        let mut children = first.flattened();
        children.extend(second.flattened());
        let proto = GateProto::Combined(children);
        match gate_set.append(proto) {
            Ok(true) => {
                if saturated {
                    tracing::info!(bigram = %name, "promoted gate pair present in every chromosome");
                } else {
                    tracing::info!(bigram = %name, correlation, "promoted fitness-correlated gate pair");
                }
                added += 1;
            }
            Ok(false) => {}
            Err(error) => {
                tracing::warn!(bigram = %name, %error, "skipping composite gate");
            }
        }
    }
    added
}

/// Deduplicate by parameter-free structure, keeping the better (lower)
/// cached fitness per signature. First-seen order is preserved.
pub fn unique_chromosomes(population: &[Chromosome]) -> Vec<Chromosome> {
    let mut by_signature: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<Chromosome> = Vec::new();
    for chromosome in population {
        let signature = chromosome.type_signature();
        match by_signature.get(&signature) {
            Some(&index) => {
                let kept = unique[index].fitness().unwrap_or(f64::INFINITY);
                let challenger = chromosome.fitness().unwrap_or(f64::INFINITY);
                if challenger < kept {
                    unique[index] = chromosome.clone();
                }
            }
            None => {
                by_signature.insert(signature, unique.len());
                unique.push(chromosome.clone());
            }
        }
    }
    unique
}

/// Sample Pearson correlation coefficient; 0 when either side has no
/// variance.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.is_empty() {
        return 0.0;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }
    if variance_x == 0.0 || variance_y == 0.0 {
        return 0.0;
    }
    covariance / (variance_x * variance_y).sqrt()
}
