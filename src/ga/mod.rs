//! Evolution driver: the generational loop.
//!
//! [`Ga`] owns the population and runs selection, crossover, mutation
//! and parallel evaluation until the generation cap, the fitness
//! threshold, or a cooperative stop ends the run. Chromosomes are
//! evaluated through an [`Optimizer`], which calls the simulator and
//! the fitness strategy; evaluation of one chromosome is independent of
//! every other, so offspring batches fan out over a rayon pool and a
//! generation is a synchronization barrier.

mod ops;

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::chromosome::Chromosome;
use crate::config::GaParams;
use crate::error::{EvolutionError, EvolutionResult};
use crate::fitness::FitnessFunction;
use crate::gates::GateSet;
use crate::metrics::GaMetrics;
use crate::optimizer::Optimizer;

/// Lifecycle of one driver instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed, `run` not called yet.
    Idle,
    /// Inside the generational loop.
    Running,
    /// Ended by a cooperative stop request.
    Stopped,
    /// Ended by the generation cap or the fitness threshold.
    Completed,
}

/// View handed to generation callbacks.
///
/// Callbacks observe the freshly selected population and may grow the
/// gate catalog or request a stop; the stop takes effect at the end of
/// the current generation.
pub struct GaContext<'a> {
    /// Catalog used for initialization and gate-swap mutation; grows
    /// only, entries are never removed.
    pub gate_set: &'a mut GateSet,
    /// Population selected for the next generation, every fitness cache
    /// filled.
    pub population: &'a [Chromosome],
    /// Fitness per population entry, same order.
    pub fitness_values: &'a [f64],
    /// 1-based generation number.
    pub generation: usize,
    stop: bool,
}

impl GaContext<'_> {
    /// Request a cooperative stop after this generation.
    pub fn stop(&mut self) {
        self.stop = true;
    }
}

/// Callback fired with a [`GaContext`] view.
pub type GenerationCallback = Box<dyn FnMut(&mut GaContext<'_>) + Send>;

/// The genetic search driver.
pub struct Ga<O: Optimizer, F: FitnessFunction> {
    gate_set: GateSet,
    fitness: F,
    optimizer: O,
    params: GaParams,
    population: Vec<Chromosome>,
    state: RunState,
    metrics: GaMetrics,
    after_generation_callbacks: Vec<GenerationCallback>,
    on_completion_callbacks: Vec<GenerationCallback>,
    stop_requested: bool,
}

impl<O: Optimizer, F: FitnessFunction> Ga<O, F> {
    pub fn new(gate_set: GateSet, fitness: F, optimizer: O, params: GaParams) -> Self {
        Self {
            gate_set,
            fitness,
            optimizer,
            params,
            population: Vec::new(),
            state: RunState::Idle,
            metrics: GaMetrics::default(),
            after_generation_callbacks: Vec::new(),
            on_completion_callbacks: Vec::new(),
            stop_requested: false,
        }
    }

    /// Request a cooperative stop; takes effect at the next generation
    /// boundary.
    pub fn stop(&mut self) {
        self.stop_requested = true;
    }

    /// Register a callback fired after each generation's selection.
    pub fn on_after_generation(&mut self, callback: GenerationCallback) {
        self.after_generation_callbacks.push(callback);
    }

    /// Register a callback fired once when the run ends.
    pub fn on_completion(&mut self, callback: GenerationCallback) {
        self.on_completion_callbacks.push(callback);
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn metrics(&self) -> &GaMetrics {
        &self.metrics
    }

    pub fn gate_set(&self) -> &GateSet {
        &self.gate_set
    }

    /// Run the generational loop to completion.
    pub fn run(&mut self) -> EvolutionResult<()> {
        self.params.validate()?;
        let mut rng = match self.params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.params.effective_worker_count())
            .build()
            .map_err(|e| EvolutionError::InvalidConfiguration {
                message: format!("failed to build evaluation pool: {e}"),
            })?;

        self.population = self.initial_population(&mut rng)?;
        self.metrics = GaMetrics::default();
        self.state = RunState::Running;
        self.stop_requested = false;
        let started = Instant::now();

        for generation in 1..=self.params.generations {
            if self.stop_requested {
                self.state = RunState::Stopped;
                break;
            }
            let elite = if generation == 1 {
                Vec::new()
            } else {
                ops::select_best(&self.population, self.params.elitism_count())
            };

            let mut offspring = self.population.clone();
            ops::shuffle(&mut offspring, &mut rng);

            for pair in offspring.chunks_mut(2) {
                if pair.len() == 2 && rng.gen::<f64>() < self.params.crossover_prob {
                    let (first, second) = pair.split_at_mut(1);
                    ops::one_point_crossover(&mut first[0], &mut second[0], &mut rng);
                }
            }

            for chromosome in offspring.iter_mut() {
                ops::swap_gate_mutation(
                    chromosome,
                    &self.gate_set,
                    self.params.swap_gate_mutation_prob,
                    &mut rng,
                )?;
            }
            for chromosome in offspring.iter_mut() {
                ops::operand_mutation(
                    chromosome,
                    self.gate_set.qubit_num(),
                    self.params.operand_mutation_prob,
                    &mut rng,
                );
            }
            for chromosome in offspring.iter_mut() {
                ops::order_swap_mutation(
                    chromosome,
                    self.params.swap_order_mutation_prob,
                    &mut rng,
                );
            }

            let evaluated = self.evaluate_batch(&pool, offspring)?;
            let evaluations = evaluated.len() as u64;

            let survivor_count = self.params.population_size.saturating_sub(elite.len());
            let mut next = elite;
            next.extend(ops::tournament_select(
                &evaluated,
                survivor_count,
                self.params.tournament_size,
                &mut rng,
            ));
            self.population = next;

            let fitness_values: Vec<f64> = self
                .population
                .iter()
                .map(|c| c.fitness().unwrap_or(f64::INFINITY))
                .collect();
            let best = fitness_values.iter().copied().fold(f64::INFINITY, f64::min);
            let average = fitness_values.iter().sum::<f64>() / fitness_values.len() as f64;
            self.metrics.record_generation(
                generation,
                evaluations,
                best,
                average,
                started.elapsed(),
            );

            if self.params.log_average_fitness && generation % self.params.log_interval == 0 {
                tracing::info!(generation, average_fitness = average, "generation done");
            }

            let stop_requested = self.fire_callbacks(true, generation, &fitness_values);
            if stop_requested {
                self.state = RunState::Stopped;
                break;
            }

            let mut sorted = fitness_values.clone();
            sorted.sort_by(f64::total_cmp);
            if sorted[self.params.fitness_threshold_at.min(sorted.len() - 1)]
                <= self.params.fitness_threshold
            {
                tracing::info!(generation, "fitness threshold reached, stopping early");
                self.state = RunState::Completed;
                break;
            }
        }

        if self.state == RunState::Running {
            self.state = RunState::Completed;
        }

        let fitness_values: Vec<f64> = self
            .population
            .iter()
            .map(|c| c.fitness().unwrap_or(f64::INFINITY))
            .collect();
        self.fire_callbacks(false, self.metrics.generation, &fitness_values);
        Ok(())
    }

    /// The `n` best chromosomes with their fitness, best first.
    pub fn get_best_chromosomes(&self, n: usize) -> EvolutionResult<Vec<(Chromosome, f64)>> {
        if self.state == RunState::Idle || self.population.is_empty() {
            return Err(EvolutionError::NoCompletedGeneration);
        }
        let ranked = ops::select_best(&self.population, n);
        Ok(ranked
            .into_iter()
            .map(|c| {
                let fitness = c.fitness().unwrap_or(f64::INFINITY);
                (c, fitness)
            })
            .collect())
    }

    fn initial_population(&self, rng: &mut StdRng) -> EvolutionResult<Vec<Chromosome>> {
        let mut population = Vec::with_capacity(self.params.population_size);
        for _ in 0..self.params.population_size {
            let genes = (0..self.params.chromosome_length)
                .map(|_| self.gate_set.random_gate(rng))
                .collect::<EvolutionResult<Vec<_>>>()?;
            population.push(Chromosome::new(genes));
        }
        Ok(population)
    }

    /// Evaluate one offspring batch in parallel. A chromosome whose
    /// simulator retries run out keeps its structure and gets an
    /// infinite fitness, so selection discards it without aborting the
    /// run. Any other failure aborts.
    fn evaluate_batch(
        &self,
        pool: &rayon::ThreadPool,
        offspring: Vec<Chromosome>,
    ) -> EvolutionResult<Vec<Chromosome>> {
        let optimizer = &self.optimizer;
        let fitness = &self.fitness;
        pool.install(|| {
            offspring
                .into_par_iter()
                .map(|chromosome| {
                    let fallback = chromosome.clone();
                    match optimizer.optimize(chromosome, fitness) {
                        Ok((scored, _)) => Ok(scored),
                        Err(EvolutionError::RetriesExhausted {
                            case,
                            retries,
                            message,
                        }) => {
                            tracing::warn!(
                                case,
                                retries,
                                message = %message,
                                "evaluation retries exhausted, discarding chromosome"
                            );
                            let mut dead = fallback;
                            dead.set_fitness(f64::INFINITY);
                            Ok(dead)
                        }
                        Err(other) => Err(other),
                    }
                })
                .collect()
        })
    }

    /// Fire the after-generation or completion callbacks; returns
    /// whether any of them requested a stop. Callbacks registered from
    /// inside a callback fire from the next generation on.
    fn fire_callbacks(
        &mut self,
        after_generation: bool,
        generation: usize,
        fitness_values: &[f64],
    ) -> bool {
        let mut callbacks = if after_generation {
            std::mem::take(&mut self.after_generation_callbacks)
        } else {
            std::mem::take(&mut self.on_completion_callbacks)
        };

        let mut context = GaContext {
            gate_set: &mut self.gate_set,
            population: &self.population,
            fitness_values,
            generation,
            stop: false,
        };
        for callback in callbacks.iter_mut() {
            callback(&mut context);
        }
        let stop = context.stop;

        let registry = if after_generation {
            &mut self.after_generation_callbacks
        } else {
            &mut self.on_completion_callbacks
        };
        callbacks.append(registry);
        *registry = callbacks;
        stop
    }
}
