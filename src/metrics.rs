//! Run metrics tracking.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Metrics accumulated over one evolutionary run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GaMetrics {
    /// Last completed generation number (1-based).
    pub generation: usize,
    /// Total chromosome evaluations performed.
    pub total_evaluations: u64,
    /// Best fitness seen so far (lower is better).
    pub best_fitness: Option<f64>,
    /// Average fitness of the current population.
    pub average_fitness: f64,
    /// Wall-clock time elapsed since the run started.
    pub elapsed_time: Duration,
    /// Best fitness per generation.
    pub best_fitness_history: Vec<f64>,
    /// Average fitness per generation.
    pub average_fitness_history: Vec<f64>,
}

impl GaMetrics {
    /// Record one completed generation.
    pub fn record_generation(
        &mut self,
        generation: usize,
        evaluations: u64,
        best_fitness: f64,
        average_fitness: f64,
        elapsed_time: Duration,
    ) {
        self.generation = generation;
        self.total_evaluations += evaluations;
        self.best_fitness = Some(match self.best_fitness {
            Some(previous) => previous.min(best_fitness),
            None => best_fitness,
        });
        self.average_fitness = average_fitness;
        self.elapsed_time = elapsed_time;
        self.best_fitness_history.push(best_fitness);
        self.average_fitness_history.push(average_fitness);
    }
}
