//! Configuration for the evolutionary search driver.

use serde::{Deserialize, Serialize};

use crate::error::{EvolutionError, EvolutionResult};

/// Parameters of the generational loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaParams {
    /// Number of chromosomes per generation.
    pub population_size: usize,
    /// Generation cap; the run may stop earlier via the fitness
    /// threshold or [`stop()`](crate::ga::GaContext::stop).
    pub generations: usize,
    /// Probability of one-point crossover per adjacent offspring pair.
    pub crossover_prob: f64,
    /// Per-gene-position probability of replacing the gene with a
    /// fresh catalog draw.
    pub swap_gate_mutation_prob: f64,
    /// Per-gene-position probability of resampling a gene's operands.
    pub operand_mutation_prob: f64,
    /// Per-gene-position probability of swapping the gene with another
    /// random position.
    pub swap_order_mutation_prob: f64,
    /// Fixed gene count of every chromosome.
    pub chromosome_length: usize,
    /// Early-stop threshold compared against the fitness at rank
    /// `fitness_threshold_at` (lower is better).
    pub fitness_threshold: f64,
    /// Population rank (0 = best) the threshold is checked at.
    pub fitness_threshold_at: usize,
    /// Fraction of the population carried over unmodified each
    /// generation.
    pub elitism_percentage: f64,
    /// Tournament size for survivor selection.
    pub tournament_size: usize,
    /// Evaluation worker threads; `None` leaves one core free for the
    /// driver.
    pub worker_count: Option<usize>,
    /// Random seed for reproducible runs.
    pub seed: Option<u64>,
    /// Log average population fitness every N generations.
    pub log_interval: usize,
    /// Disable to silence the per-generation fitness log.
    pub log_average_fitness: bool,
}

impl Default for GaParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 50,
            crossover_prob: 0.5,
            swap_gate_mutation_prob: 0.1,
            operand_mutation_prob: 0.0,
            swap_order_mutation_prob: 0.0,
            chromosome_length: 5,
            fitness_threshold: 0.0,
            fitness_threshold_at: 0,
            elitism_percentage: 0.1,
            tournament_size: 3,
            worker_count: None,
            seed: None,
            log_interval: 5,
            log_average_fitness: true,
        }
    }
}

impl GaParams {
    /// Validate parameter ranges.
    pub fn validate(&self) -> EvolutionResult<()> {
        if self.population_size == 0 {
            return Err(EvolutionError::InvalidConfiguration {
                message: "population_size must be greater than 0".to_string(),
            });
        }
        if self.generations == 0 {
            return Err(EvolutionError::InvalidConfiguration {
                message: "generations must be greater than 0".to_string(),
            });
        }
        if self.chromosome_length == 0 {
            return Err(EvolutionError::InvalidConfiguration {
                message: "chromosome_length must be greater than 0".to_string(),
            });
        }
        for (name, prob) in [
            ("crossover_prob", self.crossover_prob),
            ("swap_gate_mutation_prob", self.swap_gate_mutation_prob),
            ("operand_mutation_prob", self.operand_mutation_prob),
            ("swap_order_mutation_prob", self.swap_order_mutation_prob),
        ] {
            if !(0.0..=1.0).contains(&prob) {
                return Err(EvolutionError::InvalidConfiguration {
                    message: format!("{name} must lie in [0, 1], got {prob}"),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.elitism_percentage) {
            return Err(EvolutionError::InvalidConfiguration {
                message: format!(
                    "elitism_percentage must lie in [0, 1], got {}",
                    self.elitism_percentage
                ),
            });
        }
        if self.tournament_size == 0 {
            return Err(EvolutionError::InvalidConfiguration {
                message: "tournament_size must be greater than 0".to_string(),
            });
        }
        if self.fitness_threshold_at >= self.population_size {
            return Err(EvolutionError::InvalidConfiguration {
                message: format!(
                    "fitness_threshold_at must lie below population_size ({}), got {}",
                    self.population_size, self.fitness_threshold_at
                ),
            });
        }
        if self.log_interval == 0 {
            return Err(EvolutionError::InvalidConfiguration {
                message: "log_interval must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Number of chromosomes carried over unmodified each generation.
    pub fn elitism_count(&self) -> usize {
        (self.population_size as f64 * self.elitism_percentage).floor() as usize
    }

    /// Worker threads for parallel evaluation.
    pub fn effective_worker_count(&self) -> usize {
        self.worker_count.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get().saturating_sub(1))
                .unwrap_or(1)
                .max(1)
        })
    }

    /// Create a builder for the parameters.
    pub fn builder() -> GaParamsBuilder {
        GaParamsBuilder::default()
    }
}

/// Builder for [`GaParams`].
#[derive(Default)]
pub struct GaParamsBuilder {
    params: GaParams,
}

impl GaParamsBuilder {
    pub fn population_size(mut self, size: usize) -> Self {
        self.params.population_size = size;
        self
    }

    pub fn generations(mut self, generations: usize) -> Self {
        self.params.generations = generations;
        self
    }

    pub fn crossover_prob(mut self, prob: f64) -> Self {
        self.params.crossover_prob = prob;
        self
    }

    pub fn swap_gate_mutation_prob(mut self, prob: f64) -> Self {
        self.params.swap_gate_mutation_prob = prob;
        self
    }

    pub fn operand_mutation_prob(mut self, prob: f64) -> Self {
        self.params.operand_mutation_prob = prob;
        self
    }

    pub fn swap_order_mutation_prob(mut self, prob: f64) -> Self {
        self.params.swap_order_mutation_prob = prob;
        self
    }

    pub fn chromosome_length(mut self, length: usize) -> Self {
        self.params.chromosome_length = length;
        self
    }

    pub fn fitness_threshold(mut self, threshold: f64) -> Self {
        self.params.fitness_threshold = threshold;
        self
    }

    pub fn fitness_threshold_at(mut self, rank: usize) -> Self {
        self.params.fitness_threshold_at = rank;
        self
    }

    pub fn elitism_percentage(mut self, percentage: f64) -> Self {
        self.params.elitism_percentage = percentage;
        self
    }

    pub fn tournament_size(mut self, size: usize) -> Self {
        self.params.tournament_size = size;
        self
    }

    pub fn worker_count(mut self, workers: usize) -> Self {
        self.params.worker_count = Some(workers);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.params.seed = Some(seed);
        self
    }

    pub fn log_interval(mut self, interval: usize) -> Self {
        self.params.log_interval = interval;
        self
    }

    pub fn log_average_fitness(mut self, enabled: bool) -> Self {
        self.params.log_average_fitness = enabled;
        self
    }

    /// Build and validate the parameters.
    pub fn build(self) -> EvolutionResult<GaParams> {
        self.params.validate()?;
        Ok(self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_default() {
        let params = GaParams::default();
        assert_eq!(params.population_size, 100);
        assert_eq!(params.generations, 50);
        assert_eq!(params.tournament_size, 3);
        assert!(params.log_average_fitness);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_params_validation() {
        let mut params = GaParams::default();
        params.population_size = 0;
        assert!(params.validate().is_err());

        params.population_size = 100;
        params.crossover_prob = 1.5;
        assert!(params.validate().is_err());

        params.crossover_prob = 0.5;
        params.fitness_threshold_at = 100;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_params_builder() {
        let params = GaParams::builder()
            .population_size(40)
            .generations(10)
            .crossover_prob(0.4)
            .chromosome_length(6)
            .seed(7)
            .build()
            .unwrap();

        assert_eq!(params.population_size, 40);
        assert_eq!(params.generations, 10);
        assert_eq!(params.chromosome_length, 6);
        assert_eq!(params.seed, Some(7));
    }

    #[test]
    fn test_params_json_roundtrip() {
        let params = GaParams::builder()
            .population_size(60)
            .fitness_threshold(0.02)
            .seed(9)
            .build()
            .unwrap();
        let json = serde_json::to_string(&params).unwrap();
        let restored: GaParams = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.population_size, 60);
        assert_eq!(restored.fitness_threshold, 0.02);
        assert_eq!(restored.seed, Some(9));
    }

    #[test]
    fn test_elitism_count_floors() {
        let mut params = GaParams::default();
        params.population_size = 25;
        params.elitism_percentage = 0.1;
        assert_eq!(params.elitism_count(), 2);

        params.elitism_percentage = 0.0;
        assert_eq!(params.elitism_count(), 0);
    }
}
