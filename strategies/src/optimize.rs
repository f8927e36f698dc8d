//! Parameter optimization: exhaustive grid search and a genetic algorithm
//!
//! Both optimizers treat the fitness function as a black box scoring a
//! `ParameterSet`; higher scores win. Grids use `BTreeMap` so enumeration
//! order and tie-breaking are deterministic.

use crate::error::{StrategyError, StrategyResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Named parameter values for one optimization candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterSet {
    values: HashMap<String, f64>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `name`, or UnknownParameter if absent.
    pub fn get(&self, name: &str) -> StrategyResult<f64> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| StrategyError::UnknownParameter(name.to_string()))
    }

    /// Value for `name`, or `default` if absent.
    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        self.values.get(name).copied().unwrap_or(default)
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn values(&self) -> &HashMap<String, f64> {
        &self.values
    }
}

/// Best candidate found by grid search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSearchResult {
    pub parameters: ParameterSet,
    pub score: f64,
    /// Total combinations evaluated (full Cartesian product)
    pub evaluated: usize,
}

/// Best candidate found by the genetic algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticResult {
    pub parameters: ParameterSet,
    pub score: f64,
    pub generations: usize,
}

/// Exhaustive Cartesian-product search over discrete value lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridSearchOptimizer;

impl GridSearchOptimizer {
    pub fn new() -> Self {
        Self
    }

    /// Evaluates every combination and keeps the strictly best score;
    /// first-seen wins ties. An empty grid still performs one evaluation
    /// with an empty parameter set.
    pub fn optimize<F>(
        &self,
        grid: &BTreeMap<String, Vec<f64>>,
        mut fitness: F,
    ) -> StrategyResult<GridSearchResult>
    where
        F: FnMut(&ParameterSet) -> f64,
    {
        for (name, values) in grid {
            if values.is_empty() {
                return Err(StrategyError::InvalidParameter(format!(
                    "grid parameter '{name}' has no candidate values"
                )));
            }
        }

        let names: Vec<&String> = grid.keys().collect();
        let sizes: Vec<usize> = grid.values().map(|v| v.len()).collect();
        let total: usize = sizes.iter().product();
        info!(parameters = names.len(), combinations = total, "starting grid search");

        let mut indices = vec![0usize; names.len()];
        let mut best: Option<(ParameterSet, f64)> = None;
        for _ in 0..total {
            let mut candidate = ParameterSet::new();
            for (slot, name) in names.iter().enumerate() {
                candidate.set((*name).clone(), grid[*name][indices[slot]]);
            }
            let score = fitness(&candidate);
            if best.as_ref().map_or(true, |(_, b)| score > *b) {
                debug!(score, "new grid search best");
                best = Some((candidate, score));
            }
            // Advance the odometer, last parameter fastest.
            for slot in (0..indices.len()).rev() {
                indices[slot] += 1;
                if indices[slot] < sizes[slot] {
                    break;
                }
                indices[slot] = 0;
            }
        }

        let (parameters, score) = best.unwrap_or_else(|| (ParameterSet::new(), 0.0));
        Ok(GridSearchResult {
            parameters,
            score,
            evaluated: total,
        })
    }
}

/// Genetic algorithm over continuous parameter ranges.
#[derive(Debug, Clone)]
pub struct GeneticAlgorithmOptimizer {
    pub population_size: usize,
    pub generations: usize,
    /// Per-parameter resample probability
    pub mutation_rate: f64,
    tournament_size: usize,
    random_seed: Option<u64>,
}

impl GeneticAlgorithmOptimizer {
    pub fn new(population_size: usize, generations: usize, mutation_rate: f64) -> Self {
        Self {
            population_size,
            generations,
            mutation_rate,
            tournament_size: 3,
            random_seed: None,
        }
    }

    /// Fixes the RNG seed so runs are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Evolves a population within `ranges` for exactly `generations`
    /// iterations. The best individual seen so far survives every
    /// generation unchanged, so the reported score never regresses.
    pub fn optimize<F>(
        &self,
        ranges: &BTreeMap<String, (f64, f64)>,
        mut fitness: F,
    ) -> StrategyResult<GeneticResult>
    where
        F: FnMut(&ParameterSet) -> f64,
    {
        if self.population_size == 0 {
            return Err(StrategyError::InvalidParameter(
                "population size must be positive".to_string(),
            ));
        }
        for (name, &(lo, hi)) in ranges {
            if !(lo <= hi) {
                return Err(StrategyError::InvalidParameter(format!(
                    "range for '{name}' is inverted: [{lo}, {hi}]"
                )));
            }
        }

        let mut rng = match self.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut population: Vec<ParameterSet> = (0..self.population_size)
            .map(|_| random_individual(ranges, &mut rng))
            .collect();
        let mut best: Option<(ParameterSet, f64)> = None;

        info!(
            population = self.population_size,
            generations = self.generations,
            "starting genetic optimization"
        );

        for generation in 0..self.generations {
            let scored: Vec<(ParameterSet, f64)> = population
                .drain(..)
                .map(|individual| {
                    let score = fitness(&individual);
                    (individual, score)
                })
                .collect();

            for (individual, score) in &scored {
                if best.as_ref().map_or(true, |(_, b)| *score > *b) {
                    best = Some((individual.clone(), *score));
                }
            }
            if let Some((_, score)) = &best {
                debug!(generation, best_score = score, "generation complete");
            }

            // Elitism: the best-seen genome enters the next generation as-is.
            let mut next = Vec::with_capacity(self.population_size);
            if let Some((elite, _)) = &best {
                next.push(elite.clone());
            }
            while next.len() < self.population_size {
                let a = tournament(&scored, self.tournament_size, &mut rng);
                let b = tournament(&scored, self.tournament_size, &mut rng);
                let child = self.crossover(ranges, a, b, &mut rng);
                next.push(child);
            }
            population = next;
        }

        let (parameters, score) = match best {
            Some(found) => found,
            // generations == 0: score one individual so the result is usable.
            None => {
                let individual = population
                    .into_iter()
                    .next()
                    .unwrap_or_else(ParameterSet::new);
                let score = fitness(&individual);
                (individual, score)
            }
        };

        Ok(GeneticResult {
            parameters,
            score,
            generations: self.generations,
        })
    }

    /// Per-parameter pick-one-parent crossover followed by mutation that
    /// resamples the gene uniformly within its range.
    fn crossover(
        &self,
        ranges: &BTreeMap<String, (f64, f64)>,
        a: &ParameterSet,
        b: &ParameterSet,
        rng: &mut StdRng,
    ) -> ParameterSet {
        let mut child = ParameterSet::new();
        for (name, &(lo, hi)) in ranges {
            let value = if rng.gen_bool(0.5) {
                a.get_or(name, lo)
            } else {
                b.get_or(name, lo)
            };
            let value = if rng.gen::<f64>() < self.mutation_rate {
                rng.gen_range(lo..=hi)
            } else {
                value
            };
            child.set(name.clone(), value);
        }
        child
    }
}

fn random_individual(ranges: &BTreeMap<String, (f64, f64)>, rng: &mut StdRng) -> ParameterSet {
    let mut individual = ParameterSet::new();
    for (name, &(lo, hi)) in ranges {
        individual.set(name.clone(), rng.gen_range(lo..=hi));
    }
    individual
}

/// Best of `size` uniformly drawn candidates.
fn tournament<'a>(
    scored: &'a [(ParameterSet, f64)],
    size: usize,
    rng: &mut StdRng,
) -> &'a ParameterSet {
    let mut winner = &scored[rng.gen_range(0..scored.len())];
    for _ in 1..size {
        let challenger = &scored[rng.gen_range(0..scored.len())];
        if challenger.1 > winner.1 {
            winner = challenger;
        }
    }
    &winner.0
}
