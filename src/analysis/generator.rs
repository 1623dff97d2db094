//! Recommendation batch generation.
//!
//! Samples candidate sets with a cold-number bias: most numbers come
//! from the coldest high pool (≥32), the rest from the coldest low
//! pool, then structural filters gate acceptance. Falls back to
//! uniform sampling when history is too thin, and climbs a relaxation
//! ladder instead of retrying forever when the pools cannot satisfy
//! the filters.

use anyhow::Result;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::analysis::filters;
use crate::analysis::frequency::FrequencyTable;
use crate::types::{Draw, NumberSet, MAX_NUMBER, SET_SIZE};

// ---------------------------------------------------------------------------
// Configuration (defaults — overridden by config.toml at runtime)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Sets per batch; the first accepted set is the primary.
    pub batch_size: usize,
    /// Coldest high numbers (≥32) eligible for sampling.
    pub high_pool: usize,
    /// Coldest low numbers (<32) eligible for sampling.
    pub low_pool: usize,
    /// Below this many historical draws, skip the frequency bias and
    /// sample uniformly (source outages must never block generation).
    pub min_history: usize,
    /// Rejected attempts tolerated per relaxation stage before the
    /// constraints are loosened.
    pub max_attempts: u32,
    /// Relative weights for drawing 4, 5, or 6 numbers from the high
    /// pool. Skewed toward 4 and 5.
    pub high_count_weights: [u32; 3],
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            high_pool: 15,
            low_pool: 25,
            min_history: 2,
            max_attempts: 1000,
            high_count_weights: [2, 2, 1],
        }
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// A generated batch plus how it was produced.
#[derive(Debug, Clone)]
pub struct GenerationBatch {
    /// Pairwise-distinct sets, in acceptance order; `sets[0]` is the
    /// primary recommendation.
    pub sets: Vec<NumberSet>,
    /// True when the whole batch came from the uniform fallback path.
    pub uniform_fallback: bool,
}

/// Frequency-biased candidate set generator.
///
/// Seedable for deterministic tests; production callers pass `None`
/// and get an OS-seeded RNG.
pub struct RecommendationGenerator {
    config: GeneratorConfig,
    high_count_dist: WeightedIndex<u32>,
    rng: StdRng,
}

impl RecommendationGenerator {
    pub fn new(config: GeneratorConfig, seed: Option<u64>) -> Result<Self> {
        let high_count_dist = WeightedIndex::new(&config.high_count_weights)?;
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Ok(Self {
            config,
            high_count_dist,
            rng,
        })
    }

    /// Produce one batch of pairwise-distinct sets.
    ///
    /// With enough history: sample `n_high ∈ {4,5,6}` numbers from the
    /// cold high pool and the rest from the cold low pool, sort, and
    /// accept iff the quota filter passes, no line pattern forms, and
    /// the set is not already in the batch. After `max_attempts`
    /// rejections the line filter is relaxed; after a second exhausted
    /// window the remainder is filled uniformly. Distinctness is never
    /// relaxed.
    pub fn generate(&mut self, history: &[Draw]) -> Result<GenerationBatch> {
        if history.len() < self.config.min_history {
            warn!(
                draws = history.len(),
                required = self.config.min_history,
                "Insufficient history — uniform fallback generation"
            );
            let sets = self.uniform_batch()?;
            return Ok(GenerationBatch {
                sets,
                uniform_fallback: true,
            });
        }

        let table = FrequencyTable::from_draws(history);
        let high_pool = table.cold_high(self.config.high_pool);
        let low_pool = table.cold_low(self.config.low_pool);
        debug!(
            draws = history.len(),
            high_pool = high_pool.len(),
            low_pool = low_pool.len(),
            "Cold pools derived"
        );

        let mut sets: Vec<NumberSet> = Vec::with_capacity(self.config.batch_size);
        let mut attempts = 0u32;
        let mut line_filter_relaxed = false;

        while sets.len() < self.config.batch_size {
            attempts += 1;
            if attempts > self.config.max_attempts {
                if !line_filter_relaxed {
                    warn!(
                        accepted = sets.len(),
                        "Attempt ceiling hit — relaxing line-pattern filter"
                    );
                    line_filter_relaxed = true;
                    attempts = 0;
                    continue;
                }
                warn!(
                    accepted = sets.len(),
                    "Attempt ceiling hit twice — filling remainder uniformly"
                );
                self.fill_uniform(&mut sets)?;
                break;
            }

            let n_high = 4 + self.high_count_dist.sample(&mut self.rng);

            let Some(mut numbers) = self.sample_distinct(&high_pool, n_high) else {
                continue;
            };
            let Some(low_picks) = self.sample_distinct(&low_pool, SET_SIZE - n_high) else {
                continue;
            };
            numbers.extend(low_picks);

            let candidate = NumberSet::from_slice(&numbers)?;
            if !filters::has_high_number_quota(&candidate) {
                continue;
            }
            if !line_filter_relaxed && filters::has_line_pattern(&candidate) {
                continue;
            }
            if sets.contains(&candidate) {
                continue;
            }
            sets.push(candidate);
        }

        Ok(GenerationBatch {
            sets,
            uniform_fallback: false,
        })
    }

    /// Draw `count` distinct numbers from `pool` without replacement.
    /// None when the pool is too small for the request.
    fn sample_distinct(&mut self, pool: &[u8], count: usize) -> Option<Vec<u8>> {
        if pool.len() < count {
            return None;
        }
        let mut available = pool.to_vec();
        let mut picked = Vec::with_capacity(count);
        for _ in 0..count {
            let idx = self.rng.random_range(0..available.len());
            picked.push(available.swap_remove(idx));
        }
        Some(picked)
    }

    /// A full batch of uniform-random distinct sets, no filters.
    fn uniform_batch(&mut self) -> Result<Vec<NumberSet>> {
        let mut sets = Vec::with_capacity(self.config.batch_size);
        self.fill_uniform(&mut sets)?;
        Ok(sets)
    }

    /// Top `sets` up to the batch size with uniform-random distinct
    /// sets. Batch distinctness still enforced.
    fn fill_uniform(&mut self, sets: &mut Vec<NumberSet>) -> Result<()> {
        let universe: Vec<u8> = (1..=MAX_NUMBER).collect();
        while sets.len() < self.config.batch_size {
            // Universe always covers a full set, so the sample succeeds.
            let Some(numbers) = self.sample_distinct(&universe, SET_SIZE) else {
                break;
            };
            let candidate = NumberSet::from_slice(&numbers)?;
            if !sets.contains(&candidate) {
                sets.push(candidate);
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
