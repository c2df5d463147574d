//! Age-weight heuristic clause selector
//!
//! This implements the classic age-weight ratio heuristic used in theorem provers.
//! It alternates between selecting the oldest clause (FIFO) and the lightest clause
//! (by symbol count) based on a configurable probability.

use crate::logic::Clause;
use indexmap::IndexMap;
use std::sync::Arc;

use super::ClauseSelector;

const RNG_SEED: u64 = 12345;

/// Age-weight heuristic clause selector.
///
/// This selector balances exploration (older clauses) with exploitation (lighter clauses).
/// The `age_probability` parameter controls the ratio:
/// - Higher values favor older clauses (more FIFO-like, better for completeness)
/// - Lower values favor lighter clauses (more weight-based, faster but may miss proofs)
///
/// A typical value is 0.5 (equal balance).
pub struct AgeWeightSelector {
    /// Probability of selecting by age (FIFO) vs weight
    age_probability: f64,
    /// Random number generator state (simple LCG)
    rng_state: u64,
}

impl AgeWeightSelector {
    /// Create a new age-weight selector with the given age probability.
    ///
    /// # Arguments
    /// * `age_probability` - Probability in [0, 1] of selecting the oldest clause.
    ///   The remaining probability selects the lightest clause.
    pub fn new(age_probability: f64) -> Self {
        Self {
            age_probability: age_probability.clamp(0.0, 1.0),
            rng_state: RNG_SEED,
        }
    }

    /// Create a selector with default 50% age probability.
    pub fn default_ratio() -> Self {
        Self::new(0.5)
    }

    /// Generate a random float in [0, 1)
    fn next_random(&mut self) -> f64 {
        // Simple LCG: x_{n+1} = (a * x_n + c) mod m
        self.rng_state = self
            .rng_state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1);
        (self.rng_state >> 33) as f64 / (1u64 << 31) as f64
    }

    /// Selection cost: symbol count plus inherited penalty
    fn cost(clause: &Clause) -> usize {
        clause.weight() + clause.penalty() as usize
    }

    /// Id of the lightest clause, the oldest among equals.
    fn find_lightest(passive: &IndexMap<usize, Arc<Clause>>) -> Option<usize> {
        passive
            .iter()
            .min_by_key(|(_, clause)| Self::cost(clause))
            .map(|(&id, _)| id)
    }
}

impl ClauseSelector for AgeWeightSelector {
    fn select(&mut self, passive: &IndexMap<usize, Arc<Clause>>) -> Option<usize> {
        if passive.is_empty() {
            return None;
        }
        let r = self.next_random();
        if r < self.age_probability {
            passive.get_index(0).map(|(&id, _)| id)
        } else {
            Self::find_lightest(passive)
        }
    }

    fn name(&self) -> &str {
        "AgeWeight"
    }

    fn reset(&mut self) {
        self.rng_state = RNG_SEED;
    }
}

impl Default for AgeWeightSelector {
    fn default() -> Self {
        Self::default_ratio()
    }
}

/// FIFO clause selector: always selects the oldest clause.
///
/// Equivalent to `AgeWeightSelector` with `age_probability = 1.0`.
/// Guarantees fairness (every clause is eventually selected), which
/// is important for completeness.
pub struct FifoSelector(AgeWeightSelector);

impl FifoSelector {
    pub fn new() -> Self {
        FifoSelector(AgeWeightSelector::new(1.0))
    }
}

impl Default for FifoSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl ClauseSelector for FifoSelector {
    fn select(&mut self, passive: &IndexMap<usize, Arc<Clause>>) -> Option<usize> {
        self.0.select(passive)
    }

    fn name(&self) -> &str {
        "FIFO"
    }

    fn reset(&mut self) {
        self.0.reset();
    }
}

/// Weight-based clause selector: always selects the lightest clause.
///
/// Equivalent to `AgeWeightSelector` with `age_probability = 0.0`.
pub struct WeightSelector(AgeWeightSelector);

impl WeightSelector {
    pub fn new() -> Self {
        WeightSelector(AgeWeightSelector::new(0.0))
    }
}

impl Default for WeightSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl ClauseSelector for WeightSelector {
    fn select(&mut self, passive: &IndexMap<usize, Arc<Clause>>) -> Option<usize> {
        self.0.select(passive)
    }

    fn name(&self) -> &str {
        "Weight"
    }

    fn reset(&mut self) {
        self.0.reset();
    }
}
