//! Clause selection strategies for the given clause algorithm
//!
//! - [`FifoSelector`]: oldest clause first
//! - [`WeightSelector`]: lightest clause first
//! - [`AgeWeightSelector`]: classic age-weight ratio heuristic
//! - [`PriorityQueueSelector`]: heap keyed by a pluggable priority, with
//!   tombstones for clauses that left the passive set

pub mod age_weight;
pub mod clause;
pub mod priority;

pub use age_weight::{AgeWeightSelector, FifoSelector, WeightSelector};
pub use clause::ClauseSelector;
pub use priority::{default_priority, Priority, PriorityFn, PriorityQueueSelector};
