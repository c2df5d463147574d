//! Clause selection interface for the given clause algorithm
//!
//! The passive set notifies its selector of every clause that enters or
//! leaves it, and asks the selector which clause to process next.

use crate::logic::Clause;
use indexmap::IndexMap;
use std::sync::Arc;

// =============================================================================
// ClauseSelector: signal-based interface for clause selection
// =============================================================================

/// Strategy choosing the next given clause from the passive set.
///
/// `passive` is in insertion order, so position 0 is the oldest clause.
/// A selector that keeps its own index learns about the passive set through
/// `on_add` / `on_remove`; the clause returned by `select` is removed from the
/// passive set by the caller without a further `on_remove`.
pub trait ClauseSelector: Send {
    /// Clause entered the passive set.
    fn on_add(&mut self, _clause: &Arc<Clause>) {}

    /// Clause left the passive set without being selected.
    fn on_remove(&mut self, _id: usize) {}

    /// Choose the id of a clause in `passive`.
    fn select(&mut self, passive: &IndexMap<usize, Arc<Clause>>) -> Option<usize>;

    /// Selector name for profiling.
    fn name(&self) -> &str;

    /// Reset internal state (e.g., for new problem).
    fn reset(&mut self) {}

    /// Drop bookkeeping for clauses that are no longer passive.
    fn compact(&mut self) {}
}
