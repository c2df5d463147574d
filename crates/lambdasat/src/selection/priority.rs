//! Priority-queue clause selector
//!
//! Clauses are kept in a binary heap keyed by a [`Priority`]. Removing a clause
//! from the passive set does not touch the heap: the entry becomes a tombstone
//! that is skipped when popped, and dropped in bulk by [`compact`].
//!
//! [`compact`]: ClauseSelector::compact

use crate::logic::Clause;
use indexmap::IndexMap;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::sync::Arc;

use super::ClauseSelector;

/// Lower is selected first: by class, then by weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority {
    pub class: u32,
    pub weight: usize,
}

pub type PriorityFn = Box<dyn Fn(&Clause) -> Priority + Send>;

/// Penalty class, then symbol count
pub fn default_priority(clause: &Clause) -> Priority {
    Priority {
        class: clause.penalty(),
        weight: clause.weight(),
    }
}

pub struct PriorityQueueSelector {
    /// Entries ordered by priority, then by id (older first)
    heap: BinaryHeap<Reverse<(Priority, usize)>>,
    /// Ids whose heap entry is still valid
    live: HashSet<usize>,
    tombstones: usize,
    priority: PriorityFn,
}

impl PriorityQueueSelector {
    pub fn new() -> Self {
        Self::with_priority(Box::new(default_priority))
    }

    pub fn with_priority(priority: PriorityFn) -> Self {
        PriorityQueueSelector {
            heap: BinaryHeap::new(),
            live: HashSet::new(),
            tombstones: 0,
            priority,
        }
    }

    /// Heap entries of clauses that already left the passive set
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl Default for PriorityQueueSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl ClauseSelector for PriorityQueueSelector {
    fn on_add(&mut self, clause: &Arc<Clause>) {
        let priority = (self.priority)(clause);
        self.heap.push(Reverse((priority, clause.id())));
        self.live.insert(clause.id());
    }

    fn on_remove(&mut self, id: usize) {
        if self.live.remove(&id) {
            self.tombstones += 1;
        }
    }

    fn select(&mut self, passive: &IndexMap<usize, Arc<Clause>>) -> Option<usize> {
        while let Some(Reverse((_, id))) = self.heap.pop() {
            if !self.live.remove(&id) {
                self.tombstones = self.tombstones.saturating_sub(1);
                continue;
            }
            if passive.contains_key(&id) {
                return Some(id);
            }
        }
        None
    }

    fn name(&self) -> &str {
        "PriorityQueue"
    }

    fn reset(&mut self) {
        self.heap.clear();
        self.live.clear();
        self.tombstones = 0;
    }

    fn compact(&mut self) {
        let live = &self.live;
        let mut seen = HashSet::with_capacity(live.len());
        self.heap
            .retain(|Reverse((_, id))| live.contains(id) && seen.insert(*id));
        self.tombstones = 0;
    }
}
