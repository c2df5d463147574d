//! Passive clause set

use crate::logic::Clause;
use crate::selection::ClauseSelector;
use indexmap::IndexMap;
use std::sync::Arc;

/// Clauses awaiting selection, in insertion order, with the selector that
/// picks the next given clause.
pub struct PassiveSet {
    clauses: IndexMap<usize, Arc<Clause>>,
    selector: Box<dyn ClauseSelector>,
}

impl PassiveSet {
    pub fn new(mut selector: Box<dyn ClauseSelector>) -> Self {
        selector.reset();
        PassiveSet {
            clauses: IndexMap::new(),
            selector,
        }
    }

    /// Returns false if the clause is already passive.
    pub fn insert(&mut self, clause: Arc<Clause>) -> bool {
        if self.clauses.contains_key(&clause.id()) {
            return false;
        }
        self.selector.on_add(&clause);
        self.clauses.insert(clause.id(), clause);
        true
    }

    pub fn remove(&mut self, id: usize) -> Option<Arc<Clause>> {
        let clause = self.clauses.shift_remove(&id)?;
        self.selector.on_remove(id);
        Some(clause)
    }

    /// Take the clause chosen by the selector out of the set.
    pub fn next(&mut self) -> Option<Arc<Clause>> {
        let id = self.selector.select(&self.clauses)?;
        self.clauses.shift_remove(&id)
    }

    pub fn contains(&self, id: usize) -> bool {
        self.clauses.contains_key(&id)
    }

    pub fn get(&self, id: usize) -> Option<&Arc<Clause>> {
        self.clauses.get(&id)
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Clause>> + '_ {
        self.clauses.values()
    }

    pub fn clauses(&self) -> &IndexMap<usize, Arc<Clause>> {
        &self.clauses
    }

    pub fn selector_name(&self) -> &str {
        self.selector.name()
    }

    pub(crate) fn compact(&mut self) {
        self.selector.compact();
    }
}
