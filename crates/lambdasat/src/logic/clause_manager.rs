//! Centralized clause construction: term bank, term ordering, and clause ids.
//!
//! The `ClauseManager` is the only place clauses are created. It owns the term
//! bank every rule builds terms in, hands out clause ids in creation order, and
//! normalizes new clauses (equation orientation, trail and penalty inheritance).

use super::ordering::{Comparison, TermOrdering, WeightOrdering};
use super::{Clause, Literal, ProofStep, Trail};
use crate::term::{TermBank, TermId};
use std::sync::Arc;

/// Centralized clause management combining the term bank, the term ordering,
/// and the clause id counter.
pub struct ClauseManager {
    /// Arena of every term and type in the problem
    pub bank: TermBank,
    /// Term ordering used to orient equations
    ordering: Box<dyn TermOrdering>,
    next_id: usize,
}

impl Default for ClauseManager {
    fn default() -> Self {
        Self::new(TermBank::new())
    }
}

impl ClauseManager {
    /// Create a ClauseManager using the weight ordering
    pub fn new(bank: TermBank) -> Self {
        Self::with_ordering(bank, Box::new(WeightOrdering))
    }

    pub fn with_ordering(bank: TermBank, ordering: Box<dyn TermOrdering>) -> Self {
        ClauseManager {
            bank,
            ordering,
            next_id: 0,
        }
    }

    pub fn ordering(&self) -> &dyn TermOrdering {
        self.ordering.as_ref()
    }

    pub fn compare(&self, s: TermId, t: TermId) -> Comparison {
        self.ordering.compare(&self.bank, s, t)
    }

    /// Number of clauses created so far
    pub fn clauses_created(&self) -> usize {
        self.next_id
    }

    /// Orient an equation so that the larger side is on the left.
    pub fn orient(&self, lit: Literal) -> Literal {
        match lit {
            Literal::Equation { lhs, rhs, sign } if self.compare(lhs, rhs) == Comparison::Less => {
                Literal::Equation { lhs: rhs, rhs: lhs, sign }
            }
            other => other,
        }
    }

    /// Build a clause whose trail and penalty are inherited from the parents
    /// named in `proof`.
    pub fn mk_clause(&mut self, lits: Vec<Literal>, proof: ProofStep) -> Arc<Clause> {
        let trail = proof
            .parents()
            .iter()
            .fold(Trail::new(), |acc, p| acc.merge(p.trail()));
        let penalty = proof.parents().iter().map(|p| p.penalty()).max().unwrap_or(0);
        self.mk_clause_with(lits, trail, proof, penalty)
    }

    /// Build a clause with an explicit trail and penalty.
    pub fn mk_clause_with(
        &mut self,
        lits: Vec<Literal>,
        trail: Trail,
        proof: ProofStep,
        penalty: u32,
    ) -> Arc<Clause> {
        let lits: Vec<Literal> = lits.into_iter().map(|lit| self.orient(lit)).collect();
        let weight = lits.iter().map(|lit| lit.weight(&self.bank)).sum();
        let id = self.next_id;
        self.next_id += 1;
        Arc::new(Clause::new(id, lits, trail, proof, penalty, weight))
    }
}
