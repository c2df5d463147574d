//! Clauses

use super::literal::Literal;
use super::proof::ProofStep;
use super::trail::Trail;
use crate::term::TermBank;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// A clause: a disjunction of literals guarded by a trail.
///
/// Clauses are immutable once built, apart from the redundancy flag. They are
/// created by the [`ClauseManager`](super::ClauseManager), which assigns ids in
/// creation order, and shared as `Arc<Clause>` so that proof steps can keep
/// their parents alive after the proof state forgets them.
pub struct Clause {
    id: usize,
    lits: Box<[Literal]>,
    trail: Trail,
    proof: ProofStep,
    /// Heuristic cost inherited from the parents, used by clause selection
    penalty: u32,
    weight: usize,
    redundant: AtomicBool,
}

impl Clause {
    pub(crate) fn new(
        id: usize,
        lits: Vec<Literal>,
        trail: Trail,
        proof: ProofStep,
        penalty: u32,
        weight: usize,
    ) -> Self {
        Clause {
            id,
            lits: lits.into_boxed_slice(),
            trail,
            proof,
            penalty,
            weight,
            redundant: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn lits(&self) -> &[Literal] {
        &self.lits
    }

    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// The empty clause with an empty trail: a refutation
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty() && self.trail.is_empty()
    }

    /// No literals, but possibly still depending on trail decisions
    pub fn is_false(&self) -> bool {
        self.lits.is_empty()
    }

    pub fn is_unit(&self) -> bool {
        self.lits.len() == 1
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn proof(&self) -> &ProofStep {
        &self.proof
    }

    pub(super) fn into_proof(self) -> ProofStep {
        self.proof
    }

    pub fn penalty(&self) -> u32 {
        self.penalty
    }

    /// Symbol count of all literals
    pub fn weight(&self) -> usize {
        self.weight
    }

    pub fn is_redundant(&self) -> bool {
        self.redundant.load(Ordering::Relaxed)
    }

    pub fn mark_redundant(&self) {
        self.redundant.store(true, Ordering::Relaxed);
    }

    /// Contains a trivial literal or a pair of complementary literals
    pub fn is_tautology(&self) -> bool {
        if self.lits.iter().any(Literal::is_trivial) {
            return true;
        }
        for i in 0..self.lits.len() {
            for j in (i + 1)..self.lits.len() {
                if self.lits[i].is_complementary(&self.lits[j]) {
                    return true;
                }
            }
        }
        false
    }

    pub fn is_ground(&self, bank: &TermBank) -> bool {
        self.lits.iter().flat_map(Literal::terms).all(|t| bank.is_ground(t))
    }

    pub fn key(&self) -> ClauseKey {
        ClauseKey::from_clause(self)
    }

    /// Format this clause with a term bank for name resolution
    pub fn display<'a>(&'a self, bank: &'a TermBank) -> ClauseDisplay<'a> {
        ClauseDisplay { clause: self, bank }
    }
}

impl fmt::Debug for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clause")
            .field("id", &self.id)
            .field("lits", &self.lits)
            .field("trail", &self.trail)
            .field("rule", &self.proof.rule_name())
            .field("redundant", &self.is_redundant())
            .finish()
    }
}

/// Display wrapper for Clause that includes a term bank for name resolution
pub struct ClauseDisplay<'a> {
    clause: &'a Clause,
    bank: &'a TermBank,
}

impl fmt::Display for ClauseDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clause.lits.is_empty() {
            write!(f, "⊥")?;
        } else {
            for (i, lit) in self.clause.lits.iter().enumerate() {
                if i > 0 {
                    write!(f, " ∨ ")?;
                }
                write!(f, "{}", lit.display(self.bank))?;
            }
        }
        if !self.clause.trail.is_empty() {
            write!(f, " ← ")?;
            for (i, lit) in self.clause.trail.iter().enumerate() {
                if i > 0 {
                    write!(f, " ∧ ")?;
                }
                if !lit.sign() {
                    write!(f, "¬")?;
                }
                write!(f, "b{}", lit.var())?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// ClauseKey - Structural key for clause deduplication
// =============================================================================

/// Canonical form of a clause: literals with sorted equation sides, sorted as
/// a multiset, plus the trail.
///
/// Terms are hash-consed, so two clauses that differ only in literal order or
/// in the orientation of their equations produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClauseKey {
    lits: Vec<Literal>,
    trail: Trail,
}

impl ClauseKey {
    pub fn from_clause(clause: &Clause) -> Self {
        let mut lits: Vec<Literal> = clause.lits.iter().map(Literal::canonical).collect();
        lits.sort();
        ClauseKey {
            lits,
            trail: clause.trail.clone(),
        }
    }
}
