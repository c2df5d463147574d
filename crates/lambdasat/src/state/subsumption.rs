//! Subsumption checks

use crate::logic::{Clause, Literal};
use crate::term::TermBank;
use std::collections::HashMap;

/// `subsumes(c, d)`: `d` follows from `c` alone, so `d` is redundant when `c`
/// is kept.
pub trait Subsumption: Send + Sync {
    fn name(&self) -> &str;

    fn subsumes(&self, bank: &TermBank, c: &Clause, d: &Clause) -> bool;
}

/// Subsumption without substitution: the literals of `c` are a sub-multiset
/// of those of `d` and the trail of `c` is contained in that of `d`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralSubsetSubsumption;

impl Subsumption for LiteralSubsetSubsumption {
    fn name(&self) -> &str {
        "literal_subset"
    }

    fn subsumes(&self, _bank: &TermBank, c: &Clause, d: &Clause) -> bool {
        if c.len() > d.len() || !c.trail().subsumes(d.trail()) {
            return false;
        }
        let mut available: HashMap<Literal, usize> = HashMap::new();
        for lit in d.lits() {
            *available.entry(lit.canonical()).or_default() += 1;
        }
        c.lits().iter().all(|lit| match available.get_mut(&lit.canonical()) {
            Some(n) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        })
    }
}
