//! Term orderings
//!
//! The saturation core only needs a way to compare two terms; the actual
//! simplification ordering (KBO, LPO, ...) is supplied by the calculus. The
//! [`WeightOrdering`] provided here is the weight component of KBO without a
//! precedence: sound, stable under substitution, but partial on ground terms.

#[cfg(test)]
mod proptest_tests;

use crate::term::{TermBank, TermId, VarId};
use std::collections::HashMap;

/// Result of comparing two terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Less,
    Equal,
    Greater,
    Incomparable,
}

impl Comparison {
    /// The comparison with the arguments swapped
    pub fn flip(self) -> Self {
        match self {
            Comparison::Less => Comparison::Greater,
            Comparison::Greater => Comparison::Less,
            other => other,
        }
    }
}

/// A (partial) simplification ordering on terms.
pub trait TermOrdering: Send + Sync {
    fn name(&self) -> &str;

    fn compare(&self, bank: &TermBank, s: TermId, t: TermId) -> Comparison;
}

/// `s > t` iff `s` is heavier and every variable occurs in `s` at least as
/// often as in `t`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightOrdering;

impl TermOrdering for WeightOrdering {
    fn name(&self) -> &str {
        "weight"
    }

    fn compare(&self, bank: &TermBank, s: TermId, t: TermId) -> Comparison {
        if s == t {
            return Comparison::Equal;
        }
        let (ws, wt) = (bank.weight(s), bank.weight(t));
        if ws == wt {
            return Comparison::Incomparable;
        }
        let vars_s = bank.var_occurrences(s);
        let vars_t = bank.var_occurrences(t);
        if ws > wt && dominates(&vars_s, &vars_t) {
            Comparison::Greater
        } else if wt > ws && dominates(&vars_t, &vars_s) {
            Comparison::Less
        } else {
            Comparison::Incomparable
        }
    }
}

/// Every variable occurs in `big` at least as often as in `small`
fn dominates(big: &HashMap<VarId, usize>, small: &HashMap<VarId, usize>) -> bool {
    small
        .iter()
        .all(|(v, n)| big.get(v).copied().unwrap_or(0) >= *n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_ordering() {
        let mut bank = TermBank::new();
        let i = bank.base_ty("i");
        let f_ty = bank.arrow(&[i], i);
        let f = bank.declare("f", f_ty);
        let a = bank.declare("a", i);
        let b = bank.declare("b", i);
        let x = bank.var(VarId(0), i);
        let y = bank.var(VarId(1), i);
        let fa = bank.app(f, &[a]);
        let fx = bank.app(f, &[x]);
        let ffy = {
            let fy = bank.app(f, &[y]);
            bank.app(f, &[fy])
        };

        let ord = WeightOrdering;
        assert_eq!(ord.compare(&bank, fa, a), Comparison::Greater);
        assert_eq!(ord.compare(&bank, a, fa), Comparison::Less);
        assert_eq!(ord.compare(&bank, a, b), Comparison::Incomparable);
        assert_eq!(ord.compare(&bank, fx, x), Comparison::Greater);
        assert_eq!(ord.compare(&bank, fx, fx), Comparison::Equal);
        // f(f(Y)) is heavier than f(X) but lacks X
        assert_eq!(ord.compare(&bank, ffy, fx), Comparison::Incomparable);
        assert_eq!(ord.compare(&bank, fa, x), Comparison::Incomparable);
    }

    #[test]
    fn test_flip() {
        assert_eq!(Comparison::Less.flip(), Comparison::Greater);
        assert_eq!(Comparison::Incomparable.flip(), Comparison::Incomparable);
    }
}
