//! Boolean trails
//!
//! A trail is the set of propositional decisions a clause depends on (as used
//! by AVATAR-style splitting). A clause with trail `T` stands for `T ⇒ C`.

use serde::Serialize;
use std::collections::BTreeSet;

/// Signed boolean decision literal
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BoolLit(i32);

impl BoolLit {
    pub fn new(var: u32, sign: bool) -> Self {
        let v = var as i32 + 1;
        BoolLit(if sign { v } else { -v })
    }

    pub fn var(self) -> u32 {
        (self.0.unsigned_abs()) - 1
    }

    pub fn sign(self) -> bool {
        self.0 > 0
    }

    pub fn negate(self) -> Self {
        BoolLit(-self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Trail(BTreeSet<BoolLit>);

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(lit: BoolLit) -> Self {
        Trail(BTreeSet::from([lit]))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, lit: BoolLit) -> bool {
        self.0.contains(&lit)
    }

    pub fn iter(&self) -> impl Iterator<Item = BoolLit> + '_ {
        self.0.iter().copied()
    }

    pub fn merge(&self, other: &Trail) -> Trail {
        Trail(self.0.union(&other.0).copied().collect())
    }

    /// Every decision of `self` is also in `other`
    pub fn subsumes(&self, other: &Trail) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Contains a decision and its negation
    pub fn is_trivial(&self) -> bool {
        self.0.iter().any(|lit| lit.sign() && self.0.contains(&lit.negate()))
    }
}

impl FromIterator<BoolLit> for Trail {
    fn from_iter<I: IntoIterator<Item = BoolLit>>(iter: I) -> Self {
        Trail(iter.into_iter().collect())
    }
}
