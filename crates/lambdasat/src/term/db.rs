//! De Bruijn index manipulation
//!
//! All traversals stop at subterms whose cached `loose_bound` shows they
//! cannot contain an affected index, so closed subterms are never rebuilt.
//! Terms are shared, so each traversal memoizes on `(term, binder depth)`
//! and visits every node of the DAG at most once per depth.

use super::{TermBank, TermId, TermNode};
use std::collections::HashMap;

type Memo<T> = HashMap<(TermId, u32), T>;

impl TermBank {
    /// Add `n` to every loose De Bruijn index of `t`.
    pub fn shift(&mut self, t: TermId, n: u32) -> TermId {
        if n == 0 {
            return t;
        }
        self.shift_from(t, n, 0, &mut Memo::new())
    }

    fn shift_from(&mut self, t: TermId, n: u32, cutoff: u32, memo: &mut Memo<TermId>) -> TermId {
        if self.loose_bound(t) <= cutoff {
            return t;
        }
        if let Some(&done) = memo.get(&(t, cutoff)) {
            return done;
        }
        let result = if let TermNode::BVar(i) = *self.node(t) {
            let ty = self.ty(t);
            self.bvar(i + n, ty)
        } else {
            self.map_children(t, |bank, s, crossed| bank.shift_from(s, n, cutoff + crossed, memo))
        };
        memo.insert((t, cutoff), result);
        result
    }

    /// Subtract `n` from every loose De Bruijn index of `t`.
    ///
    /// # Panics
    /// If `t` has a loose index below `n`, which would be captured.
    pub fn unshift(&mut self, t: TermId, n: u32) -> TermId {
        if n == 0 {
            return t;
        }
        self.unshift_from(t, n, 0, &mut Memo::new())
    }

    fn unshift_from(&mut self, t: TermId, n: u32, cutoff: u32, memo: &mut Memo<TermId>) -> TermId {
        if self.loose_bound(t) <= cutoff {
            return t;
        }
        if let Some(&done) = memo.get(&(t, cutoff)) {
            return done;
        }
        let result = if let TermNode::BVar(i) = *self.node(t) {
            assert!(i >= cutoff + n, "unshift by {n} captures loose index {}", i - cutoff);
            let ty = self.ty(t);
            self.bvar(i - n, ty)
        } else {
            self.map_children(t, |bank, s, crossed| bank.unshift_from(s, n, cutoff + crossed, memo))
        };
        memo.insert((t, cutoff), result);
        result
    }

    /// Does loose index `i` occur in `t`?
    pub fn contains_loose(&self, t: TermId, i: u32) -> bool {
        self.has_loose_in(t, i, i + 1, 0, &mut Memo::new())
    }

    /// Does some loose index smaller than `k` occur in `t`?
    pub fn has_loose_below(&self, t: TermId, k: u32) -> bool {
        self.has_loose_in(t, 0, k, 0, &mut Memo::new())
    }

    /// Loose index `j` (counted from the top of `t`) with `lo <= j < hi`.
    fn has_loose_in(&self, t: TermId, lo: u32, hi: u32, depth: u32, memo: &mut Memo<bool>) -> bool {
        if lo >= hi || self.loose_bound(t) <= depth + lo {
            return false;
        }
        if let Some(&found) = memo.get(&(t, depth)) {
            return found;
        }
        let found = match self.node(t) {
            TermNode::BVar(i) => *i >= depth + lo && *i < depth + hi,
            TermNode::App(head, args) => {
                self.has_loose_in(*head, lo, hi, depth, memo)
                    || args.iter().any(|&a| self.has_loose_in(a, lo, hi, depth, memo))
            }
            TermNode::AppBuiltin(_, args) => args.iter().any(|&a| self.has_loose_in(a, lo, hi, depth, memo)),
            TermNode::Bind(_, _, body) => self.has_loose_in(*body, lo, hi, depth + 1, memo),
            TermNode::Var(_) | TermNode::Const(_) => false,
        };
        memo.insert((t, depth), found);
        found
    }

    /// Parallel substitution of the innermost loose indices.
    ///
    /// Loose index `j < subst.len()` of `t` is replaced by `subst[j]`, a term of
    /// the context outside `t`, shifted past the binders crossed on the way down.
    /// Larger loose indices are lowered by `subst.len()`, since those binders
    /// disappear.
    pub fn instantiate(&mut self, t: TermId, subst: &[TermId]) -> TermId {
        if subst.is_empty() || self.is_closed(t) {
            return t;
        }
        self.instantiate_at(t, subst, 0, &mut Memo::new())
    }

    fn instantiate_at(&mut self, t: TermId, subst: &[TermId], depth: u32, memo: &mut Memo<TermId>) -> TermId {
        if self.loose_bound(t) <= depth {
            return t;
        }
        if let Some(&done) = memo.get(&(t, depth)) {
            return done;
        }
        let result = if let TermNode::BVar(i) = *self.node(t) {
            let j = (i - depth) as usize;
            match subst.get(j) {
                Some(&replacement) => {
                    debug_assert_eq!(self.ty(replacement), self.ty(t), "substitution changes type");
                    self.shift(replacement, depth)
                }
                None => {
                    let ty = self.ty(t);
                    self.bvar(i - subst.len() as u32, ty)
                }
            }
        } else {
            self.map_children(t, |bank, s, crossed| bank.instantiate_at(s, subst, depth + crossed, memo))
        };
        memo.insert((t, depth), result);
        result
    }
}
