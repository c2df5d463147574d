//! Explicit substitution environments

use crate::term::TermId;
use std::rc::Rc;

#[derive(Debug)]
struct Frame {
    term: TermId,
    next: Option<Rc<Frame>>,
}

/// Immutable, push-only mapping from De Bruijn index to term.
///
/// Index 0 is the most recently pushed entry (the innermost binder). Pushing
/// shares the existing frames, so an environment can be captured by several
/// pending arguments at no cost. Entries are terms of the context outside
/// the binders the environment stands for.
#[derive(Debug, Clone, Default)]
pub struct DbEnv {
    size: usize,
    top: Option<Rc<Frame>>,
}

impl DbEnv {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push(&self, term: TermId) -> Self {
        DbEnv {
            size: self.size + 1,
            top: Some(Rc::new(Frame {
                term,
                next: self.top.clone(),
            })),
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Entry bound to index `i`, if the environment covers it
    pub fn find(&self, i: u32) -> Option<TermId> {
        self.iter().nth(i as usize)
    }

    /// Entries from index 0 upwards
    pub fn iter(&self) -> impl Iterator<Item = TermId> + '_ {
        std::iter::successors(self.top.as_deref(), |frame| frame.next.as_deref()).map(|frame| frame.term)
    }

    pub fn to_vec(&self) -> Vec<TermId> {
        self.iter().collect()
    }

    /// Identity of the shared frames; equal for clones, stable while `self` is alive
    pub(crate) fn addr(&self) -> usize {
        self.top.as_ref().map_or(0, |frame| Rc::as_ptr(frame) as usize)
    }
}
