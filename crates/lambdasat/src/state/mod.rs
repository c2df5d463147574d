//! Proof state: the active, passive and simplification clause sets
//!
//! ## Clause Sets
//!
//! - **Active**: clauses already used as given clauses; generating inferences
//!   run between the given clause and this set
//! - **Passive**: clauses awaiting selection by the [`ClauseSelector`]
//! - **Simpl**: source of rewrite rules for forward simplification
//!
//! A clause is never both active and passive: [`ProofState::add_active`]
//! removes it from passive first. Clauses leaving the state for good are
//! flagged redundant, and the passive descendants of a removed active clause
//! (its orphans) are purged with it.
//!
//! Every addition and removal is reported synchronously to the listeners
//! registered on this state, in registration order.

mod passive;
mod subsumption;

pub use passive::PassiveSet;
pub use subsumption::{LiteralSubsetSubsumption, Subsumption};

use crate::error::InvariantError;
use crate::logic::{Clause, ClauseKey};
use crate::selection::{ClauseSelector, FifoSelector};
use crate::term::TermBank;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Which clause set an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClauseSet {
    Active,
    Passive,
    Simpl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClauseEvent {
    Added,
    Removed,
}

/// Observer of clause set changes.
pub trait ClauseSetListener: Send {
    fn on_event(&mut self, set: ClauseSet, event: ClauseEvent, clause: &Arc<Clause>);
}

impl<F> ClauseSetListener for F
where
    F: FnMut(ClauseSet, ClauseEvent, &Arc<Clause>) + Send,
{
    fn on_event(&mut self, set: ClauseSet, event: ClauseEvent, clause: &Arc<Clause>) {
        self(set, event, clause)
    }
}

pub struct ProofState {
    active: IndexMap<usize, Arc<Clause>>,
    passive: PassiveSet,
    simpl: IndexMap<usize, Arc<Clause>>,
    /// Keys of active and passive clauses
    known: HashMap<ClauseKey, usize>,
    /// Parent id -> ids of passive clauses inferred from it
    children: HashMap<usize, Vec<usize>>,
    listeners: Vec<Box<dyn ClauseSetListener>>,
    subsumption: Box<dyn Subsumption>,
}

impl Default for ProofState {
    fn default() -> Self {
        Self::new(Box::new(FifoSelector::new()))
    }
}

impl ProofState {
    pub fn new(selector: Box<dyn ClauseSelector>) -> Self {
        Self::with_subsumption(selector, Box::new(LiteralSubsetSubsumption))
    }

    pub fn with_subsumption(selector: Box<dyn ClauseSelector>, subsumption: Box<dyn Subsumption>) -> Self {
        ProofState {
            active: IndexMap::new(),
            passive: PassiveSet::new(selector),
            simpl: IndexMap::new(),
            known: HashMap::new(),
            children: HashMap::new(),
            listeners: Vec::new(),
            subsumption,
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn ClauseSetListener>) {
        self.listeners.push(listener);
    }

    fn notify(&mut self, set: ClauseSet, event: ClauseEvent, clause: &Arc<Clause>) {
        for listener in &mut self.listeners {
            listener.on_event(set, event, clause);
        }
    }

    // === Accessors ===

    pub fn active(&self) -> &IndexMap<usize, Arc<Clause>> {
        &self.active
    }

    pub fn passive(&self) -> &PassiveSet {
        &self.passive
    }

    pub fn simpl(&self) -> &IndexMap<usize, Arc<Clause>> {
        &self.simpl
    }

    pub fn is_active(&self, id: usize) -> bool {
        self.active.contains_key(&id)
    }

    pub fn is_passive(&self, id: usize) -> bool {
        self.passive.contains(id)
    }

    /// A clause with the same literals and trail is active or passive
    pub fn is_known(&self, clause: &Clause) -> bool {
        self.known.contains_key(&clause.key())
    }

    pub fn subsumption(&self) -> &dyn Subsumption {
        self.subsumption.as_ref()
    }

    // === Active ===

    /// Move a clause into the active set, taking it out of passive first.
    pub fn add_active(&mut self, clause: Arc<Clause>) {
        if self.active.contains_key(&clause.id()) {
            return;
        }
        if self.passive.remove(clause.id()).is_some() {
            self.notify(ClauseSet::Passive, ClauseEvent::Removed, &clause);
        }
        self.known.insert(clause.key(), clause.id());
        self.active.insert(clause.id(), Arc::clone(&clause));
        self.notify(ClauseSet::Active, ClauseEvent::Added, &clause);
    }

    pub fn remove_active(&mut self, id: usize) -> Option<Arc<Clause>> {
        let clause = self.active.shift_remove(&id)?;
        self.forget_key(&clause);
        self.notify(ClauseSet::Active, ClauseEvent::Removed, &clause);
        Some(clause)
    }

    // === Passive ===

    /// Queue a clause for selection. Returns false if it is already active or
    /// passive.
    pub fn add_passive(&mut self, clause: Arc<Clause>) -> bool {
        if self.active.contains_key(&clause.id()) || !self.passive.insert(Arc::clone(&clause)) {
            return false;
        }
        for parent in clause.proof().parents() {
            self.children.entry(parent.id()).or_default().push(clause.id());
        }
        self.known.insert(clause.key(), clause.id());
        self.notify(ClauseSet::Passive, ClauseEvent::Added, &clause);
        true
    }

    pub fn remove_passive(&mut self, id: usize) -> Option<Arc<Clause>> {
        let clause = self.passive.remove(id)?;
        self.forget_key(&clause);
        self.notify(ClauseSet::Passive, ClauseEvent::Removed, &clause);
        Some(clause)
    }

    /// Take the next clause chosen by the selector out of passive, skipping
    /// clauses flagged redundant since they were queued.
    pub fn next_passive(&mut self) -> Option<Arc<Clause>> {
        loop {
            let clause = self.passive.next()?;
            self.forget_key(&clause);
            self.notify(ClauseSet::Passive, ClauseEvent::Removed, &clause);
            if !clause.is_redundant() {
                return Some(clause);
            }
        }
    }

    /// Drop redundant passive clauses and selector tombstones. Returns the
    /// number of clauses removed.
    pub fn clean_passive(&mut self) -> usize {
        let redundant: Vec<usize> = self
            .passive
            .iter()
            .filter(|c| c.is_redundant())
            .map(|c| c.id())
            .collect();
        for &id in &redundant {
            self.remove_passive(id);
        }
        self.passive.compact();
        let passive = &self.passive;
        self.children.retain(|_, kids| {
            kids.retain(|id| passive.contains(*id));
            !kids.is_empty()
        });
        if !redundant.is_empty() {
            debug!(removed = redundant.len(), remaining = self.passive.len(), "cleaned passive set");
        }
        redundant.len()
    }

    // === Simpl ===

    pub fn add_simpl(&mut self, clause: Arc<Clause>) {
        if self.simpl.insert(clause.id(), Arc::clone(&clause)).is_none() {
            self.notify(ClauseSet::Simpl, ClauseEvent::Added, &clause);
        }
    }

    pub fn remove_simpl(&mut self, id: usize) -> Option<Arc<Clause>> {
        let clause = self.simpl.shift_remove(&id)?;
        self.notify(ClauseSet::Simpl, ClauseEvent::Removed, &clause);
        Some(clause)
    }

    // === Redundancy ===

    /// Active clauses subsumed by `clause`, excluding the clause itself.
    pub fn subsumed_by(&self, bank: &TermBank, clause: &Clause) -> Vec<Arc<Clause>> {
        self.active
            .values()
            .filter(|d| d.id() != clause.id() && self.subsumption.subsumes(bank, clause, d))
            .cloned()
            .collect()
    }

    /// Some active clause that subsumes `clause`.
    pub fn subsumes_any(&self, bank: &TermBank, clause: &Clause) -> Option<Arc<Clause>> {
        self.active
            .values()
            .find(|d| d.id() != clause.id() && self.subsumption.subsumes(bank, d, clause))
            .cloned()
    }

    /// Purge the passive descendants of a removed clause, transitively, and
    /// flag them redundant.
    pub fn remove_orphans(&mut self, clause: &Clause) -> Vec<Arc<Clause>> {
        let mut purged = Vec::new();
        let mut pending = vec![clause.id()];
        while let Some(parent) = pending.pop() {
            let Some(kids) = self.children.remove(&parent) else {
                continue;
            };
            for kid in kids {
                if let Some(orphan) = self.remove_passive(kid) {
                    orphan.mark_redundant();
                    pending.push(kid);
                    purged.push(orphan);
                }
            }
        }
        if !purged.is_empty() {
            debug!(parent = clause.id(), orphans = purged.len(), "purged orphans");
        }
        purged
    }

    /// Check set disjointness and that every ancestor of a stored clause is
    /// stored or flagged redundant.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        for (&id, clause) in &self.active {
            if self.passive.contains(id) {
                return Err(InvariantError::ActiveAndPassive { id });
            }
            if clause.is_redundant() {
                return Err(InvariantError::ActiveRedundant { id });
            }
        }
        let mut seen = HashSet::new();
        let stored = self.active.values().chain(self.passive.iter());
        for clause in stored {
            let mut stack: Vec<&Arc<Clause>> = clause.proof().parents().iter().collect();
            while let Some(ancestor) = stack.pop() {
                if !seen.insert(ancestor.id()) {
                    continue;
                }
                let id = ancestor.id();
                if !(self.active.contains_key(&id) || self.passive.contains(id) || ancestor.is_redundant()) {
                    return Err(InvariantError::DanglingAncestor {
                        clause: clause.id(),
                        ancestor: id,
                    });
                }
                stack.extend(ancestor.proof().parents());
            }
        }
        Ok(())
    }

    fn forget_key(&mut self, clause: &Clause) {
        let key = clause.key();
        if self.known.get(&key) == Some(&clause.id()) {
            self.known.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{ClauseManager, Literal, ProofStep};
    use std::sync::Mutex;

    struct Fixture {
        cm: ClauseManager,
        p: crate::term::TermId,
        q: crate::term::TermId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut cm = ClauseManager::default();
            let o = cm.bank.prop();
            let p = cm.bank.declare("p", o);
            let q = cm.bank.declare("q", o);
            Fixture { cm, p, q }
        }

        fn unit(&mut self, atom: crate::term::TermId, sign: bool) -> Arc<Clause> {
            self.cm.mk_clause(vec![Literal::prop(atom, sign)], ProofStep::assert())
        }
    }

    #[test]
    fn test_add_active_removes_from_passive() {
        let mut fx = Fixture::new();
        let c = fx.unit(fx.p, true);
        let mut state = ProofState::default();
        assert!(state.add_passive(Arc::clone(&c)));
        state.add_active(Arc::clone(&c));
        assert!(state.is_active(c.id()));
        assert!(!state.is_passive(c.id()));
        assert!(!state.add_passive(Arc::clone(&c)));
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_events_in_order() {
        let mut fx = Fixture::new();
        let c = fx.unit(fx.p, true);
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut state = ProofState::default();
        for tag in ["first", "second"] {
            let log = Arc::clone(&log);
            state.add_listener(Box::new(move |set: ClauseSet, event: ClauseEvent, clause: &Arc<Clause>| {
                log.lock().unwrap().push((tag, set, event, clause.id()));
            }));
        }

        state.add_passive(Arc::clone(&c));
        state.add_active(Arc::clone(&c));
        state.add_simpl(Arc::clone(&c));
        state.remove_simpl(c.id());
        state.remove_active(c.id());

        let log = log.lock().unwrap();
        let seen: Vec<(ClauseSet, ClauseEvent)> = log
            .iter()
            .filter(|(tag, ..)| *tag == "first")
            .map(|&(_, set, event, _)| (set, event))
            .collect();
        assert_eq!(
            seen,
            vec![
                (ClauseSet::Passive, ClauseEvent::Added),
                (ClauseSet::Passive, ClauseEvent::Removed),
                (ClauseSet::Active, ClauseEvent::Added),
                (ClauseSet::Simpl, ClauseEvent::Added),
                (ClauseSet::Simpl, ClauseEvent::Removed),
                (ClauseSet::Active, ClauseEvent::Removed),
            ]
        );
        assert_eq!(log.len(), 12);
        assert_eq!(log[0].0, "first");
        assert_eq!(log[1].0, "second");
    }

    #[test]
    fn test_next_passive_skips_redundant() {
        let mut fx = Fixture::new();
        let c1 = fx.unit(fx.p, true);
        let c2 = fx.unit(fx.q, true);
        let mut state = ProofState::default();
        state.add_passive(Arc::clone(&c1));
        state.add_passive(Arc::clone(&c2));
        c1.mark_redundant();

        assert_eq!(state.next_passive().map(|c| c.id()), Some(c2.id()));
        assert!(state.next_passive().is_none());
        assert!(!state.is_known(&c1));
    }

    #[test]
    fn test_clean_passive() {
        let mut fx = Fixture::new();
        let c1 = fx.unit(fx.p, true);
        let c2 = fx.unit(fx.q, true);
        let mut state = ProofState::default();
        state.add_passive(Arc::clone(&c1));
        state.add_passive(Arc::clone(&c2));
        c2.mark_redundant();

        assert_eq!(state.clean_passive(), 1);
        assert_eq!(state.passive().len(), 1);
        assert!(state.is_passive(c1.id()));
        assert_eq!(state.clean_passive(), 0);
    }

    #[test]
    fn test_orphans_are_purged_transitively() {
        let mut fx = Fixture::new();
        let parent = fx.unit(fx.p, true);
        let other = fx.unit(fx.q, false);
        let child = fx
            .cm
            .mk_clause(vec![Literal::prop(fx.q, true)], ProofStep::inference("r", vec![Arc::clone(&parent)]));
        let grandchild = fx.cm.mk_clause(
            vec![Literal::prop(fx.q, true), Literal::prop(fx.p, false)],
            ProofStep::inference("r", vec![Arc::clone(&child), Arc::clone(&other)]),
        );

        let mut state = ProofState::default();
        state.add_active(Arc::clone(&parent));
        state.add_active(Arc::clone(&other));
        state.add_passive(Arc::clone(&child));
        state.add_passive(Arc::clone(&grandchild));

        let removed = state.remove_active(parent.id()).unwrap();
        removed.mark_redundant();
        let purged: Vec<usize> = state.remove_orphans(&removed).iter().map(|c| c.id()).collect();

        assert_eq!(purged, vec![child.id(), grandchild.id()]);
        assert!(child.is_redundant() && grandchild.is_redundant());
        assert!(state.passive().is_empty());
        assert!(state.is_active(other.id()));
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_subsumption_queries() {
        let mut fx = Fixture::new();
        let unit = fx.unit(fx.p, true);
        let wide = fx
            .cm
            .mk_clause(vec![Literal::prop(fx.q, true), Literal::prop(fx.p, true)], ProofStep::assert());

        let mut state = ProofState::default();
        state.add_active(Arc::clone(&wide));
        let subsumed = state.subsumed_by(&fx.cm.bank, &unit);
        assert_eq!(subsumed.len(), 1);
        assert_eq!(subsumed[0].id(), wide.id());
        assert!(state.subsumes_any(&fx.cm.bank, &unit).is_none());

        state.add_active(Arc::clone(&unit));
        let wide2 = fx
            .cm
            .mk_clause(vec![Literal::prop(fx.p, true), Literal::prop(fx.q, false)], ProofStep::assert());
        assert_eq!(state.subsumes_any(&fx.cm.bank, &wide2).map(|c| c.id()), Some(unit.id()));
    }

    #[test]
    fn test_dangling_ancestor_detected() {
        let mut fx = Fixture::new();
        let parent = fx.unit(fx.p, true);
        let child = fx
            .cm
            .mk_clause(vec![Literal::prop(fx.q, true)], ProofStep::inference("r", vec![Arc::clone(&parent)]));
        let mut state = ProofState::default();
        state.add_passive(Arc::clone(&child));
        assert_eq!(
            state.check_invariants(),
            Err(InvariantError::DanglingAncestor {
                clause: child.id(),
                ancestor: parent.id()
            })
        );
        parent.mark_redundant();
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_known_keys() {
        let mut fx = Fixture::new();
        let c1 = fx.unit(fx.p, true);
        let c2 = fx.unit(fx.p, true);
        let mut state = ProofState::default();
        state.add_passive(Arc::clone(&c1));
        assert!(state.is_known(&c2));
        state.remove_passive(c1.id());
        assert!(!state.is_known(&c2));
    }
}
