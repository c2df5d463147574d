//! Rule registry and orchestration
//!
//! An [`Env`] owns the clause manager and the proof state, and applies the
//! registered rules to them. Calculi plug in through the registration methods
//! (`add_generating`, `add_unary_inf`, `add_simplify`, `add_is_trivial`, ...)
//! without the saturation loop knowing which rules exist.
//!
//! Lambda normalization, literal cleanup, tautology deletion and trail
//! triviality are registered on every environment.

mod builtin;
mod rule;

pub use builtin::{LambdaNormalization, LiteralCleanup};
pub use rule::{
    BackwardSimplification, Elimination, EliminationFn, FinalGenerateFn, GeneratingInference, RedundantFn,
    Simplified, SimplifyFn, SimplifyingInference, TrivialFn, UnaryInferenceFn,
};

use crate::config::SaturationConfig;
use crate::error::RuleError;
use crate::logic::{Clause, ClauseManager};
use crate::state::{ClauseSetListener, ProofState};
use crate::term::TermBank;
use indexmap::IndexMap;
use rule::{UnaryInference, UnarySimplification};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{trace, warn};

/// Counters maintained by the environment.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnvStats {
    /// Clauses produced, per generating rule
    pub generated: IndexMap<String, usize>,
    /// Successful applications, per simplification rule
    pub simplified: IndexMap<String, usize>,
    pub trivial: usize,
    pub redundant: usize,
    pub duplicates: usize,
    /// Rounds cut short by the simplification cap
    pub simplify_cap_hits: usize,
}

pub struct Env {
    pub cm: ClauseManager,
    pub state: ProofState,
    max_simplify_rounds: usize,
    generating: Vec<Box<dyn GeneratingInference>>,
    simplifying: Vec<Box<dyn SimplifyingInference>>,
    trivial_checks: Vec<Box<TrivialFn>>,
    redundancy_checks: Vec<Box<RedundantFn>>,
    final_generators: Vec<Box<FinalGenerateFn>>,
    eliminations: Vec<Box<EliminationFn>>,
    stats: EnvStats,
}

impl Env {
    pub fn new(cm: ClauseManager, state: ProofState, config: &SaturationConfig) -> Self {
        let mut env = Env {
            cm,
            state,
            max_simplify_rounds: config.max_simplify_rounds.max(1),
            generating: Vec::new(),
            simplifying: Vec::new(),
            trivial_checks: Vec::new(),
            redundancy_checks: Vec::new(),
            final_generators: Vec::new(),
            eliminations: Vec::new(),
            stats: EnvStats::default(),
        };
        env.add_simplification(Box::new(LambdaNormalization::new(config.eta)));
        env.add_simplification(Box::new(LiteralCleanup));
        env.add_is_trivial(|c: &Clause, _: &TermBank| c.is_tautology());
        env.add_is_trivial(|c: &Clause, _: &TermBank| c.trail().is_trivial());
        env
    }

    // === Registration ===

    /// Binary (or any) generating inference against the active set
    pub fn add_generating(&mut self, rule: Box<dyn GeneratingInference>) {
        self.generating.push(rule);
    }

    /// Generating inference on the given clause alone
    pub fn add_unary_inf<F>(&mut self, name: &str, rule: F)
    where
        F: Fn(&Arc<Clause>, &mut ClauseManager) -> Result<Vec<Arc<Clause>>, RuleError> + Send + Sync + 'static,
    {
        self.generating.push(Box::new(UnaryInference {
            name: name.to_string(),
            rule: Box::new(rule),
        }));
    }

    /// Simplification with a backward part
    pub fn add_simplification(&mut self, rule: Box<dyn SimplifyingInference>) {
        self.simplifying.push(rule);
    }

    /// Forward simplification of a single clause
    pub fn add_simplify<F>(&mut self, name: &str, rule: F)
    where
        F: Fn(&Arc<Clause>, &mut ClauseManager) -> Result<Simplified, RuleError> + Send + Sync + 'static,
    {
        self.simplifying.push(Box::new(UnarySimplification {
            name: name.to_string(),
            rule: Box::new(rule),
        }));
    }

    pub fn add_is_trivial<F>(&mut self, check: F)
    where
        F: Fn(&Clause, &TermBank) -> bool + Send + Sync + 'static,
    {
        self.trivial_checks.push(Box::new(check));
    }

    pub fn add_redundant<F>(&mut self, check: F)
    where
        F: Fn(&Clause, &ProofState, &TermBank) -> bool + Send + Sync + 'static,
    {
        self.redundancy_checks.push(Box::new(check));
    }

    /// Generation run when the passive set is empty
    pub fn add_generate<F>(&mut self, rule: F)
    where
        F: Fn(&ProofState, &mut ClauseManager) -> Result<Vec<Arc<Clause>>, RuleError> + Send + Sync + 'static,
    {
        self.final_generators.push(Box::new(rule));
    }

    /// Rule run periodically by the saturation loop to delete clauses
    pub fn add_clause_elimination_rule<F>(&mut self, rule: F)
    where
        F: FnMut(&ProofState, &mut ClauseManager) -> Result<Elimination, RuleError> + Send + 'static,
    {
        self.eliminations.push(Box::new(rule));
    }

    pub fn add_listener(&mut self, listener: Box<dyn ClauseSetListener>) {
        self.state.add_listener(listener);
    }

    pub fn stats(&self) -> &EnvStats {
        &self.stats
    }

    pub fn rule_names(&self) -> (Vec<&str>, Vec<&str>) {
        (
            self.generating.iter().map(|r| r.name()).collect(),
            self.simplifying.iter().map(|r| r.name()).collect(),
        )
    }

    // === Queries ===

    pub fn next_passive(&mut self) -> Option<Arc<Clause>> {
        self.state.next_passive()
    }

    pub fn is_trivial(&self, clause: &Clause) -> bool {
        self.trivial_checks.iter().any(|check| check(clause, &self.cm.bank))
    }

    /// Subsumed by an active clause, or rejected by a registered check
    pub fn is_redundant(&self, clause: &Clause) -> bool {
        self.state.subsumes_any(&self.cm.bank, clause).is_some()
            || self
                .redundancy_checks
                .iter()
                .any(|check| check(clause, &self.state, &self.cm.bank))
    }

    // === Simplification ===

    /// First simplification rule that applies, with the rule name.
    fn simplify_step(&mut self, clause: &Arc<Clause>) -> Result<Option<Vec<Arc<Clause>>>, RuleError> {
        for rule in &self.simplifying {
            if let Simplified::Replaced(out) = rule.simplify(clause, &self.state, &mut self.cm)? {
                *self.stats.simplified.entry(rule.name().to_string()).or_default() += 1;
                trace!(rule = rule.name(), clause = clause.id(), results = out.len(), "simplified");
                return Ok(Some(out));
            }
        }
        Ok(None)
    }

    /// Apply the simplification rules to a fixpoint.
    ///
    /// `clause` must not be in the proof state. Replaced clauses are flagged
    /// redundant. The result is empty when the clause simplifies to trivial
    /// clauses only, and keeps the order rules produced, so the first element
    /// descends from the first replacement.
    pub fn all_simplify(&mut self, clause: &Arc<Clause>) -> Result<Vec<Arc<Clause>>, RuleError> {
        let mut done = Vec::new();
        let mut work = vec![(Arc::clone(clause), 0usize)];
        while let Some((c, rounds)) = work.pop() {
            if self.is_trivial(&c) {
                self.stats.trivial += 1;
                c.mark_redundant();
                continue;
            }
            if rounds >= self.max_simplify_rounds {
                self.stats.simplify_cap_hits += 1;
                warn!(clause = c.id(), rounds, "simplification round cap reached");
                done.push(c);
                continue;
            }
            match self.simplify_step(&c)? {
                None => done.push(c),
                Some(out) => {
                    c.mark_redundant();
                    work.extend(out.into_iter().rev().map(|r| (r, rounds + 1)));
                }
            }
        }
        Ok(done)
    }

    /// Simplify, then drop results that are redundant with respect to the
    /// active set.
    pub fn forward_simplify(&mut self, clause: &Arc<Clause>) -> Result<Vec<Arc<Clause>>, RuleError> {
        let simplified = self.all_simplify(clause)?;
        let mut kept = Vec::with_capacity(simplified.len());
        for c in simplified {
            if self.is_redundant(&c) {
                self.stats.redundant += 1;
                c.mark_redundant();
            } else {
                kept.push(c);
            }
        }
        Ok(kept)
    }

    /// Active clauses simplified by `given`, and the clauses replacing them.
    ///
    /// Nothing is removed here: the caller takes the originals out of the
    /// state with [`Env::remove_active`].
    pub fn backward_simplify(
        &mut self,
        given: &Arc<Clause>,
    ) -> Result<(Vec<Arc<Clause>>, Vec<Arc<Clause>>), RuleError> {
        let mut removed = Vec::new();
        let mut added = Vec::new();
        let mut seen = HashSet::new();
        for rule in &self.simplifying {
            for simp in rule.simplify_backward(given, &self.state, &mut self.cm)? {
                let id = simp.original.id();
                if id == given.id() || !self.state.is_active(id) || !seen.insert(id) {
                    continue;
                }
                *self.stats.simplified.entry(rule.name().to_string()).or_default() += 1;
                trace!(rule = rule.name(), clause = id, by = given.id(), "backward simplified");
                removed.push(simp.original);
                added.extend(simp.replacements);
            }
        }
        Ok((removed, added))
    }

    // === Generation ===

    /// Apply every generating rule to the given clause.
    pub fn generate(&mut self, given: &Arc<Clause>) -> Result<Vec<Arc<Clause>>, RuleError> {
        let mut out = Vec::new();
        for rule in &self.generating {
            let new = rule.generate(given, &self.state, &mut self.cm)?;
            *self.stats.generated.entry(rule.name().to_string()).or_default() += new.len();
            out.extend(new);
        }
        Ok(out)
    }

    /// Final generation without a given clause, used once passive is empty.
    pub fn do_generate(&mut self) -> Result<Vec<Arc<Clause>>, RuleError> {
        let mut out = Vec::new();
        for rule in &self.final_generators {
            out.extend(rule(&self.state, &mut self.cm)?);
        }
        Ok(out)
    }

    // === State changes ===

    /// Queue a clause unless an identical clause is already stored.
    pub fn add_passive(&mut self, clause: Arc<Clause>) -> bool {
        if self.state.is_known(&clause) {
            self.stats.duplicates += 1;
            clause.mark_redundant();
            return false;
        }
        self.state.add_passive(clause)
    }

    /// Delete an active clause: from active and simpl, flag it redundant and
    /// purge its orphans. Returns the number of orphans.
    pub fn remove_active(&mut self, clause: &Arc<Clause>) -> usize {
        self.state.remove_active(clause.id());
        self.state.remove_simpl(clause.id());
        clause.mark_redundant();
        self.state.remove_orphans(clause).len()
    }

    pub fn clean_passive(&mut self) -> usize {
        self.state.clean_passive()
    }

    /// Run the clause elimination rules and apply their changes. Returns the
    /// number of clauses deleted.
    pub fn run_elimination_rules(&mut self) -> Result<usize, RuleError> {
        let mut changes = Vec::with_capacity(self.eliminations.len());
        for rule in &mut self.eliminations {
            changes.push(rule(&self.state, &mut self.cm)?);
        }
        let mut deleted = 0;
        for Elimination { removed, added } in changes {
            for clause in removed {
                if self.state.is_active(clause.id()) {
                    self.remove_active(&clause);
                    deleted += 1;
                } else if self.state.remove_passive(clause.id()).is_some() {
                    clause.mark_redundant();
                    self.state.remove_orphans(&clause);
                    deleted += 1;
                }
            }
            for clause in added {
                for c in self.forward_simplify(&clause)? {
                    self.add_passive(c);
                }
            }
        }
        Ok(deleted)
    }
}
