//! Given-clause saturation loop
//!
//! Each step of [`Saturator::given_clause_step`]:
//!
//! 1. If passive is empty, run the final generation rules. Nothing new means
//!    the set is saturated (`Sat`); otherwise the new clauses are queued.
//! 2. Take the next clause from passive and forward-simplify it. A clause that
//!    simplifies away is a redundant given clause. An empty result is a
//!    refutation (`Unsat`). The first result becomes the given clause, the
//!    others are queued again.
//! 3. Remove the active clauses the given clause subsumes, with their orphans.
//! 4. Add the given clause to the simplification set and backward-simplify
//!    the active set with it. Simplified clauses are removed, their
//!    replacements queued.
//! 5. Activate the given clause.
//! 6. Run the generating rules (unless generation is disabled) and
//!    forward-simplify what they produce.
//! 7. Queue everything new.
//! 8. Report `Unsat` if an empty clause was queued.
//!
//! The wall-clock deadline is only checked between steps.

mod profile;

pub use profile::SaturationProfile;

use crate::config::SaturationConfig;
use crate::env::Env;
use crate::error::RuleError;
use crate::logic::{Clause, Proof, ProofJson};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// State of the saturation loop after a step.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Keep going
    Unknown,
    /// Passive exhausted and nothing new derivable
    Sat,
    /// Empty clause derived
    Unsat(Arc<Clause>),
    /// Wall-clock budget exceeded
    Timeout,
    /// A rule failed
    Error(String),
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Unknown)
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, Outcome::Unsat(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Outcome::Unknown => "unknown",
            Outcome::Sat => "sat",
            Outcome::Unsat(_) => "unsat",
            Outcome::Timeout => "timeout",
            Outcome::Error(_) => "error",
        }
    }

    /// Proof of the empty clause, for `Unsat`.
    pub fn proof(&self) -> Option<Proof> {
        match self {
            Outcome::Unsat(empty) => Some(Proof::extract(empty)),
            _ => None,
        }
    }
}

/// JSON report of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub outcome: &'static str,
    pub steps: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<ProofJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<SaturationProfile>,
}

pub struct Saturator {
    pub env: Env,
    config: SaturationConfig,
    profile: Option<SaturationProfile>,
}

impl Saturator {
    pub fn new(env: Env, config: SaturationConfig) -> Self {
        let profile = config.enable_profiling.then(SaturationProfile::default);
        Saturator { env, config, profile }
    }

    pub fn config(&self) -> &SaturationConfig {
        &self.config
    }

    pub fn profile(&self) -> Option<&SaturationProfile> {
        self.profile.as_ref()
    }

    /// Queue an input clause.
    pub fn add_input(&mut self, clause: Arc<Clause>) -> bool {
        self.env.add_passive(clause)
    }

    fn record(&mut self, f: impl FnOnce(&mut SaturationProfile)) {
        if let Some(p) = self.profile.as_mut() {
            f(p);
        }
    }

    fn timer(&self) -> Option<Instant> {
        self.profile.as_ref().map(|_| Instant::now())
    }

    // === One step ===

    /// Run one given-clause step. `generating = false` disables the
    /// generating rules, final generation included.
    pub fn given_clause_step(&mut self, generating: bool) -> Outcome {
        match self.step(generating) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "rule failed, stopping saturation");
                Outcome::Error(err.to_string())
            }
        }
    }

    fn step(&mut self, generating: bool) -> Result<Outcome, RuleError> {
        let active = self.env.state.active().len();
        let passive = self.env.state.passive().len();
        self.record(|p| {
            p.steps += 1;
            p.record_sizes(active, passive);
        });

        let t0 = self.timer();
        let next = self.env.next_passive();
        if let (Some(p), Some(t)) = (self.profile.as_mut(), t0) {
            p.select_given_time += t.elapsed();
        }
        let Some(clause) = next else {
            return self.final_generation(generating);
        };

        // 2. Forward simplification of the selected clause
        let t0 = self.timer();
        let simplified = self.env.forward_simplify(&clause)?;
        if let (Some(p), Some(t)) = (self.profile.as_mut(), t0) {
            p.forward_simplify_time += t.elapsed();
        }
        if let Some(empty) = simplified.iter().find(|c| c.is_empty()) {
            info!(clause = empty.id(), "derived the empty clause");
            return Ok(Outcome::Unsat(Arc::clone(empty)));
        }
        let Some((given, siblings)) = simplified.split_first() else {
            debug!(clause = clause.id(), "given clause is redundant");
            self.record(|p| p.redundant_given += 1);
            return Ok(Outcome::Unknown);
        };
        let given = Arc::clone(given);
        debug!(clause = given.id(), given = %given.display(&self.env.cm.bank), "given clause");
        self.record(|p| p.given += 1);

        let mut fresh = Vec::new();
        fresh.extend(siblings.iter().cloned());

        // 3. Backward subsumption
        let subsumed = self.env.state.subsumed_by(&self.env.cm.bank, &given);
        let mut orphans = 0;
        for d in &subsumed {
            orphans += self.env.remove_active(d);
        }

        // 4. Backward simplification
        self.env.state.add_simpl(Arc::clone(&given));
        let t0 = self.timer();
        let (removed, replacements) = self.env.backward_simplify(&given)?;
        for d in &removed {
            orphans += self.env.remove_active(d);
        }
        for c in &replacements {
            fresh.extend(self.env.forward_simplify(c)?);
        }
        if let (Some(p), Some(t)) = (self.profile.as_mut(), t0) {
            p.backward_simplify_time += t.elapsed();
        }
        if !subsumed.is_empty() || !removed.is_empty() {
            debug!(
                subsumed = subsumed.len(),
                simplified = removed.len(),
                orphans,
                "removed active clauses"
            );
        }
        self.record(|p| {
            p.removed_subsumed += subsumed.len();
            p.removed_backward += removed.len();
            p.orphans_purged += orphans;
        });

        // 5. Activation
        self.env.state.add_active(Arc::clone(&given));

        // 6. Generation
        if generating {
            let t0 = self.timer();
            let generated = self.env.generate(&given)?;
            let count = generated.len();
            for c in &generated {
                fresh.extend(self.env.forward_simplify(c)?);
            }
            if let (Some(p), Some(t)) = (self.profile.as_mut(), t0) {
                p.generate_time += t.elapsed();
                p.clauses_generated += count;
            }
        }

        // 7-8. Queue new clauses
        Ok(self.enqueue(fresh))
    }

    /// Step 1: passive is empty.
    fn final_generation(&mut self, generating: bool) -> Result<Outcome, RuleError> {
        if !generating {
            return Ok(Outcome::Sat);
        }
        let mut fresh = Vec::new();
        for c in self.env.do_generate()? {
            fresh.extend(self.env.forward_simplify(&c)?);
        }
        if fresh.is_empty() {
            return Ok(Outcome::Sat);
        }
        match self.enqueue(fresh) {
            Outcome::Unknown if self.env.state.passive().is_empty() => Ok(Outcome::Sat),
            outcome => Ok(outcome),
        }
    }

    fn enqueue(&mut self, fresh: Vec<Arc<Clause>>) -> Outcome {
        let mut empty = None;
        let mut added = 0;
        for c in fresh {
            if empty.is_none() && c.is_empty() {
                empty = Some(Arc::clone(&c));
            }
            if self.env.add_passive(c) {
                added += 1;
            }
        }
        self.record(|p| p.clauses_added += added);
        match empty {
            Some(c) => {
                info!(clause = c.id(), "derived the empty clause");
                Outcome::Unsat(c)
            }
            None => Outcome::Unknown,
        }
    }

    // === Loops ===

    /// Run steps until a terminal outcome, the step budget or the deadline.
    ///
    /// Returns the outcome with the 0-based index of the step that produced
    /// it. Running out of steps reports `Unknown` with the number of steps
    /// taken.
    pub fn given_clause(&mut self, steps: Option<usize>, deadline: Option<Instant>) -> (Outcome, usize) {
        self.run_loop(steps, deadline, true)
    }

    fn run_loop(&mut self, steps: Option<usize>, deadline: Option<Instant>, generating: bool) -> (Outcome, usize) {
        let mut num = 0;
        loop {
            if steps.is_some_and(|limit| num >= limit) {
                info!(steps = num, "step budget exhausted");
                return (Outcome::Unknown, num);
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                info!(steps = num, "timeout");
                return (Outcome::Timeout, num);
            }
            if let Err(err) = self.run_cadences(num) {
                warn!(error = %err, "clause elimination failed, stopping saturation");
                return (Outcome::Error(err.to_string()), num);
            }
            let outcome = self.given_clause_step(generating);
            if outcome.is_terminal() {
                return (outcome, num);
            }
            num += 1;
        }
    }

    fn run_cadences(&mut self, num: usize) -> Result<(), RuleError> {
        if num == 0 {
            return Ok(());
        }
        let every = self.config.clean_passive_every;
        if every > 0 && num % every == 0 {
            let cleaned = self.env.clean_passive();
            self.record(|p| {
                p.passive_cleanings += 1;
                p.passive_cleaned += cleaned;
            });
        }
        let every = self.config.inprocessing_every;
        if every > 0 && num % every == 0 {
            let eliminated = self.env.run_elimination_rules()?;
            self.record(|p| p.eliminated += eliminated);
        }
        Ok(())
    }

    /// Interreduce the passive set without generating inferences.
    ///
    /// On reaching the fixpoint the active clauses go back to passive, so the
    /// full search starts from the interreduced set. `Sat` here only means
    /// the fixpoint was reached.
    pub fn presaturate(&mut self, steps: Option<usize>, deadline: Option<Instant>) -> (Outcome, usize) {
        let t0 = self.timer();
        let before = self.env.state.passive().len();
        let (outcome, num) = self.run_loop(steps, deadline, false);
        if matches!(outcome, Outcome::Sat) {
            let active: Vec<Arc<Clause>> = self.env.state.active().values().cloned().collect();
            for c in active {
                self.env.state.remove_active(c.id());
                self.env.state.remove_simpl(c.id());
                self.env.add_passive(c);
            }
            info!(before, after = self.env.state.passive().len(), "presaturation done");
        }
        if let (Some(p), Some(t)) = (self.profile.as_mut(), t0) {
            p.presaturate_time += t.elapsed();
        }
        (outcome, num)
    }

    /// Optional presaturation, then the full loop, within the configured
    /// step and time budgets.
    pub fn run(&mut self) -> (Outcome, usize) {
        let start = Instant::now();
        let deadline = self.config.timeout.map(|t| start + t);
        let limit = self.config.step_limit();
        info!(
            passive = self.env.state.passive().len(),
            selector = self.env.state.passive().selector_name(),
            "starting saturation"
        );

        let mut taken = 0;
        if self.config.presaturate {
            let (outcome, num) = self.presaturate(limit, deadline);
            if !matches!(outcome, Outcome::Sat) {
                self.finish(start);
                return (outcome, num);
            }
            taken = num;
        }

        let remaining = limit.map(|l| l.saturating_sub(taken));
        let (outcome, num) = self.given_clause(remaining, deadline);
        self.finish(start);
        info!(outcome = outcome.name(), steps = taken + num, "saturation finished");
        (outcome, taken + num)
    }

    fn finish(&mut self, start: Instant) {
        let selector = self.env.state.passive().selector_name().to_string();
        let stats = self.env.stats().clone();
        self.record(|p| {
            p.total_time = start.elapsed();
            p.selector_name = selector;
            p.generating_rules = stats.generated;
            p.simplification_rules = stats.simplified;
        });
    }

    /// JSON-ready report of a run.
    pub fn summary(&self, outcome: &Outcome, steps: usize) -> RunSummary {
        RunSummary {
            outcome: outcome.name(),
            steps,
            message: match outcome {
                Outcome::Error(msg) => Some(msg.clone()),
                _ => None,
            },
            proof: outcome.proof().map(|p| p.summary(&self.env.cm.bank)),
            profile: self.profile.clone(),
        }
    }
}
