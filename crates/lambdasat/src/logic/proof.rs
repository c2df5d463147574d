//! Proof steps and proof extraction

use super::clause::Clause;
use crate::term::TermBank;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// How a clause came to be
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofKind {
    /// Input axiom
    Assert,
    /// Input goal (negated conjecture)
    Goal,
    /// Introduced without premises by a rule, e.g. a split definition
    Trivial,
    Inference(String),
    Simplification(String),
    /// Equisatisfiable transformation
    Esa(String),
}

impl ProofKind {
    /// Steps that may legitimately have no parents
    pub fn is_leaf(&self) -> bool {
        matches!(self, ProofKind::Assert | ProofKind::Goal | ProofKind::Trivial)
    }
}

/// The rule and premises that produced a clause
#[derive(Clone)]
pub struct ProofStep {
    kind: ProofKind,
    parents: Vec<Arc<Clause>>,
}

impl ProofStep {
    pub fn assert() -> Self {
        Self::leaf(ProofKind::Assert)
    }

    pub fn goal() -> Self {
        Self::leaf(ProofKind::Goal)
    }

    pub fn trivial() -> Self {
        Self::leaf(ProofKind::Trivial)
    }

    pub fn inference(rule: impl Into<String>, parents: Vec<Arc<Clause>>) -> Self {
        ProofStep {
            kind: ProofKind::Inference(rule.into()),
            parents,
        }
    }

    pub fn simplification(rule: impl Into<String>, parents: Vec<Arc<Clause>>) -> Self {
        ProofStep {
            kind: ProofKind::Simplification(rule.into()),
            parents,
        }
    }

    pub fn esa(rule: impl Into<String>, parents: Vec<Arc<Clause>>) -> Self {
        ProofStep {
            kind: ProofKind::Esa(rule.into()),
            parents,
        }
    }

    fn leaf(kind: ProofKind) -> Self {
        ProofStep {
            kind,
            parents: Vec::new(),
        }
    }

    pub fn kind(&self) -> &ProofKind {
        &self.kind
    }

    pub fn parents(&self) -> &[Arc<Clause>] {
        &self.parents
    }

    pub fn rule_name(&self) -> &str {
        match &self.kind {
            ProofKind::Assert => "assert",
            ProofKind::Goal => "goal",
            ProofKind::Trivial => "trivial",
            ProofKind::Inference(rule) | ProofKind::Simplification(rule) | ProofKind::Esa(rule) => rule,
        }
    }
}

/// Derivations can be far deeper than the native stack, so ancestors whose
/// last handle is released here are taken apart iteratively.
impl Drop for ProofStep {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.parents);
        while let Some(parent) = pending.pop() {
            if let Some(clause) = Arc::into_inner(parent) {
                let mut step = clause.into_proof();
                pending.append(&mut step.parents);
            }
        }
    }
}

impl fmt::Debug for ProofStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parents: Vec<usize> = self.parents.iter().map(|p| p.id()).collect();
        f.debug_struct("ProofStep")
            .field("kind", &self.kind)
            .field("parents", &parents)
            .finish()
    }
}

/// The derivation of a clause: every ancestor, in id order.
///
/// Ids are assigned at creation and a clause can only name existing clauses as
/// parents, so id order is a topological order of the derivation.
#[derive(Debug, Clone)]
pub struct Proof {
    steps: Vec<Arc<Clause>>,
}

impl Proof {
    pub fn extract(root: &Arc<Clause>) -> Self {
        let mut seen = HashSet::new();
        let mut stack = vec![Arc::clone(root)];
        let mut steps = Vec::new();
        while let Some(clause) = stack.pop() {
            if !seen.insert(clause.id()) {
                continue;
            }
            stack.extend(clause.proof().parents().iter().cloned());
            steps.push(clause);
        }
        steps.sort_by_key(|c| c.id());
        Proof { steps }
    }

    pub fn steps(&self) -> &[Arc<Clause>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The clause the proof was extracted for
    pub fn root(&self) -> Option<&Arc<Clause>> {
        self.steps.last()
    }

    /// Every parent-less step is an input or trivial step
    pub fn is_grounded(&self) -> bool {
        self.steps
            .iter()
            .all(|c| !c.proof().parents().is_empty() || c.proof().kind().is_leaf())
    }

    /// Every step only depends on strictly older clauses
    pub fn is_acyclic(&self) -> bool {
        self.steps
            .iter()
            .all(|c| c.proof().parents().iter().all(|p| p.id() < c.id()))
    }

    pub fn summary(&self, bank: &TermBank) -> ProofJson {
        ProofJson {
            steps: self
                .steps
                .iter()
                .map(|c| ProofStepJson {
                    clause_id: c.id(),
                    clause: c.display(bank).to_string(),
                    rule: c.proof().rule_name().to_string(),
                    premises: c.proof().parents().iter().map(|p| p.id()).collect(),
                })
                .collect(),
            root: self.root().map(|c| c.id()),
        }
    }
}

/// JSON representation of a proof step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofStepJson {
    pub clause_id: usize,
    pub clause: String,
    pub rule: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub premises: Vec<usize>,
}

/// JSON representation of a proof
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofJson {
    pub steps: Vec<ProofStepJson>,
    pub root: Option<usize>,
}
