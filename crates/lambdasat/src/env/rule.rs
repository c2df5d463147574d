//! Rule interfaces for saturation-based theorem proving.
//!
//! - **GeneratingInference**: rules that derive new clauses from the given
//!   clause and the active set (resolution, superposition, factoring)
//! - **SimplifyingInference**: rules that replace or delete a clause
//!   (normalization, demodulation), optionally also rewriting active clauses
//!   with a new one
//!
//! Rules never touch the proof state directly. They build clauses through the
//! [`ClauseManager`] and return them; the saturation loop commits the changes.

use crate::error::RuleError;
use crate::logic::{Clause, ClauseManager};
use crate::state::ProofState;
use crate::term::TermBank;
use std::sync::Arc;

/// Outcome of simplifying one clause.
#[derive(Debug, Clone)]
pub enum Simplified {
    /// No rule applied
    Same,
    /// The clause is replaced by these clauses; an empty list deletes it
    Replaced(Vec<Arc<Clause>>),
}

/// An active clause rewritten by backward simplification.
#[derive(Debug, Clone)]
pub struct BackwardSimplification {
    pub original: Arc<Clause>,
    pub replacements: Vec<Arc<Clause>>,
}

/// Trait for generating inference rules (resolution, superposition, factoring, etc.).
pub trait GeneratingInference: Send + Sync {
    /// Get the name of this rule
    fn name(&self) -> &str;

    /// Generate inferences between `given` and the active set, including
    /// `given` itself, which is already active when this is called.
    fn generate(
        &self,
        given: &Arc<Clause>,
        state: &ProofState,
        cm: &mut ClauseManager,
    ) -> Result<Vec<Arc<Clause>>, RuleError>;
}

/// Trait for simplification rules.
pub trait SimplifyingInference: Send + Sync {
    /// Get the name of this rule
    fn name(&self) -> &str;

    /// Forward simplification of a clause that is not in the proof state.
    fn simplify(
        &self,
        clause: &Arc<Clause>,
        state: &ProofState,
        cm: &mut ClauseManager,
    ) -> Result<Simplified, RuleError>;

    /// Backward simplification: active clauses that `given` simplifies.
    /// Default implementation simplifies nothing.
    fn simplify_backward(
        &self,
        _given: &Arc<Clause>,
        _state: &ProofState,
        _cm: &mut ClauseManager,
    ) -> Result<Vec<BackwardSimplification>, RuleError> {
        Ok(vec![])
    }
}

// =============================================================================
// Closure-backed rules
// =============================================================================

pub type UnaryInferenceFn =
    dyn Fn(&Arc<Clause>, &mut ClauseManager) -> Result<Vec<Arc<Clause>>, RuleError> + Send + Sync;
pub type SimplifyFn = dyn Fn(&Arc<Clause>, &mut ClauseManager) -> Result<Simplified, RuleError> + Send + Sync;
pub type TrivialFn = dyn Fn(&Clause, &TermBank) -> bool + Send + Sync;
pub type RedundantFn = dyn Fn(&Clause, &ProofState, &TermBank) -> bool + Send + Sync;
pub type FinalGenerateFn =
    dyn Fn(&ProofState, &mut ClauseManager) -> Result<Vec<Arc<Clause>>, RuleError> + Send + Sync;
pub type EliminationFn = dyn FnMut(&ProofState, &mut ClauseManager) -> Result<Elimination, RuleError> + Send;

/// Changes requested by a clause elimination rule.
#[derive(Debug, Clone, Default)]
pub struct Elimination {
    /// Active or passive clauses to delete
    pub removed: Vec<Arc<Clause>>,
    /// Clauses to queue in their place
    pub added: Vec<Arc<Clause>>,
}

/// Inference on the given clause alone.
pub(crate) struct UnaryInference {
    pub(crate) name: String,
    pub(crate) rule: Box<UnaryInferenceFn>,
}

impl GeneratingInference for UnaryInference {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate(
        &self,
        given: &Arc<Clause>,
        _state: &ProofState,
        cm: &mut ClauseManager,
    ) -> Result<Vec<Arc<Clause>>, RuleError> {
        (self.rule)(given, cm)
    }
}

/// Forward-only simplification on one clause.
pub(crate) struct UnarySimplification {
    pub(crate) name: String,
    pub(crate) rule: Box<SimplifyFn>,
}

impl SimplifyingInference for UnarySimplification {
    fn name(&self) -> &str {
        &self.name
    }

    fn simplify(
        &self,
        clause: &Arc<Clause>,
        _state: &ProofState,
        cm: &mut ClauseManager,
    ) -> Result<Simplified, RuleError> {
        (self.rule)(clause, cm)
    }
}
