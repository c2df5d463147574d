//! Simplifications registered on every environment

use super::rule::{Simplified, SimplifyingInference};
use crate::config::EtaMode;
use crate::error::RuleError;
use crate::lambda::normalize;
use crate::logic::{Clause, ClauseManager, Literal, ProofStep};
use crate::state::ProofState;
use std::sync::Arc;

/// Beta normal form of every term, followed by the configured eta form.
#[derive(Debug, Clone, Copy)]
pub struct LambdaNormalization {
    eta: EtaMode,
}

impl LambdaNormalization {
    pub fn new(eta: EtaMode) -> Self {
        LambdaNormalization { eta }
    }
}

impl SimplifyingInference for LambdaNormalization {
    fn name(&self) -> &str {
        "lambda_normalize"
    }

    fn simplify(
        &self,
        clause: &Arc<Clause>,
        _state: &ProofState,
        cm: &mut ClauseManager,
    ) -> Result<Simplified, RuleError> {
        let bank = &mut cm.bank;
        let eta = self.eta;
        let lits: Vec<Literal> = clause
            .lits()
            .iter()
            .map(|lit| lit.map_terms(|t| normalize(bank, t, eta)))
            .collect();
        if lits.as_slice() == clause.lits() {
            return Ok(Simplified::Same);
        }
        let proof = ProofStep::simplification(self.name(), vec![Arc::clone(clause)]);
        Ok(Simplified::Replaced(vec![cm.mk_clause(lits, proof)]))
    }
}

/// Folds connectives at the root of atoms, drops absurd and repeated
/// literals, and deletes clauses with a trivial literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralCleanup;

impl SimplifyingInference for LiteralCleanup {
    fn name(&self) -> &str {
        "literal_cleanup"
    }

    fn simplify(
        &self,
        clause: &Arc<Clause>,
        _state: &ProofState,
        cm: &mut ClauseManager,
    ) -> Result<Simplified, RuleError> {
        let mut lits: Vec<Literal> = Vec::with_capacity(clause.len());
        let mut changed = false;
        for lit in clause.lits() {
            let folded = lit.fold_builtins(&cm.bank);
            changed |= folded != *lit;
            if folded.is_trivial() {
                return Ok(Simplified::Replaced(vec![]));
            }
            if folded.is_absurd() || lits.iter().any(|l| l.canonical() == folded.canonical()) {
                changed = true;
                continue;
            }
            lits.push(folded);
        }
        if !changed {
            return Ok(Simplified::Same);
        }
        let proof = ProofStep::simplification(self.name(), vec![Arc::clone(clause)]);
        Ok(Simplified::Replaced(vec![cm.mk_clause(lits, proof)]))
    }
}
