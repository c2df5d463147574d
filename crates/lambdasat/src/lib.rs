//! lambdasat: given-clause saturation core with a higher-order normalizer
//!
//! The crate provides the parts of a superposition prover that do not depend
//! on a particular calculus:
//!
//! - a hash-consed term bank with De Bruijn binders ([`term`])
//! - beta/eta normalization of lambda terms ([`lambda`])
//! - clauses, literals, trails and proof steps ([`logic`])
//! - the active/passive/simplification sets with change events ([`state`])
//! - a rule registry ([`env`]) and the given-clause loop ([`saturate`])
//!
//! Inference rules plug in through [`Env`]; the loop itself knows no calculus.

pub mod config;
pub mod env;
pub mod error;
pub mod lambda;
pub mod logic;
pub mod saturate;
pub mod selection;
pub mod state;
pub mod term;

pub use config::{EtaMode, SaturationConfig};
pub use env::{Env, GeneratingInference, Simplified, SimplifyingInference};
pub use error::{ConfigError, InvariantError, RuleError, TermError};
pub use lambda::{eta_expand, eta_quick_reduce, eta_reduce, is_lambda_pattern, normalize, snf, whnf, DbEnv};
pub use logic::{Clause, ClauseManager, Comparison, Literal, Proof, ProofKind, ProofStep, TermOrdering, Trail};
pub use saturate::{Outcome, RunSummary, SaturationProfile, Saturator};
pub use selection::{AgeWeightSelector, ClauseSelector, FifoSelector, PriorityQueueSelector, WeightSelector};
pub use state::{ClauseEvent, ClauseSet, ClauseSetListener, ProofState, Subsumption};
pub use term::{TermBank, TermId, TyId, VarId};
