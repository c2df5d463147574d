//! Clause-level logic: literals, trails, clauses, proofs and term orderings.

pub mod clause;
pub mod clause_manager;
pub mod literal;
pub mod ordering;
pub mod proof;
pub mod trail;

pub use clause::{Clause, ClauseDisplay, ClauseKey};
pub use clause_manager::ClauseManager;
pub use literal::{Literal, LiteralDisplay};
pub use ordering::{Comparison, TermOrdering, WeightOrdering};
pub use proof::{Proof, ProofJson, ProofKind, ProofStep, ProofStepJson};
pub use trail::{BoolLit, Trail};
