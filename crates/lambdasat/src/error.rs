//! Error types
//!
//! Only recoverable conditions are errors: malformed input to checked term
//! construction, a failing registered rule, and unreadable configuration.
//! Violated invariants inside the normalizer or the proof state are bugs and
//! panic instead.

use thiserror::Error;

/// Errors raised by checked term construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermError {
    #[error("cannot apply a term of non-function type `{ty}` to {args} argument(s)")]
    NotAFunction { ty: String, args: usize },

    #[error("too many arguments: type `{ty}` takes {expected}, got {found}")]
    TooManyArguments {
        ty: String,
        expected: usize,
        found: usize,
    },

    #[error("argument {position} has type `{found}`, expected `{expected}`")]
    ArgumentType {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("builtin `{builtin}` expects {expected} argument(s), got {found}")]
    BuiltinArity {
        builtin: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("builtin `{builtin}` expects arguments of type `{expected}`, got `{found}`")]
    BuiltinType {
        builtin: &'static str,
        expected: String,
        found: String,
    },
}

/// A registered inference or simplification rule failed.
///
/// The saturation loop stops and reports the message as `Outcome::Error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("rule `{rule}` failed: {message}")]
    Failed { rule: String, message: String },

    #[error("rule `{rule}` produced an ill-typed term: {source}")]
    IllTyped {
        rule: String,
        #[source]
        source: TermError,
    },
}

impl RuleError {
    pub fn failed(rule: impl Into<String>, message: impl Into<String>) -> Self {
        RuleError::Failed {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Wrap a failed checked term construction, e.g. from `TermBank::try_app`.
    pub fn ill_typed(rule: impl Into<String>, source: TermError) -> Self {
        RuleError::IllTyped {
            rule: rule.into(),
            source,
        }
    }
}

/// A proof state consistency check failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("clause {id} is both active and passive")]
    ActiveAndPassive { id: usize },

    #[error("active clause {id} is flagged redundant")]
    ActiveRedundant { id: usize },

    #[error("clause {clause} depends on clause {ancestor}, which is neither stored nor redundant")]
    DanglingAncestor { clause: usize, ancestor: usize },
}

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
