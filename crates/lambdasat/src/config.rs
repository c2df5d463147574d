//! Saturation configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How terms are put into eta normal form after beta normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EtaMode {
    /// Contract `λx. f x` to `f` everywhere
    #[default]
    Reduce,
    /// Bring every subterm into eta-long form
    Expand,
    /// Leave eta redexes alone
    Keep,
}

/// Configuration for the given-clause loop.
///
/// Missing fields take their default values when deserialized, so a JSON
/// document only needs to mention the knobs it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SaturationConfig {
    /// Maximum number of given-clause steps (0 = no limit)
    pub max_steps: usize,
    /// Wall-clock budget for `Saturator::run` (`None` = no limit)
    pub timeout: Option<Duration>,
    /// Drop redundant passive clauses every this many steps (0 = never)
    pub clean_passive_every: usize,
    /// Run clause-elimination hooks every this many steps (0 = never)
    pub inprocessing_every: usize,
    /// Upper bound on successive simplifications of one clause
    pub max_simplify_rounds: usize,
    /// Eta normal form used by the built-in normalization rule
    pub eta: EtaMode,
    /// Interreduce the input before the full search
    pub presaturate: bool,
    /// Collect a `SaturationProfile`
    pub enable_profiling: bool,
}

impl Default for SaturationConfig {
    fn default() -> Self {
        SaturationConfig {
            max_steps: 0,
            timeout: Some(Duration::from_secs(60)),
            clean_passive_every: 1000,
            inprocessing_every: 10,
            max_simplify_rounds: 100,
            eta: EtaMode::Reduce,
            presaturate: false,
            enable_profiling: false,
        }
    }
}

impl SaturationConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SaturationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_simplify_rounds == 0 {
            return Err(ConfigError::Invalid {
                field: "max_simplify_rounds",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Step budget as an option, mapping 0 to "unlimited".
    pub fn step_limit(&self) -> Option<usize> {
        (self.max_steps > 0).then_some(self.max_steps)
    }
}
