//! Structured profiling for the saturation loop
//!
//! Collected when `SaturationConfig::enable_profiling` is set. Instrumentation
//! is gated on `Option::None`, so a disabled profile costs nothing.

use indexmap::IndexMap;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::time::Duration;

fn secs(d: &Duration) -> f64 {
    d.as_secs_f64()
}

/// Profiling data collected during saturation.
///
/// All `Duration` fields are serialized as `f64` seconds.
#[derive(Debug, Clone, Default)]
pub struct SaturationProfile {
    // Top-level phase timings
    pub total_time: Duration,
    pub select_given_time: Duration,
    pub forward_simplify_time: Duration,
    pub backward_simplify_time: Duration,
    pub generate_time: Duration,
    pub presaturate_time: Duration,

    // Aggregate counters
    pub steps: usize,
    pub given: usize,
    pub redundant_given: usize,
    pub clauses_generated: usize,
    pub clauses_added: usize,
    pub removed_subsumed: usize,
    pub removed_backward: usize,
    pub orphans_purged: usize,
    pub passive_cleanings: usize,
    pub passive_cleaned: usize,
    pub eliminated: usize,
    pub max_active_size: usize,
    pub max_passive_size: usize,

    // Rule stats, copied from the environment when the run ends
    pub generating_rules: IndexMap<String, usize>,
    pub simplification_rules: IndexMap<String, usize>,

    pub selector_name: String,
}

impl SaturationProfile {
    /// Track the largest set sizes seen so far.
    pub fn record_sizes(&mut self, active: usize, passive: usize) {
        self.max_active_size = self.max_active_size.max(active);
        self.max_passive_size = self.max_passive_size.max(passive);
    }
}

impl Serialize for SaturationProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("SaturationProfile", 22)?;

        // Top-level phase timings
        s.serialize_field("total_time", &secs(&self.total_time))?;
        s.serialize_field("select_given_time", &secs(&self.select_given_time))?;
        s.serialize_field("forward_simplify_time", &secs(&self.forward_simplify_time))?;
        s.serialize_field("backward_simplify_time", &secs(&self.backward_simplify_time))?;
        s.serialize_field("generate_time", &secs(&self.generate_time))?;
        s.serialize_field("presaturate_time", &secs(&self.presaturate_time))?;

        // Aggregate counters
        s.serialize_field("steps", &self.steps)?;
        s.serialize_field("given", &self.given)?;
        s.serialize_field("redundant_given", &self.redundant_given)?;
        s.serialize_field("clauses_generated", &self.clauses_generated)?;
        s.serialize_field("clauses_added", &self.clauses_added)?;
        s.serialize_field("removed_subsumed", &self.removed_subsumed)?;
        s.serialize_field("removed_backward", &self.removed_backward)?;
        s.serialize_field("orphans_purged", &self.orphans_purged)?;
        s.serialize_field("passive_cleanings", &self.passive_cleanings)?;
        s.serialize_field("passive_cleaned", &self.passive_cleaned)?;
        s.serialize_field("eliminated", &self.eliminated)?;
        s.serialize_field("max_active_size", &self.max_active_size)?;
        s.serialize_field("max_passive_size", &self.max_passive_size)?;

        // Rule stats
        s.serialize_field("generating_rules", &self.generating_rules)?;
        s.serialize_field("simplification_rules", &self.simplification_rules)?;

        s.serialize_field("selector_name", &self.selector_name)?;

        s.end()
    }
}
