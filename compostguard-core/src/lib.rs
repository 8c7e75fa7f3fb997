//! Core fuzzy inference engine for CompostGuard
//!
//! Scores compost quality from sensor telemetry using a Mamdani fuzzy
//! inference system: fuzzification against configurable linguistic terms,
//! min/max rule evaluation with a hard safety override, and centroid
//! defuzzification onto a 0-100 quality score with four-band labeling.
//!
//! Key constraints:
//! - Pure `&self` evaluation, no hidden state, no I/O in the engine
//! - Rule bases and variable sets are external configuration, immutable
//!   after construction
//! - A malformed rule is skipped with a reported outcome, never a failure
//!
//! ```no_run
//! use compostguard_core::{FuzzyEngine, profile, config::RuleFile};
//!
//! let rules = RuleFile::load("kompos_config.json").unwrap().into_rules();
//! let engine = FuzzyEngine::new(profile::compost().with_rules(rules)).unwrap();
//!
//! let result = engine.evaluate(&[
//!     ("suhu", 45.0),
//!     ("kelembapan", 46.0),
//!     ("ph", 7.0),
//!     ("bau", 3.2),
//! ]);
//! println!("{} ({})", result.score, result.label());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
pub mod config;
pub mod defuzz;
pub mod engine;
pub mod errors;
pub mod membership;
pub mod profile;
pub mod rules;
pub mod variables;

// Public API
pub use defuzz::{OutputShapes, QualityBands};
pub use engine::{Assessment, EngineConfig, FuzzyEngine};
pub use errors::{ConfigError, ConfigResult};
pub use membership::MembershipFunction;
pub use rules::{
    AggregatedOutput, Antecedent, CompileReport, OverrideSignal, QualityClass, Rule, RuleCheck,
    SkipReason,
};
pub use variables::{LinguisticTerm, LinguisticVariable, MembershipVector, TermId, VariableSet};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
