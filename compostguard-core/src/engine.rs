//! Engine Assembly: Configuration In, Assessments Out
//!
//! ## Overview
//!
//! [`FuzzyEngine`] wires the three pipeline stages together behind a single
//! pure function: crisp named inputs → membership degrees → aggregated rule
//! strengths → crisp score → quality band. All configuration (variable set,
//! rule base, output shapes, override signals, band thresholds) is injected
//! at construction and immutable afterwards — no module-level state, so
//! engines can be built per test, shared across tasks, or swapped atomically
//! for hot reloads.
//!
//! ## Evaluation Is Total
//!
//! `evaluate` cannot fail. Unknown input names are ignored, variables without
//! an input fuzzify to zero, unresolvable rules were already skipped at
//! compile time, and a zero defuzzification area scores 0. Feeding the same
//! inputs to the same engine twice yields bit-identical results.
//!
//! ```rust
//! use compostguard_core::{engine::FuzzyEngine, profile, rules::{Antecedent, Rule}};
//!
//! let config = profile::compost().with_rules(vec![Rule::new(
//!     vec![
//!         Antecedent::new("suhu", "ideal"),
//!         Antecedent::new("kelembapan", "sedang"),
//!         Antecedent::new("ph", "netral"),
//!     ],
//!     "sangat_baik",
//! )]);
//! let engine = FuzzyEngine::new(config).unwrap();
//!
//! let result = engine.evaluate(&[
//!     ("suhu", 45.0),
//!     ("kelembapan", 46.0),
//!     ("ph", 7.0),
//!     ("bau", 0.0),
//! ]);
//! assert!(result.score > 90.0);
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::defuzz::{OutputShapes, QualityBands};
use crate::errors::ConfigResult;
use crate::rules::{
    AggregatedOutput, CompileReport, OverrideSignal, QualityClass, Rule, RuleBase,
};
use crate::variables::{LinguisticVariable, VariableSet};

/// Complete engine configuration, built from a profile plus external rules
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Input variables with their term shapes
    pub variables: Vec<LinguisticVariable>,
    /// Rule list, usually loaded from a rule file
    pub rules: Vec<Rule>,
    /// Danger signals flooring the `poor` band
    pub overrides: Vec<OverrideSignal>,
    /// Output-side shapes for defuzzification
    pub output: OutputShapes,
    /// Label thresholds
    pub bands: QualityBands,
}

impl EngineConfig {
    /// Replace the rule list
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }
}

/// Result of one inference pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    /// Crisp composite quality score in [0, 100]
    pub score: f32,
    /// Band the score falls in
    pub class: QualityClass,
    /// Aggregated per-class degrees, for diagnostics and dashboards
    pub aggregated: AggregatedOutput,
}

impl Assessment {
    /// Canonical label for the band
    pub fn label(&self) -> &'static str {
        self.class.name()
    }
}

/// The assembled, immutable inference engine
///
/// Stateless across invocations; `evaluate` takes `&self` and is safe to
/// call concurrently.
#[derive(Debug, Clone)]
pub struct FuzzyEngine {
    variables: VariableSet,
    rules: RuleBase,
    output: OutputShapes,
    bands: QualityBands,
    report: CompileReport,
}

impl FuzzyEngine {
    /// Validate configuration and compile the rule base
    ///
    /// Fails only on structural configuration problems (bad shapes, bad
    /// bands, duplicate names). Individually malformed rules do not fail
    /// construction — consult [`FuzzyEngine::compile_report`].
    pub fn new(config: EngineConfig) -> ConfigResult<Self> {
        config.bands.validate()?;
        let variables = VariableSet::new(config.variables)?;
        let (rules, report) = RuleBase::compile(&config.rules, &config.overrides, &variables);

        Ok(Self {
            variables,
            rules,
            output: config.output,
            bands: config.bands,
            report,
        })
    }

    /// Per-rule compile outcomes from construction
    pub fn compile_report(&self) -> &CompileReport {
        &self.report
    }

    /// Number of rules participating in inference
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// The interned variable set (for resolving diagnostic lookups)
    pub fn variables(&self) -> &VariableSet {
        &self.variables
    }

    /// Run one full inference pass over crisp named inputs
    pub fn evaluate(&self, inputs: &[(&str, f32)]) -> Assessment {
        let mv = self.variables.fuzzify(inputs);
        let aggregated = self.rules.infer(&mv);
        let score = self.output.centroid(&aggregated);

        Assessment {
            score,
            class: self.bands.classify(score),
            aggregated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile;
    use crate::rules::Antecedent;

    #[test]
    fn empty_rule_base_scores_zero() {
        let engine = FuzzyEngine::new(profile::compost()).unwrap();
        let result = engine.evaluate(&[("suhu", 45.0), ("kelembapan", 46.0), ("ph", 7.0)]);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.class, QualityClass::Poor);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let config = profile::compost().with_rules(vec![Rule::new(
            vec![Antecedent::new("suhu", "ideal"), Antecedent::new("ph", "netral")],
            "good",
        )]);
        let engine = FuzzyEngine::new(config).unwrap();

        let inputs = [("suhu", 43.7), ("kelembapan", 48.2), ("ph", 6.9), ("bau", 12.0)];
        let a = engine.evaluate(&inputs);
        let b = engine.evaluate(&inputs);
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_input_names_are_ignored() {
        let engine = FuzzyEngine::new(profile::compost()).unwrap();
        let with_extra =
            engine.evaluate(&[("suhu", 45.0), ("co2", 900.0), ("kelembapan", 46.0)]);
        let without = engine.evaluate(&[("suhu", 45.0), ("kelembapan", 46.0)]);
        assert_eq!(with_extra, without);
    }
}
