//! Built-In Variable Profiles
//!
//! The engine is variable-set agnostic; this module holds the default
//! compost monitoring profile with the historically calibrated breakpoints.
//! Deployments with different sensors build their own [`EngineConfig`]
//! directly.
//!
//! Variable and term names follow the deployed rule files (Indonesian), so
//! existing configurations keep resolving without translation tables.

#[cfg(not(feature = "std"))]
use alloc::vec;

use crate::engine::EngineConfig;
use crate::membership::MembershipFunction;
use crate::rules::OverrideSignal;
use crate::variables::{LinguisticTerm, LinguisticVariable};

/// Compost monitoring profile: suhu / kelembapan / ph / bau
///
/// - `suhu` — temperature in °C, 0-80
/// - `kelembapan` — moisture content in %, 0-100
/// - `ph` — acidity, 0-14
/// - `bau` — odor proxy, fed the predicted ammonia estimate in ppm
///
/// The `bau bau_busuk` (rotten) trapezoid doubles as the safety override:
/// once ammonia climbs into its plateau, the `poor` band is floored at 1.0
/// regardless of what the rule base concludes.
///
/// Returned with an empty rule base; chain
/// [`with_rules`](EngineConfig::with_rules) to attach the loaded rule file.
pub fn compost() -> EngineConfig {
    EngineConfig {
        variables: vec![
            LinguisticVariable::new(
                "suhu",
                vec![
                    LinguisticTerm::new("dingin", MembershipFunction::trapezoid(0.0, 0.0, 28.0, 35.0)),
                    LinguisticTerm::new("ideal", MembershipFunction::triangle(30.0, 45.0, 55.0)),
                    LinguisticTerm::new("panas", MembershipFunction::trapezoid(50.0, 60.0, 80.0, 80.0)),
                ],
            ),
            LinguisticVariable::new(
                "kelembapan",
                vec![
                    LinguisticTerm::new("kering", MembershipFunction::trapezoid(0.0, 0.0, 30.0, 40.0)),
                    LinguisticTerm::new("sedang", MembershipFunction::triangle(40.0, 46.0, 52.0)),
                    LinguisticTerm::new("basah", MembershipFunction::trapezoid(50.0, 60.0, 100.0, 100.0)),
                ],
            ),
            LinguisticVariable::new(
                "ph",
                vec![
                    LinguisticTerm::new("asam", MembershipFunction::trapezoid(0.0, 0.0, 5.0, 6.0)),
                    LinguisticTerm::new("netral", MembershipFunction::triangle(5.0, 7.0, 9.0)),
                    LinguisticTerm::new("basa", MembershipFunction::trapezoid(8.0, 9.0, 14.0, 14.0)),
                ],
            ),
            LinguisticVariable::new(
                "bau",
                vec![
                    LinguisticTerm::new("tidak_bau", MembershipFunction::trapezoid(0.0, 0.0, 10.0, 20.0)),
                    LinguisticTerm::new("cukup_bau", MembershipFunction::triangle(15.0, 30.0, 45.0)),
                    LinguisticTerm::new("bau_busuk", MembershipFunction::trapezoid(40.0, 60.0, 100.0, 100.0)),
                ],
            ),
        ],
        rules: vec![],
        overrides: vec![OverrideSignal::new("bau", "bau_busuk")],
        output: Default::default(),
        bands: Default::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FuzzyEngine;

    #[test]
    fn profile_builds_cleanly() {
        let engine = FuzzyEngine::new(compost()).unwrap();
        assert_eq!(engine.rule_count(), 0);
        assert_eq!(engine.variables().variables().len(), 4);
        assert_eq!(engine.variables().term_count(), 12);
    }

    #[test]
    fn profile_terms_resolve() {
        let engine = FuzzyEngine::new(compost()).unwrap();
        let vars = engine.variables();
        assert!(vars.resolve("suhu", "ideal").is_some());
        assert!(vars.resolve("kelembapan", "Sedang").is_some());
        assert!(vars.resolve("ph", "netral").is_some());
        assert!(vars.resolve("bau", "Bau Busuk").is_some());
    }
}
