//! Rule Base Compilation and Mamdani Inference
//!
//! ## Overview
//!
//! Rules arrive from external configuration as name-based records:
//! `IF (var_1 = term_1 AND ... AND var_k = term_k) THEN quality_class`.
//! Before any inference runs, the rule list is *compiled* against a
//! [`VariableSet`]: every antecedent name pair resolves to a dense [`TermId`]
//! and every consequent to a [`QualityClass`]. The hot path then works purely
//! on indices.
//!
//! ## Compile Outcomes, Not Exceptions
//!
//! A rule that references an unknown variable, term, or quality class is not
//! an error — it is recorded as a [`RuleCheck::Skipped`] outcome in the
//! [`CompileReport`] and inference continues with the remaining rules. One
//! malformed entry must never abort the pipeline; callers log the report and
//! move on.
//!
//! ## Inference Semantics
//!
//! - Antecedent conjunction: minimum of the antecedent degrees (Mamdani AND)
//! - Aggregation across rules with the same consequent: maximum (Mamdani OR)
//! - Aggregation is commutative, so rule order never affects the result
//!
//! ## Safety Override
//!
//! Designated danger signals — `(variable, term)` pairs such as the odor
//! variable's "rotten" trapezoid — floor the `poor` aggregate at the maximum
//! of their membership degrees, independent of the configurable rule base.
//! Rules cannot be configured to suppress the floor.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use crate::variables::{MembershipVector, TermId, VariableSet};

// Optional logging, mirrored from the std-only `log` dependency
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {{}};
}

/// Upper bound on antecedents per rule
///
/// Historical rule bases use at most 4 (suhu, kelembapan, ph, bau); 8 leaves
/// headroom without unbounded allocation in the compiled representation.
pub const MAX_RULE_TERMS: usize = 8;

/// The fixed, ordered set of output quality bands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum QualityClass {
    /// Compost is in poor condition
    Poor = 0,
    /// Acceptable but needs attention
    Medium = 1,
    /// Healthy composting process
    Good = 2,
    /// Ideal conditions, mature compost
    VeryGood = 3,
}

impl QualityClass {
    /// Number of quality classes
    pub const COUNT: usize = 4;

    /// All classes in band order
    pub const ALL: [QualityClass; 4] = [
        QualityClass::Poor,
        QualityClass::Medium,
        QualityClass::Good,
        QualityClass::VeryGood,
    ];

    /// Dense index for array addressing
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Canonical label
    pub const fn name(self) -> &'static str {
        match self {
            QualityClass::Poor => "poor",
            QualityClass::Medium => "medium",
            QualityClass::Good => "good",
            QualityClass::VeryGood => "very_good",
        }
    }

    /// Parse a configured class name
    ///
    /// Accepts the canonical names and the historical Indonesian spellings
    /// used by the deployed rule files, case- and space-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match crate::variables::canon(name).as_str() {
            "poor" | "buruk" => Some(QualityClass::Poor),
            "medium" | "sedang" | "cukup" => Some(QualityClass::Medium),
            "good" | "baik" => Some(QualityClass::Good),
            "very_good" | "sangat_baik" => Some(QualityClass::VeryGood),
            _ => None,
        }
    }
}

/// One `variable = term` condition in a rule
#[derive(Debug, Clone, PartialEq)]
pub struct Antecedent {
    /// Variable name as configured
    pub variable: String,
    /// Term name as configured
    pub term: String,
}

impl Antecedent {
    /// Build a condition from configured names (resolution happens at compile)
    pub fn new(variable: &str, term: &str) -> Self {
        Self {
            variable: variable.into(),
            term: term.into(),
        }
    }
}

/// A rule as loaded from external configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Optional identifier from the rule file, for diagnostics
    pub id: Option<u32>,
    /// Conjunctive conditions; each should name a distinct variable
    pub antecedents: Vec<Antecedent>,
    /// Consequent quality class name as configured
    pub consequent: String,
}

impl Rule {
    /// Build a rule from conditions and a consequent class name
    pub fn new(antecedents: Vec<Antecedent>, consequent: &str) -> Self {
        Self {
            id: None,
            antecedents,
            consequent: consequent.into(),
        }
    }

    /// Attach the rule-file identifier
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }
}

/// A danger signal flooring the `poor` aggregate
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideSignal {
    /// Variable carrying the danger term
    pub variable: String,
    /// Term whose membership degree becomes the floor
    pub term: String,
}

impl OverrideSignal {
    /// Build an override signal from configured names
    pub fn new(variable: &str, term: &str) -> Self {
        Self {
            variable: variable.into(),
            term: term.into(),
        }
    }
}

/// Why a rule was excluded at compile time
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// An antecedent referenced a name the variable set cannot resolve
    UnknownTerm {
        /// Variable name as configured
        variable: String,
        /// Term name as configured
        term: String,
    },
    /// The consequent is outside the fixed quality class set
    UnknownClass {
        /// Consequent name as configured
        name: String,
    },
    /// A rule with no conditions would fire unconditionally
    NoAntecedents,
    /// More conditions than [`MAX_RULE_TERMS`]
    TooManyAntecedents {
        /// Configured condition count
        count: usize,
    },
}

/// Per-rule compile outcome
#[derive(Debug, Clone, PartialEq)]
pub enum RuleCheck {
    /// Rule resolved fully and participates in inference
    Compiled {
        /// Position in the configured rule list
        index: usize,
        /// Rule-file identifier, when present
        id: Option<u32>,
    },
    /// Rule excluded; inference continues without it
    Skipped {
        /// Position in the configured rule list
        index: usize,
        /// Rule-file identifier, when present
        id: Option<u32>,
        /// Why the rule was excluded
        reason: SkipReason,
    },
}

/// Collected compile outcomes for one rule list
#[derive(Debug, Clone, Default)]
pub struct CompileReport {
    /// One entry per configured rule, in file order
    pub checks: Vec<RuleCheck>,
}

impl CompileReport {
    /// Number of rules participating in inference
    pub fn compiled_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| matches!(c, RuleCheck::Compiled { .. }))
            .count()
    }

    /// Iterator over skipped rules
    pub fn skipped(&self) -> impl Iterator<Item = &RuleCheck> {
        self.checks
            .iter()
            .filter(|c| matches!(c, RuleCheck::Skipped { .. }))
    }
}

/// A rule after name resolution: indices only
#[derive(Debug, Clone)]
struct CompiledRule {
    antecedents: heapless::Vec<TermId, MAX_RULE_TERMS>,
    class: QualityClass,
}

/// Aggregated membership per output class, in [0, 1]
///
/// Computed by [`RuleBase::infer`], consumed once by the defuzzifier.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AggregatedOutput {
    degrees: [f32; QualityClass::COUNT],
}

impl AggregatedOutput {
    /// Aggregated degree for one class
    pub fn degree(&self, class: QualityClass) -> f32 {
        self.degrees[class.index()]
    }

    /// Raise a class's degree to at least `value` (max-aggregation)
    pub fn raise(&mut self, class: QualityClass, value: f32) {
        let slot = &mut self.degrees[class.index()];
        if value > *slot {
            *slot = value;
        }
    }

    /// Iterate `(class, degree)` pairs in band order
    pub fn iter(&self) -> impl Iterator<Item = (QualityClass, f32)> + '_ {
        QualityClass::ALL.iter().map(|&c| (c, self.degrees[c.index()]))
    }
}

/// Compiled, immutable rule base
#[derive(Debug, Clone)]
pub struct RuleBase {
    rules: Vec<CompiledRule>,
    overrides: Vec<TermId>,
}

impl RuleBase {
    /// Resolve rules and override signals against a variable set
    ///
    /// Never fails: unresolvable rules become skip outcomes in the report,
    /// unresolvable override signals are dropped with a warning.
    pub fn compile(
        rules: &[Rule],
        overrides: &[OverrideSignal],
        set: &VariableSet,
    ) -> (Self, CompileReport) {
        let mut compiled = Vec::with_capacity(rules.len());
        let mut report = CompileReport::default();

        'rules: for (index, rule) in rules.iter().enumerate() {
            let skip = |reason| RuleCheck::Skipped {
                index,
                id: rule.id,
                reason,
            };

            if rule.antecedents.is_empty() {
                report.checks.push(skip(SkipReason::NoAntecedents));
                continue;
            }
            if rule.antecedents.len() > MAX_RULE_TERMS {
                report.checks.push(skip(SkipReason::TooManyAntecedents {
                    count: rule.antecedents.len(),
                }));
                continue;
            }
            let Some(class) = QualityClass::parse(&rule.consequent) else {
                report.checks.push(skip(SkipReason::UnknownClass {
                    name: rule.consequent.clone(),
                }));
                continue;
            };

            let mut antecedents = heapless::Vec::new();
            for cond in &rule.antecedents {
                let Some(id) = set.resolve(&cond.variable, &cond.term) else {
                    log_warn!(
                        "rule {:?} skipped: unknown term {}.{}",
                        rule.id,
                        cond.variable,
                        cond.term
                    );
                    report.checks.push(skip(SkipReason::UnknownTerm {
                        variable: cond.variable.clone(),
                        term: cond.term.clone(),
                    }));
                    continue 'rules;
                };
                // Capacity is checked above
                let _ = antecedents.push(id);
            }

            compiled.push(CompiledRule { antecedents, class });
            report.checks.push(RuleCheck::Compiled { index, id: rule.id });
        }

        let mut resolved_overrides = Vec::with_capacity(overrides.len());
        for sig in overrides {
            match set.resolve(&sig.variable, &sig.term) {
                Some(id) => resolved_overrides.push(id),
                None => {
                    log_warn!(
                        "override signal {}.{} does not resolve; dropped",
                        sig.variable,
                        sig.term
                    );
                }
            }
        }

        (
            Self {
                rules: compiled,
                overrides: resolved_overrides,
            },
            report,
        )
    }

    /// Number of rules participating in inference
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules compiled (the engine then scores 0 unless an
    /// override fires)
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate all rules against a membership vector
    pub fn infer(&self, mv: &MembershipVector) -> AggregatedOutput {
        let mut agg = AggregatedOutput::default();

        for rule in &self.rules {
            let mut strength = 1.0f32;
            for &id in &rule.antecedents {
                strength = strength.min(mv.degree(id));
            }
            agg.raise(rule.class, strength);
        }

        // Safety floor: the worst band can only be raised, never suppressed
        let mut danger = 0.0f32;
        for &id in &self.overrides {
            danger = danger.max(mv.degree(id));
        }
        agg.raise(QualityClass::Poor, danger);

        agg
    }
}
