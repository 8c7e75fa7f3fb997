//! Linguistic Variables and the Interned Term Lookup
//!
//! ## Overview
//!
//! Each numeric input dimension (temperature, moisture, pH, odor) is a
//! *linguistic variable* carrying one or more named *terms*, each backed by a
//! membership function. Rule files refer to terms by name; the engine resolves
//! those names ONCE at compile time into dense [`TermId`] indices so the hot
//! path never touches strings.
//!
//! ## Missing-Term Compatibility
//!
//! Rule bases and variable sets evolve independently across deployments. A
//! `(variable, term)` pair that does not resolve yields degree 0 rather than
//! an error: [`MembershipVector::degree`] returns 0.0 for any out-of-range
//! id, and name resolution failures surface as per-rule skip outcomes, never
//! as evaluation failures.
//!
//! Names are canonicalized (lowercased, spaces to underscores) when resolved,
//! so the historical rule files' `"Sangat Baik"` spelling matches a term
//! registered as `sangat_baik`.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec, vec::Vec};

use crate::errors::{ConfigError, ConfigResult};
use crate::membership::MembershipFunction;

/// Canonical form for names arriving from external configuration
pub(crate) fn canon(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Dense index of one term within a [`VariableSet`]
///
/// Stable for the lifetime of the set; used by compiled rules and override
/// signals to address degrees without string lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermId(pub(crate) u16);

/// A named fuzzy set over one variable's domain
#[derive(Debug, Clone)]
pub struct LinguisticTerm {
    name: String,
    shape: MembershipFunction,
}

impl LinguisticTerm {
    /// Create a term; the name is canonicalized
    pub fn new(name: &str, shape: MembershipFunction) -> Self {
        Self {
            name: canon(name),
            shape,
        }
    }

    /// Canonical term name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The term's membership function
    pub fn shape(&self) -> &MembershipFunction {
        &self.shape
    }
}

/// A named input dimension with its term set
#[derive(Debug, Clone)]
pub struct LinguisticVariable {
    name: String,
    terms: Vec<LinguisticTerm>,
}

impl LinguisticVariable {
    /// Create a variable; the name is canonicalized
    pub fn new(name: &str, terms: Vec<LinguisticTerm>) -> Self {
        Self {
            name: canon(name),
            terms,
        }
    }

    /// Canonical variable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The variable's terms, in registration order
    pub fn terms(&self) -> &[LinguisticTerm] {
        &self.terms
    }
}

/// Immutable, validated collection of input variables
///
/// Owns the interning tables: every term in the set has a flat [`TermId`]
/// assigned in registration order.
#[derive(Debug, Clone)]
pub struct VariableSet {
    variables: Vec<LinguisticVariable>,
    /// Flat-index offset of each variable's first term
    offsets: Vec<u16>,
    total_terms: u16,
}

impl VariableSet {
    /// Validate and intern a list of variables
    ///
    /// Rejects duplicate variable/term names and malformed membership shapes.
    pub fn new(variables: Vec<LinguisticVariable>) -> ConfigResult<Self> {
        let mut offsets = Vec::with_capacity(variables.len());
        let mut next: u16 = 0;

        for (vi, var) in variables.iter().enumerate() {
            if variables[..vi].iter().any(|v| v.name == var.name) {
                return Err(ConfigError::DuplicateVariable {
                    name: var.name.clone(),
                });
            }
            for (ti, term) in var.terms.iter().enumerate() {
                if var.terms[..ti].iter().any(|t| t.name == term.name) {
                    return Err(ConfigError::DuplicateTerm {
                        variable: var.name.clone(),
                        name: term.name.clone(),
                    });
                }
                term.shape.validate().map_err(|_| ConfigError::BadTermShape {
                    variable: var.name.clone(),
                    term: term.name.clone(),
                })?;
            }
            offsets.push(next);
            next += var.terms.len() as u16;
        }

        Ok(Self {
            variables,
            offsets,
            total_terms: next,
        })
    }

    /// The variables in registration order
    pub fn variables(&self) -> &[LinguisticVariable] {
        &self.variables
    }

    /// Total number of interned terms across all variables
    pub fn term_count(&self) -> usize {
        self.total_terms as usize
    }

    /// Resolve a `(variable, term)` name pair to its flat id
    ///
    /// Both names are canonicalized before matching. Returns `None` when
    /// either name is unknown — callers decide whether that means "skip the
    /// rule" (compile time) or "degree 0" (lookup time).
    pub fn resolve(&self, variable: &str, term: &str) -> Option<TermId> {
        let var_name = canon(variable);
        let term_name = canon(term);

        let vi = self.variables.iter().position(|v| v.name == var_name)?;
        let ti = self.variables[vi]
            .terms
            .iter()
            .position(|t| t.name == term_name)?;
        Some(TermId(self.offsets[vi] + ti as u16))
    }

    /// Fuzzify crisp named inputs into a fresh [`MembershipVector`]
    ///
    /// Input names must be canonical (the set's own spelling). Variables with
    /// no matching input fuzzify to all-zero degrees; unrecognized input
    /// names are ignored. Each variable is fuzzified independently.
    pub fn fuzzify(&self, inputs: &[(&str, f32)]) -> MembershipVector {
        let mut degrees = vec![0.0f32; self.total_terms as usize];

        for (vi, var) in self.variables.iter().enumerate() {
            let Some(&(_, x)) = inputs.iter().find(|(name, _)| *name == var.name) else {
                continue;
            };
            let base = self.offsets[vi] as usize;
            for (ti, term) in var.terms.iter().enumerate() {
                degrees[base + ti] = term.shape.degree(x);
            }
        }

        MembershipVector { degrees }
    }
}

/// Per-evaluation degree table, indexed by [`TermId`]
///
/// Ephemeral: created fresh by [`VariableSet::fuzzify`], consumed by one
/// inference pass, then dropped.
#[derive(Debug, Clone)]
pub struct MembershipVector {
    degrees: Vec<f32>,
}

impl MembershipVector {
    /// Degree for the given term; out-of-range ids yield 0.0
    pub fn degree(&self, id: TermId) -> f32 {
        self.degrees.get(id.0 as usize).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_var_set() -> VariableSet {
        VariableSet::new(vec![
            LinguisticVariable::new(
                "suhu",
                vec![
                    LinguisticTerm::new("dingin", MembershipFunction::trapezoid(0.0, 0.0, 28.0, 35.0)),
                    LinguisticTerm::new("ideal", MembershipFunction::triangle(30.0, 45.0, 55.0)),
                ],
            ),
            LinguisticVariable::new(
                "ph",
                vec![
                    LinguisticTerm::new("netral", MembershipFunction::triangle(5.0, 7.0, 9.0)),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn resolve_is_case_and_space_insensitive() {
        let set = two_var_set();
        let a = set.resolve("suhu", "ideal").unwrap();
        let b = set.resolve("Suhu", " Ideal ").unwrap();
        assert_eq!(a, b);
        assert!(set.resolve("suhu", "panas").is_none());
        assert!(set.resolve("bau", "busuk").is_none());
    }

    #[test]
    fn fuzzify_computes_independent_degrees() {
        let set = two_var_set();
        let mv = set.fuzzify(&[("suhu", 45.0), ("ph", 7.0)]);
        assert_eq!(mv.degree(set.resolve("suhu", "ideal").unwrap()), 1.0);
        assert_eq!(mv.degree(set.resolve("suhu", "dingin").unwrap()), 0.0);
        assert_eq!(mv.degree(set.resolve("ph", "netral").unwrap()), 1.0);
    }

    #[test]
    fn missing_input_variable_fuzzifies_to_zero() {
        let set = two_var_set();
        let mv = set.fuzzify(&[("suhu", 45.0)]);
        assert_eq!(mv.degree(set.resolve("ph", "netral").unwrap()), 0.0);
    }

    #[test]
    fn out_of_range_id_is_zero() {
        let set = two_var_set();
        let mv = set.fuzzify(&[("suhu", 45.0)]);
        assert_eq!(mv.degree(TermId(999)), 0.0);
    }

    #[test]
    fn duplicate_names_rejected() {
        let dup = VariableSet::new(vec![
            LinguisticVariable::new("ph", vec![]),
            LinguisticVariable::new("PH", vec![]),
        ]);
        assert!(matches!(dup, Err(ConfigError::DuplicateVariable { .. })));

        let dup_term = VariableSet::new(vec![LinguisticVariable::new(
            "ph",
            vec![
                LinguisticTerm::new("netral", MembershipFunction::triangle(5.0, 7.0, 9.0)),
                LinguisticTerm::new("Netral", MembershipFunction::triangle(5.0, 7.0, 9.0)),
            ],
        )]);
        assert!(matches!(dup_term, Err(ConfigError::DuplicateTerm { .. })));
    }
}
