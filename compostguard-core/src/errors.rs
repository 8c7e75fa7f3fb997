//! Error Types for Engine Configuration Failures
//!
//! ## Design Philosophy
//!
//! Evaluation itself never fails: missing terms resolve to degree 0, missing
//! input variables fuzzify to zero, and a zero defuzzification denominator is
//! defined as score 0. Errors therefore only exist at *construction* time,
//! when external configuration (membership shapes, quality bands, rule files)
//! is checked once before the engine becomes immutable.
//!
//! Individually malformed rules are NOT errors — they are collected as
//! skip outcomes in the compile report (see [`crate::rules::RuleCheck`]) so a
//! single bad rule can never abort the pipeline.
//!
//! ## Error Categories
//!
//! ### Shape Violations
//! - `BadBreakpoints` / `BadTermShape`: membership breakpoints not
//!   non-decreasing, or a shape with no support
//!
//! ### Structural Violations
//! - `DuplicateVariable` / `DuplicateTerm`: the interned lookup would be
//!   ambiguous
//! - `BadBands`: label thresholds that gap, overlap, or leave the 0-100
//!   domain
//!
//! ### I/O (std only)
//! - `Io` / `Parse`: rule-file loading failures. Callers are expected to
//!   treat these as non-fatal and fall back to an empty rule base.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use thiserror_no_std::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while building an engine from external configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Membership breakpoints are not non-decreasing or carry no support
    #[error("membership breakpoints must be non-decreasing with nonzero support")]
    BadBreakpoints,

    /// A term's shape failed validation, with its location in the variable set
    #[error("bad membership shape for {variable}.{term}")]
    BadTermShape {
        /// Owning linguistic variable
        variable: String,
        /// Offending term
        term: String,
    },

    /// Two variables share a name
    #[error("duplicate variable '{name}'")]
    DuplicateVariable {
        /// The repeated variable name
        name: String,
    },

    /// Two terms of one variable share a name
    #[error("duplicate term '{name}' in variable '{variable}'")]
    DuplicateTerm {
        /// Owning linguistic variable
        variable: String,
        /// The repeated term name
        name: String,
    },

    /// Quality band thresholds must be strictly increasing within (0, 100)
    #[error("quality band thresholds must be strictly increasing within the score domain")]
    BadBands,

    /// Rule file could not be read
    #[cfg(feature = "std")]
    #[error("rule file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rule file was not valid JSON
    #[cfg(feature = "std")]
    #[error("rule file parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::BadBreakpoints =>
                defmt::write!(fmt, "bad breakpoints"),
            Self::BadTermShape { variable, term } =>
                defmt::write!(fmt, "bad shape for {=str}.{=str}", variable.as_str(), term.as_str()),
            Self::DuplicateVariable { name } =>
                defmt::write!(fmt, "duplicate variable {=str}", name.as_str()),
            Self::DuplicateTerm { variable, name } =>
                defmt::write!(fmt, "duplicate term {=str}.{=str}", variable.as_str(), name.as_str()),
            Self::BadBands =>
                defmt::write!(fmt, "bad quality bands"),
            #[cfg(feature = "std")]
            Self::Io(_) =>
                defmt::write!(fmt, "rule file I/O error"),
            #[cfg(feature = "std")]
            Self::Parse(_) =>
                defmt::write!(fmt, "rule file parse error"),
        }
    }
}
