//! Pre-Trained Model Support for CompostGuard
//!
//! ## Overview
//!
//! The quality pipeline depends on two statistical models trained offline
//! (outside this codebase, on lab compost data):
//!
//! 1. **Ammonia regressor** — maps (temperature, moisture, pH) to an
//!    ammonia estimate in ppm-like units. Required: without it no
//!    meaningful quality score exists.
//! 2. **Maturity classifier** — maps (temperature, moisture, pH, ammonia)
//!    to a binary mature/immature call. Optional: when absent, maturity is
//!    reported as unknown and everything else keeps running.
//!
//! Both are tree ensembles shipped as an opaque JSON *model bundle*. This
//! crate only loads and evaluates them — there is no training code, no
//! fitting, no randomness. Inference walks each tree from the root to a
//! leaf and averages leaf values across the ensemble.
//!
//! ## Memory Model
//!
//! Trees use an array-backed node layout with `u16` child indices. Children
//! always point forward (index strictly greater than the parent's), which
//! is validated at load time and makes traversal provably terminating.
//!
//! ## Module Organization
//!
//! - [`node`] — compact node representation (split / leaf)
//! - [`tree`] — a single decision tree with validated structure
//! - [`forest`] — ensemble evaluation (mean over trees)
//! - [`bundle`] — the JSON wire format and the typed model handles (std)

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
pub mod bundle;
pub mod forest;
pub mod node;
pub mod tree;

#[cfg(feature = "std")]
pub use bundle::{AmmoniaModel, MaturityModel, ModelBundle, ModelSet};
pub use forest::Forest;
pub use node::Node;
pub use tree::DecisionTree;

use thiserror_no_std::Error;

/// Result type for model operations
pub type MlResult<T> = Result<T, MlError>;

/// Errors raised while loading or evaluating models
#[derive(Error, Debug)]
pub enum MlError {
    /// A tree or forest with no content
    #[error("model has no trees or nodes")]
    EmptyModel,

    /// A child pointer is out of bounds or does not point forward
    #[error("bad node index {index}")]
    BadNodeIndex {
        /// The offending child index
        index: u16,
    },

    /// A split references a feature the input vector does not carry
    #[error("split references feature {feature} outside the input vector")]
    InvalidFeature {
        /// The offending feature index
        feature: u8,
    },

    /// The bundle carries no ammonia regressor, which is required
    #[error("model bundle has no ammonia regressor")]
    MissingRegressor,

    /// Model bundle could not be read
    #[cfg(feature = "std")]
    #[error("model bundle I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Model bundle was not valid JSON
    #[cfg(feature = "std")]
    #[error("model bundle parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Binary compost maturity call from the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maturity {
    /// Compost is ready for use
    Mature,
    /// Compost needs more time
    Immature,
}

impl Maturity {
    /// Canonical label for records and logs
    pub const fn name(self) -> &'static str {
        match self {
            Maturity::Mature => "mature",
            Maturity::Immature => "immature",
        }
    }
}

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
