//! The JSON Model Bundle and Typed Model Handles
//!
//! ## Wire Format
//!
//! The training pipeline exports one JSON file holding both models:
//!
//! ```json
//! {
//!   "ammonia_regressor": {
//!     "scale_divisor": null,
//!     "trees": [ { "nodes": [
//!       { "kind": "split", "feature": 0, "threshold": 40.0, "left": 1, "right": 2 },
//!       { "kind": "leaf", "value": 4.2 },
//!       { "kind": "leaf", "value": 18.7 }
//!     ] } ]
//!   },
//!   "maturity_classifier": { "trees": [ ... ] }
//! }
//! ```
//!
//! Keys mirror the historical pickle dictionary (`rf_regressor_ammonia`,
//! `rf_classifier_maturity`); either model may be absent. Converting the
//! bundle into typed handles enforces the availability contract: the
//! ammonia regressor is required, the maturity classifier optional.
//!
//! ## Feature Order
//!
//! - Regressor: `[temperature, moisture, ph]`
//! - Classifier: `[temperature, moisture, ph, ammonia]`
//!
//! The order is part of the trained artifact and must not be rearranged.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::forest::Forest;
use crate::node::Node;
use crate::tree::DecisionTree;
use crate::{Maturity, MlError, MlResult};

/// Classifier vote fraction at or above which compost counts as mature
const MATURITY_THRESHOLD: f32 = 0.5;

/// Parsed model bundle, before structural validation
#[derive(Debug, Clone, Deserialize)]
pub struct ModelBundle {
    /// The required ammonia regression ensemble
    #[serde(default)]
    pub ammonia_regressor: Option<ForestSpec>,
    /// The optional maturity classification ensemble
    #[serde(default)]
    pub maturity_classifier: Option<ForestSpec>,
}

/// One ensemble as serialized
#[derive(Debug, Clone, Deserialize)]
pub struct ForestSpec {
    /// Flat preorder node arrays, one per tree
    pub trees: Vec<TreeSpec>,
    /// Optional fixed divisor applied to raw regressor output
    ///
    /// Some training exports produce values in a scaled unit; the divisor
    /// brings them back to ppm. Absent for models that already emit ppm.
    #[serde(default)]
    pub scale_divisor: Option<f32>,
}

/// One tree as serialized
#[derive(Debug, Clone, Deserialize)]
pub struct TreeSpec {
    /// Preorder node array; children point strictly forward
    pub nodes: Vec<Node>,
}

impl ForestSpec {
    fn into_forest(self) -> MlResult<Forest> {
        let trees = self
            .trees
            .into_iter()
            .map(|spec| DecisionTree::new(spec.nodes))
            .collect::<MlResult<Vec<_>>>()?;
        Forest::new(trees)
    }
}

impl ModelBundle {
    /// Parse a bundle from JSON text
    pub fn from_json(text: &str) -> MlResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a bundle from disk
    pub fn load(path: impl AsRef<Path>) -> MlResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Validate into typed model handles
    ///
    /// Fails with [`MlError::MissingRegressor`] when the bundle carries no
    /// ammonia model; a missing maturity classifier is fine.
    pub fn into_models(self) -> MlResult<ModelSet> {
        let ammonia_spec = self.ammonia_regressor.ok_or(MlError::MissingRegressor)?;
        let scale_divisor = ammonia_spec.scale_divisor;
        let ammonia = AmmoniaModel {
            forest: ammonia_spec.into_forest()?,
            scale_divisor,
        };

        let maturity = match self.maturity_classifier {
            Some(spec) => Some(MaturityModel {
                forest: spec.into_forest()?,
            }),
            None => None,
        };

        Ok(ModelSet { ammonia, maturity })
    }
}

/// The validated models a process runs with
#[derive(Debug, Clone)]
pub struct ModelSet {
    /// Required ammonia regressor
    pub ammonia: AmmoniaModel,
    /// Optional maturity classifier
    pub maturity: Option<MaturityModel>,
}

/// Typed handle for the ammonia regression ensemble
#[derive(Debug, Clone)]
pub struct AmmoniaModel {
    forest: Forest,
    scale_divisor: Option<f32>,
}

impl AmmoniaModel {
    /// Estimate ammonia in ppm from (temperature °C, moisture %, pH)
    ///
    /// Output is clamped to ≥ 0 — the regressor can extrapolate below zero
    /// near the edges of its training range.
    pub fn estimate(&self, temperature: f32, moisture: f32, ph: f32) -> MlResult<f32> {
        let raw = self.forest.predict_mean(&[temperature, moisture, ph])?;
        let scaled = match self.scale_divisor {
            Some(divisor) if divisor != 0.0 => raw / divisor,
            _ => raw,
        };
        Ok(scaled.max(0.0))
    }
}

/// Typed handle for the maturity classification ensemble
#[derive(Debug, Clone)]
pub struct MaturityModel {
    forest: Forest,
}

impl MaturityModel {
    /// Classify maturity from (temperature °C, moisture %, pH, ammonia ppm)
    pub fn classify(
        &self,
        temperature: f32,
        moisture: f32,
        ph: f32,
        ammonia: f32,
    ) -> MlResult<Maturity> {
        let vote = self
            .forest
            .predict_mean(&[temperature, moisture, ph, ammonia])?;
        Ok(if vote >= MATURITY_THRESHOLD {
            Maturity::Mature
        } else {
            Maturity::Immature
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &str = r#"{
        "ammonia_regressor": {
            "trees": [
                { "nodes": [
                    { "kind": "split", "feature": 0, "threshold": 40.0, "left": 1, "right": 2 },
                    { "kind": "leaf", "value": 4.0 },
                    { "kind": "leaf", "value": 20.0 }
                ] },
                { "nodes": [ { "kind": "leaf", "value": 10.0 } ] }
            ]
        },
        "maturity_classifier": {
            "trees": [
                { "nodes": [
                    { "kind": "split", "feature": 3, "threshold": 15.0, "left": 1, "right": 2 },
                    { "kind": "leaf", "value": 1.0 },
                    { "kind": "leaf", "value": 0.0 }
                ] }
            ]
        }
    }"#;

    #[test]
    fn bundle_parses_and_validates() {
        let models = ModelBundle::from_json(BUNDLE).unwrap().into_models().unwrap();
        assert!(models.maturity.is_some());

        // Cool pile: (4 + 10) / 2
        let low = models.ammonia.estimate(30.0, 45.0, 7.0).unwrap();
        assert_eq!(low, 7.0);

        // Hot pile: (20 + 10) / 2
        let high = models.ammonia.estimate(60.0, 45.0, 7.0).unwrap();
        assert_eq!(high, 15.0);
    }

    #[test]
    fn maturity_votes_on_ammonia() {
        let models = ModelBundle::from_json(BUNDLE).unwrap().into_models().unwrap();
        let clf = models.maturity.unwrap();
        assert_eq!(clf.classify(45.0, 46.0, 7.0, 5.0).unwrap(), Maturity::Mature);
        assert_eq!(clf.classify(45.0, 46.0, 7.0, 40.0).unwrap(), Maturity::Immature);
    }

    #[test]
    fn missing_regressor_is_fatal() {
        let text = r#"{ "maturity_classifier": { "trees": [ { "nodes": [ { "kind": "leaf", "value": 1.0 } ] } ] } }"#;
        let err = ModelBundle::from_json(text).unwrap().into_models().unwrap_err();
        assert!(matches!(err, MlError::MissingRegressor));
    }

    #[test]
    fn missing_classifier_is_fine() {
        let text = r#"{ "ammonia_regressor": { "trees": [ { "nodes": [ { "kind": "leaf", "value": 3.0 } ] } ] } }"#;
        let models = ModelBundle::from_json(text).unwrap().into_models().unwrap();
        assert!(models.maturity.is_none());
    }

    #[test]
    fn negative_estimates_clamp_to_zero() {
        let text = r#"{ "ammonia_regressor": { "trees": [ { "nodes": [ { "kind": "leaf", "value": -2.5 } ] } ] } }"#;
        let models = ModelBundle::from_json(text).unwrap().into_models().unwrap();
        assert_eq!(models.ammonia.estimate(20.0, 30.0, 7.0).unwrap(), 0.0);
    }

    #[test]
    fn scale_divisor_applies_before_clamp() {
        let text = r#"{ "ammonia_regressor": {
            "scale_divisor": 40.0,
            "trees": [ { "nodes": [ { "kind": "leaf", "value": 800.0 } ] } ]
        } }"#;
        let models = ModelBundle::from_json(text).unwrap().into_models().unwrap();
        assert_eq!(models.ammonia.estimate(20.0, 30.0, 7.0).unwrap(), 20.0);
    }
}
