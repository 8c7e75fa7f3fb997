//! Centroid Defuzzification and Score Banding
//!
//! ## Overview
//!
//! The aggregated per-class degrees are converted back into a single crisp
//! score over the fixed 0-100 quality domain using the center-of-gravity
//! method: each output shape is clipped at its class's aggregated degree,
//! the clipped shapes are combined pointwise by maximum, and the centroid of
//! the resulting area is the score.
//!
//! ## Discretization
//!
//! The domain is sampled at a fixed step of 2 (51 samples, 0..=100). The
//! historical thresholds were calibrated against this sampling, so the step
//! is a constant rather than configuration.
//!
//! ## Zero-Area Edge Case
//!
//! When no rule fired and no override raised a degree, the clipped area is
//! empty and the centroid denominator is 0. The defined result is a score of
//! exactly 0 — never NaN.

use crate::errors::{ConfigError, ConfigResult};
use crate::membership::MembershipFunction;
use crate::rules::{AggregatedOutput, QualityClass};

/// Lower bound of the score domain
pub const SCORE_MIN: f32 = 0.0;

/// Upper bound of the score domain
pub const SCORE_MAX: f32 = 100.0;

/// Sampling step for the centroid integral
const DEFUZZ_STEP: usize = 2;

/// Output-side membership shapes, one per quality class
///
/// The shapes tile the 0-100 domain with overlap consistent with the four
/// band structure: `poor` skewed low, `very_good` skewed high.
#[derive(Debug, Clone)]
pub struct OutputShapes {
    shapes: [MembershipFunction; QualityClass::COUNT],
}

impl Default for OutputShapes {
    /// Historical output breakpoints from the deployed configuration
    fn default() -> Self {
        Self {
            shapes: [
                MembershipFunction::trapezoid(0.0, 0.0, 30.0, 50.0),
                MembershipFunction::triangle(40.0, 60.0, 80.0),
                MembershipFunction::triangle(70.0, 85.0, 95.0),
                MembershipFunction::trapezoid(90.0, 95.0, 100.0, 100.0),
            ],
        }
    }
}

impl OutputShapes {
    /// Build validated output shapes, in band order
    pub fn new(
        poor: MembershipFunction,
        medium: MembershipFunction,
        good: MembershipFunction,
        very_good: MembershipFunction,
    ) -> ConfigResult<Self> {
        let shapes = [poor, medium, good, very_good];
        for shape in &shapes {
            shape.validate()?;
        }
        Ok(Self { shapes })
    }

    /// The shape for one quality class
    pub fn shape(&self, class: QualityClass) -> &MembershipFunction {
        &self.shapes[class.index()]
    }

    /// Center-of-gravity defuzzification over the clipped, max-combined
    /// output shapes
    pub fn centroid(&self, agg: &AggregatedOutput) -> f32 {
        let mut numerator = 0.0f32;
        let mut denominator = 0.0f32;

        let samples = (SCORE_MAX - SCORE_MIN) as usize / DEFUZZ_STEP;
        for step in 0..=samples {
            let x = SCORE_MIN + (step * DEFUZZ_STEP) as f32;

            let mut clipped_max = 0.0f32;
            for (class, degree) in agg.iter() {
                let clipped = degree.min(self.shapes[class.index()].degree(x));
                clipped_max = clipped_max.max(clipped);
            }

            numerator += x * clipped_max;
            denominator += clipped_max;
        }

        if denominator == 0.0 {
            return 0.0;
        }
        numerator / denominator
    }
}

/// Non-overlapping closed thresholds mapping a crisp score to its band
///
/// Each bound is inclusive for the band below it; scores above `good_max`
/// are `very_good`. Bounds must be strictly increasing inside the domain so
/// the bands neither gap nor overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityBands {
    /// Scores at or below this are `poor`
    pub poor_max: f32,
    /// Scores at or below this (and above `poor_max`) are `medium`
    pub medium_max: f32,
    /// Scores at or below this (and above `medium_max`) are `good`
    pub good_max: f32,
}

impl Default for QualityBands {
    /// Historical thresholds: 45 / 75 / 90
    fn default() -> Self {
        Self {
            poor_max: 45.0,
            medium_max: 75.0,
            good_max: 90.0,
        }
    }
}

impl QualityBands {
    /// Check the bounds are strictly increasing within the score domain
    pub fn validate(&self) -> ConfigResult<()> {
        let ok = SCORE_MIN < self.poor_max
            && self.poor_max < self.medium_max
            && self.medium_max < self.good_max
            && self.good_max < SCORE_MAX;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::BadBands)
        }
    }

    /// Map a crisp score to its quality band
    pub fn classify(&self, score: f32) -> QualityClass {
        if score <= self.poor_max {
            QualityClass::Poor
        } else if score <= self.medium_max {
            QualityClass::Medium
        } else if score <= self.good_max {
            QualityClass::Good
        } else {
            QualityClass::VeryGood
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_aggregate_scores_zero() {
        let shapes = OutputShapes::default();
        let agg = AggregatedOutput::default();
        assert_eq!(shapes.centroid(&agg), 0.0);
    }

    #[test]
    fn poor_only_lands_in_lowest_band() {
        let shapes = OutputShapes::default();
        let mut agg = AggregatedOutput::default();
        agg.raise(QualityClass::Poor, 1.0);

        let score = shapes.centroid(&agg);
        // Centroid of trap(0,0,30,50) sampled at step 2
        assert!((score - 20.923).abs() < 0.01, "score {score}");
        assert_eq!(QualityBands::default().classify(score), QualityClass::Poor);
    }

    #[test]
    fn very_good_only_exceeds_90() {
        let shapes = OutputShapes::default();
        let mut agg = AggregatedOutput::default();
        agg.raise(QualityClass::VeryGood, 1.0);

        let score = shapes.centroid(&agg);
        assert!((score - 95.625).abs() < 1e-3, "score {score}");
        assert_eq!(QualityBands::default().classify(score), QualityClass::VeryGood);
    }

    #[test]
    fn partial_degrees_blend_between_bands() {
        let shapes = OutputShapes::default();
        let mut agg = AggregatedOutput::default();
        agg.raise(QualityClass::Medium, 0.5);
        agg.raise(QualityClass::Good, 0.5);

        let score = shapes.centroid(&agg);
        assert!(score > 45.0 && score <= 90.0, "score {score}");
    }

    #[test]
    fn band_bounds_are_inclusive_below() {
        let bands = QualityBands::default();
        assert_eq!(bands.classify(45.0), QualityClass::Poor);
        assert_eq!(bands.classify(45.1), QualityClass::Medium);
        assert_eq!(bands.classify(75.0), QualityClass::Medium);
        assert_eq!(bands.classify(90.0), QualityClass::Good);
        assert_eq!(bands.classify(90.1), QualityClass::VeryGood);
        assert_eq!(bands.classify(0.0), QualityClass::Poor);
    }

    #[test]
    fn band_validation_rejects_disorder() {
        assert!(QualityBands::default().validate().is_ok());
        let bad = QualityBands {
            poor_max: 80.0,
            medium_max: 75.0,
            good_max: 90.0,
        };
        assert!(bad.validate().is_err());
        let out_of_domain = QualityBands {
            poor_max: 45.0,
            medium_max: 75.0,
            good_max: 100.0,
        };
        assert!(out_of_domain.validate().is_err());
    }
}
