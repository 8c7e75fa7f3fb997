//! Result Record Wire Format
//!
//! One record per processed reading, shared by the history push and the
//! "latest" overwrite view. Field names are the store's established wire
//! contract (the dashboard reads them), so the historical spellings stay
//! even where the code uses English.

use serde::{Deserialize, Serialize};

use compostguard_core::Assessment;
use compostguard_ml::Maturity;

/// Record written to the realtime store for every processed reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Temperature in °C
    #[serde(rename = "suhu")]
    pub temperature: f32,
    /// Moisture content in %
    pub moisture: f32,
    /// Acidity
    pub ph: f32,
    /// Predicted ammonia in ppm, rounded to 2 decimals
    pub ammonia: f32,
    /// Crisp quality score in [0, 100], rounded to 2 decimals
    pub score: f32,
    /// Quality band label
    pub fuzzy_label: String,
    /// Maturity call: "mature", "immature", or "unknown"
    pub maturity: String,
    /// Epoch milliseconds at processing time
    pub timestamp: i64,
}

/// Round to 2 decimals, the store's precision for derived values
fn round2(x: f32) -> f32 {
    (x * 100.0).round() / 100.0
}

impl ResultRecord {
    /// Assemble a record from the pipeline's outputs
    pub fn from_parts(
        temperature: f32,
        moisture: f32,
        ph: f32,
        ammonia: f32,
        assessment: &Assessment,
        maturity: Option<Maturity>,
        timestamp: i64,
    ) -> Self {
        Self {
            temperature,
            moisture,
            ph,
            ammonia: round2(ammonia),
            score: round2(assessment.score),
            fuzzy_label: assessment.label().to_owned(),
            maturity: maturity.map(Maturity::name).unwrap_or("unknown").to_owned(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compostguard_core::{profile, FuzzyEngine};

    #[test]
    fn wire_names_are_stable() {
        let engine = FuzzyEngine::new(profile::compost()).unwrap();
        let assessment = engine.evaluate(&[("suhu", 45.0)]);

        let record = ResultRecord::from_parts(
            45.0,
            46.0,
            7.0,
            3.14159,
            &assessment,
            None,
            1_700_000_000_000,
        );
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["suhu"], 45.0);
        assert_eq!(json["moisture"], 46.0);
        assert_eq!(json["ammonia"], 3.14);
        assert_eq!(json["fuzzy_label"], "poor");
        assert_eq!(json["maturity"], "unknown");
        assert_eq!(json["timestamp"], 1_700_000_000_000i64);
        // The rename must not leak the English field name
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn maturity_label_round_trips() {
        let engine = FuzzyEngine::new(profile::compost()).unwrap();
        let assessment = engine.evaluate(&[]);

        let record = ResultRecord::from_parts(
            20.0,
            30.0,
            7.0,
            0.0,
            &assessment,
            Some(Maturity::Mature),
            0,
        );
        assert_eq!(record.maturity, "mature");

        let back: ResultRecord =
            serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();
        assert_eq!(back, record);
    }
}
