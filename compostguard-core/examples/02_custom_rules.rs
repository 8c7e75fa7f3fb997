//! Custom Rule File Example
//!
//! Loads a rule base from JSON text in the deployed configuration format and
//! inspects the compile report, including how entries referencing unknown
//! vocabulary are skipped without aborting.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_custom_rules
//! ```

use compostguard_core::{config::RuleFile, profile, FuzzyEngine, RuleCheck};

const RULES_JSON: &str = r#"{
    "project_name": "Smart Compost Monitoring - Simplified",
    "version": "2.0",
    "rules": [
        { "id": 1,
          "if": { "bau": "Tidak Bau", "suhu": "Ideal", "ph": "Netral", "kelembapan": "Sedang" },
          "then": "Sangat Baik" },
        { "id": 7,
          "if": { "bau": "Tidak Bau", "suhu": "Dingin", "ph": "Netral", "kelembapan": "Sedang" },
          "then": "Sedang" },
        { "id": 99,
          "if": { "bau": "Menyengat", "suhu": "Ideal" },
          "then": "Buruk" }
    ]
}"#;

fn main() {
    println!("CompostGuard Custom Rules Example");
    println!("=================================\n");

    let file = RuleFile::from_json(RULES_JSON).expect("embedded JSON is well-formed");
    if let Some(name) = &file.project_name {
        println!("Loaded '{}' (version {})\n", name, file.version.as_deref().unwrap_or("?"));
    }

    let engine = FuzzyEngine::new(profile::compost().with_rules(file.into_rules()))
        .expect("profile configuration is valid");

    println!("Compile report:");
    for check in &engine.compile_report().checks {
        match check {
            RuleCheck::Compiled { id, .. } => {
                println!("  rule {:?}: compiled", id);
            }
            RuleCheck::Skipped { id, reason, .. } => {
                // Rule 99 uses the older "menyengat" vocabulary and is
                // skipped; the rest of the base still runs
                println!("  rule {:?}: skipped ({reason:?})", id);
            }
        }
    }
    println!();

    let result = engine.evaluate(&[
        ("suhu", 25.0),
        ("kelembapan", 46.0),
        ("ph", 7.0),
        ("bau", 4.0),
    ]);
    println!(
        "Cool pile with no odor: score {:.2} -> {}",
        result.score,
        result.label()
    );
}
