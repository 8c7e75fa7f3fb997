//! Basic Inference Example
//!
//! Scores a handful of compost readings against the default profile and a
//! minimal rule base, showing how membership degrees turn into a crisp
//! quality score.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_basic_inference
//! ```

use compostguard_core::{
    profile,
    rules::{Antecedent, Rule},
    FuzzyEngine, QualityClass,
};

fn main() {
    println!("CompostGuard Basic Inference Example");
    println!("====================================\n");

    // One favorable rule plus one unfavorable rule
    let rules = vec![
        Rule::new(
            vec![
                Antecedent::new("suhu", "ideal"),
                Antecedent::new("kelembapan", "sedang"),
                Antecedent::new("ph", "netral"),
            ],
            "sangat_baik",
        )
        .with_id(1),
        Rule::new(
            vec![
                Antecedent::new("suhu", "dingin"),
                Antecedent::new("kelembapan", "basah"),
            ],
            "buruk",
        )
        .with_id(2),
    ];

    let engine = FuzzyEngine::new(profile::compost().with_rules(rules))
        .expect("profile configuration is valid");
    println!("Engine ready: {} rules compiled\n", engine.rule_count());

    let scenarios = [
        ("Ideal pile", 45.0, 46.0, 7.0, 0.0),
        ("Cold and soggy", 18.0, 70.0, 6.5, 5.0),
        ("Running hot", 62.0, 44.0, 7.2, 10.0),
        ("Ammonia spike", 45.0, 46.0, 7.0, 65.0),
    ];

    for (name, suhu, kelembapan, ph, bau) in scenarios {
        let result = engine.evaluate(&[
            ("suhu", suhu),
            ("kelembapan", kelembapan),
            ("ph", ph),
            ("bau", bau),
        ]);

        println!("{name}:");
        println!("  T={suhu}°C  MC={kelembapan}%  pH={ph}  NH3={bau}ppm");
        println!("  score {:.2} -> {}", result.score, result.label());
        for (class, degree) in result.aggregated.iter() {
            if degree > 0.0 {
                println!("    {:>10}: {:.3}", class.name(), degree);
            }
        }
        if result.class == QualityClass::Poor && bau >= 40.0 {
            println!("    (safety override active)");
        }
        println!();
    }
}
