//! Inference latency benchmark
//!
//! One full evaluate() pass over the compost profile with a realistic
//! 16-rule base: fuzzification, rule inference, and the 51-sample centroid.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use compostguard_core::{
    profile,
    rules::{Antecedent, Rule},
    FuzzyEngine,
};

fn realistic_rules() -> Vec<Rule> {
    let mut rules = Vec::new();
    let smells = ["tidak_bau", "cukup_bau", "bau_busuk"];
    let temps = ["dingin", "ideal", "panas"];
    let classes = ["buruk", "sedang", "baik", "sangat_baik"];

    for i in 0..16 {
        rules.push(
            Rule::new(
                vec![
                    Antecedent::new("bau", smells[i % 3]),
                    Antecedent::new("suhu", temps[(i / 3) % 3]),
                    Antecedent::new("ph", "netral"),
                    Antecedent::new("kelembapan", "sedang"),
                ],
                classes[i % 4],
            )
            .with_id(i as u32 + 1),
        );
    }
    rules
}

fn bench_evaluate(c: &mut Criterion) {
    let engine = FuzzyEngine::new(profile::compost().with_rules(realistic_rules())).unwrap();

    c.bench_function("evaluate_16_rules", |b| {
        b.iter(|| {
            engine.evaluate(black_box(&[
                ("suhu", 43.0),
                ("kelembapan", 47.5),
                ("ph", 6.8),
                ("bau", 18.0),
            ]))
        })
    });

    let empty = FuzzyEngine::new(profile::compost()).unwrap();
    c.bench_function("evaluate_empty_rule_base", |b| {
        b.iter(|| {
            empty.evaluate(black_box(&[
                ("suhu", 43.0),
                ("kelembapan", 47.5),
                ("ph", 6.8),
                ("bau", 18.0),
            ]))
        })
    });
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
