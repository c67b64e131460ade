//! Benchmarks para métricas e busca local

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pbooster_core::{
    OptimizerConfig, Perturbation, TopicFrequency, UserProfile,
    objective, privacy, select_topics, utility_loss,
};

fn history(topics: u64) -> TopicFrequency {
    (0..topics).map(|i| (format!("topic{:02}", i), 1 + (i * 7) % 23)).collect()
}

fn bench_metrics(c: &mut Criterion) {
    let freq = history(20);
    let shifted: TopicFrequency = freq.iter().map(|(t, n)| (t, n + 3)).collect();

    c.bench_function("privacy_20_topics", |b| {
        b.iter(|| privacy(black_box(&freq)).unwrap())
    });

    c.bench_function("utility_loss_20_topics", |b| {
        b.iter(|| utility_loss(black_box(&freq), black_box(&shifted)).unwrap())
    });
}

fn bench_objective(c: &mut Criterion) {
    let freq = history(20);
    let config = OptimizerConfig::new(1.0, 0.1).unwrap();
    let perturbation = Perturbation::zeros(&freq).adjusted("topic03", 4);

    c.bench_function("objective_20_topics", |b| {
        b.iter(|| objective(black_box(&freq), black_box(&perturbation), &config).unwrap())
    });
}

fn bench_select_topics(c: &mut Criterion) {
    let small = UserProfile::new("User50", TopicFrequency::from([("sports", 40), ("news", 10)]));
    let large = UserProfile::new("User500", history(12));

    for lambda in [0.5, 10.0] {
        let config = OptimizerConfig::new(lambda, 0.1).unwrap();

        c.bench_function(&format!("select_topics_2_topics_lambda_{}", lambda), |b| {
            b.iter(|| select_topics(black_box(&small), &config).unwrap())
        });

        c.bench_function(&format!("select_topics_12_topics_lambda_{}", lambda), |b| {
            b.iter(|| select_topics(black_box(&large), &config).unwrap())
        });
    }
}

criterion_group!(
    benches,
    bench_metrics,
    bench_objective,
    bench_select_topics,
);
criterion_main!(benches);
