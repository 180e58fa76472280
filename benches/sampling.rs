use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;

use worldsample::{
    apply_factor_multipliers, Distribution, EntityGenerator, FieldValue, GeneratorSettings, SampledFields,
    SamplingConfig,
};

fn ecosystem() -> SamplingConfig {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/ecosystem.json");
    SamplingConfig::load(path).unwrap()
}

fn bench_factor_multipliers(c: &mut Criterion) {
    let config = ecosystem();
    let mut sampled = SampledFields::new();
    sampled.insert("habitat".to_string(), FieldValue::from("desert"));
    sampled.insert("species".to_string(), FieldValue::from("fox"));
    let base = config.probabilities("diet").unwrap().clone();

    c.bench_function("sampling/apply_factor_multipliers", |b| {
        b.iter(|| apply_factor_multipliers(black_box(&base), "diet", black_box(&sampled), config.factors()));
    });
}

fn bench_distributions(c: &mut Criterion) {
    let mut group = c.benchmark_group("distribution_draw");
    group.throughput(Throughput::Elements(1));

    let cases = [
        ("normal", Distribution::normal(10.0, 2.0)),
        ("lognormal", Distribution::lognormal(10.0, 2.0)),
        ("truncated_wide", Distribution::truncated_normal(10.0, 2.0, 0.0, f64::INFINITY)),
        ("truncated_tail", Distribution::truncated_normal(0.0, 1.0, 5.0, f64::INFINITY)),
    ];
    for (name, dist) in cases {
        let mut rng = StdRng::seed_from_u64(1);
        group.bench_function(name, |b| {
            b.iter(|| dist.sample(&0.0, &mut rng).unwrap());
        });
    }
    group.finish();
}

fn bench_generate_one(c: &mut Criterion) {
    let config = ecosystem();
    let generator = EntityGenerator::new(&config);
    let mut rng = StdRng::seed_from_u64(2);

    let mut group = c.benchmark_group("entity_generation");
    group.throughput(Throughput::Elements(1));
    group.bench_function("generate_one", |b| {
        b.iter(|| generator.generate_one(&mut rng).unwrap());
    });
    group.finish();
}

fn bench_generate_batch(c: &mut Criterion) {
    let config = ecosystem();
    let generator = EntityGenerator::new(&config);

    let mut group = c.benchmark_group("batch_generation");
    group.throughput(Throughput::Elements(1000));
    for workers in [1, 4] {
        let settings = GeneratorSettings {
            workers,
            ..GeneratorSettings::seeded(3)
        };
        group.bench_function(format!("1000_entities_{workers}_workers"), |b| {
            b.iter_batched(
                || settings,
                |s| generator.generate_batch(1000, &s).unwrap(),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    sampling,
    bench_factor_multipliers,
    bench_distributions,
    bench_generate_one,
    bench_generate_batch
);
criterion_main!(sampling);
