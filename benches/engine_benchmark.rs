//! Benchmarks for the engine hot paths.
//!
//! Covers select, update (including the periodic mutation) and the state
//! codec at the default population size and a larger one.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ssn::rps::{MatchConfig, play_match};
use ssn::{Config, Engine};

fn engine(population_size: i32) -> Engine {
    let config = Config {
        population_size,
        seed: 42,
        ..Config::default()
    };
    Engine::new(config).unwrap_or_else(|e| panic!("bench config rejected: {e}"))
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");
    for size in [100, 1000] {
        let mut engine = engine(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(engine.select()));
        });
    }
    group.finish();
}

fn bench_select_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_update");
    for size in [100, 1000] {
        let mut engine = engine(size);
        let mut reward = 1.0f32;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                if let Ok(id) = engine.select() {
                    reward = -reward;
                    black_box(engine.update(id, black_box(reward))).ok();
                }
            });
        });
    }
    group.finish();
}

fn bench_save_load(c: &mut Criterion) {
    let mut engine = engine(1000);
    let Ok(saved) = engine.save() else {
        return;
    };

    c.bench_function("save_1000", |b| {
        b.iter(|| black_box(engine.save()));
    });

    c.bench_function("load_1000", |b| {
        b.iter(|| black_box(engine.load(black_box(&saved))));
    });
}

fn bench_match(c: &mut Criterion) {
    let config = MatchConfig {
        engine: Config {
            seed: 7,
            ..MatchConfig::default().engine
        },
        opponent_seed: 7,
        ..MatchConfig::default()
    };

    c.bench_function("rps_match_1000", |b| {
        b.iter(|| black_box(play_match(black_box(&config))));
    });
}

criterion_group!(
    benches,
    bench_select,
    bench_select_update,
    bench_save_load,
    bench_match
);
criterion_main!(benches);
