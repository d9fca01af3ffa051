//! Criterion benchmarks for the gamerec recommendation engine.
//!
//! Covers the hot paths of a run:
//! - ALS training over synthetic observation sets
//! - Per-entity normal equation solves
//! - Top-N scoring for single users and whole batches

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use gamerec::als::{AlsConfig, AlsTrainer, NormalEquations, TrainingContext};
use gamerec::index::UserIndex;
use gamerec::interactions::Observation;
use gamerec::inventory::RawInventoryRecord;
use gamerec::recommend::Recommender;
use std::hint::black_box;

/// Generate synthetic observations with a pseudo-random play-time pattern.
fn generate_observations(user_count: usize, items_per_user: usize) -> Vec<Observation> {
    let mut observations = Vec::with_capacity(user_count * items_per_user);
    for user_index in 0..user_count {
        for j in 0..items_per_user {
            let appid = ((user_index * 7 + j * 13) % 200) as u32 + 1;
            let weight = ((user_index * 31 + j * 17) % 600 + 5) as f32;
            observations.push(Observation {
                user_index,
                appid,
                weight,
            });
        }
    }
    observations
}

fn bench_config(iterations: usize) -> AlsConfig {
    AlsConfig {
        factors: 8,
        iterations,
        regularization: 0.1,
        implicit_alpha: None,
        seed: Some(42),
    }
}

/// Benchmark ALS training at different dataset sizes.
fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(10);

    let ctx = TrainingContext::new().unwrap();

    for &user_count in [100usize, 300].iter() {
        let observations = generate_observations(user_count, 20);
        group.throughput(Throughput::Elements(observations.len() as u64));
        group.bench_with_input(
            format!("als_{user_count}_users"),
            &observations,
            |b, observations| {
                let trainer = AlsTrainer::new(bench_config(3)).unwrap();
                b.iter(|| {
                    let model = trainer.train(black_box(observations), &ctx).unwrap();
                    black_box(model)
                })
            },
        );
    }

    group.finish();
}

/// Benchmark one entity's regularized solve.
fn bench_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver");

    let rank = 16;
    let factors: Vec<Vec<f32>> = (0..50)
        .map(|i| {
            (0..rank)
                .map(|j| ((i * 3 + j * 5) as f32 * 0.01).sin() * 0.2)
                .collect()
        })
        .collect();

    group.throughput(Throughput::Elements(factors.len() as u64));
    group.bench_function("normal_equations_rank_16", |b| {
        b.iter(|| {
            let mut equations = NormalEquations::new(rank);
            for (i, factor) in factors.iter().enumerate() {
                equations.add(black_box(factor), 1.0, (i % 7) as f64);
            }
            equations.regularize(0.1);
            let solution = equations.solve().unwrap();
            black_box(solution)
        })
    });

    group.finish();
}

/// Benchmark top-N scoring over a trained model.
fn bench_recommendation(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommendation");

    let user_count = 300;
    let observations = generate_observations(user_count, 20);
    let ctx = TrainingContext::new().unwrap();
    let trainer = AlsTrainer::new(bench_config(5)).unwrap();
    let model = trainer.train(&observations, &ctx).unwrap();

    let records: Vec<RawInventoryRecord> = (0..user_count)
        .map(|i| RawInventoryRecord {
            user_id: format!("user_{i}"),
            games: None,
        })
        .collect();
    let index = UserIndex::from_records(&records);
    let recommender = Recommender::new(&model, &index);

    group.bench_function("recommend_single_user", |b| {
        b.iter(|| {
            let recommendations = recommender.recommend(black_box(0), 10).unwrap();
            black_box(recommendations)
        })
    });

    group.throughput(Throughput::Elements(user_count as u64));
    group.bench_function("recommend_batch_300_users", |b| {
        b.iter(|| {
            let outcome = recommender.recommend_batch(10).unwrap();
            black_box(outcome)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_training, bench_solver, bench_recommendation);

criterion_main!(benches);
