use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fulfillment_core::{Order, WorkerRegistry};
use fulfillment_model::ModelBuilder;
use fulfillment_optimizer::{AssignmentSolver, BranchAndBoundSolver, MilpSolver};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn daily_orders(count: usize, seed: u64) -> Vec<Order> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let items = rng.gen_range(1..=20u32);
            let weight = rng.gen_range(0.1..2.0) * f64::from(items);
            Order::new(i as u64 + 1, items, weight)
        })
        .collect()
}

fn model_building(c: &mut Criterion) {
    let registry = WorkerRegistry::standard_shift();
    let mut group = c.benchmark_group("build_model");
    for size in [100usize, 1_000, 5_000] {
        let orders = daily_orders(size, 7);
        group.bench_with_input(BenchmarkId::from_parameter(size), &orders, |b, orders| {
            b.iter(|| ModelBuilder::new(&registry).build(black_box(orders)))
        });
    }
    group.finish();
}

fn solving(c: &mut Criterion) {
    let registry = WorkerRegistry::standard_shift();
    let mut group = c.benchmark_group("solve");
    group.sample_size(10);

    for size in [20usize, 80] {
        let orders = daily_orders(size, 42);
        let model = ModelBuilder::new(&registry).build(&orders).unwrap();
        group.bench_with_input(BenchmarkId::new("milp", size), &model, |b, model| {
            b.iter(|| MilpSolver::new().solve(black_box(model)))
        });
    }

    let orders = daily_orders(20, 42);
    let model = ModelBuilder::new(&registry).build(&orders).unwrap();
    group.bench_with_input(BenchmarkId::new("branch-and-bound", 20), &model, |b, model| {
        b.iter(|| BranchAndBoundSolver::new().solve(black_box(model)))
    });

    group.finish();
}

criterion_group!(benches, model_building, solving);
criterion_main!(benches);
