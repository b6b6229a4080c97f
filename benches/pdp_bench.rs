//! Criterion benchmarks for u-pdp.
//!
//! Uses synthetic grid instances with seeded random tasks so every run
//! measures the same work.

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_numflow::random::create_rng;
use u_pdp::anneal::{AnnealConfig, StepClock};
use u_pdp::cost::CostModel;
use u_pdp::insertion::InsertionEvaluator;
use u_pdp::model::{Task, Topology, Vehicle};
use u_pdp::planner::{CentralizedPlanner, TaskLedger};

// ===========================================================================
// Instances
// ===========================================================================

fn grid(side: usize) -> Topology {
    let mut edges = Vec::new();
    for y in 0..side {
        for x in 0..side {
            let c = y * side + x;
            if x + 1 < side {
                edges.push((c, c + 1, 1.0));
            }
            if y + 1 < side {
                edges.push((c, c + side, 1.0));
            }
        }
    }
    Topology::from_edges(side * side, &edges).expect("grid edges are in range")
}

fn fleet(cities: usize) -> Vec<Vehicle> {
    vec![
        Vehicle::new(0, 30, 0, 5.0),
        Vehicle::new(1, 30, cities / 2, 4.0),
        Vehicle::new(2, 20, cities - 1, 3.0),
    ]
}

fn tasks(n: usize, cities: usize, seed: u64) -> Vec<Arc<Task>> {
    let mut rng = create_rng(seed);
    (0..n)
        .map(|id| {
            let pickup = rng.random_range(0..cities);
            let delivery = rng.random_range(0..cities);
            let weight = rng.random_range(1..=6);
            Arc::new(Task::new(id, pickup, delivery, weight).with_reward(rng.random_range(500.0..1500.0)))
        })
        .collect()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion");
    group.sample_size(10);

    let graph = grid(8);
    let vehicles = fleet(64);
    for &committed in &[5usize, 20, 40] {
        let all = tasks(committed + 1, 64, 42);
        let mut ledger = TaskLedger::new(CostModel::new(&vehicles, &graph));
        for task in &all[..committed] {
            let quote = ledger.quote(task).expect("fresh task");
            ledger.commit(quote).expect("fresh quote");
        }
        let frozen = ledger.committed().clone();
        let evaluator = InsertionEvaluator::new(CostModel::new(&vehicles, &graph));
        let probe = &all[committed];

        group.bench_with_input(BenchmarkId::from_parameter(committed), &frozen, |b, s| {
            b.iter(|| {
                let outcome = evaluator.evaluate(black_box(s), black_box(probe));
                black_box(outcome)
            })
        });
    }
    group.finish();
}

fn bench_anneal(c: &mut Criterion) {
    let mut group = c.benchmark_group("anneal");
    group.sample_size(10);

    let graph = grid(8);
    let vehicles = fleet(64);
    for &n in &[10usize, 30] {
        let tasks = tasks(n, 64, 7);
        let config = AnnealConfig::default()
            .with_deadline(Duration::from_secs(1))
            .with_max_iterations(500)
            .with_seed(42);
        let planner = CentralizedPlanner::new(&vehicles, &graph)
            .expect("non-empty fleet")
            .with_anneal_config(config.clone());

        group.bench_with_input(BenchmarkId::new("tasks", n), &tasks, |b, t| {
            b.iter(|| {
                let mut clock = StepClock::new(config.budget() / 500);
                let outcome = planner.plan_with_clock(black_box(t), &mut clock);
                black_box(outcome)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insertion, bench_anneal);
criterion_main!(benches);
