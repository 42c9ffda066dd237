//! Performance benchmarks for SparkConf
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sparkconf::render::{render, OutputFormat};
use sparkconf::sizing::{
    parse_memory, plan_allocation, round_to_clean_megabytes, ClusterTopology, ExecutorPolicy,
};

fn bench_parse_memory(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_memory");

    for input in ["100", "512M", "64G", "1.5t", "64GiB"] {
        group.bench_with_input(BenchmarkId::from_parameter(input), &input, |b, input| {
            b.iter(|| parse_memory(black_box(input)))
        });
    }

    group.finish();
}

fn bench_round(c: &mut Criterion) {
    c.bench_function("round_to_clean_megabytes", |b| {
        b.iter(|| {
            for gib in 1..64u64 {
                black_box(round_to_clean_megabytes(black_box((gib << 30) as f64 / 3.0)));
            }
        });
    });
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_allocation");

    for policy in ExecutorPolicy::ALL {
        let topology = ClusterTopology::new(16, 20, "64G", "/tmp");
        group.bench_with_input(
            BenchmarkId::from_parameter(policy.cli_name()),
            &topology,
            |b, topology| b.iter(|| plan_allocation(black_box(topology), policy)),
        );
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let plan = plan_allocation(&ClusterTopology::default(), ExecutorPolicy::General).unwrap();

    c.bench_function("render_all", |b| {
        b.iter(|| render(black_box(&plan), OutputFormat::All))
    });
}

criterion_group!(benches, bench_parse_memory, bench_round, bench_plan, bench_render);
criterion_main!(benches);
