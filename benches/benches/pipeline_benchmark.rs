//! Parsing and derivation benchmarks on synthetic payloads.
//!
//! Run with: `cargo bench --package spotwatt-bench`

use chrono::TimeDelta;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use spotwatt_bench::{day_ahead_document, retail_page, series};
use spotwatt_derive::{AlignMode, MissingPolicy, align, delta, flat_overhead};
use spotwatt_fetch::{parse_day_ahead, parse_retail};
use std::hint::black_box;

fn parse_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for (name, points, minutes) in [("hourly", 24, 60), ("quarter-hourly", 96, 15)] {
        let body = day_ahead_document(points, minutes);
        group.throughput(Throughput::Elements(points as u64));
        group.bench_with_input(BenchmarkId::new("day-ahead", name), &body, |b, body| {
            b.iter(|| parse_day_ahead(black_box(body)));
        });
    }

    let body = retail_page(48);
    group.throughput(Throughput::Elements(48));
    group.bench_with_input(BenchmarkId::new("retail", "half-hourly"), &body, |b, body| {
        b.iter(|| parse_retail(black_box(body), None));
    });

    group.finish();
}

fn derive_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive");
    let retail = series(48, TimeDelta::minutes(30), 0);
    let spot = flat_overhead(&series(96, TimeDelta::minutes(15), 0), 18.5);
    group.throughput(Throughput::Elements(retail.len() as u64));

    for mode in [AlignMode::Timestamp, AlignMode::Hour, AlignMode::Positional] {
        group.bench_with_input(BenchmarkId::new("align", mode), &mode, |b, mode| {
            b.iter(|| align(black_box(&retail), black_box(&spot), *mode));
        });
    }

    for policy in [MissingPolicy::Zero, MissingPolicy::Drop] {
        group.bench_with_input(
            BenchmarkId::new("delta", policy.as_str()),
            &policy,
            |b, policy| {
                b.iter(|| delta(black_box(&retail), black_box(&spot), AlignMode::Hour, *policy));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, parse_benchmark, derive_benchmark);
criterion_main!(benches);
