//! Profiling pipeline benchmarks.
//!
//! Measures parsing, in-memory profiling, and the date parser in isolation.

use std::io::Write;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::NamedTempFile;

use dqprofile::dates::parse_datetime;
use dqprofile::{Parser, Profiler};

/// Generate an orders table with nulls, duplicates, emails and date ranges.
fn generate_orders(rows: usize) -> String {
    let mut rng = StdRng::seed_from_u64(7);
    let mut data = String::from("order_id,email,amount,start_date,end_date,status\n");
    let statuses = ["open", "shipped", "cancelled", ""];

    for row in 0..rows {
        let day = rng.gen_range(1..=28i32);
        let length = rng.gen_range(-2..=10i32);
        let end_day = (day + length).clamp(1, 28);
        let amount = if rng.gen_bool(0.05) {
            String::new()
        } else {
            format!("{:.2}", rng.gen_range(1.0..500.0f64))
        };

        data.push_str(&format!(
            "{},user{}@example.com,{},2024-03-{:02},2024-03-{:02},{}\n",
            row % (rows - rows / 100).max(1),
            rng.gen_range(0..1000),
            amount,
            day,
            end_day,
            statuses[row % statuses.len()],
        ));
    }

    data
}

fn temp_csv(data: &str) -> NamedTempFile {
    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
    temp.write_all(data.as_bytes()).unwrap();
    temp
}

/// Benchmark the full file pipeline: parse, infer, score, sample.
fn bench_profile_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("profile_file");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_orders(*rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("orders_rows", rows), &data, |b, data| {
            b.iter_with_setup(
                || temp_csv(data),
                |temp| black_box(Profiler::new().profile_file(temp.path(), None).unwrap()),
            )
        });
    }

    group.finish();
}

/// Benchmark profiling an already loaded dataset.
fn bench_profile_dataset(c: &mut Criterion) {
    let mut group = c.benchmark_group("profile_dataset");
    group.sample_size(20);

    for rows in [1_000, 50_000].iter() {
        let data = generate_orders(*rows);
        let dataset = Parser::new().parse_bytes(data.as_bytes(), b',').unwrap();
        let profiler = Profiler::new();

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("orders_rows", rows), &dataset, |b, dataset| {
            b.iter(|| black_box(profiler.profile(dataset, "orders")))
        });
    }

    group.finish();
}

/// Benchmark the date parser on hits and misses.
fn bench_date_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("date_parsing");

    for input in ["2024-03-15", "15/03/2024", "2024-03-15T10:30:00Z", "20240315", "not a date"] {
        group.bench_with_input(BenchmarkId::from_parameter(input), input, |b, input| {
            b.iter(|| black_box(parse_datetime(input)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_profile_file,
    bench_profile_dataset,
    bench_date_parsing
);
criterion_main!(benches);
