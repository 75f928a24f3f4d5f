//! Criterion benchmarks for sqlcraft

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde::Serialize;
use sqlcraft::core::bind;
use sqlcraft::prelude::*;
use sqlcraft::sqlgen;

// ============================================================================
// SqlValue Creation Benchmarks
// ============================================================================

fn bench_value_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_creation");
    group.throughput(Throughput::Elements(1));

    group.bench_function("int", |b| {
        b.iter(|| {
            let value = SqlValue::from(black_box(42i32));
            black_box(value)
        });
    });

    group.bench_function("long", |b| {
        b.iter(|| {
            let value = SqlValue::from(black_box(123456789i64));
            black_box(value)
        });
    });

    group.bench_function("string", |b| {
        b.iter(|| {
            let value = SqlValue::from(black_box("Hello, World!".to_string()));
            black_box(value)
        });
    });

    group.finish();
}

// ============================================================================
// Parameter Rendering Benchmarks
// ============================================================================

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let simple_params = vec![
        Parameter::single("name", "Alice"),
        Parameter::single("age", 30),
    ];
    group.bench_function("two_scalars", |b| {
        b.iter(|| {
            let rendered = bind::render(
                black_box("SELECT * FROM users WHERE name = @name AND age > @age"),
                black_box(&simple_params),
                SqlDialect::Sqlite,
            );
            black_box(rendered)
        });
    });

    for size in [10usize, 100, 1000] {
        let params = vec![Parameter::list("ids", (0..size as i32).collect::<Vec<_>>())];
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("in_list", size), &params, |b, params| {
            b.iter(|| {
                let rendered = bind::render(
                    black_box("SELECT * FROM users WHERE id IN (@ids)"),
                    black_box(params),
                    SqlDialect::Postgres,
                );
                black_box(rendered)
            });
        });
    }

    group.finish();
}

// ============================================================================
// SQL Generation Benchmarks
// ============================================================================

#[derive(Serialize, Clone)]
struct Customer {
    customer_id: Option<i64>,
    first_name: String,
    last_name: String,
    age: i64,
}

fn bench_sqlgen(c: &mut Criterion) {
    let mut group = c.benchmark_group("sqlgen");

    let customer = Customer {
        customer_id: None,
        first_name: "Clark".to_string(),
        last_name: "Kent".to_string(),
        age: 28,
    };

    group.bench_function("generate_insert", |b| {
        b.iter(|| {
            let generated =
                sqlgen::generate_insert(SqlDialect::Sqlite, black_box(&customer), None);
            black_box(generated)
        });
    });

    let batch = vec![customer.clone(); 100];
    group.throughput(Throughput::Elements(100));
    group.bench_function("generate_inserts_100", |b| {
        b.iter(|| {
            let generated =
                sqlgen::generate_inserts(SqlDialect::Sqlite, black_box(&batch), None);
            black_box(generated)
        });
    });

    let saved = Customer {
        customer_id: Some(1),
        ..customer.clone()
    };
    group.bench_function("generate_update", |b| {
        b.iter(|| {
            let generated = sqlgen::generate_update(
                SqlDialect::Postgres,
                black_box(&saved),
                &["customer_id"],
                None,
            );
            black_box(generated)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_value_creation, bench_render, bench_sqlgen);
criterion_main!(benches);
