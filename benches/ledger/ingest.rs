use super::fixtures::synthetic_export;
use captable_rs::{Model, Record};
use chrono::{NaiveDate, Utc};
use criterion::{BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

/// Register benchmarks for decoding and consuming OCF records.
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Ledger - Ingest");

    for &stakeholders in &[10, 100, 1_000] {
        let values = synthetic_export(stakeholders);
        group.throughput(Throughput::Elements(values.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("decode_records", stakeholders),
            &values,
            |b, values| {
                b.iter(|| {
                    for value in values {
                        let _ = black_box(Record::from_value(black_box(value)));
                    }
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("consume_all", stakeholders),
            &values,
            |b, values| {
                b.iter(|| {
                    let mut model = Model::new(NaiveDate::default(), Utc::now());
                    model.consume_all(black_box(values));
                    black_box(model)
                })
            },
        );
    }

    group.finish();
}
