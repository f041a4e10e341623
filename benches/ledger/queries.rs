use super::fixtures::{model_from, synthetic_export};
use criterion::{BenchmarkId, Criterion};
use std::hint::black_box;

/// Register benchmarks for per-stakeholder holdings queries.
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Ledger - Queries");

    for &stakeholders in &[100, 1_000] {
        let model = model_from(&synthetic_export(stakeholders));

        group.bench_with_input(
            BenchmarkId::new("stock_holdings_all_stakeholders", stakeholders),
            &model,
            |b, model| {
                b.iter(|| {
                    for stakeholder in model.stakeholders() {
                        for stock_class in model.stock_classes() {
                            black_box(model.stakeholder_stock_holdings(stakeholder, stock_class));
                        }
                    }
                })
            },
        );

        if let Some(plan) = model.stock_plan("plan") {
            group.bench_with_input(
                BenchmarkId::new("options_remaining_for_issuance", stakeholders),
                &model,
                |b, model| b.iter(|| black_box(model.options_remaining_for_issuance(plan))),
            );
        }

        if let Some(seed) = model.stock_class("seed") {
            group.bench_with_input(
                BenchmarkId::new("stock_class_conversion_ratio", stakeholders),
                &model,
                |b, model| b.iter(|| black_box(model.stock_class_conversion_ratio(seed))),
            );
        }
    }

    group.finish();
}
