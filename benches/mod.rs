use criterion::{criterion_group, criterion_main};

mod ledger;

use ledger::register_benchmarks as register_ledger_benchmarks;
use summary::register_benchmarks as register_summary_benchmarks;

// Define the benchmark groups
criterion_group!(
    benches,
    register_ledger_benchmarks,
    register_summary_benchmarks,
);

criterion_main!(benches);
