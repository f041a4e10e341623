pub mod fixtures;
mod ingest;
mod queries;

use criterion::Criterion;

/// Register all ledger ingestion and query benchmarks.
pub fn register_benchmarks(c: &mut Criterion) {
    ingest::register_benchmarks(c);
    queries::register_benchmarks(c);
}
