mod fixtures;
mod ingestion_tests;
mod order_independence_tests;
mod summary_package_tests;
