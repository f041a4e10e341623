//! # Capitalization Ledger Engine
//!
//! An in-memory capitalization ledger for Open Cap Format (OCF) data. It ingests
//! OCF objects in any order and answers the questions a cap table renderer asks:
//! how many shares, plan securities, warrants and non-plan awards each
//! stakeholder holds, what preferred stock is worth in common-equivalent shares,
//! and how much of each plan's pool is still available for grant.
//!
//! ## Key Features
//!
//! - **Order-Independent Ingestion**: Records are indexed, never applied eagerly.
//!   Every query replays a security's transactions through a fresh calculator, so
//!   a retraction consumed before its issuance still nets out correctly.
//!
//! - **Typed Records**: OCF `object_type` tags decode into [`Record`], with
//!   transaction tags split into a security family and an action. Unknown tags
//!   are kept as [`Record::Unknown`] and ignored by the ledger.
//!
//! - **Policy-Driven Balances**: One [`BalanceCalculator`] handles stock, plan
//!   securities and warrants; a [`BalancePolicy`] constant says which tags issue,
//!   decrement or reverse a security.
//!
//! - **Exact Conversion Ratios**: Preferred classes resolve to the reachable
//!   common class with the lowest positive votes per share. Ratios along the
//!   path are multiplied in [`rust_decimal::Decimal`], never in floating point.
//!
//! - **Read-Only Views**: Renderers get a [`CapTableView`], and
//!   [`CapTableSummary`] computes a full table from one. Summaries can be
//!   wrapped in a checksummed [`CapTableSummaryPackage`] for approval comparisons.
//!
//! ## Example
//!
//! ```rust
//! use captable_rs::prelude::*;
//! use chrono::TimeZone;
//! use serde_json::json;
//!
//! let as_of = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
//! let generated_at = Utc.with_ymd_and_hms(2023, 7, 1, 0, 0, 0).unwrap();
//! let mut model = Model::new(as_of, generated_at);
//!
//! model.consume_all(&[
//!     json!({ "id": "joe", "object_type": "STAKEHOLDER", "name": { "legal_name": "Joe" } }),
//!     json!({ "id": "Fake", "object_type": "STOCK_CLASS", "name": "Common",
//!             "class_type": "COMMON", "votes_per_share": "1" }),
//!     json!({ "id": "t1", "object_type": "TX_STOCK_ISSUANCE", "security_id": "yup",
//!             "stakeholder_id": "joe", "stock_class_id": "Fake", "quantity": "100" }),
//! ]);
//!
//! let joe = model.stakeholder("joe").unwrap();
//! let fake = model.stock_class("Fake").unwrap();
//! assert_eq!(model.stakeholder_stock_holdings(joe, fake), Decimal::from(100));
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber. Dropped
//! conversion rights and malformed records are logged at `warn`, unreachable
//! common stock at `error`, and reversals still waiting for their issuance at
//! `debug` (or `warn` under [`UnresolvedReversalPolicy::Warn`]).

pub mod ledger;

/// Prelude module that re-exports commonly used types and traits.
pub mod prelude;

pub use ledger::balance::{BalanceCalculator, BalanceEffect, BalancePolicy, QuantitySource};
pub use ledger::conversion::{ConversionPath, ConversionRatioCalculator};
pub use ledger::error::LedgerError;
pub use ledger::model::{
    HoldingCategory, Model, UnresolvedReversalPolicy, stock_class_display_order,
    stock_plan_display_order,
};
pub use ledger::options_remaining::OptionsRemainingCalculator;
pub use ledger::ratio::{Ratio, RoundingType};
pub use ledger::records::{Record, RecordError, parse_ocf_date};
pub use ledger::summary::{
    CAPTABLE_SUMMARY_FORMAT_VERSION, CapTableSummary, CapTableSummaryPackage, HoldingCategories,
    HoldingsRow,
};
pub use ledger::types::{
    ConversionRight, ExerciseTrigger, Issuer, ObjectType, PoolAdjustment, SecurityFamily,
    Stakeholder, StockClass, StockPlan, Transaction, TransactionAction, TransactionKind,
};
pub use ledger::view::CapTableView;
