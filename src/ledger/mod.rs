//! Capitalization ledger: typed OCF records, balance calculators, conversion
//! ratios and the aggregating [`Model`].

/// Running balance calculators shared by stock, plan securities and warrants.
pub mod balance;
/// Conversion-ratio resolution from preferred into common stock.
pub mod conversion;
pub mod error;
pub mod model;
/// Plan pool remaining after grants and pool adjustments.
pub mod options_remaining;
pub mod ratio;
pub mod records;
/// Computed cap table summaries with checksum packaging.
pub mod summary;
pub mod types;
/// Read-only interface for cap table renderers.
pub mod view;

pub use balance::{BalanceCalculator, BalanceEffect, BalancePolicy, QuantitySource};
pub use conversion::{ConversionPath, ConversionRatioCalculator};
pub use error::LedgerError;
pub use model::{HoldingCategory, Model, UnresolvedReversalPolicy};
pub use options_remaining::OptionsRemainingCalculator;
pub use ratio::{Ratio, RoundingType};
pub use records::{Record, RecordError};
pub use summary::{
    CAPTABLE_SUMMARY_FORMAT_VERSION, CapTableSummary, CapTableSummaryPackage, HoldingCategories,
    HoldingsRow,
};
pub use types::{
    ConversionRight, ExerciseTrigger, Issuer, ObjectType, PoolAdjustment, SecurityFamily,
    Stakeholder, StockClass, StockPlan, Transaction, TransactionAction, TransactionKind,
};
pub use view::CapTableView;
