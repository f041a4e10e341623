//! Prelude module that re-exports commonly used types and traits.
//!
//! Instead of importing each type individually, you can use:
//!
//! ```rust
//! use captable_rs::prelude::*;
//! ```

// Ledger and its read-only view
pub use crate::ledger::{CapTableView, LedgerError, Model, UnresolvedReversalPolicy};

// Records
pub use crate::ledger::{
    Issuer, ObjectType, PoolAdjustment, Record, RecordError, Stakeholder, StockClass, StockPlan,
    Transaction, TransactionKind,
};

// Calculators
pub use crate::ledger::{
    BalanceCalculator, BalancePolicy, ConversionPath, ConversionRatioCalculator,
    OptionsRemainingCalculator, Ratio, RoundingType,
};

// Summaries
pub use crate::ledger::{CapTableSummary, CapTableSummaryPackage, HoldingCategories};

// Decimal and date types used throughout the public API
pub use chrono::{DateTime, NaiveDate, Utc};
pub use rust_decimal::Decimal;
