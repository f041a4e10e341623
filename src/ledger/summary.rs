//! Computed cap table summary for renderers and approval comparisons

use std::collections::BTreeMap;

use bitflags::bitflags;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::trace;

use super::error::LedgerError;
use super::types::{Stakeholder, StockClass, StockPlan};
use super::view::CapTableView;

bitflags! {
    /// Flags for selecting which holdings a summary computes
    ///
    /// Multiple flags can be combined using bitwise OR.
    ///
    /// # Examples
    /// ```
    /// use captable_rs::HoldingCategories;
    ///
    /// // Issued stock and warrants only
    /// let flags = HoldingCategories::STOCK | HoldingCategories::WARRANT;
    /// assert!(!flags.contains(HoldingCategories::PLAN));
    ///
    /// // Everything
    /// let flags = HoldingCategories::ALL;
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct HoldingCategories: u32 {
        /// Outstanding shares per stock class
        const STOCK = 1 << 0;

        /// Plan securities per stock plan, plus options remaining per plan
        const PLAN = 1 << 1;

        /// Warrants per stock class
        const WARRANT = 1 << 2;

        /// Non-plan equity compensation per stock class
        const NON_PLAN = 1 << 3;

        /// All holdings
        const ALL = Self::STOCK.bits() | Self::PLAN.bits()
                  | Self::WARRANT.bits() | Self::NON_PLAN.bits();
    }
}

/// One stakeholder's computed holdings. Zero positions are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingsRow {
    pub stakeholder_id: String,
    pub display_name: String,
    /// Outstanding shares by stock class id (not converted)
    pub stock: BTreeMap<String, Decimal>,
    /// As-converted warrants by stock class id, rounded per class
    pub warrants: BTreeMap<String, Decimal>,
    /// As-converted non-plan equity compensation by stock class id, rounded per class
    pub non_plan: BTreeMap<String, Decimal>,
    /// As-converted plan securities by stock plan id, rounded per the plan's class
    pub plans: BTreeMap<String, Decimal>,
    /// Sum of all positions in common-equivalent shares
    pub as_converted_total: Decimal,
}

impl HoldingsRow {
    fn new(stakeholder: &Stakeholder) -> Self {
        Self {
            stakeholder_id: stakeholder.id.clone(),
            display_name: stakeholder.display_name.clone(),
            stock: BTreeMap::new(),
            warrants: BTreeMap::new(),
            non_plan: BTreeMap::new(),
            plans: BTreeMap::new(),
            as_converted_total: Decimal::ZERO,
        }
    }
}

/// Point-in-time cap table computed from a [`CapTableView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapTableSummary {
    pub issuer_name: String,
    pub as_of_date: NaiveDate,
    pub categories: HoldingCategories,
    /// Stock class ids in display order
    pub stock_class_ids: Vec<String>,
    /// Stock plan ids in display order
    pub stock_plan_ids: Vec<String>,
    pub rows: Vec<HoldingsRow>,
    /// Shares still available for grant by plan id
    pub options_remaining: BTreeMap<String, Decimal>,
    /// All rows' as-converted totals plus options remaining
    pub fully_diluted_total: Decimal,
}

impl CapTableSummary {
    /// Computes a summary of the selected holding categories.
    ///
    /// Every position counts toward `as_converted_total` in common-equivalent
    /// shares, rounded with the rounding mode of the class it converts from.
    /// Plan positions use the rounding of the plan's stock class.
    ///
    /// # Errors
    ///
    /// Propagates conversion failures from the view.
    pub fn from_view<V>(view: &V, categories: HoldingCategories) -> Result<Self, LedgerError>
    where
        V: CapTableView + ?Sized,
    {
        let stock_classes = view.stock_classes();
        let stock_plans = view.stock_plans();
        let mut rows = Vec::with_capacity(view.stakeholders().len());

        for stakeholder in view.stakeholders() {
            let mut row = HoldingsRow::new(stakeholder);

            for stock_class in stock_classes {
                if categories.contains(HoldingCategories::STOCK) {
                    let shares = view.stakeholder_stock_holdings(stakeholder, stock_class);
                    if !shares.is_zero() {
                        let ratio = view.stock_class_conversion(stock_class)?;
                        let converted = ratio.convert(shares).ok_or_else(|| {
                            LedgerError::ConversionOverflow {
                                stock_class_id: stock_class.id.clone(),
                            }
                        })?;
                        row.as_converted_total += stock_class.round_converted(converted);
                        row.stock.insert(stock_class.id.clone(), shares);
                    }
                }

                if categories.contains(HoldingCategories::WARRANT)
                    && view.warrant_stock_ids().contains(&stock_class.id)
                {
                    let warrants = stock_class
                        .round_converted(view.stakeholder_warrant_holdings(stakeholder, stock_class)?);
                    if !warrants.is_zero() {
                        row.as_converted_total += warrants;
                        row.warrants.insert(stock_class.id.clone(), warrants);
                    }
                }

                if categories.contains(HoldingCategories::NON_PLAN)
                    && view.non_plan_stock_ids().contains(&stock_class.id)
                {
                    let awards = stock_class
                        .round_converted(view.stakeholder_non_plan_holdings(stakeholder, stock_class)?);
                    if !awards.is_zero() {
                        row.as_converted_total += awards;
                        row.non_plan.insert(stock_class.id.clone(), awards);
                    }
                }
            }

            if categories.contains(HoldingCategories::PLAN) {
                for stock_plan in stock_plans {
                    let securities = view.stakeholder_stock_plan_holdings(stakeholder, stock_plan)?;
                    let securities = match plan_stock_class(stock_classes, stock_plan) {
                        Some(stock_class) => stock_class.round_converted(securities),
                        None => securities,
                    };
                    if !securities.is_zero() {
                        row.as_converted_total += securities;
                        row.plans.insert(stock_plan.id.clone(), securities);
                    }
                }
            }

            rows.push(row);
        }

        let mut options_remaining = BTreeMap::new();
        if categories.contains(HoldingCategories::PLAN) {
            for stock_plan in stock_plans {
                options_remaining.insert(
                    stock_plan.id.clone(),
                    view.options_remaining_for_issuance(stock_plan)?,
                );
            }
        }

        let fully_diluted_total: Decimal = rows
            .iter()
            .map(|row| row.as_converted_total)
            .chain(options_remaining.values().copied())
            .sum();

        trace!(
            stakeholders = rows.len(),
            %fully_diluted_total,
            "computed cap table summary"
        );

        Ok(Self {
            issuer_name: view.issuer_name().to_string(),
            as_of_date: view.as_of_date(),
            categories,
            stock_class_ids: stock_classes.iter().map(|class| class.id.clone()).collect(),
            stock_plan_ids: stock_plans.iter().map(|plan| plan.id.clone()).collect(),
            rows,
            options_remaining,
            fully_diluted_total,
        })
    }

    /// The row for a stakeholder.
    #[must_use]
    pub fn row(&self, stakeholder_id: &str) -> Option<&HoldingsRow> {
        self.rows
            .iter()
            .find(|row| row.stakeholder_id == stakeholder_id)
    }

    /// Outstanding shares of a stock class across all stakeholders.
    #[must_use]
    pub fn stock_class_total(&self, stock_class_id: &str) -> Decimal {
        self.rows
            .iter()
            .filter_map(|row| row.stock.get(stock_class_id))
            .sum()
    }

    /// Plan securities of a stock plan across all stakeholders.
    #[must_use]
    pub fn stock_plan_total(&self, stock_plan_id: &str) -> Decimal {
        self.rows
            .iter()
            .filter_map(|row| row.plans.get(stock_plan_id))
            .sum()
    }

    /// A stakeholder's share of the fully diluted total, or `None` when the
    /// total is zero or the stakeholder has no row.
    #[must_use]
    pub fn fully_diluted_percentage(&self, stakeholder_id: &str) -> Option<Decimal> {
        let row = self.row(stakeholder_id)?;
        row.as_converted_total
            .checked_div(self.fully_diluted_total)
            .map(|fraction| fraction * Decimal::ONE_HUNDRED)
    }
}

fn plan_stock_class<'a>(stock_classes: &'a [StockClass], stock_plan: &StockPlan) -> Option<&'a StockClass> {
    let class_id = stock_plan.stock_class_id.as_deref()?;
    stock_classes.iter().find(|class| class.id == class_id)
}

/// Format version used for checksum-enabled cap table summaries.
pub const CAPTABLE_SUMMARY_FORMAT_VERSION: u32 = 1;

/// Wrapper that provides checksum validation for `CapTableSummary` instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapTableSummaryPackage {
    /// Version of the summary schema for forward compatibility.
    pub version: u32,
    /// Summary payload.
    pub summary: CapTableSummary,
    /// Hex-encoded checksum of the serialized summary.
    pub checksum: String,
}

impl CapTableSummaryPackage {
    /// Creates a new package computing the checksum of the summary contents.
    pub fn new(summary: CapTableSummary) -> Result<Self, LedgerError> {
        let checksum = Self::compute_checksum(&summary)?;

        Ok(Self {
            version: CAPTABLE_SUMMARY_FORMAT_VERSION,
            summary,
            checksum,
        })
    }

    /// Serializes the package to JSON.
    pub fn to_json(&self) -> Result<String, LedgerError> {
        serde_json::to_string(self).map_err(|error| LedgerError::SerializationError {
            message: error.to_string(),
        })
    }

    /// Deserializes the package from JSON.
    pub fn from_json(data: &str) -> Result<Self, LedgerError> {
        serde_json::from_str(data).map_err(|error| LedgerError::DeserializationError {
            message: error.to_string(),
        })
    }

    /// Validates the checksum and version.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.version != CAPTABLE_SUMMARY_FORMAT_VERSION {
            return Err(LedgerError::UnsupportedVersion {
                found: self.version,
                expected: CAPTABLE_SUMMARY_FORMAT_VERSION,
            });
        }

        let computed = Self::compute_checksum(&self.summary)?;
        if computed != self.checksum {
            return Err(LedgerError::ChecksumMismatch {
                expected: self.checksum.clone(),
                actual: computed,
            });
        }

        Ok(())
    }

    /// Consumes the package and returns the validated summary.
    pub fn into_summary(self) -> Result<CapTableSummary, LedgerError> {
        self.validate()?;
        Ok(self.summary)
    }

    fn compute_checksum(summary: &CapTableSummary) -> Result<String, LedgerError> {
        let payload =
            serde_json::to_vec(summary).map_err(|error| LedgerError::SerializationError {
                message: error.to_string(),
            })?;

        let mut hasher = Sha256::new();
        hasher.update(payload);

        Ok(hasher
            .finalize()
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect())
    }
}
