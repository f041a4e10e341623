//! Read-only capability interface handed to cap table renderers.
//!
//! Renderers lay out computed figures; they never mutate the ledger or
//! reach into its indices. Anything they need is on [`CapTableView`].

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::model::Model;
use super::ratio::Ratio;
use super::types::{Stakeholder, StockClass, StockPlan};

/// Everything a renderer may read from a capitalization ledger.
pub trait CapTableView {
    /// Issuer display name.
    fn issuer_name(&self) -> &str;

    /// The as-of date figures are computed for.
    fn as_of_date(&self) -> NaiveDate;

    /// Stakeholders in consumption order.
    fn stakeholders(&self) -> &[Stakeholder];

    /// Stock classes in display order.
    fn stock_classes(&self) -> &[StockClass];

    /// Stock plans in display order.
    fn stock_plans(&self) -> &[StockPlan];

    /// Ids of classes that have warrants issued against them.
    fn warrant_stock_ids(&self) -> &BTreeSet<String>;

    /// Ids of classes that have non-plan equity compensation issued against them.
    fn non_plan_stock_ids(&self) -> &BTreeSet<String>;

    /// Outstanding shares of a class held by a stakeholder.
    fn stakeholder_stock_holdings(&self, stakeholder: &Stakeholder, stock_class: &StockClass)
    -> Decimal;

    /// Outstanding plan securities held by a stakeholder, as converted.
    fn stakeholder_stock_plan_holdings(
        &self,
        stakeholder: &Stakeholder,
        stock_plan: &StockPlan,
    ) -> Result<Decimal, LedgerError>;

    /// Outstanding warrants held by a stakeholder, as converted.
    fn stakeholder_warrant_holdings(
        &self,
        stakeholder: &Stakeholder,
        stock_class: &StockClass,
    ) -> Result<Decimal, LedgerError>;

    /// Outstanding non-plan equity compensation held by a stakeholder, as converted.
    fn stakeholder_non_plan_holdings(
        &self,
        stakeholder: &Stakeholder,
        stock_class: &StockClass,
    ) -> Result<Decimal, LedgerError>;

    /// Shares still available for grant from a plan.
    fn options_remaining_for_issuance(&self, stock_plan: &StockPlan)
    -> Result<Decimal, LedgerError>;

    /// Conversion ratio of a class into common stock, as a single decimal.
    fn stock_class_conversion_ratio(&self, stock_class: &StockClass)
    -> Result<Decimal, LedgerError>;

    /// Exact conversion ratio of a class into common stock.
    fn stock_class_conversion(&self, stock_class: &StockClass) -> Result<Ratio, LedgerError>;
}

impl CapTableView for Model {
    fn issuer_name(&self) -> &str {
        Model::issuer_name(self)
    }

    fn as_of_date(&self) -> NaiveDate {
        Model::as_of_date(self)
    }

    fn stakeholders(&self) -> &[Stakeholder] {
        Model::stakeholders(self)
    }

    fn stock_classes(&self) -> &[StockClass] {
        Model::stock_classes(self)
    }

    fn stock_plans(&self) -> &[StockPlan] {
        Model::stock_plans(self)
    }

    fn warrant_stock_ids(&self) -> &BTreeSet<String> {
        Model::warrant_stock_ids(self)
    }

    fn non_plan_stock_ids(&self) -> &BTreeSet<String> {
        Model::non_plan_stock_ids(self)
    }

    fn stakeholder_stock_holdings(
        &self,
        stakeholder: &Stakeholder,
        stock_class: &StockClass,
    ) -> Decimal {
        Model::stakeholder_stock_holdings(self, stakeholder, stock_class)
    }

    fn stakeholder_stock_plan_holdings(
        &self,
        stakeholder: &Stakeholder,
        stock_plan: &StockPlan,
    ) -> Result<Decimal, LedgerError> {
        Model::stakeholder_stock_plan_holdings(self, stakeholder, stock_plan)
    }

    fn stakeholder_warrant_holdings(
        &self,
        stakeholder: &Stakeholder,
        stock_class: &StockClass,
    ) -> Result<Decimal, LedgerError> {
        Model::stakeholder_warrant_holdings(self, stakeholder, stock_class)
    }

    fn stakeholder_non_plan_holdings(
        &self,
        stakeholder: &Stakeholder,
        stock_class: &StockClass,
    ) -> Result<Decimal, LedgerError> {
        Model::stakeholder_non_plan_holdings(self, stakeholder, stock_class)
    }

    fn options_remaining_for_issuance(
        &self,
        stock_plan: &StockPlan,
    ) -> Result<Decimal, LedgerError> {
        Model::options_remaining_for_issuance(self, stock_plan)
    }

    fn stock_class_conversion_ratio(
        &self,
        stock_class: &StockClass,
    ) -> Result<Decimal, LedgerError> {
        Model::stock_class_conversion_ratio(self, stock_class)
    }

    fn stock_class_conversion(&self, stock_class: &StockClass) -> Result<Ratio, LedgerError> {
        Model::stock_class_conversion(self, stock_class)
    }
}
