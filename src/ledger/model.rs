//! The capitalization ledger: ingests OCF records and answers holdings queries.
//!
//! A [`Model`] is created for one as-of date and filled by repeated
//! [`Model::consume`] calls in any order. Nothing is computed at ingest time
//! beyond indexing; every query replays the indexed transactions through a
//! fresh calculator, so results never depend on the order records arrived in.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

use super::balance::{BalanceCalculator, BalancePolicy};
use super::conversion::{ConversionPath, ConversionRatioCalculator};
use super::error::LedgerError;
use super::options_remaining::OptionsRemainingCalculator;
use super::ratio::Ratio;
use super::records::Record;
use super::types::{
    PoolAdjustment, SecurityFamily, Stakeholder, StockClass, StockPlan, Transaction,
};

/// The four ways an issued security is filed for holdings queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HoldingCategory {
    /// Plain stock, keyed by stock class
    Stock,
    /// Plan securities and plan equity compensation, keyed by stock plan
    PlanSecurity,
    /// Warrants, keyed by the stock class they exercise into
    Warrant,
    /// Equity compensation outside any plan, keyed by stock class
    NonPlan,
}

/// What a query does when it finishes with reversals whose issuance never
/// arrived. The reversal is never applied either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnresolvedReversalPolicy {
    /// Keep the reversal pending and log at debug level.
    #[default]
    Defer,
    /// Keep the reversal pending and log a warning.
    Warn,
}

/// Issued security ids filed under (stakeholder id, class-or-plan id).
#[derive(Debug, Clone, Default)]
struct SecurityIndex {
    by_stakeholder: HashMap<String, HashMap<String, BTreeSet<String>>>,
}

impl SecurityIndex {
    fn insert(&mut self, stakeholder_id: &str, key: &str, security_id: &str) {
        self.by_stakeholder
            .entry(stakeholder_id.to_string())
            .or_default()
            .entry(key.to_string())
            .or_default()
            .insert(security_id.to_string());
    }

    fn security_ids<'a>(
        &'a self,
        stakeholder_id: &str,
        key: &str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.by_stakeholder
            .get(stakeholder_id)
            .and_then(|by_key| by_key.get(key))
            .into_iter()
            .flatten()
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
struct IssuedSecurities {
    stock: SecurityIndex,
    plan_security: SecurityIndex,
    warrant: SecurityIndex,
    non_plan: SecurityIndex,
}

impl IssuedSecurities {
    fn index(&self, category: HoldingCategory) -> &SecurityIndex {
        match category {
            HoldingCategory::Stock => &self.stock,
            HoldingCategory::PlanSecurity => &self.plan_security,
            HoldingCategory::Warrant => &self.warrant,
            HoldingCategory::NonPlan => &self.non_plan,
        }
    }

    fn index_mut(&mut self, category: HoldingCategory) -> &mut SecurityIndex {
        match category {
            HoldingCategory::Stock => &mut self.stock,
            HoldingCategory::PlanSecurity => &mut self.plan_security,
            HoldingCategory::Warrant => &mut self.warrant,
            HoldingCategory::NonPlan => &mut self.non_plan,
        }
    }
}

/// In-memory capitalization ledger for a single as-of date.
#[derive(Debug, Clone)]
pub struct Model {
    as_of_date: NaiveDate,
    generated_at_timestamp: DateTime<Utc>,
    issuer_name: String,
    stakeholders: Vec<Stakeholder>,
    /// Kept in display order; re-sorted whenever a class is consumed
    stock_classes: Vec<StockClass>,
    /// Kept in display order; re-sorted whenever a plan is consumed
    stock_plans: Vec<StockPlan>,
    transactions_by_security_id: HashMap<String, Vec<Transaction>>,
    issued: IssuedSecurities,
    pool_adjustments_by_plan_id: HashMap<String, Vec<PoolAdjustment>>,
    warrant_stock_ids: BTreeSet<String>,
    non_plan_stock_ids: BTreeSet<String>,
    conversions: ConversionRatioCalculator,
    unresolved_policy: UnresolvedReversalPolicy,
}

impl Model {
    /// Create an empty ledger.
    ///
    /// `generated_at_timestamp` also stands in for "now" when ordering
    /// classes and plans that have no board approval date.
    #[must_use]
    pub fn new(as_of_date: NaiveDate, generated_at_timestamp: DateTime<Utc>) -> Self {
        Self {
            as_of_date,
            generated_at_timestamp,
            issuer_name: String::new(),
            stakeholders: Vec::new(),
            stock_classes: Vec::new(),
            stock_plans: Vec::new(),
            transactions_by_security_id: HashMap::new(),
            issued: IssuedSecurities::default(),
            pool_adjustments_by_plan_id: HashMap::new(),
            warrant_stock_ids: BTreeSet::new(),
            non_plan_stock_ids: BTreeSet::new(),
            conversions: ConversionRatioCalculator::new(),
            unresolved_policy: UnresolvedReversalPolicy::default(),
        }
    }

    /// Sets how queries report reversals that never found their issuance.
    pub fn set_unresolved_policy(&mut self, policy: UnresolvedReversalPolicy) {
        self.unresolved_policy = policy;
    }

    /// The configured unresolved-reversal policy.
    #[must_use]
    pub fn unresolved_policy(&self) -> UnresolvedReversalPolicy {
        self.unresolved_policy
    }

    // ─── Ingestion ──────────────────────────────────────────────────────────

    /// Ingests one decoded record.
    pub fn consume(&mut self, record: Record) {
        match record {
            Record::Issuer(issuer) => {
                trace!(issuer_id = %issuer.id, "consumed issuer");
                self.issuer_name = issuer.display_name;
            }
            Record::Stakeholder(stakeholder) => {
                trace!(stakeholder_id = %stakeholder.id, "consumed stakeholder");
                upsert_by(&mut self.stakeholders, stakeholder, |holder| &holder.id);
            }
            Record::StockClass(stock_class) => {
                trace!(stock_class_id = %stock_class.id, "consumed stock class");
                self.conversions.apply(stock_class.clone());
                upsert_by(&mut self.stock_classes, stock_class, |class| &class.id);
                let today = self.today();
                self.stock_classes
                    .sort_by(|a, b| stock_class_display_order(a, b, today));
            }
            Record::StockPlan(stock_plan) => {
                trace!(stock_plan_id = %stock_plan.id, "consumed stock plan");
                upsert_by(&mut self.stock_plans, stock_plan, |plan| &plan.id);
                let today = self.today();
                self.stock_plans
                    .sort_by(|a, b| stock_plan_display_order(a, b, today));
            }
            Record::PoolAdjustment(adjustment) => {
                trace!(stock_plan_id = %adjustment.stock_plan_id, "consumed pool adjustment");
                self.pool_adjustments_by_plan_id
                    .entry(adjustment.stock_plan_id.clone())
                    .or_default()
                    .push(adjustment);
            }
            Record::Transaction(txn) => self.index_transaction(txn),
            Record::Unknown { id, object_type } => {
                debug!(id = %id, object_type = %object_type, "ignoring record");
            }
        }
    }

    /// Decodes and ingests one raw OCF object. Objects that cannot be decoded
    /// are logged and skipped.
    pub fn consume_value(&mut self, value: &Value) {
        match Record::from_value(value) {
            Ok(record) => self.consume(record),
            Err(error) => warn!(%error, "skipping malformed OCF record"),
        }
    }

    /// Ingests every raw object yielded by `values`.
    pub fn consume_all<'a, I>(&mut self, values: I)
    where
        I: IntoIterator<Item = &'a Value>,
    {
        for value in values {
            self.consume_value(value);
        }
    }

    fn index_transaction(&mut self, txn: Transaction) {
        trace!(
            object_type = %txn.kind.object_type(),
            security_id = %txn.security_id,
            "consumed transaction"
        );

        if txn.kind.is_issuance() {
            self.index_issuance(&txn);
        }

        self.transactions_by_security_id
            .entry(txn.security_id.clone())
            .or_default()
            .push(txn);
    }

    fn index_issuance(&mut self, txn: &Transaction) {
        let (category, key) = match txn.kind.family {
            SecurityFamily::Stock => (HoldingCategory::Stock, txn.stock_class_id.as_deref()),
            SecurityFamily::PlanSecurity | SecurityFamily::EquityCompensation => {
                match txn.stock_plan_id.as_deref() {
                    Some(plan_id) => (HoldingCategory::PlanSecurity, Some(plan_id)),
                    None => {
                        if let Some(class_id) = txn.stock_class_id.as_deref() {
                            self.non_plan_stock_ids.insert(class_id.to_string());
                        }
                        (HoldingCategory::NonPlan, txn.stock_class_id.as_deref())
                    }
                }
            }
            SecurityFamily::Warrant => {
                let class_id = txn.warrant_stock_class_id();
                if let Some(class_id) = class_id {
                    self.warrant_stock_ids.insert(class_id.to_string());
                }
                (HoldingCategory::Warrant, class_id)
            }
        };

        match (txn.stakeholder_id.as_deref(), key) {
            (Some(stakeholder_id), Some(key)) => {
                self.issued
                    .index_mut(category)
                    .insert(stakeholder_id, key, &txn.security_id);
            }
            _ => debug!(
                security_id = %txn.security_id,
                ?category,
                "issuance lacks a stakeholder or class/plan; indexed by security only"
            ),
        }
    }

    // ─── Read-only views ────────────────────────────────────────────────────

    /// The as-of date figures are computed for.
    #[must_use]
    pub fn as_of_date(&self) -> NaiveDate {
        self.as_of_date
    }

    /// When the report was generated.
    #[must_use]
    pub fn generated_at_timestamp(&self) -> DateTime<Utc> {
        self.generated_at_timestamp
    }

    /// Issuer display name (`dba`, else `legal_name`); empty until an issuer is consumed.
    #[must_use]
    pub fn issuer_name(&self) -> &str {
        &self.issuer_name
    }

    /// Stakeholders in the order their ids were first consumed.
    #[must_use]
    pub fn stakeholders(&self) -> &[Stakeholder] {
        &self.stakeholders
    }

    /// Stock classes, common before preferred, then by approval date and name.
    #[must_use]
    pub fn stock_classes(&self) -> &[StockClass] {
        &self.stock_classes
    }

    /// Stock plans by approval date, then plan name.
    #[must_use]
    pub fn stock_plans(&self) -> &[StockPlan] {
        &self.stock_plans
    }

    /// Ids of stock classes that warrants exercise into.
    #[must_use]
    pub fn warrant_stock_ids(&self) -> &BTreeSet<String> {
        &self.warrant_stock_ids
    }

    /// Ids of stock classes that non-plan equity compensation is issued against.
    #[must_use]
    pub fn non_plan_stock_ids(&self) -> &BTreeSet<String> {
        &self.non_plan_stock_ids
    }

    /// Looks up a stakeholder by id.
    #[must_use]
    pub fn stakeholder(&self, stakeholder_id: &str) -> Option<&Stakeholder> {
        self.stakeholders
            .iter()
            .find(|stakeholder| stakeholder.id == stakeholder_id)
    }

    /// Looks up a stock class by id.
    #[must_use]
    pub fn stock_class(&self, stock_class_id: &str) -> Option<&StockClass> {
        self.stock_classes
            .iter()
            .find(|class| class.id == stock_class_id)
    }

    /// Looks up a stock plan by id.
    #[must_use]
    pub fn stock_plan(&self, stock_plan_id: &str) -> Option<&StockPlan> {
        self.stock_plans.iter().find(|plan| plan.id == stock_plan_id)
    }

    /// All transactions recorded against a security, in arrival order.
    #[must_use]
    pub fn transactions_for_security(&self, security_id: &str) -> &[Transaction] {
        self.transactions_by_security_id
            .get(security_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Pool adjustments recorded for a plan, in arrival order.
    #[must_use]
    pub fn pool_adjustments(&self, stock_plan_id: &str) -> &[PoolAdjustment] {
        self.pool_adjustments_by_plan_id
            .get(stock_plan_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    /// Outstanding shares of `stock_class` held by `stakeholder`.
    #[must_use]
    pub fn stakeholder_stock_holdings(
        &self,
        stakeholder: &Stakeholder,
        stock_class: &StockClass,
    ) -> Decimal {
        self.replay(
            HoldingCategory::Stock,
            BalancePolicy::STOCK,
            &stakeholder.id,
            &stock_class.id,
        )
    }

    /// Outstanding plan securities of `stock_plan` held by `stakeholder`,
    /// as converted when the plan's class is preferred.
    ///
    /// # Errors
    ///
    /// Propagates [`ConversionRatioCalculator::find_ratio`] failures.
    pub fn stakeholder_stock_plan_holdings(
        &self,
        stakeholder: &Stakeholder,
        stock_plan: &StockPlan,
    ) -> Result<Decimal, LedgerError> {
        let value = self.replay(
            HoldingCategory::PlanSecurity,
            BalancePolicy::PLAN_SECURITY,
            &stakeholder.id,
            &stock_plan.id,
        );
        match stock_plan
            .stock_class_id
            .as_deref()
            .and_then(|class_id| self.stock_class(class_id))
        {
            Some(stock_class) => self.as_converted(value, stock_class),
            None => Ok(value),
        }
    }

    /// Outstanding warrants into `stock_class` held by `stakeholder`, as
    /// converted when the class is preferred.
    ///
    /// # Errors
    ///
    /// Propagates [`ConversionRatioCalculator::find_ratio`] failures.
    pub fn stakeholder_warrant_holdings(
        &self,
        stakeholder: &Stakeholder,
        stock_class: &StockClass,
    ) -> Result<Decimal, LedgerError> {
        let value = self.replay(
            HoldingCategory::Warrant,
            BalancePolicy::WARRANT,
            &stakeholder.id,
            &stock_class.id,
        );
        self.as_converted(value, stock_class)
    }

    /// Outstanding non-plan equity compensation against `stock_class` held
    /// by `stakeholder`, as converted when the class is preferred.
    ///
    /// # Errors
    ///
    /// Propagates [`ConversionRatioCalculator::find_ratio`] failures.
    pub fn stakeholder_non_plan_holdings(
        &self,
        stakeholder: &Stakeholder,
        stock_class: &StockClass,
    ) -> Result<Decimal, LedgerError> {
        let value = self.replay(
            HoldingCategory::NonPlan,
            BalancePolicy::PLAN_SECURITY,
            &stakeholder.id,
            &stock_class.id,
        );
        self.as_converted(value, stock_class)
    }

    /// Shares still available for grant from `stock_plan`.
    ///
    /// # Errors
    ///
    /// Propagates [`ConversionRatioCalculator::find_ratio`] failures.
    pub fn options_remaining_for_issuance(
        &self,
        stock_plan: &StockPlan,
    ) -> Result<Decimal, LedgerError> {
        let mut total_holdings = Decimal::ZERO;
        for stakeholder in &self.stakeholders {
            total_holdings += self.stakeholder_stock_plan_holdings(stakeholder, stock_plan)?;
        }

        let mut calculator = OptionsRemainingCalculator::new();
        calculator.apply(
            stock_plan.initial_shares_reserved,
            total_holdings,
            self.pool_adjustments(&stock_plan.id),
        );
        Ok(calculator.value())
    }

    /// Conversion ratio of `stock_class` into common stock as a single
    /// decimal; exactly one for common classes. Use
    /// [`Model::stock_class_conversion`] to convert quantities.
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnknownStockClass`] for a preferred class that was never consumed.
    pub fn stock_class_conversion_ratio(
        &self,
        stock_class: &StockClass,
    ) -> Result<Decimal, LedgerError> {
        Ok(self.conversion_path(stock_class)?.ratio_decimal())
    }

    /// Exact numerator/denominator ratio of `stock_class` into common stock.
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnknownStockClass`] for a preferred class that was never consumed.
    pub fn stock_class_conversion(&self, stock_class: &StockClass) -> Result<Ratio, LedgerError> {
        Ok(self.conversion_path(stock_class)?.ratio)
    }

    /// The common class `stock_class` converts into; the class itself when it
    /// is common or has no reachable common class.
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnknownStockClass`] for a preferred class that was never consumed.
    pub fn conversion_common_stock_class<'a>(
        &'a self,
        stock_class: &'a StockClass,
    ) -> Result<&'a StockClass, LedgerError> {
        let path = self.conversion_path(stock_class)?;
        Ok(path
            .common_stock_class_id()
            .and_then(|class_id| self.stock_class(class_id))
            .unwrap_or(stock_class))
    }

    /// Full conversion path for `stock_class`; a one-element path for common classes.
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnknownStockClass`] for a preferred class that was never consumed.
    pub fn conversion_path(&self, stock_class: &StockClass) -> Result<ConversionPath, LedgerError> {
        if !stock_class.is_preferred {
            return Ok(ConversionPath {
                ratio: Ratio::ONE,
                path: vec![stock_class.id.clone()],
            });
        }
        self.conversions.find_ratio(&stock_class.id)
    }

    fn as_converted(&self, value: Decimal, stock_class: &StockClass) -> Result<Decimal, LedgerError> {
        if !stock_class.is_preferred {
            return Ok(value);
        }
        self.stock_class_conversion(stock_class)?
            .convert(value)
            .ok_or_else(|| LedgerError::ConversionOverflow {
                stock_class_id: stock_class.id.clone(),
            })
    }

    fn replay(
        &self,
        category: HoldingCategory,
        policy: BalancePolicy,
        stakeholder_id: &str,
        key: &str,
    ) -> Decimal {
        let mut calculator = BalanceCalculator::new(policy);
        for security_id in self.issued.index(category).security_ids(stakeholder_id, key) {
            for txn in self.transactions_for_security(security_id) {
                calculator.apply(txn);
            }
        }

        let value = calculator.value();
        if calculator.unresolved_count() > 0 {
            let unresolved: Vec<&str> = calculator.unresolved().collect();
            match self.unresolved_policy {
                UnresolvedReversalPolicy::Defer => debug!(
                    ?category,
                    stakeholder_id,
                    key,
                    ?unresolved,
                    "reversals still waiting for their issuance"
                ),
                UnresolvedReversalPolicy::Warn => warn!(
                    ?category,
                    stakeholder_id,
                    key,
                    ?unresolved,
                    "reversals still waiting for their issuance"
                ),
            }
        }
        value
    }

    fn today(&self) -> NaiveDate {
        self.generated_at_timestamp.date_naive()
    }
}

fn upsert_by<T, F>(items: &mut Vec<T>, item: T, id_of: F)
where
    F: Fn(&T) -> &String,
{
    match items.iter().position(|existing| id_of(existing) == id_of(&item)) {
        Some(position) => items[position] = item,
        None => items.push(item),
    }
}

/// Display order for stock classes: common before preferred, then ascending
/// board approval date (`today` when missing), then name.
#[must_use]
pub fn stock_class_display_order(a: &StockClass, b: &StockClass, today: NaiveDate) -> Ordering {
    a.is_preferred
        .cmp(&b.is_preferred)
        .then_with(|| {
            a.board_approval_date
                .unwrap_or(today)
                .cmp(&b.board_approval_date.unwrap_or(today))
        })
        .then_with(|| a.display_name.cmp(&b.display_name))
}

/// Display order for stock plans: ascending board approval date (`today`
/// when missing), then plan name.
#[must_use]
pub fn stock_plan_display_order(a: &StockPlan, b: &StockPlan, today: NaiveDate) -> Ordering {
    a.board_approval_date
        .unwrap_or(today)
        .cmp(&b.board_approval_date.unwrap_or(today))
        .then_with(|| a.plan_name.cmp(&b.plan_name))
}
