//! Running balance of outstanding units across a set of securities.
//!
//! A single [`BalanceCalculator`] serves plain stock, plan securities and
//! warrants. What differs between them is captured by a [`BalancePolicy`]
//! value: which transaction tags count as an issuance, which reverse a whole
//! security, which decrement by a quantity, and where the quantity is read.
//!
//! Whole-security reversals (reissuance, retraction) carry no quantity of
//! their own. They are parked in a pending set and netted against the
//! security's recorded issuance when the value is read, so the result is the
//! same whichever of the pair arrives first.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;
use tracing::trace;

use super::types::{SecurityFamily, Transaction, TransactionAction, TransactionKind};

/// Where a policy reads a transaction's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantitySource {
    /// `quantity`, else `quantity_converted`, else zero.
    Direct,
    /// As `Direct`, then the first exercise trigger's converted quantity.
    DirectOrExerciseTrigger,
}

/// How a transaction moves the running balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceEffect {
    /// Adds the quantity and records it against the security.
    Issue,
    /// Reverses the security's whole recorded issuance, whenever that is seen.
    ReverseSecurity,
    /// Subtracts the quantity.
    Decrement,
    /// No effect.
    Ignore,
}

/// The tag sets and quantity source that configure a [`BalanceCalculator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalancePolicy {
    pub name: &'static str,
    pub families: &'static [SecurityFamily],
    pub issuance: &'static [TransactionAction],
    pub whole_security: &'static [TransactionAction],
    pub decrement: &'static [TransactionAction],
    pub quantity: QuantitySource,
}

impl BalancePolicy {
    /// Outstanding shares of plain stock.
    pub const STOCK: BalancePolicy = BalancePolicy {
        name: "stock",
        families: &[SecurityFamily::Stock],
        issuance: &[TransactionAction::Issuance],
        whole_security: &[TransactionAction::Reissuance],
        decrement: &[
            TransactionAction::Cancellation,
            TransactionAction::Repurchase,
            TransactionAction::Retraction,
            TransactionAction::Transfer,
            TransactionAction::Conversion,
        ],
        quantity: QuantitySource::Direct,
    };

    /// Outstanding plan securities and equity compensation.
    pub const PLAN_SECURITY: BalancePolicy = BalancePolicy {
        name: "plan security",
        families: &[
            SecurityFamily::PlanSecurity,
            SecurityFamily::EquityCompensation,
        ],
        issuance: &[TransactionAction::Issuance],
        whole_security: &[TransactionAction::Retraction],
        decrement: &[
            TransactionAction::Cancellation,
            TransactionAction::Exercise,
            TransactionAction::Release,
            TransactionAction::Transfer,
        ],
        quantity: QuantitySource::Direct,
    };

    /// Outstanding warrants.
    pub const WARRANT: BalancePolicy = BalancePolicy {
        name: "warrant",
        families: &[SecurityFamily::Warrant],
        issuance: &[TransactionAction::Issuance],
        whole_security: &[TransactionAction::Retraction],
        decrement: &[
            TransactionAction::Cancellation,
            TransactionAction::Exercise,
            TransactionAction::Transfer,
        ],
        quantity: QuantitySource::DirectOrExerciseTrigger,
    };

    /// Classifies a transaction tag under this policy.
    #[must_use]
    pub fn classify(&self, kind: &TransactionKind) -> BalanceEffect {
        if !self.families.contains(&kind.family) {
            return BalanceEffect::Ignore;
        }
        if self.issuance.contains(&kind.action) {
            BalanceEffect::Issue
        } else if self.whole_security.contains(&kind.action) {
            BalanceEffect::ReverseSecurity
        } else if self.decrement.contains(&kind.action) {
            BalanceEffect::Decrement
        } else {
            BalanceEffect::Ignore
        }
    }

    /// Reads the quantity this policy uses from a transaction.
    #[must_use]
    pub fn quantity(&self, txn: &Transaction) -> Decimal {
        match self.quantity {
            QuantitySource::Direct => txn.direct_quantity(),
            QuantitySource::DirectOrExerciseTrigger => txn.quantity_or_trigger(),
        }
    }
}

/// Accumulates outstanding units from a stream of transactions.
#[derive(Debug, Clone)]
pub struct BalanceCalculator {
    policy: BalancePolicy,
    value: Decimal,
    issuance_amounts: HashMap<String, Decimal>,
    pending_security_ids: BTreeSet<String>,
}

impl BalanceCalculator {
    /// Create an empty calculator for `policy`.
    #[must_use]
    pub fn new(policy: BalancePolicy) -> Self {
        Self {
            policy,
            value: Decimal::ZERO,
            issuance_amounts: HashMap::new(),
            pending_security_ids: BTreeSet::new(),
        }
    }

    /// Plain stock calculator.
    #[must_use]
    pub fn stock() -> Self {
        Self::new(BalancePolicy::STOCK)
    }

    /// Plan security / equity compensation calculator.
    #[must_use]
    pub fn plan_security() -> Self {
        Self::new(BalancePolicy::PLAN_SECURITY)
    }

    /// Warrant calculator.
    #[must_use]
    pub fn warrant() -> Self {
        Self::new(BalancePolicy::WARRANT)
    }

    /// The policy this calculator was built with.
    #[must_use]
    pub fn policy(&self) -> &BalancePolicy {
        &self.policy
    }

    /// Applies one transaction.
    pub fn apply(&mut self, txn: &Transaction) {
        match self.policy.classify(&txn.kind) {
            BalanceEffect::Issue => {
                let quantity = self.policy.quantity(txn);
                self.value += quantity;
                self.issuance_amounts
                    .insert(txn.security_id.clone(), quantity);
            }
            BalanceEffect::ReverseSecurity => {
                self.pending_security_ids.insert(txn.security_id.clone());
            }
            BalanceEffect::Decrement => {
                self.value -= self.policy.quantity(txn);
            }
            BalanceEffect::Ignore => {
                trace!(
                    policy = self.policy.name,
                    object_type = %txn.kind.object_type(),
                    "transaction has no effect on balance"
                );
            }
        }
    }

    /// The outstanding balance.
    ///
    /// Pending reversals whose issuance has been seen are netted out and
    /// cleared; the rest stay pending for a later read.
    pub fn value(&mut self) -> Decimal {
        let issuance_amounts = &mut self.issuance_amounts;
        let value = &mut self.value;
        self.pending_security_ids.retain(|security_id| {
            match issuance_amounts.remove(security_id) {
                Some(amount) => {
                    *value -= amount;
                    false
                }
                None => true,
            }
        });
        self.value
    }

    /// Security ids with a reversal whose issuance has not been seen yet.
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.pending_security_ids.iter().map(String::as_str)
    }

    /// Number of unresolved reversals.
    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.pending_security_ids.len()
    }
}
