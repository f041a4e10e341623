//! Typed OCF domain objects consumed by the ledger.
//!
//! OCF tags every object with an `object_type` string. Here that tag becomes
//! [`ObjectType`], an exhaustive enum with an explicit `Unknown` variant, and
//! transaction tags are split into a [`SecurityFamily`] and a
//! [`TransactionAction`] so calculators can match on them instead of testing
//! string prefixes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ratio::{Ratio, RoundingType};

/// The security family encoded in a `TX_<FAMILY>_<ACTION>` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityFamily {
    /// `TX_STOCK_*`
    Stock,
    /// `TX_PLAN_SECURITY_*`
    PlanSecurity,
    /// `TX_EQUITY_COMPENSATION_*`
    EquityCompensation,
    /// `TX_WARRANT_*`
    Warrant,
}

impl SecurityFamily {
    /// Tag fragment between `TX_` and the action, including the trailing underscore.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            SecurityFamily::Stock => "STOCK_",
            SecurityFamily::PlanSecurity => "PLAN_SECURITY_",
            SecurityFamily::EquityCompensation => "EQUITY_COMPENSATION_",
            SecurityFamily::Warrant => "WARRANT_",
        }
    }

    fn split(tag: &str) -> Option<(Self, &str)> {
        // Class- and plan-level stock events carry no security and are not
        // security transactions.
        if tag.starts_with("STOCK_CLASS_") || tag.starts_with("STOCK_PLAN_") {
            return None;
        }
        [
            SecurityFamily::PlanSecurity,
            SecurityFamily::EquityCompensation,
            SecurityFamily::Warrant,
            SecurityFamily::Stock,
        ]
        .into_iter()
        .find_map(|family| tag.strip_prefix(family.prefix()).map(|rest| (family, rest)))
    }
}

/// What a security transaction does to its security.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionAction {
    Issuance,
    Reissuance,
    Retraction,
    Cancellation,
    Repurchase,
    Transfer,
    Release,
    Exercise,
    Conversion,
    Acceptance,
    /// Any other suffix, kept verbatim.
    Other(String),
}

impl TransactionAction {
    fn from_suffix(suffix: &str) -> Self {
        match suffix {
            "ISSUANCE" => TransactionAction::Issuance,
            "REISSUANCE" => TransactionAction::Reissuance,
            "RETRACTION" => TransactionAction::Retraction,
            "CANCELLATION" => TransactionAction::Cancellation,
            "REPURCHASE" => TransactionAction::Repurchase,
            "TRANSFER" => TransactionAction::Transfer,
            "RELEASE" => TransactionAction::Release,
            "EXERCISE" => TransactionAction::Exercise,
            "CONVERSION" => TransactionAction::Conversion,
            "ACCEPTANCE" => TransactionAction::Acceptance,
            other => TransactionAction::Other(other.to_string()),
        }
    }

    /// The tag suffix for this action.
    #[must_use]
    pub fn suffix(&self) -> &str {
        match self {
            TransactionAction::Issuance => "ISSUANCE",
            TransactionAction::Reissuance => "REISSUANCE",
            TransactionAction::Retraction => "RETRACTION",
            TransactionAction::Cancellation => "CANCELLATION",
            TransactionAction::Repurchase => "REPURCHASE",
            TransactionAction::Transfer => "TRANSFER",
            TransactionAction::Release => "RELEASE",
            TransactionAction::Exercise => "EXERCISE",
            TransactionAction::Conversion => "CONVERSION",
            TransactionAction::Acceptance => "ACCEPTANCE",
            TransactionAction::Other(suffix) => suffix,
        }
    }
}

/// A decoded `TX_<FAMILY>_<ACTION>` tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionKind {
    pub family: SecurityFamily,
    pub action: TransactionAction,
}

impl TransactionKind {
    /// Create a kind from its parts.
    #[must_use]
    pub fn new(family: SecurityFamily, action: TransactionAction) -> Self {
        Self { family, action }
    }

    /// Decodes a security transaction tag, or `None` if the tag is not one.
    #[must_use]
    pub fn parse(object_type: &str) -> Option<Self> {
        let tag = object_type.strip_prefix("TX_")?;
        let (family, suffix) = SecurityFamily::split(tag)?;
        Some(Self::new(family, TransactionAction::from_suffix(suffix)))
    }

    /// Rebuilds the OCF tag, e.g. `TX_WARRANT_EXERCISE`.
    #[must_use]
    pub fn object_type(&self) -> String {
        format!("TX_{}{}", self.family.prefix(), self.action.suffix())
    }

    /// True for `*_ISSUANCE` of any family.
    #[must_use]
    #[inline]
    pub fn is_issuance(&self) -> bool {
        self.action == TransactionAction::Issuance
    }
}

/// The decoded `object_type` of an OCF record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectType {
    Issuer,
    Stakeholder,
    StockClass,
    StockPlan,
    StockPlanPoolAdjustment,
    Transaction(TransactionKind),
    /// Any tag the ledger does not interpret.
    Unknown(String),
}

impl ObjectType {
    /// Decodes an `object_type` string. Never fails; unrecognised tags map to `Unknown`.
    #[must_use]
    pub fn parse(object_type: &str) -> Self {
        match object_type {
            "ISSUER" => ObjectType::Issuer,
            "STAKEHOLDER" => ObjectType::Stakeholder,
            "STOCK_CLASS" => ObjectType::StockClass,
            "STOCK_PLAN" => ObjectType::StockPlan,
            "TX_STOCK_PLAN_POOL_ADJUSTMENT" => ObjectType::StockPlanPoolAdjustment,
            other => TransactionKind::parse(other)
                .map_or_else(|| ObjectType::Unknown(other.to_string()), ObjectType::Transaction),
        }
    }
}

/// The company whose capitalization is being computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    pub id: String,
    /// `dba` when present, otherwise `legal_name`
    pub display_name: String,
}

/// A holder of securities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stakeholder {
    pub id: String,
    pub display_name: String,
}

impl Stakeholder {
    /// Create a stakeholder.
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// A traversable conversion right from one stock class into another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRight {
    pub converts_to_stock_class_id: String,
    pub ratio: Ratio,
}

/// A class of stock, common or preferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockClass {
    pub id: String,
    pub display_name: String,
    pub is_preferred: bool,
    pub votes_per_share: Option<Decimal>,
    /// Rounding for converted share counts, from the first conversion mechanism
    pub rounding_type: RoundingType,
    pub board_approval_date: Option<NaiveDate>,
    pub conversion_rights: Vec<ConversionRight>,
}

impl StockClass {
    /// A common class with no conversion rights.
    #[must_use]
    pub fn common(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            is_preferred: false,
            votes_per_share: None,
            rounding_type: RoundingType::Normal,
            board_approval_date: None,
            conversion_rights: Vec::new(),
        }
    }

    /// A preferred class with no conversion rights.
    #[must_use]
    pub fn preferred(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            is_preferred: true,
            ..Self::common(id, display_name)
        }
    }

    /// Sets votes per share.
    #[must_use]
    pub fn with_votes_per_share(mut self, votes: Decimal) -> Self {
        self.votes_per_share = Some(votes);
        self
    }

    /// Sets the board approval date.
    #[must_use]
    pub fn with_board_approval_date(mut self, date: NaiveDate) -> Self {
        self.board_approval_date = Some(date);
        self
    }

    /// Appends a conversion right into `target` at `ratio`.
    #[must_use]
    pub fn with_conversion_right(mut self, target: impl Into<String>, ratio: Ratio) -> Self {
        self.conversion_rights.push(ConversionRight {
            converts_to_stock_class_id: target.into(),
            ratio,
        });
        self
    }

    /// The first conversion right into `target`, if any.
    #[must_use]
    pub fn conversion_right_to(&self, target: &str) -> Option<&ConversionRight> {
        self.conversion_rights
            .iter()
            .find(|right| right.converts_to_stock_class_id == target)
    }

    /// Rounds a converted share count with this class' rounding mode.
    #[must_use]
    #[inline]
    pub fn round_converted(&self, quantity: Decimal) -> Decimal {
        self.rounding_type.apply(quantity)
    }
}

/// An equity compensation plan with a reserved share pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPlan {
    pub id: String,
    pub plan_name: String,
    pub initial_shares_reserved: Decimal,
    pub stock_class_id: Option<String>,
    pub board_approval_date: Option<NaiveDate>,
}

impl StockPlan {
    /// Create a plan.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        plan_name: impl Into<String>,
        initial_shares_reserved: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            plan_name: plan_name.into(),
            initial_shares_reserved,
            stock_class_id: None,
            board_approval_date: None,
        }
    }
}

/// A change to the number of shares reserved by a stock plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolAdjustment {
    pub id: String,
    pub stock_plan_id: String,
    pub date: Option<NaiveDate>,
    pub shares_reserved: Decimal,
}

/// Warrant exercise terms: how many shares of which class an exercise yields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExerciseTrigger {
    pub converts_to_stock_class_id: Option<String>,
    pub converts_to_quantity: Option<Decimal>,
}

/// A security transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub security_id: String,
    pub stakeholder_id: Option<String>,
    pub stock_class_id: Option<String>,
    pub stock_plan_id: Option<String>,
    pub quantity: Option<Decimal>,
    pub quantity_converted: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub exercise_triggers: Vec<ExerciseTrigger>,
}

impl Transaction {
    /// A transaction with only its tag and security set.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        kind: TransactionKind,
        security_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            security_id: security_id.into(),
            stakeholder_id: None,
            stock_class_id: None,
            stock_plan_id: None,
            quantity: None,
            quantity_converted: None,
            date: None,
            exercise_triggers: Vec::new(),
        }
    }

    /// `quantity`, else `quantity_converted`, else zero.
    #[must_use]
    pub fn direct_quantity(&self) -> Decimal {
        self.quantity
            .or(self.quantity_converted)
            .unwrap_or(Decimal::ZERO)
    }

    /// Like [`Transaction::direct_quantity`], falling back to the first
    /// exercise trigger's converted quantity when no direct field exists.
    #[must_use]
    pub fn quantity_or_trigger(&self) -> Decimal {
        self.quantity
            .or(self.quantity_converted)
            .or_else(|| {
                self.exercise_triggers
                    .first()
                    .and_then(|trigger| trigger.converts_to_quantity)
            })
            .unwrap_or(Decimal::ZERO)
    }

    /// The stock class a warrant is issued against: `stock_class_id`, else
    /// the first exercise trigger's destination class.
    #[must_use]
    pub fn warrant_stock_class_id(&self) -> Option<&str> {
        self.stock_class_id.as_deref().or_else(|| {
            self.exercise_triggers
                .iter()
                .find_map(|trigger| trigger.converts_to_stock_class_id.as_deref())
        })
    }
}
