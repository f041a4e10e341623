//! Decoding of raw OCF JSON objects into typed [`Record`]s.
//!
//! Decoding is tolerant: unknown fields are ignored, absent optional fields
//! become `None`, and objects whose `object_type` the ledger does not
//! interpret decode to [`Record::Unknown`]. Only an object of a known type
//! whose body cannot be read (for example a quantity that is not a number)
//! produces a [`RecordError`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::ratio::{Ratio, RoundingType};
use super::types::{
    ConversionRight, ExerciseTrigger, Issuer, ObjectType, PoolAdjustment, Stakeholder,
    StockClass, StockPlan, Transaction, TransactionAction, TransactionKind,
};

/// Errors raised while decoding a single OCF object.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record has no object_type")]
    MissingObjectType,
    #[error("malformed {object_type} record '{id}': {message}")]
    Malformed {
        object_type: String,
        id: String,
        message: String,
    },
}

/// One decoded OCF object.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Issuer(Issuer),
    Stakeholder(Stakeholder),
    StockClass(StockClass),
    StockPlan(StockPlan),
    PoolAdjustment(PoolAdjustment),
    Transaction(Transaction),
    /// An object the ledger does not interpret.
    Unknown { id: String, object_type: String },
}

impl Record {
    /// Decodes a tagged JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingObjectType`] when the object has no
    /// string `object_type`, and [`RecordError::Malformed`] when an object of
    /// a known type has a body that cannot be read.
    pub fn from_value(value: &Value) -> Result<Self, RecordError> {
        let object_type = value
            .get("object_type")
            .and_then(Value::as_str)
            .ok_or(RecordError::MissingObjectType)?;
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let record = match ObjectType::parse(object_type) {
            ObjectType::Issuer => {
                let raw: RawIssuer = decode(value, object_type, &id)?;
                Record::Issuer(raw.into_issuer(id))
            }
            ObjectType::Stakeholder => {
                let raw: RawStakeholder = decode(value, object_type, &id)?;
                Record::Stakeholder(raw.into_stakeholder(id))
            }
            ObjectType::StockClass => {
                let raw: RawStockClass = decode(value, object_type, &id)?;
                Record::StockClass(raw.into_stock_class(id))
            }
            ObjectType::StockPlan => {
                let raw: RawStockPlan = decode(value, object_type, &id)?;
                Record::StockPlan(raw.into_stock_plan(id))
            }
            ObjectType::StockPlanPoolAdjustment => {
                let raw: RawPoolAdjustment = decode(value, object_type, &id)?;
                Record::PoolAdjustment(PoolAdjustment {
                    id,
                    stock_plan_id: raw.stock_plan_id,
                    date: raw.date,
                    shares_reserved: raw.shares_reserved,
                })
            }
            ObjectType::Transaction(kind) => {
                let raw: RawTransaction = decode(value, object_type, &id)?;
                match raw.security_id.clone() {
                    Some(security_id) => {
                        Record::Transaction(raw.into_transaction(id, kind, security_id))
                    }
                    // Security-less events with an action we don't track are
                    // simply not ledger transactions.
                    None if matches!(kind.action, TransactionAction::Other(_)) => {
                        Record::Unknown {
                            id,
                            object_type: object_type.to_string(),
                        }
                    }
                    None => {
                        return Err(RecordError::Malformed {
                            object_type: object_type.to_string(),
                            id,
                            message: "missing field `security_id`".to_string(),
                        });
                    }
                }
            }
            ObjectType::Unknown(object_type) => Record::Unknown { id, object_type },
        };

        Ok(record)
    }

    /// Decodes a JSON document holding a single tagged object.
    ///
    /// # Errors
    ///
    /// As [`Record::from_value`], plus [`RecordError::Malformed`] when the
    /// text is not valid JSON.
    pub fn from_json(data: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(data).map_err(|error| RecordError::Malformed {
            object_type: "JSON".to_string(),
            id: String::new(),
            message: error.to_string(),
        })?;
        Self::from_value(&value)
    }

    /// The record's `object_type` tag as it appeared in the source.
    #[must_use]
    pub fn object_type(&self) -> String {
        match self {
            Record::Issuer(_) => "ISSUER".to_string(),
            Record::Stakeholder(_) => "STAKEHOLDER".to_string(),
            Record::StockClass(_) => "STOCK_CLASS".to_string(),
            Record::StockPlan(_) => "STOCK_PLAN".to_string(),
            Record::PoolAdjustment(_) => "TX_STOCK_PLAN_POOL_ADJUSTMENT".to_string(),
            Record::Transaction(txn) => txn.kind.object_type(),
            Record::Unknown { object_type, .. } => object_type.clone(),
        }
    }
}

fn decode<T: DeserializeOwned>(value: &Value, object_type: &str, id: &str) -> Result<T, RecordError> {
    T::deserialize(value).map_err(|error| RecordError::Malformed {
        object_type: object_type.to_string(),
        id: id.to_string(),
        message: error.to_string(),
    })
}

/// Parses an OCF date. Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, in
/// which case only the date part is kept.
///
/// # Errors
///
/// Returns the chrono parse error when the date part is not `YYYY-MM-DD`.
pub fn parse_ocf_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let date_part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
}

fn deserialize_ocf_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|text| parse_ocf_date(&text).map_err(serde::de::Error::custom))
        .transpose()
}

/// Like `deserialize_ocf_date`, but an unparseable date becomes `None`.
/// Balances never read transaction dates.
fn deserialize_lenient_ocf_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|text| match parse_ocf_date(&text) {
        Ok(date) => Some(date),
        Err(error) => {
            warn!(date = %text, %error, "ignoring unparseable transaction date");
            None
        }
    }))
}

#[derive(Deserialize)]
struct RawIssuer {
    #[serde(default)]
    legal_name: Option<String>,
    #[serde(default)]
    dba: Option<String>,
}

impl RawIssuer {
    fn into_issuer(self, id: String) -> Issuer {
        Issuer {
            id,
            display_name: self.dba.or(self.legal_name).unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct RawName {
    #[serde(default)]
    legal_name: Option<String>,
}

#[derive(Deserialize)]
struct RawStakeholder {
    #[serde(default)]
    name: Option<RawName>,
}

impl RawStakeholder {
    fn into_stakeholder(self, id: String) -> Stakeholder {
        let display_name = self
            .name
            .and_then(|name| name.legal_name)
            .unwrap_or_else(|| id.clone());
        Stakeholder { id, display_name }
    }
}

#[derive(Deserialize, Default)]
struct RawConversionMechanism {
    #[serde(default)]
    ratio: Option<Ratio>,
    #[serde(default)]
    rounding_type: Option<RoundingType>,
    #[serde(default)]
    converts_to_quantity: Option<Decimal>,
}

#[derive(Deserialize)]
struct RawConversionRight {
    #[serde(default)]
    converts_to_stock_class_id: Option<String>,
    #[serde(default)]
    conversion_mechanism: Option<RawConversionMechanism>,
}

#[derive(Deserialize)]
struct RawStockClass {
    #[serde(default)]
    name: String,
    #[serde(default)]
    class_type: Option<String>,
    #[serde(default)]
    votes_per_share: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_ocf_date")]
    board_approval_date: Option<NaiveDate>,
    #[serde(default)]
    conversion_rights: Vec<RawConversionRight>,
}

impl RawStockClass {
    fn into_stock_class(self, id: String) -> StockClass {
        let rounding_type = self
            .conversion_rights
            .first()
            .and_then(|right| right.conversion_mechanism.as_ref())
            .and_then(|mechanism| mechanism.rounding_type)
            .unwrap_or_default();

        let conversion_rights = self
            .conversion_rights
            .into_iter()
            .filter_map(|right| {
                let target = right.converts_to_stock_class_id;
                let ratio = right.conversion_mechanism.and_then(|mechanism| mechanism.ratio);
                match (target, ratio) {
                    (Some(target), Some(ratio)) if !ratio.denominator.is_zero() => {
                        Some(ConversionRight {
                            converts_to_stock_class_id: target,
                            ratio,
                        })
                    }
                    (target, ratio) => {
                        warn!(
                            stock_class_id = %id,
                            converts_to = ?target,
                            ratio = ?ratio,
                            "dropping conversion right without a usable target and ratio"
                        );
                        None
                    }
                }
            })
            .collect();

        StockClass {
            display_name: self.name,
            is_preferred: self.class_type.as_deref() == Some("PREFERRED"),
            votes_per_share: self.votes_per_share,
            rounding_type,
            board_approval_date: self.board_approval_date,
            conversion_rights,
            id,
        }
    }
}

#[derive(Deserialize)]
struct RawStockPlan {
    #[serde(default)]
    plan_name: String,
    #[serde(default)]
    initial_shares_reserved: Decimal,
    #[serde(default)]
    stock_class_id: Option<String>,
    #[serde(default)]
    stock_class_ids: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_ocf_date")]
    board_approval_date: Option<NaiveDate>,
}

impl RawStockPlan {
    fn into_stock_plan(self, id: String) -> StockPlan {
        StockPlan {
            id,
            plan_name: self.plan_name,
            initial_shares_reserved: self.initial_shares_reserved,
            stock_class_id: self
                .stock_class_id
                .or_else(|| self.stock_class_ids.into_iter().next()),
            board_approval_date: self.board_approval_date,
        }
    }
}

#[derive(Deserialize)]
struct RawPoolAdjustment {
    stock_plan_id: String,
    #[serde(default, deserialize_with = "deserialize_ocf_date")]
    date: Option<NaiveDate>,
    shares_reserved: Decimal,
}

#[derive(Deserialize)]
struct RawExerciseTrigger {
    #[serde(default)]
    conversion_right: Option<RawConversionRight>,
}

#[derive(Deserialize)]
struct RawTransaction {
    #[serde(default)]
    security_id: Option<String>,
    #[serde(default)]
    stakeholder_id: Option<String>,
    #[serde(default)]
    stock_class_id: Option<String>,
    #[serde(default)]
    stock_plan_id: Option<String>,
    #[serde(default)]
    quantity: Option<Decimal>,
    #[serde(default)]
    quantity_converted: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_lenient_ocf_date")]
    date: Option<NaiveDate>,
    #[serde(default)]
    exercise_triggers: Vec<RawExerciseTrigger>,
}

impl RawTransaction {
    fn into_transaction(self, id: String, kind: TransactionKind, security_id: String) -> Transaction {
        let exercise_triggers = self
            .exercise_triggers
            .into_iter()
            .map(|trigger| {
                let right = trigger.conversion_right;
                let converts_to_quantity = right
                    .as_ref()
                    .and_then(|right| right.conversion_mechanism.as_ref())
                    .and_then(|mechanism| mechanism.converts_to_quantity);
                ExerciseTrigger {
                    converts_to_stock_class_id: right
                        .and_then(|right| right.converts_to_stock_class_id),
                    converts_to_quantity,
                }
            })
            .collect();

        Transaction {
            id,
            kind,
            security_id,
            stakeholder_id: self.stakeholder_id,
            stock_class_id: self.stock_class_id,
            stock_plan_id: self.stock_plan_id,
            quantity: self.quantity,
            quantity_converted: self.quantity_converted,
            date: self.date,
            exercise_triggers,
        }
    }
}
