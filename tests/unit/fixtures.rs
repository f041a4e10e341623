//! A small but complete OCF export used by the integration tests.

use captable_rs::Model;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{Value, json};

/// Routes ledger logs to the test harness' captured output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 31).expect("valid date")
}

pub fn generated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 2, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub fn model_from(values: &[Value]) -> Model {
    let mut model = Model::new(as_of(), generated_at());
    model.consume_all(values);
    model
}

/// Issuer, three stakeholders, a common and two preferred classes, one plan
/// and a mix of issuances, decrements and whole-security reversals.
pub fn ocf_export() -> Vec<Value> {
    vec![
        json!({
            "id": "issuer-1", "object_type": "ISSUER",
            "legal_name": "Example Robotics, Inc.", "dba": "Example Robotics"
        }),
        json!({ "id": "sh-founder", "object_type": "STAKEHOLDER", "name": { "legal_name": "Frances Founder" } }),
        json!({ "id": "sh-fund", "object_type": "STAKEHOLDER", "name": { "legal_name": "Seed Fund I, L.P." } }),
        json!({ "id": "sh-employee", "object_type": "STAKEHOLDER", "name": { "legal_name": "Emery Employee" } }),
        json!({
            "id": "cls-common", "object_type": "STOCK_CLASS", "name": "Common Stock",
            "class_type": "COMMON", "votes_per_share": "1", "board_approval_date": "2019-02-01"
        }),
        json!({
            "id": "cls-seed", "object_type": "STOCK_CLASS", "name": "Series Seed Preferred",
            "class_type": "PREFERRED", "votes_per_share": "1", "board_approval_date": "2020-06-01",
            "conversion_rights": [{
                "converts_to_stock_class_id": "cls-common",
                "conversion_mechanism": {
                    "type": "RATIO_CONVERSION",
                    "ratio": { "numerator": "3", "denominator": "2" },
                    "rounding_type": "FLOOR"
                }
            }]
        }),
        json!({
            "id": "cls-a", "object_type": "STOCK_CLASS", "name": "Series A Preferred",
            "class_type": "PREFERRED", "votes_per_share": "1", "board_approval_date": "2022-09-15",
            "conversion_rights": [{
                "converts_to_stock_class_id": "cls-seed",
                "conversion_mechanism": {
                    "type": "RATIO_CONVERSION",
                    "ratio": { "numerator": "2", "denominator": "1" },
                    "rounding_type": "NORMAL"
                }
            }]
        }),
        json!({
            "id": "plan-2019", "object_type": "STOCK_PLAN", "plan_name": "2019 Equity Incentive Plan",
            "stock_class_ids": ["cls-common"], "initial_shares_reserved": "1000000",
            "board_approval_date": "2019-03-01"
        }),
        json!({
            "id": "adj-1", "object_type": "TX_STOCK_PLAN_POOL_ADJUSTMENT", "stock_plan_id": "plan-2019",
            "date": "2021-01-10", "shares_reserved": "1500000"
        }),
        json!({
            "id": "adj-2", "object_type": "TX_STOCK_PLAN_POOL_ADJUSTMENT", "stock_plan_id": "plan-2019",
            "date": "2023-05-20", "shares_reserved": "2000000"
        }),
        json!({
            "id": "tx-1", "object_type": "TX_STOCK_ISSUANCE", "security_id": "CS-1",
            "stakeholder_id": "sh-founder", "stock_class_id": "cls-common",
            "quantity": "5000000", "date": "2019-02-02"
        }),
        json!({
            "id": "tx-2", "object_type": "TX_STOCK_REPURCHASE", "security_id": "CS-1",
            "quantity": "250000", "date": "2021-07-01"
        }),
        json!({
            "id": "tx-3", "object_type": "TX_STOCK_ISSUANCE", "security_id": "PS-1",
            "stakeholder_id": "sh-fund", "stock_class_id": "cls-seed",
            "quantity": "1000001", "date": "2020-06-05"
        }),
        json!({
            "id": "tx-4", "object_type": "TX_STOCK_ISSUANCE", "security_id": "PA-1",
            "stakeholder_id": "sh-fund", "stock_class_id": "cls-a",
            "quantity": "400000", "date": "2022-09-20"
        }),
        json!({
            "id": "tx-5", "object_type": "TX_STOCK_ISSUANCE", "security_id": "PA-2",
            "stakeholder_id": "sh-fund", "stock_class_id": "cls-a",
            "quantity": "100000", "date": "2022-09-20"
        }),
        json!({
            "id": "tx-6", "object_type": "TX_STOCK_REISSUANCE", "security_id": "PA-2",
            "date": "2022-10-01"
        }),
        json!({
            "id": "tx-7", "object_type": "TX_PLAN_SECURITY_ISSUANCE", "security_id": "OPT-1",
            "stakeholder_id": "sh-employee", "stock_plan_id": "plan-2019",
            "quantity": "120000", "date": "2021-02-01"
        }),
        json!({
            "id": "tx-8", "object_type": "TX_PLAN_SECURITY_EXERCISE", "security_id": "OPT-1",
            "quantity": "20000", "date": "2023-02-01"
        }),
        json!({
            "id": "tx-9", "object_type": "TX_PLAN_SECURITY_ISSUANCE", "security_id": "OPT-2",
            "stakeholder_id": "sh-employee", "stock_plan_id": "plan-2019",
            "quantity": "30000", "date": "2021-02-01"
        }),
        json!({
            "id": "tx-10", "object_type": "TX_PLAN_SECURITY_RETRACTION", "security_id": "OPT-2",
            "date": "2021-03-01"
        }),
        json!({
            "id": "tx-11", "object_type": "TX_WARRANT_ISSUANCE", "security_id": "W-1",
            "stakeholder_id": "sh-fund",
            "exercise_triggers": [{
                "conversion_right": {
                    "converts_to_stock_class_id": "cls-seed",
                    "conversion_mechanism": { "converts_to_quantity": "10000" }
                }
            }],
            "date": "2020-06-05"
        }),
        json!({
            "id": "tx-12", "object_type": "TX_EQUITY_COMPENSATION_ISSUANCE", "security_id": "RSA-1",
            "stakeholder_id": "sh-founder", "stock_class_id": "cls-common",
            "quantity": "75000", "date": "2022-01-01"
        }),
        json!({ "id": "val-1", "object_type": "VALUATION", "price_per_share": { "amount": "0.10" } }),
    ]
}
