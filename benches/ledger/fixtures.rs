use captable_rs::Model;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{Value, json};

/// A synthetic export: one common and one preferred class, one plan, and per
/// stakeholder a stock issuance, a partial transfer, an option grant and a
/// retracted grant.
pub fn synthetic_export(stakeholders: usize) -> Vec<Value> {
    let mut values = vec![
        json!({ "id": "issuer", "object_type": "ISSUER", "legal_name": "Bench Corp" }),
        json!({
            "id": "common", "object_type": "STOCK_CLASS", "name": "Common",
            "class_type": "COMMON", "votes_per_share": "1"
        }),
        json!({
            "id": "seed", "object_type": "STOCK_CLASS", "name": "Seed",
            "class_type": "PREFERRED", "votes_per_share": "1",
            "conversion_rights": [{
                "converts_to_stock_class_id": "common",
                "conversion_mechanism": {
                    "ratio": { "numerator": "3", "denominator": "2" },
                    "rounding_type": "FLOOR"
                }
            }]
        }),
        json!({
            "id": "plan", "object_type": "STOCK_PLAN", "plan_name": "Plan",
            "stock_class_ids": ["common"], "initial_shares_reserved": "100000000"
        }),
    ];

    for i in 0..stakeholders {
        let holder = format!("sh-{i}");
        let class = if i % 4 == 0 { "seed" } else { "common" };
        values.push(json!({
            "id": holder, "object_type": "STAKEHOLDER", "name": { "legal_name": format!("Holder {i}") }
        }));
        values.push(json!({
            "id": format!("iss-{i}"), "object_type": "TX_STOCK_ISSUANCE", "security_id": format!("S-{i}"),
            "stakeholder_id": holder, "stock_class_id": class, "quantity": format!("{}", 1_000 + i)
        }));
        values.push(json!({
            "id": format!("xfer-{i}"), "object_type": "TX_STOCK_TRANSFER",
            "security_id": format!("S-{i}"), "quantity": "10"
        }));
        values.push(json!({
            "id": format!("opt-{i}"), "object_type": "TX_PLAN_SECURITY_ISSUANCE",
            "security_id": format!("O-{i}"), "stakeholder_id": holder,
            "stock_plan_id": "plan", "quantity": "500"
        }));
        values.push(json!({
            "id": format!("opt-r-{i}"), "object_type": "TX_PLAN_SECURITY_ISSUANCE",
            "security_id": format!("OR-{i}"), "stakeholder_id": holder,
            "stock_plan_id": "plan", "quantity": "50"
        }));
        values.push(json!({
            "id": format!("ret-{i}"), "object_type": "TX_PLAN_SECURITY_RETRACTION",
            "security_id": format!("OR-{i}")
        }));
    }

    values
}

pub fn model_from(values: &[Value]) -> Model {
    let as_of = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let generated_at = Utc
        .with_ymd_and_hms(2024, 1, 2, 0, 0, 0)
        .single()
        .unwrap_or_default();
    let mut model = Model::new(as_of, generated_at);
    model.consume_all(values);
    model
}
