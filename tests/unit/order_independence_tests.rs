//! Holdings must not depend on the order records are consumed in.

#[cfg(test)]
mod tests_order_independence {
    use crate::fixtures::{model_from, ocf_export};
    use captable_rs::{CapTableSummary, HoldingCategories};
    use proptest::prelude::*;

    fn summarize(values: &[serde_json::Value]) -> CapTableSummary {
        let model = model_from(values);
        CapTableSummary::from_view(&model, HoldingCategories::ALL)
            .unwrap_or_else(|error| panic!("summary failed: {error}"))
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

        #[test]
        fn shuffled_export_yields_same_summary(shuffled in Just(ocf_export()).prop_shuffle()) {
            let expected = summarize(&ocf_export());
            let actual = summarize(&shuffled);

            prop_assert_eq!(&actual.stock_class_ids, &expected.stock_class_ids);
            prop_assert_eq!(&actual.stock_plan_ids, &expected.stock_plan_ids);
            prop_assert_eq!(&actual.options_remaining, &expected.options_remaining);
            prop_assert_eq!(actual.fully_diluted_total, expected.fully_diluted_total);
            // Rows follow stakeholder consumption order, so compare by id.
            prop_assert_eq!(actual.rows.len(), expected.rows.len());
            for row in &expected.rows {
                prop_assert_eq!(actual.row(&row.stakeholder_id), Some(row));
            }
        }
    }
}
