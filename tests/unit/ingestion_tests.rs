#[cfg(test)]
mod tests_ingestion {
    use crate::fixtures::{init_tracing, model_from, ocf_export};
    use captable_rs::{CapTableView, LedgerError, Model, Record, RoundingType};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn model() -> Model {
        init_tracing();
        model_from(&ocf_export())
    }

    #[test]
    fn export_populates_reference_data() {
        let model = model();

        assert_eq!(model.issuer_name(), "Example Robotics");
        assert_eq!(model.stakeholders().len(), 3);
        let class_ids: Vec<&str> = model
            .stock_classes()
            .iter()
            .map(|class| class.id.as_str())
            .collect();
        assert_eq!(class_ids, vec!["cls-common", "cls-seed", "cls-a"]);
        assert_eq!(model.stock_plans().len(), 1);
        assert!(model.warrant_stock_ids().contains("cls-seed"));
        assert!(model.non_plan_stock_ids().contains("cls-common"));
        assert_eq!(
            model.stock_class("cls-seed").map(|class| class.rounding_type),
            Some(RoundingType::Floor)
        );
    }

    #[test]
    fn stock_holdings_net_repurchases_and_reissuances() {
        let model = model();
        let founder = model.stakeholder("sh-founder").expect("founder");
        let fund = model.stakeholder("sh-fund").expect("fund");
        let common = model.stock_class("cls-common").expect("common");
        let series_a = model.stock_class("cls-a").expect("series a");

        assert_eq!(model.stakeholder_stock_holdings(founder, common), dec!(4750000));
        assert_eq!(model.stakeholder_stock_holdings(fund, series_a), dec!(400000));
        assert_eq!(model.stakeholder_stock_holdings(fund, common), Decimal::ZERO);
    }

    #[test]
    fn plan_and_pool_figures() {
        let model = model();
        let employee = model.stakeholder("sh-employee").expect("employee");
        let plan = model.stock_plan("plan-2019").expect("plan");

        assert_eq!(plan.stock_class_id.as_deref(), Some("cls-common"));
        assert_eq!(
            model
                .stakeholder_stock_plan_holdings(employee, plan)
                .expect("plan holdings"),
            dec!(100000)
        );
        assert_eq!(
            model.options_remaining_for_issuance(plan).expect("remaining"),
            dec!(1900000)
        );
    }

    #[test]
    fn warrants_and_non_plan_awards_are_as_converted() {
        let model = model();
        let founder = model.stakeholder("sh-founder").expect("founder");
        let fund = model.stakeholder("sh-fund").expect("fund");
        let common = model.stock_class("cls-common").expect("common");
        let seed = model.stock_class("cls-seed").expect("seed");

        assert_eq!(
            model.stakeholder_warrant_holdings(fund, seed).expect("warrants"),
            dec!(15000)
        );
        assert_eq!(
            model
                .stakeholder_non_plan_holdings(founder, common)
                .expect("non-plan"),
            dec!(75000)
        );
    }

    #[test]
    fn multi_hop_conversion_compounds_ratios() {
        let model = model();
        let series_a = model.stock_class("cls-a").expect("series a");

        let path = model.conversion_path(series_a).expect("path");
        assert_eq!(path.path, vec!["cls-a", "cls-seed", "cls-common"]);
        assert_eq!(path.ratio_decimal(), dec!(3));
        assert_eq!(
            model.stock_class_conversion_ratio(series_a).expect("ratio"),
            dec!(3)
        );
    }

    #[test]
    fn view_matches_model() {
        let model = model();
        let view: &dyn CapTableView = &model;
        let plan = model.stock_plan("plan-2019").expect("plan");

        assert_eq!(view.as_of_date(), model.as_of_date());
        assert_eq!(view.stock_classes().len(), 3);
        assert_eq!(
            view.options_remaining_for_issuance(plan).expect("remaining"),
            dec!(1900000)
        );
    }

    #[test]
    fn record_decoding_errors_convert_into_ledger_errors() {
        let error = Record::from_json("{ not json").expect_err("invalid JSON");
        let error: LedgerError = error.into();
        assert!(matches!(error, LedgerError::Record(_)));
        assert!(error.to_string().contains("JSON"));
    }

    #[test]
    fn records_round_trip_through_consume() {
        let mut model = Model::new(crate::fixtures::as_of(), crate::fixtures::generated_at());
        for value in ocf_export() {
            match Record::from_value(&value) {
                Ok(record) => model.consume(record),
                Err(error) => panic!("fixture record failed to decode: {error}"),
            }
        }
        assert_eq!(model.stakeholders().len(), 3);
        assert_eq!(model.transactions_for_security("CS-1").len(), 2);
    }
}
